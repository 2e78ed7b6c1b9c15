pub mod bookmarks;
pub mod config;
pub mod events;
pub mod gesture;
pub mod i18n;
pub mod language;
pub mod session;
pub mod source;
pub mod text;
pub mod theme;
pub mod timer;
pub mod verse;
pub mod view;

// Re-export main types for convenience
pub use bookmarks::{BookmarkSet, BookmarkStore};
pub use config::{Config, Preferences};
pub use events::PreferenceEvent;
pub use gesture::{GestureIntent, GestureRecognizer, GestureThresholds, PointerKind, ScrollContext};
pub use language::Language;
pub use session::{
    BookmarkToggle, Direction, PracticeKind, PracticeSession, SessionMode, SessionPhase, SessionStatus,
    Step,
};
pub use source::{VerseCache, VerseSource};
pub use theme::Theme;
pub use timer::QuestionTimer;
pub use verse::{Translation, VerseDb, VerseId, VerseKind, VerseRecord};
pub use view::{render, CardFace, CardView, RenderContext};
