use gita_core::config::Preferences;
use gita_core::i18n;
use gita_core::verse::CHAPTER_COUNT;
use gita_core::{
    BookmarkStore, BookmarkToggle, Direction, GestureIntent, GestureRecognizer, GestureThresholds,
    Language, PointerKind, PracticeKind, PracticeSession, PreferenceEvent, ScrollContext,
    SessionStatus, Step, VerseDb,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use std::collections::BTreeSet;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedSender;

use crate::tui::AppEvent;

/// How long a toast stays on screen
pub const TOAST_DURATION: Duration = Duration::from_secs(2);

/// Chapter cards per row on the selection screen
pub const GRID_COLUMNS: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Selection,
    Card,
    Completion,
    Jump,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeItem {
    Shlokank,
    CharanBodha,
    Reading,
    Starred,
    Jump,
}

impl HomeItem {
    pub fn all() -> Vec<HomeItem> {
        vec![
            HomeItem::Shlokank,
            HomeItem::CharanBodha,
            HomeItem::Reading,
            HomeItem::Starred,
            HomeItem::Jump,
        ]
    }

    pub fn title(&self) -> &'static str {
        match self {
            HomeItem::Shlokank => "Shlokank",
            HomeItem::CharanBodha => "Charan Bodha",
            HomeItem::Reading => "Adhyay Path",
            HomeItem::Starred => "Starred",
            HomeItem::Jump => "Jump to Verse",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            HomeItem::Shlokank => "Identify a verse from its chapter and number",
            HomeItem::CharanBodha => "Identify a verse from its opening phrase",
            HomeItem::Reading => "Read a chapter with translations",
            HomeItem::Starred => "Browse your starred verses",
            HomeItem::Jump => "Open any verse directly",
        }
    }
}

/// What confirming the chapter selection starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPurpose {
    Practice(PracticeKind),
    Reading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpField {
    Chapter,
    Verse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsItem {
    Language,
    Theme,
    Zoom,
}

impl SettingsItem {
    pub fn all() -> Vec<SettingsItem> {
        vec![SettingsItem::Language, SettingsItem::Theme, SettingsItem::Zoom]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
}

/// Where and when a mouse drag started
#[derive(Debug, Clone, Copy)]
pub struct DragStart {
    pub column: u16,
    pub row: u16,
    pub at: Instant,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub screen: Screen,

    // Home menu
    pub home_state: ListState,

    // Chapter selection
    pub selection_purpose: SelectionPurpose,
    pub selected_chapters: BTreeSet<u8>,
    pub chapter_cursor: u8,

    // Jump
    pub jump_field: JumpField,
    pub jump_chapter: u8,
    pub jump_verse_state: ListState,

    // Session
    pub session: Option<PracticeSession>,
    /// Screen that Esc returns to from the session
    pub session_origin: Screen,
    pub card_scroll: u16,
    pub card_max_scroll: u16,

    // Settings popup
    pub show_settings: bool,
    pub settings_state: ListState,

    // Feedback
    pub toast: Option<Toast>,
    next_toast_id: u64,
    pub status: Option<String>,

    // Gestures
    pub gestures: GestureRecognizer,
    pub drag: Option<DragStart>,
    // Card area for mouse hit-testing (updated during render)
    pub card_area: Option<Rect>,

    // Data
    pub db: VerseDb,
    pub loading: bool,
    pub preferences: Preferences,
    pub bookmarks: BookmarkStore,
    pub rng: StdRng,
    events: Option<UnboundedSender<AppEvent>>,
}

impl App {
    pub fn new(
        preferences: Preferences,
        bookmarks: BookmarkStore,
        events: Option<UnboundedSender<AppEvent>>,
    ) -> Self {
        let mut home_state = ListState::default();
        home_state.select(Some(0));
        let mut settings_state = ListState::default();
        settings_state.select(Some(0));

        Self {
            should_quit: false,
            screen: Screen::Home,

            home_state,

            selection_purpose: SelectionPurpose::Practice(PracticeKind::Shlokank),
            selected_chapters: BTreeSet::new(),
            chapter_cursor: 1,

            jump_field: JumpField::Chapter,
            jump_chapter: 1,
            jump_verse_state: ListState::default(),

            session: None,
            session_origin: Screen::Home,
            card_scroll: 0,
            card_max_scroll: 0,

            show_settings: false,
            settings_state,

            toast: None,
            next_toast_id: 0,
            status: Some("Loading verses...".to_string()),

            gestures: GestureRecognizer::new(GestureThresholds::terminal()),
            drag: None,
            card_area: None,

            db: VerseDb::new(),
            loading: true,
            preferences,
            bookmarks,
            rng: StdRng::from_entropy(),
            events,
        }
    }

    pub fn language(&self) -> Language {
        self.preferences.language()
    }

    /// Whether the question timer display needs refreshing
    pub fn timer_running(&self) -> bool {
        self.screen == Screen::Card && self.session.as_ref().is_some_and(|s| s.timer_running())
    }

    pub fn on_verses_loaded(&mut self, result: anyhow::Result<VerseDb>) {
        self.loading = false;
        match result {
            Ok(db) => {
                tracing::info!(verses = db.len(), "verse collection ready");
                self.status = None;
                self.db = db;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load verse collection");
                self.status = Some(format!("Could not load verses: {}", e));
            }
        }
    }

    // Toasts
    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.next_toast_id += 1;
        let id = self.next_toast_id;
        self.toast = Some(Toast {
            id,
            message: message.into(),
        });

        if let Some(tx) = self.events.clone() {
            tokio::spawn(async move {
                tokio::time::sleep(TOAST_DURATION).await;
                let _ = tx.send(AppEvent::ToastExpired(id));
            });
        }
    }

    /// A newer toast keeps its full duration
    pub fn expire_toast(&mut self, id: u64) {
        if self.toast.as_ref().is_some_and(|t| t.id == id) {
            self.toast = None;
        }
    }

    pub fn on_preference_changed(&mut self, event: PreferenceEvent) {
        let message = match event {
            PreferenceEvent::LanguageChanged(language) => format!("Language: {}", language.display_name()),
            PreferenceEvent::ThemeChanged(theme) => format!("Theme: {}", theme.as_str()),
            PreferenceEvent::ZoomChanged(zoom) => format!("Zoom: {:.0}%", zoom * 100.0),
        };
        self.show_toast(message);
    }

    // Home menu
    pub fn selected_home_item(&self) -> Option<HomeItem> {
        self.home_state.selected().and_then(|i| HomeItem::all().get(i).copied())
    }

    pub fn home_nav_down(&mut self) {
        let len = HomeItem::all().len();
        let i = self.home_state.selected().unwrap_or(0);
        self.home_state.select(Some((i + 1).min(len - 1)));
    }

    pub fn home_nav_up(&mut self) {
        let i = self.home_state.selected().unwrap_or(0);
        self.home_state.select(Some(i.saturating_sub(1)));
    }

    pub fn home_enter(&mut self) {
        match self.selected_home_item() {
            Some(HomeItem::Shlokank) => self.open_selection(SelectionPurpose::Practice(PracticeKind::Shlokank)),
            Some(HomeItem::CharanBodha) => {
                self.open_selection(SelectionPurpose::Practice(PracticeKind::CharanBodha))
            }
            Some(HomeItem::Reading) => self.open_selection(SelectionPurpose::Reading),
            Some(HomeItem::Starred) => self.open_starred(),
            Some(HomeItem::Jump) => self.open_jump(),
            None => {}
        }
    }

    fn open_selection(&mut self, purpose: SelectionPurpose) {
        self.selection_purpose = purpose;
        self.selected_chapters.clear();
        self.chapter_cursor = 1;
        self.screen = Screen::Selection;
    }

    fn open_starred(&mut self) {
        match PracticeSession::start_starred(&self.db, self.bookmarks.set()) {
            Some(session) => self.enter_session(session),
            None => self.show_toast(i18n::no_starred()),
        }
    }

    // Chapter selection
    pub fn move_chapter_cursor(&mut self, delta: i8) {
        let target = self.chapter_cursor as i16 + delta as i16;
        self.chapter_cursor = target.clamp(1, CHAPTER_COUNT as i16) as u8;
    }

    /// Practice toggles the chapter; reading opens it straight away
    pub fn select_chapter(&mut self) {
        let chapter = self.chapter_cursor;
        match self.selection_purpose {
            SelectionPurpose::Practice(_) => {
                if !self.selected_chapters.remove(&chapter) {
                    self.selected_chapters.insert(chapter);
                }
            }
            SelectionPurpose::Reading => {
                if let Some(session) = PracticeSession::start_reading(&self.db, chapter) {
                    self.enter_session(session);
                }
            }
        }
    }

    pub fn all_chapters_selected(&self) -> bool {
        self.selected_chapters.len() == CHAPTER_COUNT as usize
    }

    pub fn toggle_all_chapters(&mut self) {
        if !matches!(self.selection_purpose, SelectionPurpose::Practice(_)) {
            return;
        }
        if self.all_chapters_selected() {
            self.selected_chapters.clear();
        } else {
            self.selected_chapters = (1..=CHAPTER_COUNT).collect();
        }
    }

    /// Practice needs loaded verses and at least one chapter
    pub fn can_start(&self) -> bool {
        matches!(self.selection_purpose, SelectionPurpose::Practice(_))
            && !self.selected_chapters.is_empty()
            && !self.db.is_empty()
    }

    /// No-op when nothing is selected or the selection holds no verses
    pub fn start_practice(&mut self) {
        let SelectionPurpose::Practice(kind) = self.selection_purpose else {
            return;
        };
        if !self.can_start() {
            return;
        }
        if let Some(session) =
            PracticeSession::start_session(&self.db, &self.selected_chapters, kind, &mut self.rng)
        {
            self.enter_session(session);
        }
    }

    // Jump
    fn open_jump(&mut self) {
        self.jump_field = JumpField::Chapter;
        self.jump_chapter = self.db.chapters().first().copied().unwrap_or(1);
        self.jump_verse_state.select(Some(0));
        self.screen = Screen::Jump;
    }

    pub fn jump_verses(&self) -> Vec<u16> {
        self.db
            .verses_for_chapter(self.jump_chapter)
            .iter()
            .filter(|v| !v.is_conclusion())
            .map(|v| v.verse)
            .collect()
    }

    pub fn jump_nav(&mut self, delta: i8) {
        match self.jump_field {
            JumpField::Chapter => {
                let target = self.jump_chapter as i16 + delta as i16;
                self.jump_chapter = target.clamp(1, CHAPTER_COUNT as i16) as u8;
                self.jump_verse_state.select(Some(0));
            }
            JumpField::Verse => {
                let len = self.jump_verses().len();
                if len > 0 {
                    let i = self.jump_verse_state.selected().unwrap_or(0) as isize + delta as isize;
                    self.jump_verse_state.select(Some(i.clamp(0, len as isize - 1) as usize));
                }
            }
        }
    }

    pub fn jump_enter(&mut self) {
        match self.jump_field {
            JumpField::Chapter => {
                if !self.jump_verses().is_empty() {
                    self.jump_field = JumpField::Verse;
                }
            }
            JumpField::Verse => {
                let verses = self.jump_verses();
                let Some(verse) = self.jump_verse_state.selected().and_then(|i| verses.get(i)) else {
                    return;
                };
                if let Some(session) = PracticeSession::start_at(&self.db, self.jump_chapter, *verse) {
                    self.enter_session(session);
                }
            }
        }
    }

    pub fn jump_back(&mut self) {
        match self.jump_field {
            JumpField::Verse => self.jump_field = JumpField::Chapter,
            JumpField::Chapter => self.screen = Screen::Home,
        }
    }

    // Session
    fn enter_session(&mut self, session: PracticeSession) {
        tracing::debug!(mode = ?session.mode(), cards = session.len(), "entering session");
        // Chapter pickers get the user back; everything else lands on the menu
        self.session_origin = match self.screen {
            Screen::Selection => Screen::Selection,
            _ => Screen::Home,
        };
        self.session = Some(session);
        self.card_scroll = 0;
        self.screen = Screen::Card;
    }

    /// Leave the card screen for wherever the session was started from
    pub fn leave_session(&mut self) {
        self.session = None;
        self.drag = None;
        self.screen = self.session_origin;
    }

    fn after_move(&mut self) {
        self.card_scroll = 0;
        match self.session.as_ref().map(|s| s.status()) {
            Some(SessionStatus::Completed) => self.screen = Screen::Completion,
            Some(SessionStatus::Terminated) => {
                self.session = None;
                self.screen = Screen::Home;
            }
            _ => {}
        }
    }

    pub fn reveal(&mut self) {
        if let Some(session) = &mut self.session {
            session.reveal();
        }
        self.card_scroll = 0;
    }

    pub fn advance(&mut self, direction: Direction) {
        if let Some(session) = &mut self.session {
            session.advance(direction);
        }
        self.after_move();
    }

    pub fn peek(&mut self, step: Step) {
        if let Some(session) = &mut self.session {
            if session.peek_neighbor(&self.db, step) {
                self.card_scroll = 0;
            }
        }
    }

    pub fn show_hint(&mut self) {
        if let Some(session) = &mut self.session {
            session.show_hint();
        }
    }

    pub fn toggle_star(&mut self) {
        let Some(session) = &mut self.session else {
            return;
        };
        match session.toggle_bookmark(&mut self.bookmarks) {
            Ok(Some(outcome)) => {
                let starred = outcome == BookmarkToggle::Added;
                self.show_toast(i18n::star_toast(starred));
                self.after_move();
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "failed to save bookmarks");
                self.show_toast("Could not save starred list");
                self.after_move();
            }
        }
    }

    pub fn restart(&mut self) {
        if let Some(session) = &mut self.session {
            session.restart(&mut self.rng);
            self.card_scroll = 0;
            self.screen = Screen::Card;
        }
    }

    pub fn next_chapter(&mut self) {
        if let Some(session) = &mut self.session {
            if session.next_chapter(&self.db) {
                self.card_scroll = 0;
                self.screen = Screen::Card;
            }
        }
    }

    pub fn can_continue_reading(&self) -> bool {
        self.session.as_ref().and_then(|s| s.following_chapter()).is_some()
    }

    // Card scrolling
    pub fn scroll_card_down(&mut self) {
        self.card_scroll = (self.card_scroll + 1).min(self.card_max_scroll);
    }

    pub fn scroll_card_up(&mut self) {
        self.card_scroll = self.card_scroll.saturating_sub(1);
    }

    pub fn scroll_context(&self) -> ScrollContext {
        ScrollContext {
            scrollable: self.card_max_scroll > 0,
            at_top: self.card_scroll == 0,
            at_bottom: self.card_scroll >= self.card_max_scroll,
        }
    }

    // Gestures
    pub fn begin_drag(&mut self, column: u16, row: u16) {
        self.drag = Some(DragStart {
            column,
            row,
            at: Instant::now(),
        });
    }

    pub fn end_drag(&mut self, column: u16, row: u16) {
        let Some(start) = self.drag.take() else {
            return;
        };
        let dx = column as f32 - start.column as f32;
        let dy = row as f32 - start.row as f32;
        let intent = self.gestures.classify(
            PointerKind::Mouse,
            dx,
            dy,
            start.at.elapsed(),
            self.scroll_context(),
        );
        tracing::trace!(dx, dy, ?intent, "drag classified");

        match intent {
            GestureIntent::Next => self.advance(Direction::Next),
            GestureIntent::Previous => self.advance(Direction::Previous),
            GestureIntent::Flip => self.reveal(),
            GestureIntent::None => {}
        }
    }

    // Settings
    pub fn toggle_settings(&mut self) {
        self.show_settings = !self.show_settings;
    }

    pub fn selected_setting(&self) -> Option<SettingsItem> {
        self.settings_state
            .selected()
            .and_then(|i| SettingsItem::all().get(i).copied())
    }

    pub fn settings_nav_down(&mut self) {
        let len = SettingsItem::all().len();
        let i = self.settings_state.selected().unwrap_or(0);
        self.settings_state.select(Some((i + 1).min(len - 1)));
    }

    pub fn settings_nav_up(&mut self) {
        let i = self.settings_state.selected().unwrap_or(0);
        self.settings_state.select(Some(i.saturating_sub(1)));
    }

    /// Change the selected setting; `forward` picks the direction for
    /// language and zoom.
    pub fn adjust_setting(&mut self, forward: bool) {
        let result = match self.selected_setting() {
            Some(SettingsItem::Language) => {
                let all = Language::all();
                let current = all.iter().position(|l| *l == self.language()).unwrap_or(0);
                let next = if forward {
                    (current + 1) % all.len()
                } else {
                    (current + all.len() - 1) % all.len()
                };
                self.preferences.set_language(all[next])
            }
            Some(SettingsItem::Theme) => self.preferences.toggle_theme(),
            Some(SettingsItem::Zoom) => self.preferences.step_zoom(if forward { 1 } else { -1 }),
            None => Ok(()),
        };

        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to save preferences");
            self.show_toast("Could not save preferences");
        }
    }
}
