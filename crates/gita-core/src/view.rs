//! Derives what a card shows from session state. Front ends draw the result
//! and keep no card state of their own.

use crate::bookmarks::BookmarkSet;
use crate::i18n;
use crate::language::Language;
use crate::session::{PracticeKind, PracticeSession, SessionMode, SessionPhase};
use crate::text::{self, FormattedLine};
use crate::verse::{VerseDb, VerseRecord};

#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub language: Language,
    pub bookmarks: &'a BookmarkSet,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CardFace {
    /// Centered prompt on the question side of a practice card
    Prompt(String),
    Verse {
        lines: Vec<FormattedLine>,
        /// Closing salutation after a chapter conclusion
        namaste: bool,
    },
    Translation {
        text: String,
        missing: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub phase: SessionPhase,
    pub header: String,
    pub counter: Option<String>,
    pub face: CardFace,
    /// Small label on the card corner: VERSE, PUSHPIKA or TRANSLATION
    pub sticker: Option<&'static str>,
    pub hint_available: bool,
    pub hint: Option<String>,
    pub timer_visible: bool,
    pub starred: bool,
    pub has_prev_neighbor: bool,
    pub has_next_neighbor: bool,
    pub show_prev: bool,
}

/// None when the session has nothing left to show
pub fn render(session: &PracticeSession, db: &VerseDb, ctx: &RenderContext<'_>) -> Option<CardView> {
    let record = session.viewed_record()?;
    let language = ctx.language;
    let revealed = session.is_revealed();
    let (has_prev_neighbor, has_next_neighbor) = session.neighbor_availability(db);

    let (header, face, sticker) = match session.mode() {
        SessionMode::Practice(kind) => practice_card(kind, record, revealed, language),
        SessionMode::Reading | SessionMode::Starred => reading_card(record, revealed, language),
    };

    let hint_available = session.mode().is_practice() && !revealed && !record.is_conclusion();
    let hint = match session.mode().practice_kind() {
        Some(kind) if session.hint_shown() && hint_available => Some(hint_text(kind, record, language)),
        _ => None,
    };

    Some(CardView {
        phase: session.phase(),
        header,
        counter: counter(session, record),
        face,
        sticker,
        hint_available,
        hint,
        timer_visible: session.mode().is_practice()
            && !session.is_viewing_neighbor()
            && !record.is_conclusion(),
        starred: ctx.bookmarks.contains(record.id()),
        has_prev_neighbor,
        has_next_neighbor,
        show_prev: session.cursor() > 0,
    })
}

fn title(record: &VerseRecord, language: Language) -> String {
    if record.is_conclusion() {
        i18n::conclusion_title(language, record.chapter)
    } else {
        i18n::verse_title(language, record.chapter, record.verse)
    }
}

fn verse_face(record: &VerseRecord, language: Language) -> (CardFace, Option<&'static str>) {
    let conclusion = record.is_conclusion();
    let lines = text::format_lines(record.lines_for(language), !conclusion);
    let sticker = if conclusion {
        i18n::conclusion_label(language)
    } else {
        i18n::verse_label(language)
    };
    (
        CardFace::Verse {
            lines,
            namaste: conclusion,
        },
        Some(sticker),
    )
}

fn practice_card(
    kind: PracticeKind,
    record: &VerseRecord,
    revealed: bool,
    language: Language,
) -> (String, CardFace, Option<&'static str>) {
    if revealed {
        let (face, sticker) = verse_face(record, language);
        return (title(record, language), face, sticker);
    }

    match kind {
        PracticeKind::Shlokank => (String::new(), CardFace::Prompt(title(record, language)), None),
        PracticeKind::CharanBodha if record.is_conclusion() => (
            i18n::conclusion_short_title(language).to_string(),
            CardFace::Prompt(i18n::conclusion_prompt(language).to_string()),
            None,
        ),
        PracticeKind::CharanBodha => {
            let phrase = text::opening_phrase(record.lines_for(language));
            (
                i18n::identify_prompt(language).to_string(),
                CardFace::Prompt(format!("{}...", phrase.prompt)),
                None,
            )
        }
    }
}

fn reading_card(
    record: &VerseRecord,
    revealed: bool,
    language: Language,
) -> (String, CardFace, Option<&'static str>) {
    let header = if record.is_conclusion() {
        i18n::conclusion_short_title(language).to_string()
    } else {
        format!("{} · {}", record.chapter, record.verse)
    };

    if !revealed {
        let (face, sticker) = verse_face(record, language);
        return (header, face, sticker);
    }

    let face = match record.translation_for(language) {
        Some(text) => CardFace::Translation {
            text: text.to_string(),
            missing: false,
        },
        None => CardFace::Translation {
            text: i18n::translation_missing(language).to_string(),
            missing: true,
        },
    };
    (header, face, Some(i18n::translation_label(language)))
}

fn hint_text(kind: PracticeKind, record: &VerseRecord, language: Language) -> String {
    let hint = match kind {
        PracticeKind::CharanBodha => text::opening_phrase(record.lines_for(language)).hint,
        PracticeKind::Shlokank => text::first_word_hint(record.lines_for(language)).unwrap_or_default(),
    };
    if hint.is_empty() {
        "---".to_string()
    } else {
        hint
    }
}

/// "i / n". Chapter reading counts verses only and shows nothing on the
/// conclusion.
fn counter(session: &PracticeSession, record: &VerseRecord) -> Option<String> {
    match session.mode() {
        SessionMode::Reading => {
            if record.is_conclusion() {
                return None;
            }
            let total = session
                .working_set()
                .iter()
                .filter(|v| !v.is_conclusion())
                .count();
            Some(format!("{} / {}", session.cursor() + 1, total))
        }
        _ => Some(format!("{} / {}", session.cursor() + 1, session.len())),
    }
}
