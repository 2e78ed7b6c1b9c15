//! Practice session state machine.
//!
//! A session walks a working set of verses one card at a time. Each card has a
//! question side and an answer side; in the practice modes a timer runs while
//! the question side of the session's own card is showing. While the answer is
//! showing the learner may peek at neighboring verses of the same chapter
//! without losing their place.

use anyhow::Result;
use rand::Rng;
use std::collections::BTreeSet;
use std::time::Duration;

use crate::bookmarks::{BookmarkSet, BookmarkStore};
use crate::timer::QuestionTimer;
use crate::verse::{VerseDb, VerseRecord, CHAPTER_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PracticeKind {
    /// Shlokank: identify the verse from its chapter and verse number
    Shlokank,
    /// Charan Bodha: identify the verse from its opening phrase
    CharanBodha,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Practice(PracticeKind),
    /// Adhyay Path: one chapter in order, verse on the front, translation on the back
    Reading,
    /// Browsing the starred list
    Starred,
}

impl SessionMode {
    pub fn practice_kind(&self) -> Option<PracticeKind> {
        match self {
            SessionMode::Practice(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn is_practice(&self) -> bool {
        self.practice_kind().is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Previous,
    Next,
}

impl Step {
    pub fn offset(self) -> isize {
        match self {
            Step::Previous => -1,
            Step::Next => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Active,
    /// Advanced past the last card
    Completed,
    /// The working set became empty; the caller must leave the session
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Question,
    Answer,
    Completed,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkToggle {
    Added,
    Removed,
    /// Unstarred while browsing the starred list; the card left the session
    RemovedFromSession,
    /// As above, and nothing is left to browse
    SessionEmptied,
}

/// Uniform in-place Fisher–Yates shuffle
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

#[derive(Debug, Clone)]
pub struct PracticeSession {
    mode: SessionMode,
    working_set: Vec<VerseRecord>,
    cursor: usize,
    revealed: bool,
    /// Set while peeking at a neighbor of the current card
    neighbor: Option<VerseRecord>,
    hint_shown: bool,
    timer: QuestionTimer,
    status: SessionStatus,
}

impl PracticeSession {
    fn with_items(mode: SessionMode, working_set: Vec<VerseRecord>, cursor: usize) -> Self {
        let mut session = Self {
            mode,
            working_set,
            cursor,
            revealed: false,
            neighbor: None,
            hint_shown: false,
            timer: QuestionTimer::new(),
            status: SessionStatus::Active,
        };
        session.load_current();
        session
    }

    /// Shuffled quiz over the verses of `chapters`. Chapter conclusions are
    /// never quiz targets. Returns None when nothing matches.
    pub fn start_session<R: Rng + ?Sized>(
        db: &VerseDb,
        chapters: &BTreeSet<u8>,
        kind: PracticeKind,
        rng: &mut R,
    ) -> Option<Self> {
        let mut pool = db.practice_pool(chapters);
        if pool.is_empty() {
            tracing::debug!(?chapters, "no verses for selection, session not started");
            return None;
        }
        shuffle(&mut pool, rng);
        tracing::info!(?kind, verses = pool.len(), "practice session started");
        Some(Self::with_items(SessionMode::Practice(kind), pool, 0))
    }

    /// Read one chapter in order, conclusion included
    pub fn start_reading(db: &VerseDb, chapter: u8) -> Option<Self> {
        Self::start_at_index(db, chapter, 0)
    }

    /// Read a chapter starting at a given verse
    pub fn start_at(db: &VerseDb, chapter: u8, verse: u16) -> Option<Self> {
        let position = db
            .verses_for_chapter(chapter)
            .iter()
            .position(|v| v.verse == verse)?;
        Self::start_at_index(db, chapter, position)
    }

    fn start_at_index(db: &VerseDb, chapter: u8, cursor: usize) -> Option<Self> {
        let verses: Vec<VerseRecord> =
            db.verses_for_chapter(chapter).into_iter().cloned().collect();
        if cursor >= verses.len() {
            return None;
        }
        Some(Self::with_items(SessionMode::Reading, verses, cursor))
    }

    /// Browse starred verses in collection order. None when no starred verse
    /// exists in the collection.
    pub fn start_starred(db: &VerseDb, bookmarks: &BookmarkSet) -> Option<Self> {
        let starred: Vec<VerseRecord> = db
            .all()
            .iter()
            .filter(|v| bookmarks.contains(v.id()))
            .cloned()
            .collect();
        if starred.is_empty() {
            return None;
        }
        Some(Self::with_items(SessionMode::Starred, starred, 0))
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn working_set(&self) -> &[VerseRecord] {
        &self.working_set
    }

    pub fn len(&self) -> usize {
        self.working_set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.working_set.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn hint_shown(&self) -> bool {
        self.hint_shown
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    pub fn phase(&self) -> SessionPhase {
        match self.status {
            SessionStatus::Completed => SessionPhase::Completed,
            SessionStatus::Terminated => SessionPhase::Terminated,
            SessionStatus::Active if self.revealed => SessionPhase::Answer,
            SessionStatus::Active => SessionPhase::Question,
        }
    }

    /// The session's own card at the cursor
    pub fn current_record(&self) -> Option<&VerseRecord> {
        self.working_set.get(self.cursor)
    }

    /// The card on screen: a peeked neighbor, or the current card
    pub fn viewed_record(&self) -> Option<&VerseRecord> {
        self.neighbor.as_ref().or_else(|| self.current_record())
    }

    pub fn is_viewing_neighbor(&self) -> bool {
        self.neighbor.is_some()
    }

    pub fn timer_running(&self) -> bool {
        self.timer.is_running()
    }

    pub fn elapsed(&self) -> Duration {
        self.timer.elapsed()
    }

    pub fn timer(&self) -> &QuestionTimer {
        &self.timer
    }

    /// Reset per-card state for the card at the cursor
    fn load_current(&mut self) {
        self.revealed = false;
        self.neighbor = None;
        self.hint_shown = false;
        if self.mode.is_practice() && self.status == SessionStatus::Active {
            self.timer.start();
        } else {
            self.timer.stop();
        }
    }

    /// Flip between question and answer. Hiding the answer returns to the
    /// session's own card and restarts its timer.
    pub fn reveal(&mut self) {
        if !self.is_active() {
            return;
        }
        self.hint_shown = false;
        if self.revealed {
            self.load_current();
        } else {
            self.timer.stop();
            self.revealed = true;
        }
    }

    pub fn advance(&mut self, direction: Direction) {
        if !self.is_active() {
            return;
        }
        match direction {
            Direction::Next => {
                if self.cursor + 1 < self.working_set.len() {
                    self.cursor += 1;
                    self.load_current();
                } else if self.mode != SessionMode::Starred {
                    self.finish(SessionStatus::Completed);
                }
            }
            Direction::Previous => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.load_current();
                }
            }
        }
    }

    fn finish(&mut self, status: SessionStatus) {
        self.status = status;
        self.revealed = false;
        self.neighbor = None;
        self.hint_shown = false;
        self.timer.stop();
        tracing::debug!(?status, "session finished");
    }

    /// Show the previous/next verse of the viewed card's chapter without
    /// moving the cursor. Only while the answer is showing in a practice mode.
    /// Returns whether the view moved.
    pub fn peek_neighbor(&mut self, db: &VerseDb, step: Step) -> bool {
        if !self.is_active() || !self.revealed || !self.mode.is_practice() {
            return false;
        }
        let Some(viewed) = self.viewed_record().map(VerseRecord::id) else {
            return false;
        };
        let Some(target) = db.neighbor(viewed, step.offset()) else {
            return false;
        };

        if self.current_record().map(VerseRecord::id) == Some(target.id()) {
            self.neighbor = None;
        } else {
            self.neighbor = Some(target.clone());
        }
        true
    }

    /// Whether a previous/next neighbor exists for the viewed card
    pub fn neighbor_availability(&self, db: &VerseDb) -> (bool, bool) {
        if !self.is_active() || !self.revealed || !self.mode.is_practice() {
            return (false, false);
        }
        match self.viewed_record() {
            Some(viewed) => (
                db.neighbor(viewed.id(), -1).is_some(),
                db.neighbor(viewed.id(), 1).is_some(),
            ),
            None => (false, false),
        }
    }

    /// Only meaningful on the question side of a practice card
    pub fn show_hint(&mut self) -> bool {
        if !self.is_active() || self.revealed || !self.mode.is_practice() {
            return false;
        }
        self.hint_shown = true;
        true
    }

    /// Star or unstar the viewed card. In starred browsing, unstarring also
    /// drops the card from the working set. The in-memory state is updated
    /// even if persisting fails; the write error is returned afterwards.
    pub fn toggle_bookmark(&mut self, store: &mut BookmarkStore) -> Result<Option<BookmarkToggle>> {
        if self.status == SessionStatus::Terminated {
            return Ok(None);
        }
        let Some(id) = self.viewed_record().map(VerseRecord::id) else {
            return Ok(None);
        };

        let written = store.toggle(id);
        let starred = store.contains(id);

        let outcome = if starred {
            BookmarkToggle::Added
        } else if self.mode == SessionMode::Starred && !self.is_viewing_neighbor() {
            self.working_set.remove(self.cursor);
            if self.working_set.is_empty() {
                self.cursor = 0;
                self.finish(SessionStatus::Terminated);
                BookmarkToggle::SessionEmptied
            } else {
                self.cursor = self.cursor.min(self.working_set.len() - 1);
                self.load_current();
                BookmarkToggle::RemovedFromSession
            }
        } else {
            BookmarkToggle::Removed
        };

        written?;
        Ok(Some(outcome))
    }

    /// Start over from the first card. Practice sessions are re-shuffled;
    /// reading keeps chapter order.
    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.working_set.is_empty() {
            return;
        }
        if self.mode.is_practice() {
            shuffle(&mut self.working_set, rng);
        }
        self.cursor = 0;
        self.status = SessionStatus::Active;
        self.load_current();
    }

    /// Chapter that follows a completed reading session, if any
    pub fn following_chapter(&self) -> Option<u8> {
        if self.mode != SessionMode::Reading {
            return None;
        }
        let chapter = self.working_set.first()?.chapter;
        (chapter < CHAPTER_COUNT).then_some(chapter + 1)
    }

    /// After completing a chapter, continue reading the next one
    pub fn next_chapter(&mut self, db: &VerseDb) -> bool {
        if self.status != SessionStatus::Completed {
            return false;
        }
        let Some(chapter) = self.following_chapter() else {
            return false;
        };
        let verses: Vec<VerseRecord> =
            db.verses_for_chapter(chapter).into_iter().cloned().collect();
        if verses.is_empty() {
            return false;
        }
        self.working_set = verses;
        self.cursor = 0;
        self.status = SessionStatus::Active;
        self.load_current();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verse::tests::{record, sample_db};
    use crate::verse::VerseId;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn chapters(list: &[u8]) -> BTreeSet<u8> {
        list.iter().copied().collect()
    }

    fn three_verse_db() -> VerseDb {
        VerseDb::from_records(vec![
            record(1, 1, &["one"]),
            record(1, 2, &["two"]),
            record(1, 3, &["three"]),
        ])
    }

    fn ids(records: &[VerseRecord]) -> Vec<VerseId> {
        let mut ids: Vec<VerseId> = records.iter().map(VerseRecord::id).collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_shuffle_is_permutation() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut items: Vec<u32> = (0..17).collect();
            shuffle(&mut items, &mut rng);
            let mut sorted = items.clone();
            sorted.sort();
            assert_eq!(sorted, (0..17).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_shuffle_reaches_every_order() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..600 {
            let mut items = [1, 2, 3];
            shuffle(&mut items, &mut rng);
            seen.insert(items);
        }
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn test_three_verse_scenario() {
        let db = three_verse_db();
        let mut rng = StdRng::seed_from_u64(1);
        let mut session =
            PracticeSession::start_session(&db, &chapters(&[1]), PracticeKind::Shlokank, &mut rng).unwrap();

        assert_eq!(ids(session.working_set()), ids(db.all()));
        assert_eq!(session.cursor(), 0);
        assert!(!session.is_revealed());
        assert!(session.timer_running());

        session.reveal();
        assert!(session.is_revealed());
        assert!(!session.timer_running());

        session.advance(Direction::Next);
        assert_eq!(session.cursor(), 1);
        assert!(!session.is_revealed());
        assert!(session.timer_running());

        session.advance(Direction::Next);
        assert_eq!(session.cursor(), 2);
        session.advance(Direction::Next);
        assert_eq!(session.phase(), SessionPhase::Completed);
        assert_eq!(session.cursor(), 2);
        assert!(!session.timer_running());

        // Completed is terminal until restart
        session.advance(Direction::Next);
        session.reveal();
        assert_eq!(session.phase(), SessionPhase::Completed);
    }

    #[test]
    fn test_start_excludes_conclusions_and_unselected() {
        let db = sample_db();
        let mut rng = StdRng::seed_from_u64(3);
        let session =
            PracticeSession::start_session(&db, &chapters(&[1]), PracticeKind::CharanBodha, &mut rng).unwrap();

        assert_eq!(session.len(), 3);
        assert!(session.working_set().iter().all(|v| v.chapter == 1 && !v.is_conclusion()));
    }

    #[test]
    fn test_start_with_nothing_selected_is_noop() {
        let db = sample_db();
        let mut rng = StdRng::seed_from_u64(3);

        assert!(PracticeSession::start_session(&db, &chapters(&[]), PracticeKind::Shlokank, &mut rng).is_none());
        assert!(PracticeSession::start_session(&db, &chapters(&[9]), PracticeKind::Shlokank, &mut rng).is_none());
        assert!(PracticeSession::start_session(&VerseDb::new(), &chapters(&[1]), PracticeKind::Shlokank, &mut rng)
            .is_none());
    }

    #[test]
    fn test_previous_is_noop_at_start() {
        let db = three_verse_db();
        let mut rng = StdRng::seed_from_u64(2);
        let mut session =
            PracticeSession::start_session(&db, &chapters(&[1]), PracticeKind::Shlokank, &mut rng).unwrap();
        let order = ids(session.working_set());

        session.advance(Direction::Previous);
        assert_eq!(session.cursor(), 0);
        session.advance(Direction::Next);
        session.advance(Direction::Previous);
        assert_eq!(session.cursor(), 0);
        assert_eq!(ids(session.working_set()), order);
    }

    #[test]
    fn test_cursor_never_leaves_range() {
        let db = sample_db();
        let mut rng = StdRng::seed_from_u64(11);
        let mut session =
            PracticeSession::start_session(&db, &chapters(&[1, 2]), PracticeKind::Shlokank, &mut rng).unwrap();
        let len = session.len();

        let mut previous = session.cursor();
        while session.is_active() {
            session.advance(Direction::Next);
            if session.is_active() {
                assert_eq!(session.cursor(), previous + 1);
            }
            assert!(session.cursor() < len);
            previous = session.cursor();
        }
        assert_eq!(session.phase(), SessionPhase::Completed);
    }

    #[test]
    fn test_double_reveal_restores_own_card() {
        let db = sample_db();
        let mut rng = StdRng::seed_from_u64(5);
        let mut session =
            PracticeSession::start_session(&db, &chapters(&[1]), PracticeKind::CharanBodha, &mut rng).unwrap();
        let own = session.current_record().unwrap().id();

        session.reveal();
        let moved = session.peek_neighbor(&db, Step::Next) || session.peek_neighbor(&db, Step::Previous);
        assert!(moved);
        assert!(session.is_viewing_neighbor());
        assert!(!session.timer_running());

        session.reveal();
        assert!(!session.is_revealed());
        assert_eq!(session.viewed_record().unwrap().id(), own);
        assert!(session.timer_running());

        session.reveal();
        session.reveal();
        assert!(!session.is_revealed());
        assert_eq!(session.viewed_record().unwrap().id(), own);
    }

    #[test]
    fn test_peek_requires_answer_side() {
        let db = sample_db();
        let mut rng = StdRng::seed_from_u64(5);
        let mut session =
            PracticeSession::start_session(&db, &chapters(&[1]), PracticeKind::Shlokank, &mut rng).unwrap();

        assert!(!session.peek_neighbor(&db, Step::Next));
        assert!(!session.peek_neighbor(&db, Step::Previous));
        assert!(!session.is_viewing_neighbor());
    }

    #[test]
    fn test_peek_walks_chapter_not_working_set() {
        let db = sample_db();
        let session_db = VerseDb::from_records(vec![record(1, 2, &["x"])]);
        let mut rng = StdRng::seed_from_u64(5);
        let mut session =
            PracticeSession::start_session(&session_db, &chapters(&[1]), PracticeKind::Shlokank, &mut rng).unwrap();
        session.reveal();

        assert!(session.peek_neighbor(&db, Step::Next));
        assert_eq!(session.viewed_record().unwrap().id(), VerseId::new(1, 3));
        assert!(session.peek_neighbor(&db, Step::Next));
        assert_eq!(session.viewed_record().unwrap().id(), VerseId::new(1, 999));
        assert!(!session.peek_neighbor(&db, Step::Next));
        assert_eq!(session.neighbor_availability(&db), (true, false));

        assert!(session.peek_neighbor(&db, Step::Previous));
        assert!(session.peek_neighbor(&db, Step::Previous));
        assert!(!session.is_viewing_neighbor());
        assert_eq!(session.cursor(), 0);
        assert!(session.is_revealed());
    }

    #[test]
    fn test_hint_only_on_question_side() {
        let db = sample_db();
        let mut rng = StdRng::seed_from_u64(5);
        let mut session =
            PracticeSession::start_session(&db, &chapters(&[2]), PracticeKind::CharanBodha, &mut rng).unwrap();

        assert!(session.show_hint());
        assert!(session.hint_shown());
        session.reveal();
        assert!(!session.hint_shown());
        assert!(!session.show_hint());

        let mut reading = PracticeSession::start_reading(&db, 2).unwrap();
        assert!(!reading.show_hint());
    }

    #[test]
    fn test_bookmark_round_trip_on_neighbor() {
        let db = sample_db();
        let mut store = BookmarkStore::in_memory(BookmarkSet::new());
        let mut rng = StdRng::seed_from_u64(9);
        let single = VerseDb::from_records(vec![record(1, 1, &["x"])]);
        let mut session =
            PracticeSession::start_session(&single, &chapters(&[1]), PracticeKind::Shlokank, &mut rng).unwrap();

        session.reveal();
        assert!(session.peek_neighbor(&db, Step::Next));
        assert_eq!(session.toggle_bookmark(&mut store).unwrap(), Some(BookmarkToggle::Added));
        assert!(store.contains(VerseId::new(1, 2)));
        assert!(!store.contains(VerseId::new(1, 1)));

        assert_eq!(session.toggle_bookmark(&mut store).unwrap(), Some(BookmarkToggle::Removed));
        assert!(store.set().is_empty());
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn test_starred_unstar_middle_keeps_cursor() {
        let db = sample_db();
        let mut set = BookmarkSet::new();
        for id in [VerseId::new(1, 1), VerseId::new(1, 3), VerseId::new(2, 2)] {
            set.insert(id);
        }
        let mut store = BookmarkStore::in_memory(set);
        let mut session = PracticeSession::start_starred(&db, store.set()).unwrap();
        assert_eq!(session.len(), 3);
        assert!(!session.timer_running());

        session.advance(Direction::Next);
        session.reveal();
        assert_eq!(
            session.toggle_bookmark(&mut store).unwrap(),
            Some(BookmarkToggle::RemovedFromSession)
        );
        assert_eq!(session.len(), 2);
        assert_eq!(session.cursor(), 1);
        assert!(!session.is_revealed());
        assert_eq!(session.current_record().unwrap().id(), VerseId::new(2, 2));
    }

    #[test]
    fn test_starred_unstar_last_clamps_cursor() {
        let db = sample_db();
        let mut set = BookmarkSet::new();
        set.insert(VerseId::new(1, 1));
        set.insert(VerseId::new(2, 1));
        let mut store = BookmarkStore::in_memory(set);
        let mut session = PracticeSession::start_starred(&db, store.set()).unwrap();

        session.advance(Direction::Next);
        assert_eq!(session.cursor(), 1);
        // No completion while browsing stars
        session.advance(Direction::Next);
        assert_eq!(session.phase(), SessionPhase::Question);

        session.toggle_bookmark(&mut store).unwrap();
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.current_record().unwrap().id(), VerseId::new(1, 1));
    }

    #[test]
    fn test_starred_unstar_sole_item_terminates() {
        let db = sample_db();
        let mut set = BookmarkSet::new();
        set.insert(VerseId::new(2, 2));
        let mut store = BookmarkStore::in_memory(set);
        let mut session = PracticeSession::start_starred(&db, store.set()).unwrap();

        assert_eq!(
            session.toggle_bookmark(&mut store).unwrap(),
            Some(BookmarkToggle::SessionEmptied)
        );
        assert_eq!(session.phase(), SessionPhase::Terminated);
        assert!(session.is_empty());
        assert!(session.viewed_record().is_none());
        assert_eq!(session.toggle_bookmark(&mut store).unwrap(), None);

        session.advance(Direction::Next);
        session.reveal();
        assert_eq!(session.phase(), SessionPhase::Terminated);
    }

    #[test]
    fn test_starred_requires_known_verses() {
        let db = sample_db();
        let mut set = BookmarkSet::new();
        assert!(PracticeSession::start_starred(&db, &set).is_none());

        set.insert(VerseId::new(17, 4));
        assert!(PracticeSession::start_starred(&db, &set).is_none());
    }

    #[test]
    fn test_restart_reshuffles_same_elements() {
        let db = sample_db();
        let mut rng = StdRng::seed_from_u64(21);
        let mut session =
            PracticeSession::start_session(&db, &chapters(&[1, 2]), PracticeKind::Shlokank, &mut rng).unwrap();
        let before = ids(session.working_set());

        while session.is_active() {
            session.advance(Direction::Next);
        }
        session.restart(&mut rng);

        assert_eq!(session.phase(), SessionPhase::Question);
        assert_eq!(session.cursor(), 0);
        assert!(session.timer_running());
        assert_eq!(ids(session.working_set()), before);
    }

    #[test]
    fn test_reading_runs_in_order_and_continues() {
        let db = sample_db();
        let mut session = PracticeSession::start_reading(&db, 1).unwrap();
        let verses: Vec<u16> = session.working_set().iter().map(|v| v.verse).collect();

        assert_eq!(verses, vec![1, 2, 3, 999]);
        assert!(!session.timer_running());
        assert!(!session.next_chapter(&db));

        for _ in 0..4 {
            session.advance(Direction::Next);
        }
        assert_eq!(session.phase(), SessionPhase::Completed);
        assert_eq!(session.following_chapter(), Some(2));

        assert!(session.next_chapter(&db));
        assert_eq!(session.current_record().unwrap().id(), VerseId::new(2, 1));
        assert_eq!(session.phase(), SessionPhase::Question);
    }

    #[test]
    fn test_reading_restart_keeps_order() {
        let db = sample_db();
        let mut rng = StdRng::seed_from_u64(4);
        let mut session = PracticeSession::start_reading(&db, 1).unwrap();
        session.advance(Direction::Next);
        session.restart(&mut rng);

        let verses: Vec<u16> = session.working_set().iter().map(|v| v.verse).collect();
        assert_eq!(verses, vec![1, 2, 3, 999]);
        assert_eq!(session.cursor(), 0);
    }

    #[test]
    fn test_start_at_jumps_to_verse() {
        let db = sample_db();
        let session = PracticeSession::start_at(&db, 1, 3).unwrap();

        assert_eq!(session.cursor(), 2);
        assert_eq!(session.mode(), SessionMode::Reading);
        assert!(PracticeSession::start_at(&db, 1, 40).is_none());
    }

    #[test]
    fn test_last_chapter_has_no_successor() {
        let db = VerseDb::from_records(vec![record(18, 78, &["x"])]);
        let mut session = PracticeSession::start_reading(&db, 18).unwrap();
        session.advance(Direction::Next);

        assert_eq!(session.phase(), SessionPhase::Completed);
        assert_eq!(session.following_chapter(), None);
        assert!(!session.next_chapter(&db));
    }
}
