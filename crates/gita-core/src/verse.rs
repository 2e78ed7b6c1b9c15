use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::path::Path;

use crate::language::Language;

/// Number of chapters (adhyays) in the text.
pub const CHAPTER_COUNT: u8 = 18;

/// Verse number used by the source data for a chapter's closing entry.
pub const CONCLUSION_VERSE: u16 = 999;

/// Identifies a record by chapter and verse. Orders by chapter, then verse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VerseId {
    pub chapter: u8,
    pub verse: u16,
}

impl VerseId {
    pub fn new(chapter: u8, verse: u16) -> Self {
        Self { chapter, verse }
    }
}

impl fmt::Display for VerseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.chapter, self.verse)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerseKind {
    Verse,
    /// Pushpika: the colophon closing a chapter. Never a quiz target.
    ChapterConclusion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Translation {
    Hindi,
    English,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VerseRecord {
    pub chapter: u8,
    pub verse: u16,
    pub kind: VerseKind,
    /// Devanagari rendering, one entry per charan.
    pub lines: Vec<String>,
    /// IAST transliteration of `lines`, when the source provides one.
    pub alternate_lines: Option<Vec<String>>,
    pub translations: BTreeMap<Translation, String>,
}

impl VerseRecord {
    pub fn id(&self) -> VerseId {
        VerseId::new(self.chapter, self.verse)
    }

    pub fn is_conclusion(&self) -> bool {
        self.kind == VerseKind::ChapterConclusion
    }

    /// Lines to display for a language: IAST when requested and available.
    pub fn lines_for(&self, language: Language) -> &[String] {
        match (&self.alternate_lines, language.uses_transliteration()) {
            (Some(alternate), true) => alternate,
            _ => &self.lines,
        }
    }

    /// Translation for a language. English variants fall back to Hindi.
    pub fn translation_for(&self, language: Language) -> Option<&str> {
        let preferred = match language.translation() {
            Translation::Hindi => self.translations.get(&Translation::Hindi),
            Translation::English => self
                .translations
                .get(&Translation::English)
                .or_else(|| self.translations.get(&Translation::Hindi)),
        };
        preferred.map(String::as_str)
    }
}

/// A record as it appears in the verse JSON document
#[derive(Debug, Deserialize)]
struct RawVerse {
    chapter: u32,
    verse: u32,
    #[serde(default)]
    charans: Vec<String>,
    #[serde(default)]
    english_transliteration: Option<Vec<String>>,
    #[serde(default)]
    hindi_translation: Option<String>,
    #[serde(default)]
    english_translation: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

impl RawVerse {
    fn into_record(self) -> Option<VerseRecord> {
        let chapter = u8::try_from(self.chapter).ok().filter(|c| *c >= 1)?;
        let verse = u16::try_from(self.verse).ok().filter(|v| *v >= 1)?;

        let kind = if self.kind.as_deref() == Some("pushpika") || verse == CONCLUSION_VERSE {
            VerseKind::ChapterConclusion
        } else {
            VerseKind::Verse
        };

        let mut translations = BTreeMap::new();
        for (lang, text) in [
            (Translation::Hindi, self.hindi_translation),
            (Translation::English, self.english_translation),
        ] {
            if let Some(text) = text.filter(|t| !t.trim().is_empty()) {
                translations.insert(lang, text);
            }
        }

        Some(VerseRecord {
            chapter,
            verse,
            kind,
            lines: self.charans,
            alternate_lines: self.english_transliteration.filter(|l| !l.is_empty()),
            translations,
        })
    }
}

#[derive(Debug, Default)]
pub struct VerseDb {
    verses: Vec<VerseRecord>,
    chapters: Vec<u8>,
}

impl VerseDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a database from already-parsed records.
    /// Duplicate (chapter, verse) pairs keep their first occurrence.
    pub fn from_records(records: Vec<VerseRecord>) -> Self {
        let mut seen = HashSet::new();
        let mut verses = Vec::with_capacity(records.len());

        for record in records {
            if seen.insert(record.id()) {
                verses.push(record);
            } else {
                tracing::warn!(id = %record.id(), "duplicate verse entry ignored");
            }
        }

        let mut db = Self {
            verses,
            chapters: Vec::new(),
        };
        db.build_indexes();
        db
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let raw: Vec<RawVerse> =
            serde_json::from_str(content).context("verse collection is not a JSON array of verses")?;
        let total = raw.len();

        let records: Vec<VerseRecord> = raw
            .into_iter()
            .filter_map(|r| {
                let (chapter, verse) = (r.chapter, r.verse);
                let record = r.into_record();
                if record.is_none() {
                    tracing::warn!(chapter, verse, "verse entry with invalid numbering skipped");
                }
                record
            })
            .collect();

        let db = Self::from_records(records);
        tracing::info!(
            loaded = db.len(),
            total,
            chapters = db.chapters.len(),
            "verse collection parsed"
        );
        Ok(db)
    }

    pub async fn load_from_json(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read verse collection {}", path.display()))?;
        Self::from_json_str(&content)
    }

    fn build_indexes(&mut self) {
        let chapters: BTreeSet<u8> = self.verses.iter().map(|v| v.chapter).collect();
        self.chapters = chapters.into_iter().collect();
    }

    pub fn len(&self) -> usize {
        self.verses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    /// Every record, in collection order
    pub fn all(&self) -> &[VerseRecord] {
        &self.verses
    }

    pub fn chapters(&self) -> &[u8] {
        &self.chapters
    }

    pub fn get(&self, id: VerseId) -> Option<&VerseRecord> {
        self.verses.iter().find(|v| v.id() == id)
    }

    /// Records of one chapter sorted by verse number (the conclusion sorts last).
    pub fn verses_for_chapter(&self, chapter: u8) -> Vec<&VerseRecord> {
        let mut verses: Vec<&VerseRecord> =
            self.verses.iter().filter(|v| v.chapter == chapter).collect();
        verses.sort_by_key(|v| v.verse);
        verses
    }

    /// Quiz candidates: verses of the selected chapters, conclusions excluded.
    pub fn practice_pool(&self, chapters: &BTreeSet<u8>) -> Vec<VerseRecord> {
        self.verses
            .iter()
            .filter(|v| chapters.contains(&v.chapter) && v.kind == VerseKind::Verse)
            .cloned()
            .collect()
    }

    /// The record `offset` places away from `id` within the same chapter.
    pub fn neighbor(&self, id: VerseId, offset: isize) -> Option<&VerseRecord> {
        let verses = self.verses_for_chapter(id.chapter);
        let position = verses.iter().position(|v| v.verse == id.verse)?;
        let target = position.checked_add_signed(offset)?;
        verses.get(target).copied()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(chapter: u8, verse: u16, lines: &[&str]) -> VerseRecord {
        VerseRecord {
            chapter,
            verse,
            kind: if verse == CONCLUSION_VERSE {
                VerseKind::ChapterConclusion
            } else {
                VerseKind::Verse
            },
            lines: lines.iter().map(|l| l.to_string()).collect(),
            alternate_lines: None,
            translations: BTreeMap::new(),
        }
    }

    pub(crate) fn sample_db() -> VerseDb {
        VerseDb::from_records(vec![
            record(1, 1, &["धृतराष्ट्र उवाच", "धर्मक्षेत्रे कुरुक्षेत्रे समवेता युयुत्सवः ।"]),
            record(1, 2, &["सञ्जय उवाच", "दृष्ट्वा तु पाण्डवानीकं व्यूढं दुर्योधनस्तदा ।"]),
            record(1, 3, &["पश्यैतां पाण्डुपुत्राणामाचार्य महतीं चमूम् ।"]),
            record(1, 999, &["ॐ तत्सदिति"]),
            record(2, 1, &["सञ्जय उवाच", "तं तथा कृपयाविष्टमश्रुपूर्णाकुलेक्षणम् ।"]),
            record(2, 2, &["श्रीभगवानुवाच", "कुतस्त्वा कश्मलमिदं विषमे समुपस्थितम् ।"]),
        ])
    }

    #[test]
    fn test_parse_wire_format() {
        let json = r#"[
            {"chapter": 1, "verse": 1, "charans": ["a", "b"],
             "english_transliteration": ["x", "y"],
             "hindi_translation": "हिन्दी", "english_translation": "English"},
            {"chapter": 1, "verse": 999, "charans": ["end"], "type": "pushpika"},
            {"chapter": 2, "verse": 5, "charans": ["c"], "type": "pushpika"}
        ]"#;
        let db = VerseDb::from_json_str(json).unwrap();

        assert_eq!(db.len(), 3);
        assert_eq!(db.chapters(), &[1, 2]);

        let first = db.get(VerseId::new(1, 1)).unwrap();
        assert_eq!(first.kind, VerseKind::Verse);
        assert_eq!(first.alternate_lines.as_deref(), Some(&["x".to_string(), "y".to_string()][..]));
        assert_eq!(first.translation_for(Language::Hindi), Some("हिन्दी"));
        assert_eq!(first.translation_for(Language::EnglishIast), Some("English"));

        assert!(db.get(VerseId::new(1, 999)).unwrap().is_conclusion());
        assert!(db.get(VerseId::new(2, 5)).unwrap().is_conclusion());
    }

    #[test]
    fn test_missing_fields_degrade() {
        let json = r#"[{"chapter": 3, "verse": 4}]"#;
        let db = VerseDb::from_json_str(json).unwrap();
        let verse = db.get(VerseId::new(3, 4)).unwrap();

        assert!(verse.lines.is_empty());
        assert_eq!(verse.translation_for(Language::Hindi), None);
        assert_eq!(verse.lines_for(Language::EnglishIast).len(), 0);
    }

    #[test]
    fn test_english_falls_back_to_hindi() {
        let json = r#"[{"chapter": 1, "verse": 1, "charans": [], "hindi_translation": "केवल", "english_translation": ""}]"#;
        let db = VerseDb::from_json_str(json).unwrap();
        let verse = db.get(VerseId::new(1, 1)).unwrap();

        assert_eq!(verse.translation_for(Language::EnglishSanskrit), Some("केवल"));
    }

    #[test]
    fn test_invalid_and_duplicate_entries_skipped() {
        let json = r#"[
            {"chapter": 0, "verse": 1, "charans": []},
            {"chapter": 1, "verse": 1, "charans": ["first"]},
            {"chapter": 1, "verse": 1, "charans": ["second"]}
        ]"#;
        let db = VerseDb::from_json_str(json).unwrap();

        assert_eq!(db.len(), 1);
        assert_eq!(db.get(VerseId::new(1, 1)).unwrap().lines, vec!["first".to_string()]);
    }

    #[test]
    fn test_not_an_array_is_error() {
        assert!(VerseDb::from_json_str(r#"{"chapter": 1}"#).is_err());
    }

    #[test]
    fn test_practice_pool_excludes_conclusions() {
        let db = sample_db();
        let chapters: BTreeSet<u8> = [1].into_iter().collect();
        let pool = db.practice_pool(&chapters);

        assert_eq!(pool.len(), 3);
        assert!(pool.iter().all(|v| v.chapter == 1 && !v.is_conclusion()));
    }

    #[test]
    fn test_neighbor_within_chapter() {
        let db = sample_db();

        assert_eq!(db.neighbor(VerseId::new(1, 2), 1).unwrap().verse, 3);
        assert_eq!(db.neighbor(VerseId::new(1, 2), -1).unwrap().verse, 1);
        assert_eq!(db.neighbor(VerseId::new(1, 3), 1).unwrap().verse, 999);
        assert!(db.neighbor(VerseId::new(1, 1), -1).is_none());
        assert!(db.neighbor(VerseId::new(1, 999), 1).is_none());
        assert!(db.neighbor(VerseId::new(2, 2), 1).is_none());
    }

    #[test]
    fn test_verse_id_order_and_display() {
        let mut ids = vec![VerseId::new(2, 1), VerseId::new(1, 10), VerseId::new(1, 2)];
        ids.sort();
        assert_eq!(ids, vec![VerseId::new(1, 2), VerseId::new(1, 10), VerseId::new(2, 1)]);
        assert_eq!(VerseId::new(2, 47).to_string(), "2.47");
    }
}
