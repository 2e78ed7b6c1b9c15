//! Starred verses, persisted as a sorted JSON list.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::app_config_dir;
use crate::verse::VerseId;

/// One element of the persisted list: `{"id": "2.47", "chapter": 2, "verse": 47}`
#[derive(Debug, Serialize, Deserialize)]
struct BookmarkEntry {
    #[serde(default)]
    id: String,
    chapter: u8,
    verse: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkSet {
    entries: BTreeSet<VerseId>,
}

impl BookmarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: VerseId) -> bool {
        self.entries.contains(&id)
    }

    pub fn insert(&mut self, id: VerseId) -> bool {
        self.entries.insert(id)
    }

    /// Flip membership. Returns true if `id` is bookmarked afterwards.
    pub fn toggle(&mut self, id: VerseId) -> bool {
        if self.entries.remove(&id) {
            false
        } else {
            self.entries.insert(id);
            true
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in (chapter, verse) order
    pub fn iter(&self) -> impl Iterator<Item = VerseId> + '_ {
        self.entries.iter().copied()
    }

    pub fn to_json(&self) -> Result<String> {
        let entries: Vec<BookmarkEntry> = self
            .iter()
            .map(|id| BookmarkEntry {
                id: id.to_string(),
                chapter: id.chapter,
                verse: id.verse,
            })
            .collect();
        Ok(serde_json::to_string(&entries)?)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let entries: Vec<BookmarkEntry> = serde_json::from_str(content)?;
        Ok(Self {
            entries: entries
                .into_iter()
                .map(|e| VerseId::new(e.chapter, e.verse))
                .collect(),
        })
    }
}

/// Bookmark set bound to its backing file. Every change is written through.
#[derive(Debug)]
pub struct BookmarkStore {
    path: Option<PathBuf>,
    set: BookmarkSet,
}

impl BookmarkStore {
    pub fn load() -> Self {
        match app_config_dir() {
            Ok(dir) => Self::load_from(dir.join("bookmarks.json")),
            Err(e) => {
                tracing::warn!(error = %e, "no config directory, bookmarks will not persist");
                Self::in_memory(BookmarkSet::new())
            }
        }
    }

    pub fn load_from(path: PathBuf) -> Self {
        let set = match read_set(&path) {
            Ok(set) => set,
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "unreadable bookmarks, starting empty");
                BookmarkSet::new()
            }
        };
        Self {
            path: Some(path),
            set,
        }
    }

    pub fn in_memory(set: BookmarkSet) -> Self {
        Self { path: None, set }
    }

    pub fn set(&self) -> &BookmarkSet {
        &self.set
    }

    pub fn contains(&self, id: VerseId) -> bool {
        self.set.contains(id)
    }

    /// Flip membership of `id` and persist. Returns true if now bookmarked.
    /// The in-memory set keeps the change even if the write fails.
    pub fn toggle(&mut self, id: VerseId) -> Result<bool> {
        let starred = self.set.toggle(id);
        tracing::debug!(%id, starred, "bookmark toggled");
        self.save()?;
        Ok(starred)
    }

    fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create bookmark directory {}", parent.display()))?;
        }
        fs::write(path, self.set.to_json()?)
            .with_context(|| format!("failed to write bookmarks {}", path.display()))
    }
}

fn read_set(path: &Path) -> Result<BookmarkSet> {
    if !path.exists() {
        return Ok(BookmarkSet::new());
    }
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(BookmarkSet::new());
    }
    BookmarkSet::from_json(&content)
}
