//! Where the verse collection comes from: a local file, or a URL fetched
//! once and kept in a versioned on-disk cache.

use anyhow::{anyhow, Context, Result};
use std::fmt;
use std::path::PathBuf;

use crate::config::app_cache_dir;
use crate::verse::VerseDb;

/// Bump to invalidate every cached collection
pub const CACHE_VERSION: &str = "gita-v2";

/// Used when neither the command line nor the config names a source
pub const DEFAULT_SOURCE: &str = "verse.json";

const CACHE_FILE: &str = "verse.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerseSource {
    Path(PathBuf),
    Url(String),
}

impl VerseSource {
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            VerseSource::Url(trimmed.to_string())
        } else {
            VerseSource::Path(PathBuf::from(trimmed))
        }
    }

    /// Command line wins over config, config over the default
    pub fn resolve(cli: Option<&str>, config: Option<&str>) -> Self {
        Self::parse(cli.or(config).unwrap_or(DEFAULT_SOURCE))
    }

    /// Load using the user cache directory for URL sources
    pub async fn load(&self) -> Result<VerseDb> {
        let cache = match app_cache_dir() {
            Ok(dir) => Some(VerseCache::new(dir)),
            Err(e) => {
                tracing::warn!(error = %e, "no cache directory, verse collection will not be cached");
                None
            }
        };
        self.load_with_cache(cache.as_ref()).await
    }

    pub async fn load_with_cache(&self, cache: Option<&VerseCache>) -> Result<VerseDb> {
        match self {
            VerseSource::Path(path) => VerseDb::load_from_json(path).await,
            VerseSource::Url(url) => load_url(url, cache).await,
        }
    }
}

impl fmt::Display for VerseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerseSource::Path(path) => write!(f, "{}", path.display()),
            VerseSource::Url(url) => write!(f, "{}", url),
        }
    }
}

async fn load_url(url: &str, cache: Option<&VerseCache>) -> Result<VerseDb> {
    if let Some(cache) = cache {
        if let Some(content) = cache.read().await {
            match VerseDb::from_json_str(&content) {
                Ok(db) => {
                    tracing::debug!(path = %cache.file().display(), "verse collection served from cache");
                    return Ok(db);
                }
                Err(e) => tracing::warn!(error = %e, "cached verse collection unreadable, refetching"),
            }
        }
    }

    let content = fetch(url).await?;
    let db = VerseDb::from_json_str(&content)?;

    if let Some(cache) = cache {
        if let Err(e) = cache.write(&content).await {
            tracing::warn!(error = %e, "failed to cache verse collection");
        }
        match cache.prune().await {
            Ok(0) => {}
            Ok(removed) => tracing::info!(removed, "pruned stale verse caches"),
            Err(e) => tracing::warn!(error = %e, "failed to prune verse caches"),
        }
    }
    Ok(db)
}

async fn fetch(url: &str) -> Result<String> {
    tracing::info!(url, "fetching verse collection");
    let response = reqwest::get(url)
        .await
        .with_context(|| format!("failed to reach {}", url))?;

    if !response.status().is_success() {
        return Err(anyhow!(
            "verse collection request failed with status: {}",
            response.status()
        ));
    }

    Ok(response.text().await?)
}

/// `<root>/<CACHE_VERSION>/verse.json`; sibling version directories are stale
#[derive(Debug, Clone)]
pub struct VerseCache {
    root: PathBuf,
}

impl VerseCache {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn file(&self) -> PathBuf {
        self.root.join(CACHE_VERSION).join(CACHE_FILE)
    }

    pub async fn read(&self) -> Option<String> {
        tokio::fs::read_to_string(self.file()).await.ok()
    }

    pub async fn write(&self, content: &str) -> Result<()> {
        let file = self.file();
        if let Some(parent) = file.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create cache directory {}", parent.display()))?;
        }
        tokio::fs::write(&file, content)
            .await
            .with_context(|| format!("failed to write cache {}", file.display()))
    }

    /// Remove every version directory except the current one
    pub async fn prune(&self) -> Result<usize> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_name() == CACHE_VERSION || !entry.file_type().await?.is_dir() {
                continue;
            }
            tokio::fs::remove_dir_all(entry.path()).await?;
            removed += 1;
        }
        Ok(removed)
    }
}
