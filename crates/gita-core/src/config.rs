use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::events::{PreferenceBus, PreferenceEvent};
use crate::language::Language;
use crate::theme::Theme;

pub const MIN_ZOOM: f32 = 0.8;
pub const MAX_ZOOM: f32 = 1.5;
pub const ZOOM_STEP: f32 = 0.1;

const APP_DIR: &str = "project-gita";

/// Directory holding config.json and bookmarks.json
pub fn app_config_dir() -> Result<PathBuf> {
    let config_dir =
        dirs::config_dir().ok_or_else(|| anyhow!("Could not determine config directory"))?;
    Ok(config_dir.join(APP_DIR))
}

/// Directory holding cached verse collections
pub fn app_cache_dir() -> Result<PathBuf> {
    let cache_dir =
        dirs::cache_dir().ok_or_else(|| anyhow!("Could not determine cache directory"))?;
    Ok(cache_dir.join(APP_DIR))
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub theme: Option<String>,
    pub language: Option<String>,
    pub zoom: Option<f32>,
    pub verse_source: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            theme: Some(Theme::default().as_str().to_string()),
            language: Some(Language::default().as_str().to_string()),
            zoom: Some(1.0),
            verse_source: None,
        }
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Config = serde_json::from_str(&config_content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create config directory {}", parent.display()))?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)
            .with_context(|| format!("failed to write config {}", path.display()))?;
        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        Ok(app_config_dir()?.join("config.json"))
    }

    pub fn theme(&self) -> Theme {
        self.theme
            .as_deref()
            .and_then(Theme::from_str)
            .unwrap_or_default()
    }

    pub fn language(&self) -> Language {
        self.language
            .as_deref()
            .and_then(Language::from_str)
            .unwrap_or_default()
    }

    pub fn zoom(&self) -> f32 {
        clamp_zoom(self.zoom.unwrap_or(1.0))
    }
}

fn clamp_zoom(zoom: f32) -> f32 {
    if zoom.is_finite() {
        zoom.clamp(MIN_ZOOM, MAX_ZOOM)
    } else {
        1.0
    }
}

/// User preferences backed by a config file, broadcasting changes to
/// registered listeners.
#[derive(Debug)]
pub struct Preferences {
    config: Config,
    path: Option<PathBuf>,
    bus: PreferenceBus,
}

impl Preferences {
    /// Load from the default config location, falling back to defaults
    pub fn load() -> Self {
        match Config::get_config_path() {
            Ok(path) => Self::load_from(path),
            Err(e) => {
                tracing::warn!(error = %e, "no config directory, preferences will not persist");
                Self::in_memory(Config::new())
            }
        }
    }

    pub fn load_from(path: PathBuf) -> Self {
        let config = Config::load_from(&path).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "unreadable config, using defaults");
            Config::new()
        });
        Self {
            config,
            path: Some(path),
            bus: PreferenceBus::new(),
        }
    }

    pub fn in_memory(config: Config) -> Self {
        Self {
            config,
            path: None,
            bus: PreferenceBus::new(),
        }
    }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&PreferenceEvent) + Send + 'static,
    {
        self.bus.subscribe(listener);
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn language(&self) -> Language {
        self.config.language()
    }

    pub fn theme(&self) -> Theme {
        self.config.theme()
    }

    pub fn zoom(&self) -> f32 {
        self.config.zoom()
    }

    pub fn verse_source(&self) -> Option<&str> {
        self.config.verse_source.as_deref()
    }

    pub fn set_language(&mut self, language: Language) -> Result<()> {
        if self.language() == language && self.config.language.is_some() {
            return Ok(());
        }
        self.config.language = Some(language.as_str().to_string());
        self.bus.emit(PreferenceEvent::LanguageChanged(language));
        self.save()
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        if self.theme() == theme && self.config.theme.is_some() {
            return Ok(());
        }
        self.config.theme = Some(theme.as_str().to_string());
        self.bus.emit(PreferenceEvent::ThemeChanged(theme));
        self.save()
    }

    pub fn toggle_theme(&mut self) -> Result<()> {
        self.set_theme(self.theme().toggled())
    }

    pub fn set_zoom(&mut self, zoom: f32) -> Result<()> {
        let zoom = clamp_zoom(zoom);
        if (self.zoom() - zoom).abs() < f32::EPSILON && self.config.zoom.is_some() {
            return Ok(());
        }
        self.config.zoom = Some(zoom);
        self.bus.emit(PreferenceEvent::ZoomChanged(zoom));
        self.save()
    }

    /// Step zoom by `steps` increments of `ZOOM_STEP`, rounded to one decimal
    pub fn step_zoom(&mut self, steps: i32) -> Result<()> {
        let target = self.zoom() + steps as f32 * ZOOM_STEP;
        self.set_zoom((target * 10.0).round() / 10.0)
    }

    fn save(&self) -> Result<()> {
        match &self.path {
            Some(path) => self.config.save_to(path),
            None => Ok(()),
        }
    }
}
