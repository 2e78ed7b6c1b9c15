//! Change notification for user preferences.
//!
//! Components that care about a preference register a listener here instead
//! of being probed for ad-hoc hooks.

use crate::language::Language;
use crate::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PreferenceEvent {
    LanguageChanged(Language),
    ThemeChanged(Theme),
    ZoomChanged(f32),
}

pub type Listener = Box<dyn FnMut(&PreferenceEvent) + Send>;

#[derive(Default)]
pub struct PreferenceBus {
    listeners: Vec<Listener>,
}

impl PreferenceBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&PreferenceEvent) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Deliver an event to every listener, in registration order
    pub fn emit(&mut self, event: PreferenceEvent) {
        tracing::debug!(?event, listeners = self.listeners.len(), "preference changed");
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}

impl std::fmt::Debug for PreferenceBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
