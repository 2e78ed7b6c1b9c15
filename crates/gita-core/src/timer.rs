use std::time::{Duration, Instant};

/// How often a running timer display is refreshed
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Measures how long a question has been on screen. Purely motivational:
/// the value is displayed, never scored or stored.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuestionTimer {
    started: Option<Instant>,
    frozen: Option<Duration>,
}

impl QuestionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    pub fn start_at(&mut self, now: Instant) {
        self.started = Some(now);
        self.frozen = None;
    }

    pub fn stop(&mut self) {
        self.stop_at(Instant::now());
    }

    pub fn stop_at(&mut self, now: Instant) {
        if let Some(started) = self.started.take() {
            self.frozen = Some(now.saturating_duration_since(started));
        }
    }

    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    pub fn elapsed_at(&self, now: Instant) -> Duration {
        match self.started {
            Some(started) => now.saturating_duration_since(started),
            None => self.frozen.unwrap_or_default(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(Instant::now())
    }
}

/// "5.2s" below a minute, "1:05.2" from a minute on
pub fn format_elapsed(elapsed: Duration) -> String {
    // Round once, in tenths, so the seconds field never shows 60.0
    let tenths = (elapsed.as_millis() + 50) / 100;
    let minutes = tenths / 600;
    let rem = tenths % 600;

    if minutes > 0 {
        format!("{}:{:02}.{}", minutes, rem / 10, rem % 10)
    } else {
        format!("{}.{}s", rem / 10, rem % 10)
    }
}
