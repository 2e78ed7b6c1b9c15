//! Classifies a finished pointer drag into a card action.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Touch,
    Mouse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureIntent {
    Next,
    Previous,
    Flip,
    /// Let the drag fall through (e.g. to scroll the card)
    None,
}

/// Scroll position of the card content at the end of the drag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollContext {
    pub scrollable: bool,
    pub at_top: bool,
    pub at_bottom: bool,
}

impl ScrollContext {
    pub fn fixed() -> Self {
        Self {
            scrollable: false,
            at_top: true,
            at_bottom: true,
        }
    }
}

/// Distances in whatever unit the front end measures drags in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureThresholds {
    pub touch_horizontal: f32,
    pub vertical: f32,
    pub mouse_horizontal: f32,
    pub flick_window: Duration,
}

impl Default for GestureThresholds {
    /// Pixel distances for a touch screen or pointer device
    fn default() -> Self {
        Self {
            touch_horizontal: 70.0,
            vertical: 60.0,
            mouse_horizontal: 100.0,
            flick_window: Duration::from_millis(300),
        }
    }
}

impl GestureThresholds {
    /// Terminal cells are roughly 8x16 px
    pub fn terminal() -> Self {
        Self {
            touch_horizontal: 9.0,
            vertical: 4.0,
            mouse_horizontal: 12.0,
            flick_window: Duration::from_millis(300),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GestureRecognizer {
    thresholds: GestureThresholds,
}

impl GestureRecognizer {
    pub fn new(thresholds: GestureThresholds) -> Self {
        Self { thresholds }
    }

    /// `dx`/`dy` are end minus start; negative `dx` is a leftward swipe.
    pub fn classify(
        &self,
        kind: PointerKind,
        dx: f32,
        dy: f32,
        duration: Duration,
        scroll: ScrollContext,
    ) -> GestureIntent {
        let t = &self.thresholds;
        match kind {
            PointerKind::Touch => {
                if dx.abs() > t.touch_horizontal && dx.abs() > dy.abs() {
                    return horizontal(dx);
                }
                if dy.abs() > t.vertical && duration < t.flick_window {
                    let flips = !scroll.scrollable
                        || (dy < 0.0 && scroll.at_bottom)
                        || (dy > 0.0 && scroll.at_top);
                    if flips {
                        return GestureIntent::Flip;
                    }
                }
                GestureIntent::None
            }
            PointerKind::Mouse => {
                if dy.abs() > t.vertical {
                    GestureIntent::Flip
                } else if dx.abs() > t.mouse_horizontal {
                    horizontal(dx)
                } else {
                    GestureIntent::None
                }
            }
        }
    }
}

fn horizontal(dx: f32) -> GestureIntent {
    if dx < 0.0 {
        GestureIntent::Next
    } else {
        GestureIntent::Previous
    }
}
