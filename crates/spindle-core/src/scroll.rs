//! ScrollSignal — the virtual scroll document.
//!
//! The player is laid out as a document `screens` viewports tall; the
//! viewport can travel `screens - 1` viewports before hitting the bottom.
//! Positions are stored in rows of a fixed virtual resolution so wheel steps
//! stay exact, and every change reports whether the position moved (no move,
//! no scroll event).

use serde::{Deserialize, Serialize};

/// Virtual rows per viewport.
const ROWS_PER_SCREEN: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Document height in viewports.
    #[serde(default = "default_screens")]
    pub screens: u32,
    /// Rows per mouse-wheel notch or arrow key.
    #[serde(default = "default_wheel_step")]
    pub wheel_step: u32,
    /// Rows per page key.
    #[serde(default = "default_page_step")]
    pub page_step: u32,
}

fn default_screens() -> u32 {
    12
}

fn default_wheel_step() -> u32 {
    10
}

fn default_page_step() -> u32 {
    ROWS_PER_SCREEN
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            screens: default_screens(),
            wheel_step: default_wheel_step(),
            page_step: default_page_step(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScrollSignal {
    offset: u32,
    max_offset: u32,
    wheel_step: u32,
    page_step: u32,
}

impl ScrollSignal {
    pub fn new(config: &ScrollConfig) -> Self {
        let screens = config.screens.max(2);
        Self {
            offset: 0,
            max_offset: (screens - 1) * ROWS_PER_SCREEN,
            wheel_step: config.wheel_step.max(1),
            page_step: config.page_step.max(1),
        }
    }

    /// Normalised position: 0 at the top, 1 at the bottom.
    pub fn progress(&self) -> f64 {
        self.offset as f64 / self.max_offset as f64
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn max_offset(&self) -> u32 {
        self.max_offset
    }

    /// Move by `rows` (negative = up).  Returns true if the position changed.
    pub fn scroll_by(&mut self, rows: i64) -> bool {
        let target = (self.offset as i64 + rows).clamp(0, self.max_offset as i64) as u32;
        self.set_offset(target)
    }

    /// Jump to a normalised position; out-of-range values are clamped.
    pub fn scroll_to(&mut self, progress: f64) -> bool {
        let p = crate::mapper::clamp_progress(progress);
        let target = (p * self.max_offset as f64).round() as u32;
        self.set_offset(target)
    }

    pub fn wheel_down(&mut self) -> bool {
        self.scroll_by(self.wheel_step as i64)
    }

    pub fn wheel_up(&mut self) -> bool {
        self.scroll_by(-(self.wheel_step as i64))
    }

    pub fn page_down(&mut self) -> bool {
        self.scroll_by(self.page_step as i64)
    }

    pub fn page_up(&mut self) -> bool {
        self.scroll_by(-(self.page_step as i64))
    }

    pub fn home(&mut self) -> bool {
        self.set_offset(0)
    }

    pub fn end(&mut self) -> bool {
        self.set_offset(self.max_offset)
    }

    fn set_offset(&mut self, offset: u32) -> bool {
        if offset == self.offset {
            return false;
        }
        self.offset = offset;
        true
    }
}

impl Default for ScrollSignal {
    fn default() -> Self {
        Self::new(&ScrollConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_bounds() {
        let mut s = ScrollSignal::default();
        assert_eq!(s.max_offset(), 1100);
        assert_eq!(s.progress(), 0.0);
        assert!(!s.wheel_up());
        assert!(s.end());
        assert_eq!(s.progress(), 1.0);
        assert!(!s.wheel_down());
        assert!(!s.page_down());
        assert!(s.home());
        assert!(!s.home());
    }

    #[test]
    fn test_wheel_and_page_steps() {
        let mut s = ScrollSignal::default();
        assert!(s.wheel_down());
        assert_eq!(s.offset(), 10);
        assert!(s.page_down());
        assert_eq!(s.offset(), 110);
        assert!(s.page_up());
        assert!(s.wheel_up());
        assert_eq!(s.offset(), 0);
    }

    #[test]
    fn test_scroll_to_clamps() {
        let mut s = ScrollSignal::default();
        assert!(s.scroll_to(0.5));
        assert_eq!(s.offset(), 550);
        assert!(s.scroll_to(3.0));
        assert_eq!(s.progress(), 1.0);
        assert!(s.scroll_to(-1.0));
        assert_eq!(s.progress(), 0.0);
        assert!(!s.scroll_to(f64::NAN));
    }

    #[test]
    fn test_degenerate_config() {
        let s = ScrollSignal::new(&ScrollConfig {
            screens: 0,
            wheel_step: 0,
            page_step: 0,
        });
        assert_eq!(s.max_offset(), ROWS_PER_SCREEN);
        let mut s = s;
        assert!(s.wheel_down());
        assert_eq!(s.offset(), 1);
    }
}
