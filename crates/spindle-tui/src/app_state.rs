//! AppState — shared read-only data passed to all components during render/event.
//!
//! Components read this, but never mutate it.
//! The App event loop is the only thing that writes to AppState.

use std::time::Instant;

use spindle_core::catalog::{Catalog, Track};
use spindle_core::mapper::ViewFrame;
use spindle_core::scene::{Animator, Scene};

pub struct AppState {
    pub catalog: Catalog,
    /// Latest frame from the mapper.
    pub frame: ViewFrame,
    /// Eased values for the current scene.
    pub animator: Animator,
    /// Film grain over the backdrop.
    pub grain: bool,
    /// Rendered frame counter; seeds the grain.
    pub frame_count: u64,
    pub started: Instant,
}

impl AppState {
    pub fn new(catalog: Catalog, frame: ViewFrame, grain: bool) -> Self {
        let scene = Scene::from_frame(&frame);
        let animator = Animator::new(scene, &catalog.track(frame.current_track).video);
        Self {
            catalog,
            frame,
            animator,
            grain,
            frame_count: 0,
            started: Instant::now(),
        }
    }

    pub fn scene(&self) -> &Scene {
        self.animator.scene()
    }

    pub fn current_track(&self) -> &Track {
        self.catalog.track(self.frame.current_track)
    }

    /// Artist shown in the nav bar and on the labels.
    pub fn brand(&self) -> String {
        self.catalog.track(0).artist.to_uppercase()
    }

    /// Seconds since startup, for looping decorations.
    pub fn clock(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spindle_core::mapper::ViewState;

    #[test]
    fn test_initial_state() {
        let frame = ViewFrame {
            progress: 0.0,
            view_state: ViewState::Hero,
            current_track: 0,
            is_scrolling: false,
        };
        let state = AppState::new(Catalog::builtin(), frame, true);
        assert_eq!(state.brand(), "NEON DRIFT");
        assert_eq!(state.current_track().title, "Midnight Velocity");
        assert_eq!(state.scene().header_hint, "SCROLL TO START");
        assert_eq!(state.animator.backdrop().len(), 1);
    }
}
