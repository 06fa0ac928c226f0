//! ScrollStateMapper — scroll progress in, one consistent view frame out.
//!
//! The scroll document is split into two zones:
//!
//! ```text
//!  0.0 ──── 0.1 ── 0.15 ───────────────────────────── 1.0
//!  │  hero   │       │        track zone (12 slots)     │
//!              player ─────────────────────────────────────
//! ```
//!
//! * `view_state` is `Hero` while progress ≤ `hero_threshold`, `Player` above.
//! * Below `track_zone_start` the current track is left untouched; inside the
//!   zone the remaining range is remapped linearly onto the catalog and
//!   floored.
//! * `is_scrolling` is owned by an [`IdleDebounce`]: every update re-arms it,
//!   it only drops back to `false` after the idle window passes in silence.
//!
//! Every entry point returns a full [`ViewFrame`] so renderers never combine
//! values from two different derivations.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::catalog::{Side, SIDE_LEN};
use crate::debounce::IdleDebounce;

pub const HERO_THRESHOLD: f64 = 0.1;
pub const TRACK_ZONE_START: f64 = 0.15;

/// Slack applied before flooring the zone position.  `(0.575 - 0.15) / 0.85`
/// is `0.49999999999999994` in f64; without it decimal slot boundaries would
/// land one track early.
const QUANTIZE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewState {
    #[default]
    Hero,
    Player,
}

/// Zone breakpoints of the scroll document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zones {
    #[serde(default = "default_hero_threshold")]
    pub hero_threshold: f64,
    #[serde(default = "default_track_zone_start")]
    pub track_zone_start: f64,
}

fn default_hero_threshold() -> f64 {
    HERO_THRESHOLD
}

fn default_track_zone_start() -> f64 {
    TRACK_ZONE_START
}

impl Default for Zones {
    fn default() -> Self {
        Self {
            hero_threshold: HERO_THRESHOLD,
            track_zone_start: TRACK_ZONE_START,
        }
    }
}

impl Zones {
    /// Clamp both breakpoints into [0,1) and keep `track_zone_start` from
    /// reaching 1.0 (the zone would have zero width).
    pub fn sanitized(self) -> Self {
        let hero_threshold = clamp_progress(self.hero_threshold);
        let track_zone_start = clamp_progress(self.track_zone_start).min(0.99);
        Self {
            hero_threshold,
            track_zone_start,
        }
    }
}

/// Clamp a raw scroll value into [0,1].  NaN counts as the top of the page.
pub fn clamp_progress(progress: f64) -> f64 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}

pub fn view_state_for(progress: f64, zones: &Zones) -> ViewState {
    if clamp_progress(progress) <= zones.hero_threshold {
        ViewState::Hero
    } else {
        ViewState::Player
    }
}

/// Track slot for `progress`, or `None` before the track zone (caller keeps
/// whatever it had).  The floor carries a `QUANTIZE_EPSILON` (1e-9) tolerance
/// so exact boundaries such as 0.575 land on the upper slot despite float
/// error; values within that tolerance below a boundary round up too.
pub fn track_index_for(progress: f64, track_count: usize, zones: &Zones) -> Option<usize> {
    let progress = clamp_progress(progress);
    if track_count == 0 || progress < zones.track_zone_start {
        return None;
    }
    let zone_progress = (progress - zones.track_zone_start) / (1.0 - zones.track_zone_start);
    let raw = (zone_progress * track_count as f64 + QUANTIZE_EPSILON).floor();
    let raw = if raw < 0.0 { 0 } else { raw as usize };
    Some(raw.min(track_count - 1))
}

pub fn side_of(index: usize) -> Side {
    if is_side_b(index) {
        Side::B
    } else {
        Side::A
    }
}

pub fn is_side_b(index: usize) -> bool {
    index >= SIDE_LEN
}

pub fn track_index_in_side(index: usize) -> usize {
    index % SIDE_LEN
}

/// The view-state tuple consumed by every renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewFrame {
    pub progress: f64,
    pub view_state: ViewState,
    pub current_track: usize,
    pub is_scrolling: bool,
}

impl ViewFrame {
    /// The record is "playing" once the scroll has settled in player view.
    pub fn is_playing(&self) -> bool {
        !self.is_scrolling && self.view_state == ViewState::Player
    }

    pub fn side(&self) -> Side {
        side_of(self.current_track)
    }

    pub fn is_side_b(&self) -> bool {
        is_side_b(self.current_track)
    }

    pub fn track_index_in_side(&self) -> usize {
        track_index_in_side(self.current_track)
    }
}

pub struct ScrollStateMapper {
    zones: Zones,
    track_count: usize,
    progress: f64,
    view_state: ViewState,
    current_track: usize,
    idle: IdleDebounce,
}

impl ScrollStateMapper {
    pub fn new(track_count: usize, zones: Zones, idle_window: Duration) -> Self {
        Self {
            zones: zones.sanitized(),
            track_count: track_count.max(1),
            progress: 0.0,
            view_state: ViewState::Hero,
            current_track: 0,
            idle: IdleDebounce::new(idle_window),
        }
    }

    pub fn zones(&self) -> &Zones {
        &self.zones
    }

    pub fn track_count(&self) -> usize {
        self.track_count
    }

    /// Feed one scroll-change event.
    pub fn update(&mut self, progress: f64, now: Instant) -> ViewFrame {
        let progress = clamp_progress(progress);
        self.idle.touch(now);
        self.progress = progress;

        let view_state = view_state_for(progress, &self.zones);
        if view_state != self.view_state {
            tracing::debug!(
                "mapper: view {:?} → {:?} at {:.3}",
                self.view_state,
                view_state,
                progress
            );
            self.view_state = view_state;
        }

        if let Some(idx) = track_index_for(progress, self.track_count, &self.zones) {
            if idx != self.current_track {
                tracing::debug!("mapper: track {} → {}", self.current_track, idx);
                self.current_track = idx;
            }
        }

        self.frame()
    }

    /// Direct selection (e.g. clicking a list entry).  Bypasses the scroll
    /// mapping and leaves the idle state alone.
    pub fn select_track(&mut self, index: usize) -> ViewFrame {
        let index = index.min(self.track_count.saturating_sub(1));
        if index != self.current_track {
            tracing::debug!("mapper: track {} → {} (selected)", self.current_track, index);
            self.current_track = index;
        }
        self.frame()
    }

    /// Called when the idle timer fires.  Returns the new frame only if
    /// `is_scrolling` actually dropped; a stale timer changes nothing.
    pub fn settle(&mut self, now: Instant) -> Option<ViewFrame> {
        if self.idle.expire(now) {
            Some(self.frame())
        } else {
            None
        }
    }

    pub fn frame(&self) -> ViewFrame {
        ViewFrame {
            progress: self.progress,
            view_state: self.view_state,
            current_track: self.current_track,
            is_scrolling: self.idle.is_active(),
        }
    }

    /// When the pending idle deadline falls, if any.
    pub fn idle_deadline(&self) -> Option<Instant> {
        self.idle.deadline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDLE: Duration = Duration::from_millis(500);

    fn mapper() -> ScrollStateMapper {
        ScrollStateMapper::new(12, Zones::default(), IDLE)
    }

    fn index_at(p: f64) -> Option<usize> {
        track_index_for(p, 12, &Zones::default())
    }

    #[test]
    fn test_view_state_breakpoint() {
        let z = Zones::default();
        assert_eq!(view_state_for(0.05, &z), ViewState::Hero);
        assert_eq!(view_state_for(0.1, &z), ViewState::Hero);
        assert_eq!(view_state_for(0.1000001, &z), ViewState::Player);
        assert_eq!(view_state_for(0.2, &z), ViewState::Player);
        assert_eq!(view_state_for(-3.0, &z), ViewState::Hero);
        assert_eq!(view_state_for(f64::NAN, &z), ViewState::Hero);
    }

    #[test]
    fn test_track_slots() {
        assert_eq!(index_at(0.0), None);
        assert_eq!(index_at(0.1499), None);
        assert_eq!(index_at(0.15), Some(0));
        assert_eq!(index_at(0.575), Some(6));
        assert_eq!(index_at(1.0), Some(11));
        assert_eq!(index_at(7.5), Some(11));
        // one slot is 0.85 / 12 of the document
        let slot = 0.85 / 12.0;
        for i in 0..12 {
            let mid = TRACK_ZONE_START + slot * (i as f64 + 0.5);
            assert_eq!(index_at(mid), Some(i), "slot {i}");
        }
    }

    #[test]
    fn test_boundary_tolerance() {
        // within the tolerance below the 5→6 boundary: rounds up
        assert_eq!(index_at(0.575 - 1e-11), Some(6));
        // clearly below it: plain floor
        assert_eq!(index_at(0.575 - 1e-6), Some(5));
        assert_eq!(index_at(0.575 + 1e-6), Some(6));
    }

    #[test]
    fn test_track_slots_match_formula() {
        for k in 0..=1000 {
            let p = 0.15 + 0.85 * k as f64 / 1000.0;
            let expected = (((p - 0.15) / 0.85 * 12.0) + 1e-9).floor().clamp(0.0, 11.0) as usize;
            assert_eq!(index_at(p), Some(expected), "p={p}");
        }
    }

    #[test]
    fn test_sides() {
        assert!(!is_side_b(5));
        assert!(is_side_b(6));
        assert_eq!(track_index_in_side(7), 1);
        assert_eq!(track_index_in_side(11), 5);
        assert_eq!(side_of(0), Side::A);
        assert_eq!(side_of(9), Side::B);
    }

    #[test]
    fn test_update_retains_index_above_zone() {
        let t0 = Instant::now();
        let mut m = mapper();
        assert_eq!(m.update(0.9, t0).current_track, 10);
        // scrolling back into the hero/gap zone keeps the last track
        let f = m.update(0.12, t0);
        assert_eq!(f.current_track, 10);
        assert_eq!(f.view_state, ViewState::Player);
        let f = m.update(0.0, t0);
        assert_eq!(f.current_track, 10);
        assert_eq!(f.view_state, ViewState::Hero);
    }

    #[test]
    fn test_update_from_start() {
        let t0 = Instant::now();
        let mut m = mapper();
        let f = m.frame();
        assert_eq!(f.current_track, 0);
        assert_eq!(f.view_state, ViewState::Hero);
        assert!(!f.is_scrolling);

        let f = m.update(0.05, t0);
        assert_eq!(f.current_track, 0);
        assert!(f.is_scrolling);
        assert!(!f.is_playing());
    }

    #[test]
    fn test_update_is_idempotent() {
        let t0 = Instant::now();
        let mut m = mapper();
        let a = m.update(0.61, t0);
        let b = m.update(0.61, t0);
        assert_eq!(a, b);
        assert_eq!(a.current_track, 6);
    }

    #[test]
    fn test_settle_after_idle() {
        let t0 = Instant::now();
        let mut m = mapper();
        m.update(0.3, t0);
        assert_eq!(m.settle(t0 + Duration::from_millis(499)), None);
        let f = m.settle(t0 + IDLE).unwrap();
        assert!(!f.is_scrolling);
        assert!(f.is_playing());
        // already settled
        assert_eq!(m.settle(t0 + Duration::from_secs(5)), None);
    }

    #[test]
    fn test_burst_keeps_scrolling() {
        let t0 = Instant::now();
        let mut m = mapper();
        for i in 0..20u64 {
            let now = t0 + Duration::from_millis(i * 400);
            let f = m.update(0.2 + i as f64 * 0.01, now);
            assert!(f.is_scrolling);
            // a timer armed by an earlier event must not end the burst
            assert_eq!(m.settle(now + Duration::from_millis(399)), None);
        }
        let last = t0 + Duration::from_millis(19 * 400);
        assert!(m.frame().is_scrolling);
        assert!(m.settle(last + IDLE).is_some());
    }

    #[test]
    fn test_select_track_bypasses_mapping() {
        let t0 = Instant::now();
        let mut m = mapper();
        let f = m.select_track(8);
        assert_eq!(f.current_track, 8);
        assert!(!f.is_scrolling);
        assert_eq!(f.view_state, ViewState::Hero);
        assert_eq!(m.select_track(40).current_track, 11);
        // the next scroll event inside the zone takes over again
        assert_eq!(m.update(0.2, t0).current_track, 0);
        // outside the zone the selection survives
        m.select_track(3);
        assert_eq!(m.update(0.05, t0).current_track, 3);
    }

    #[test]
    fn test_clamped_input() {
        let t0 = Instant::now();
        let mut m = mapper();
        let f = m.update(1.7, t0);
        assert_eq!(f.progress, 1.0);
        assert_eq!(f.current_track, 11);
        let f = m.update(-0.4, t0);
        assert_eq!(f.progress, 0.0);
        assert_eq!(f.current_track, 11);
        assert_eq!(m.update(f64::NAN, t0).progress, 0.0);
    }

    #[test]
    fn test_custom_zones_are_sanitized() {
        let z = Zones {
            hero_threshold: -1.0,
            track_zone_start: 4.0,
        }
        .sanitized();
        assert_eq!(z.hero_threshold, 0.0);
        assert_eq!(z.track_zone_start, 0.99);
        assert_eq!(track_index_for(1.0, 12, &z), Some(11));
    }
}
