//! Presentational targets derived from a [`ViewFrame`], and the animator that
//! eases rendered values toward them.
//!
//! `Scene::from_frame` is pure: same frame in, same targets out.  `Animator`
//! owns the springs and tweens and is stepped once per rendered frame.

use std::time::Duration;

use crate::catalog::Side;
use crate::mapper::{ViewFrame, ViewState};
use crate::motion::{Easing, Spring, SpringValue, Tween};

/// Tonearm angle at the outer groove (first track of a side), degrees.
pub const TONEARM_BASE_DEG: f64 = 20.0;
/// Tonearm angle at the last track of a side.
pub const TONEARM_MAX_DEG: f64 = 48.0;
/// Highest in-side index; the arm reaches `TONEARM_MAX_DEG` there.
const LAST_IN_SIDE: f64 = 5.0;

pub const TONEARM_SPRING: Spring = Spring::new(50.0, 15.0, 1.0);
pub const RECORD_SPRING: Spring = Spring::new(40.0, 18.0, 1.0);

/// One platter revolution at 33⅓ RPM.
pub const REVOLUTION: Duration = Duration::from_micros(1_818_100);

pub const BACKDROP_OPACITY: f64 = 0.6;
const BACKDROP_FADE: Duration = Duration::from_millis(1500);
const HERO_FADE: Duration = Duration::from_millis(800);
const OVERLAY_FADE: Duration = Duration::from_millis(1000);
const TONEARM_FADE: Duration = Duration::from_millis(1000);
const INFO_FADE: Duration = Duration::from_millis(700);
const SPIN_RETURN: Duration = Duration::from_millis(500);

/// Target angle for the tonearm.  Parked at 0 while the record is seeking.
pub fn tonearm_angle(track_index_in_side: usize, active: bool) -> f64 {
    if !active {
        return 0.0;
    }
    let progress = (track_index_in_side as f64 / LAST_IN_SIDE).min(1.0);
    TONEARM_BASE_DEG + progress * (TONEARM_MAX_DEG - TONEARM_BASE_DEG)
}

/// 3D pose of the record.  In hero view it lies tilted and oversized below
/// the title, forming a horizon; in player view it faces the viewer and flips
/// to show side B.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordPose {
    pub rotate_x: f64,
    pub rotate_y: f64,
    pub scale: f64,
    pub offset_y: f64,
}

impl RecordPose {
    pub fn for_view(view_state: ViewState, side: Side) -> Self {
        match view_state {
            ViewState::Hero => Self {
                rotate_x: 60.0,
                rotate_y: 0.0,
                scale: 2.3,
                offset_y: 580.0,
            },
            ViewState::Player => Self {
                rotate_x: 0.0,
                rotate_y: if side == Side::B { 180.0 } else { 0.0 },
                scale: 1.0,
                offset_y: 0.0,
            },
        }
    }

    /// Which face points at the viewer for the current flip angle.
    pub fn facing(&self) -> Side {
        if self.rotate_y.to_radians().cos() >= 0.0 {
            Side::A
        } else {
            Side::B
        }
    }
}

/// Hero title block: opacity, vertical offset, scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeroPose {
    pub opacity: f64,
    pub offset_y: f64,
    pub scale: f64,
}

impl HeroPose {
    pub fn for_view(view_state: ViewState) -> Self {
        match view_state {
            ViewState::Hero => Self {
                opacity: 1.0,
                offset_y: 0.0,
                scale: 1.0,
            },
            ViewState::Player => Self {
                opacity: 0.0,
                offset_y: -100.0,
                scale: 0.9,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub view_state: ViewState,
    pub side: Side,
    pub track_index_in_side: usize,
    pub playing: bool,
    pub tonearm_visible: bool,
    pub tonearm_angle: f64,
    pub record: RecordPose,
    pub face_a_spinning: bool,
    pub face_b_spinning: bool,
    pub hero: HeroPose,
    /// Dark layer over the backdrop; opaque in hero view.
    pub hero_overlay_opacity: f64,
    pub track_info_visible: bool,
    pub header_hint: &'static str,
    pub status_label: &'static str,
}

impl Scene {
    pub fn from_frame(frame: &ViewFrame) -> Self {
        let side = frame.side();
        let playing = frame.is_playing();
        let player = frame.view_state == ViewState::Player;
        Self {
            view_state: frame.view_state,
            side,
            track_index_in_side: frame.track_index_in_side(),
            playing,
            tonearm_visible: player,
            tonearm_angle: tonearm_angle(frame.track_index_in_side(), !frame.is_scrolling),
            record: RecordPose::for_view(frame.view_state, side),
            face_a_spinning: playing && !frame.is_side_b(),
            face_b_spinning: playing && frame.is_side_b(),
            hero: HeroPose::for_view(frame.view_state),
            hero_overlay_opacity: if player { 0.0 } else { 1.0 },
            track_info_visible: player,
            header_hint: if player {
                "SCROLL TO BROWSE"
            } else {
                "SCROLL TO START"
            },
            status_label: if frame.is_scrolling { "SEEKING" } else { "PLAYING" },
        }
    }
}

/// One background video layer.  Layers are keyed by video reference; a new
/// key fades in on top while older layers fade out.
#[derive(Debug, Clone)]
pub struct BackdropLayer {
    pub key: String,
    pub opacity: Tween,
}

/// Continuous platter rotation for one face.
#[derive(Debug, Clone)]
struct Platter {
    angle: f64,
    returning: Option<Tween>,
}

impl Platter {
    fn new() -> Self {
        Self {
            angle: 0.0,
            returning: None,
        }
    }

    fn step(&mut self, spinning: bool, dt: Duration) {
        if spinning {
            self.returning = None;
            let per_sec = 360.0 / REVOLUTION.as_secs_f64();
            self.angle = (self.angle + per_sec * dt.as_secs_f64()) % 360.0;
            return;
        }
        if self.angle == 0.0 {
            return;
        }
        let tween = self.returning.get_or_insert_with(|| {
            // unwind the short way round
            let start = if self.angle > 180.0 {
                self.angle - 360.0
            } else {
                self.angle
            };
            let mut t = Tween::new(start, SPIN_RETURN, Easing::EaseInOut);
            t.set_target(0.0);
            t
        });
        tween.step(dt);
        let done = tween.is_done();
        let v = tween.value();
        if done {
            self.angle = 0.0;
            self.returning = None;
        } else {
            self.angle = v.rem_euclid(360.0);
        }
    }
}

/// Eases every rendered value toward the current [`Scene`].
pub struct Animator {
    scene: Scene,
    tonearm: SpringValue,
    tonearm_opacity: Tween,
    rotate_x: SpringValue,
    rotate_y: SpringValue,
    scale: SpringValue,
    offset_y: SpringValue,
    hero_opacity: Tween,
    hero_offset: Tween,
    hero_scale: Tween,
    overlay: Tween,
    info: Tween,
    face_a: Platter,
    face_b: Platter,
    backdrop: Vec<BackdropLayer>,
}

impl Animator {
    /// Start fully settled on `scene` with backdrop `video`.
    pub fn new(scene: Scene, video: &str) -> Self {
        let r = scene.record;
        let h = scene.hero;
        let tonearm_opacity = if scene.tonearm_visible { 1.0 } else { 0.0 };
        let info = if scene.track_info_visible { 1.0 } else { 0.0 };
        Self {
            tonearm: SpringValue::new(TONEARM_SPRING, scene.tonearm_angle),
            tonearm_opacity: Tween::new(tonearm_opacity, TONEARM_FADE, Easing::EaseInOut),
            rotate_x: SpringValue::new(RECORD_SPRING, r.rotate_x),
            rotate_y: SpringValue::new(RECORD_SPRING, r.rotate_y),
            scale: SpringValue::new(RECORD_SPRING, r.scale),
            offset_y: SpringValue::new(RECORD_SPRING, r.offset_y),
            hero_opacity: Tween::new(h.opacity, HERO_FADE, Easing::EaseInOut),
            hero_offset: Tween::new(h.offset_y, HERO_FADE, Easing::EaseInOut),
            hero_scale: Tween::new(h.scale, HERO_FADE, Easing::EaseInOut),
            overlay: Tween::new(scene.hero_overlay_opacity, OVERLAY_FADE, Easing::Linear),
            info: Tween::new(info, INFO_FADE, Easing::EaseInOut),
            face_a: Platter::new(),
            face_b: Platter::new(),
            backdrop: vec![BackdropLayer {
                key: video.to_string(),
                opacity: Tween::new(BACKDROP_OPACITY, BACKDROP_FADE, Easing::EaseInOut),
            }],
            scene,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Retarget everything at a new scene.  Cheap to call with an unchanged
    /// scene.
    pub fn set_scene(&mut self, scene: Scene) {
        self.tonearm.set_target(scene.tonearm_angle);
        self.tonearm_opacity
            .set_target(if scene.tonearm_visible { 1.0 } else { 0.0 });
        self.rotate_x.set_target(scene.record.rotate_x);
        self.rotate_y.set_target(scene.record.rotate_y);
        self.scale.set_target(scene.record.scale);
        self.offset_y.set_target(scene.record.offset_y);
        self.hero_opacity.set_target(scene.hero.opacity);
        self.hero_offset.set_target(scene.hero.offset_y);
        self.hero_scale.set_target(scene.hero.scale);
        self.overlay.set_target(scene.hero_overlay_opacity);
        self.info
            .set_target(if scene.track_info_visible { 1.0 } else { 0.0 });
        self.scene = scene;
    }

    /// Switch the background video.  No-op if `video` is already the top layer.
    pub fn set_video(&mut self, video: &str) {
        if self.backdrop.last().is_some_and(|l| l.key == video) {
            return;
        }
        for layer in &mut self.backdrop {
            layer.opacity.set_target(0.0);
        }
        let mut opacity = Tween::new(0.0, BACKDROP_FADE, Easing::EaseInOut);
        opacity.set_target(BACKDROP_OPACITY);
        self.backdrop.push(BackdropLayer {
            key: video.to_string(),
            opacity,
        });
    }

    pub fn step(&mut self, dt: Duration) {
        self.tonearm.step(dt);
        self.tonearm_opacity.step(dt);
        self.rotate_x.step(dt);
        self.rotate_y.step(dt);
        self.scale.step(dt);
        self.offset_y.step(dt);
        self.hero_opacity.step(dt);
        self.hero_offset.step(dt);
        self.hero_scale.step(dt);
        self.overlay.step(dt);
        self.info.step(dt);
        self.face_a.step(self.scene.face_a_spinning, dt);
        self.face_b.step(self.scene.face_b_spinning, dt);

        for layer in &mut self.backdrop {
            layer.opacity.step(dt);
        }
        // keep the top layer; drop anything that has fully faded out beneath it
        let top = self.backdrop.len().saturating_sub(1);
        let mut i = 0;
        self.backdrop.retain(|l| {
            let keep = i == top || !(l.opacity.is_done() && l.opacity.value() <= 0.0);
            i += 1;
            keep
        });
    }

    /// True while anything is still moving and needs another frame.
    pub fn is_animating(&self) -> bool {
        !self.tonearm.is_settled()
            || !self.tonearm_opacity.is_done()
            || !self.rotate_x.is_settled()
            || !self.rotate_y.is_settled()
            || !self.scale.is_settled()
            || !self.offset_y.is_settled()
            || !self.hero_opacity.is_done()
            || !self.hero_offset.is_done()
            || !self.hero_scale.is_done()
            || !self.overlay.is_done()
            || !self.info.is_done()
            || self.scene.face_a_spinning
            || self.scene.face_b_spinning
            || self.face_a.angle != 0.0
            || self.face_b.angle != 0.0
            || self.backdrop.iter().any(|l| !l.opacity.is_done())
    }

    pub fn tonearm_angle(&self) -> f64 {
        self.tonearm.value()
    }

    pub fn tonearm_opacity(&self) -> f64 {
        self.tonearm_opacity.value()
    }

    pub fn record_pose(&self) -> RecordPose {
        RecordPose {
            rotate_x: self.rotate_x.value(),
            rotate_y: self.rotate_y.value(),
            scale: self.scale.value(),
            offset_y: self.offset_y.value(),
        }
    }

    pub fn hero_pose(&self) -> HeroPose {
        HeroPose {
            opacity: self.hero_opacity.value(),
            offset_y: self.hero_offset.value(),
            scale: self.hero_scale.value(),
        }
    }

    pub fn hero_overlay_opacity(&self) -> f64 {
        self.overlay.value()
    }

    pub fn track_info_opacity(&self) -> f64 {
        self.info.value()
    }

    /// Label rotation of the given face, degrees in [0,360).
    pub fn spin_angle(&self, side: Side) -> f64 {
        match side {
            Side::A => self.face_a.angle,
            Side::B => self.face_b.angle,
        }
    }

    pub fn backdrop(&self) -> &[BackdropLayer] {
        &self.backdrop
    }
}
