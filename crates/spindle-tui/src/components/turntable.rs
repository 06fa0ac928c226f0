//! Turntable component — the stage.  Full-body braille canvas holding the
//! backdrop wash, film grain, the record and the tonearm.
//!
//! Canvas space: y spans [-100, 100]; x is widened to the area's aspect so
//! one unit is the same physical size on both axes.  The record is shaded
//! per dot (grooves, label, spin stripe), then projected through its pose:
//! `rotate_x` squashes it vertically into the hero horizon, `rotate_y`
//! squashes and mirrors it horizontally for the side flip.
//!
//! Keys (when focused): scroll the document and step tracks.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::canvas::{Canvas, Circle, Line as CanvasLine, Painter, Shape},
    Frame,
};

use spindle_core::catalog::Side;
use spindle_core::scene::RecordPose;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{blend, label_color, C_CHROME, C_GROOVE, C_PRIMARY, C_SPINDLE, C_VINYL},
    widgets::backdrop::{wash, Grain},
};

/// Half-height of the canvas in units.
const HALF_H: f64 = 100.0;
/// Player-view record radius in units.
const RECORD_RADIUS: f64 = 70.0;
/// Record width in the layout the pose offsets are expressed in.
const POSE_PX_RADIUS: f64 = 325.0;
/// Grooves across the playable band.
const GROOVES: f64 = 14.0;
const LABEL_FRAC: f64 = 0.33;
const SPINDLE_FRAC: f64 = 0.035;
/// Tonearm pivot offset from the record center, in radii.
const PIVOT_FRAC: f64 = 1.05;
/// Pivot to stylus, in radii.
const ARM_FRAC: f64 = 1.9;

pub struct Turntable;

impl Turntable {
    pub fn new() -> Self {
        Self
    }
}

/// Canvas x bounds that keep braille dots square for `area`.
pub fn x_half_extent(area: Rect) -> f64 {
    if area.height == 0 {
        return HALF_H;
    }
    // braille: 2 dots per column, 4 per row
    HALF_H * (area.width as f64 * 2.0) / (area.height as f64 * 4.0)
}

/// Record radius that fits `x_half` with some margin.
pub fn record_radius(x_half: f64) -> f64 {
    RECORD_RADIUS.min(x_half * 0.8)
}

/// Stylus tip relative to the pivot for a tonearm angle (degrees clockwise
/// from straight down).
pub fn stylus_offset(angle_deg: f64, radius: f64) -> (f64, f64) {
    let a = angle_deg.to_radians();
    let len = ARM_FRAC * radius;
    (-a.sin() * len, -a.cos() * len)
}

/// A record face projected through its pose.
struct Record {
    cx: f64,
    cy: f64,
    radius: f64,
    /// Horizontal squash from the flip; negative when mirrored.
    sx: f64,
    /// Vertical squash from the tilt.
    sy: f64,
    spin: f64,
    face: Side,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    /// Canvas units per braille dot.
    step: f64,
}

impl Record {
    fn new(pose: RecordPose, spin: f64, base_radius: f64, x_half: f64, step: f64) -> Self {
        let unit = base_radius / POSE_PX_RADIUS;
        Self {
            cx: 0.0,
            cy: -pose.offset_y * unit,
            radius: base_radius * pose.scale,
            sx: pose.rotate_y.to_radians().cos(),
            sy: pose.rotate_x.to_radians().cos(),
            spin,
            face: pose.facing(),
            x_bounds: [-x_half, x_half],
            y_bounds: [-HALF_H, HALF_H],
            step,
        }
    }

    /// Shade a point given in face coordinates (radius fraction, angle).
    fn shade(&self, rho: f64, theta: f64) -> ratatui::style::Color {
        if rho < SPINDLE_FRAC {
            return C_SPINDLE;
        }
        // spin stripe: the label marker and a faint sheen opposite it
        let rel = (theta.to_degrees() + self.spin).rem_euclid(360.0);
        if rho < LABEL_FRAC {
            let label = label_color(self.face);
            return if rho > 0.12 && (rel < 14.0 || rel > 346.0) {
                blend(C_PRIMARY, label, 0.35)
            } else {
                label
            };
        }
        if rho > 0.97 {
            return C_VINYL;
        }
        let band = ((rho - LABEL_FRAC) / (1.0 - LABEL_FRAC) * GROOVES).fract();
        let groove = rho > 0.38 && band < 0.2;
        let sheen = (rel - 180.0).abs() < 10.0;
        match (groove, sheen) {
            (true, true) => blend(C_PRIMARY, C_GROOVE, 0.15),
            (true, false) | (false, true) => C_GROOVE,
            (false, false) => C_VINYL,
        }
    }
}

impl Shape for Record {
    fn draw(&self, painter: &mut Painter) {
        let ry = self.radius * self.sy.abs();
        let rx = self.radius * self.sx.abs();
        if ry < self.step * 0.5 || rx < self.step * 0.25 || self.step <= 0.0 {
            return;
        }
        let y0 = (self.cy - ry).max(self.y_bounds[0]);
        let y1 = (self.cy + ry).min(self.y_bounds[1]);
        let mut y = y0;
        while y <= y1 {
            let v = (y - self.cy) / self.sy;
            let span = (1.0 - ((y - self.cy) / ry).powi(2)).max(0.0).sqrt() * rx;
            let x0 = (self.cx - span).max(self.x_bounds[0]);
            let x1 = (self.cx + span).min(self.x_bounds[1]);
            let mut x = x0;
            while x <= x1 {
                let u = (x - self.cx) / self.sx;
                let rho = u.hypot(v) / self.radius;
                if rho <= 1.0 {
                    if let Some((px, py)) = painter.get_point(x, y) {
                        painter.paint(px, py, self.shade(rho, v.atan2(u)));
                    }
                }
                x += self.step;
            }
            y += self.step;
        }
    }
}

impl Component for Turntable {
    fn id(&self) -> ComponentId {
        ComponentId::Turntable
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => vec![Action::WheelDown],
            KeyCode::Char('k') | KeyCode::Up => vec![Action::WheelUp],
            KeyCode::PageDown | KeyCode::Char(' ') => vec![Action::PageDown],
            KeyCode::PageUp => vec![Action::PageUp],
            KeyCode::Char('g') | KeyCode::Home => vec![Action::ScrollHome],
            KeyCode::Char('G') | KeyCode::End => vec![Action::ScrollEnd],
            KeyCode::Char('n') | KeyCode::Right => vec![Action::NextTrack],
            KeyCode::Char('p') | KeyCode::Left => vec![Action::PrevTrack],
            _ => vec![],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        if area.width < 4 || area.height < 2 {
            return;
        }
        let anim = &state.animator;
        let overlay = anim.hero_overlay_opacity();
        let bg = wash(anim.backdrop(), overlay);

        let x_half = x_half_extent(area);
        let radius = record_radius(x_half);
        let step = HALF_H * 2.0 / (area.height as f64 * 4.0);
        let pose = anim.record_pose();
        let face = pose.facing();
        let record = Record::new(pose, anim.spin_angle(face), radius, x_half, step);

        let dots = area.width as usize * 2 * area.height as usize * 4;
        let grain_strength = if state.grain { 1.0 - overlay } else { 0.0 };
        let grain = Grain::new(
            state.frame_count,
            dots,
            ([-x_half, x_half], [-HALF_H, HALF_H]),
            grain_strength,
            bg,
        );

        let arm_opacity = anim.tonearm_opacity();
        let pivot = (radius * PIVOT_FRAC, radius * PIVOT_FRAC);
        let (dx, dy) = stylus_offset(anim.tonearm_angle(), radius);
        let tip = (pivot.0 + dx, pivot.1 + dy);
        let arm_color = blend(C_CHROME, bg, arm_opacity);

        let label = (pose.scale < 1.3 && record.sx.abs() > 0.6).then(|| {
            Line::from(Span::styled(
                face.label(),
                Style::default()
                    .fg(blend(C_PRIMARY, label_color(face), 0.9))
                    .add_modifier(Modifier::BOLD),
            ))
        });
        let label_y = record.cy - radius * 0.18;

        let canvas = Canvas::default()
            .background_color(bg)
            .marker(Marker::Braille)
            .x_bounds([-x_half, x_half])
            .y_bounds([-HALF_H, HALF_H])
            .paint(move |ctx| {
                ctx.draw(&grain);
                ctx.layer();
                ctx.draw(&record);
                if arm_opacity > 0.02 {
                    ctx.layer();
                    ctx.draw(&CanvasLine {
                        x1: pivot.0,
                        y1: pivot.1,
                        x2: tip.0,
                        y2: tip.1,
                        color: arm_color,
                    });
                    // headshell
                    ctx.draw(&CanvasLine {
                        x1: tip.0,
                        y1: tip.1,
                        x2: tip.0 - radius * 0.08,
                        y2: tip.1 + radius * 0.04,
                        color: arm_color,
                    });
                    ctx.draw(&Circle {
                        x: pivot.0,
                        y: pivot.1,
                        radius: radius * 0.07,
                        color: arm_color,
                    });
                }
                if let Some(label) = &label {
                    ctx.print(-(radius * 0.12), label_y, label.clone());
                }
            });
        frame.render_widget(canvas, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spindle_core::mapper::ViewState;
    use spindle_core::scene::{TONEARM_BASE_DEG, TONEARM_MAX_DEG};

    fn record(view: ViewState, side: Side) -> Record {
        Record::new(RecordPose::for_view(view, side), 0.0, RECORD_RADIUS, 150.0, 1.0)
    }

    #[test]
    fn test_aspect_keeps_dots_square() {
        // 80x20 cells = 160x80 dots: twice as wide as tall
        assert_eq!(x_half_extent(Rect::new(0, 0, 80, 20)), 200.0);
        assert_eq!(record_radius(200.0), RECORD_RADIUS);
        assert_eq!(record_radius(50.0), 40.0);
    }

    #[test]
    fn test_stylus_sweeps_inward() {
        let pivot = RECORD_RADIUS * PIVOT_FRAC;
        let dist = |angle: f64| {
            let (dx, dy) = stylus_offset(angle, RECORD_RADIUS);
            (pivot + dx).hypot(pivot + dy) / RECORD_RADIUS
        };
        // parked outside the record
        assert!(dist(0.0) > 1.0);
        // first track on the outer grooves, last near the label
        let outer = dist(TONEARM_BASE_DEG);
        let inner = dist(TONEARM_MAX_DEG);
        assert!(outer < 1.0 && outer > 0.7);
        assert!(inner < outer && inner > LABEL_FRAC);
    }

    #[test]
    fn test_hero_pose_sinks_and_flattens() {
        let hero = record(ViewState::Hero, Side::A);
        assert!(hero.cy < -100.0);
        assert!((hero.sy - 0.5).abs() < 1e-9);
        assert!(hero.radius > RECORD_RADIUS * 2.0);
        // top edge peeks into the lower half as a horizon
        let top = hero.cy + hero.radius * hero.sy;
        assert!(top > -100.0 && top < 0.0);
    }

    #[test]
    fn test_side_b_is_mirrored() {
        let b = record(ViewState::Player, Side::B);
        assert!(b.sx < -0.99);
        assert_eq!(b.face, Side::B);
        assert_eq!(b.cy, 0.0);
    }

    #[test]
    fn test_shading_regions() {
        let r = record(ViewState::Player, Side::A);
        assert_eq!(r.shade(0.0, 0.0), C_SPINDLE);
        assert_eq!(r.shade(0.2, std::f64::consts::FRAC_PI_2), label_color(Side::A));
        assert_eq!(r.shade(0.99, 1.0), C_VINYL);
    }
}
