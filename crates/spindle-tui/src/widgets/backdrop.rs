//! Backdrop — the full-bleed "video" behind the stage.
//!
//! Terminals cannot play the looping clips, so each video reference becomes
//! a tinted wash whose hue is derived from the reference itself.  Layers are
//! stacked oldest first and blended by their animated opacity; the hero
//! overlay then darkens the result.  Optional film grain is sprinkled on top.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::style::Color;
use ratatui::widgets::canvas::{Painter, Shape};

use spindle_core::scene::BackdropLayer;

use crate::theme::{blend, C_BG, C_OVERLAY};

/// Braille dots lit by the grain, per thousand.
const GRAIN_PER_MILLE: usize = 15;
/// Grain redraws every N frames.
const GRAIN_HOLD_FRAMES: u64 = 2;

/// Wash color for one video reference: stable per key, dim enough that text
/// stays readable on top.
pub fn video_tint(key: &str) -> Color {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    let hue = (hasher.finish() % 360) as f64;
    hsv(hue, 0.55, 0.32)
}

/// Composite background color for the stage.
pub fn wash(layers: &[BackdropLayer], overlay_opacity: f64) -> Color {
    let mut color = C_BG;
    for layer in layers {
        color = blend(video_tint(&layer.key), color, layer.opacity.value());
    }
    blend(C_OVERLAY, color, overlay_opacity)
}

/// Film grain as a canvas shape.  Deterministic for a given frame so a
/// redraw without a new tick looks identical.
pub struct Grain {
    seed: u64,
    /// Braille dots covered by the canvas.
    dots: usize,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    color: Color,
}

impl Grain {
    /// `strength` is how much of the grain shows through the hero overlay;
    /// `base` is the wash it sits on.
    pub fn new(
        frame_count: u64,
        dots: usize,
        bounds: ([f64; 2], [f64; 2]),
        strength: f64,
        base: Color,
    ) -> Self {
        Self {
            seed: frame_count / GRAIN_HOLD_FRAMES,
            dots: if strength <= 0.01 { 0 } else { dots },
            x_bounds: bounds.0,
            y_bounds: bounds.1,
            color: blend(Color::Rgb(150, 150, 150), base, 0.2 * strength),
        }
    }

    /// Points to paint, in canvas coordinates.
    pub fn points(&self) -> Vec<(f64, f64)> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let count = self.dots * GRAIN_PER_MILLE / 1000;
        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        (0..count)
            .map(|_| (rng.gen_range(x0..=x1), rng.gen_range(y0..=y1)))
            .collect()
    }
}

impl Shape for Grain {
    fn draw(&self, painter: &mut Painter) {
        for (x, y) in self.points() {
            if let Some((px, py)) = painter.get_point(x, y) {
                painter.paint(px, py, self.color);
            }
        }
    }
}

fn hsv(h: f64, s: f64, v: f64) -> Color {
    let c = v * s;
    let hp = (h % 360.0) / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = v - c;
    let to = |f: f64| ((f + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Color::Rgb(to(r), to(g), to(b))
}
