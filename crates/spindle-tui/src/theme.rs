//! Color palette and style constants for the player.

use ratatui::style::{Color, Style};
use spindle_core::catalog::Side;

// ── Color palette ─────────────────────────────────────────────────────────────

pub const C_BG: Color = Color::Rgb(5, 5, 5);
pub const C_OVERLAY: Color = Color::Rgb(8, 8, 8);
pub const C_PLAYING: Color = Color::Rgb(74, 222, 128);
pub const C_MUTED: Color = Color::Rgb(72, 72, 88);
pub const C_SECONDARY: Color = Color::Rgb(156, 163, 175);
pub const C_PRIMARY: Color = Color::Rgb(235, 235, 240);
pub const C_DIM: Color = Color::Rgb(51, 51, 51);
pub const C_SELECTION_BG: Color = Color::Rgb(28, 28, 32);
pub const C_PANEL_BORDER: Color = Color::Rgb(40, 40, 46);
pub const C_PANEL_BORDER_FOCUSED: Color = Color::Rgb(120, 100, 200);
pub const C_SIDE_A: Color = Color::Rgb(248, 113, 113);
pub const C_SIDE_B: Color = Color::Rgb(96, 165, 250);
pub const C_LABEL_A: Color = Color::Rgb(185, 28, 28);
pub const C_LABEL_B: Color = Color::Rgb(8, 145, 178);
pub const C_VINYL: Color = Color::Rgb(34, 34, 34);
pub const C_GROOVE: Color = Color::Rgb(60, 60, 60);
pub const C_CHROME: Color = Color::Rgb(220, 220, 220);
pub const C_SPINDLE: Color = Color::Rgb(229, 229, 229);

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Text color of a side badge.
pub fn side_color(side: Side) -> Color {
    match side {
        Side::A => C_SIDE_A,
        Side::B => C_SIDE_B,
    }
}

/// Center label color of a record face.
pub fn label_color(side: Side) -> Color {
    match side {
        Side::A => C_LABEL_A,
        Side::B => C_LABEL_B,
    }
}

/// Blend `color` toward `base` by `1 - opacity`.  Terminals have no alpha,
/// so every fade is a blend against what sits underneath.
pub fn blend(color: Color, base: Color, opacity: f64) -> Color {
    let t = opacity.clamp(0.0, 1.0);
    match (rgb(color), rgb(base)) {
        (Some((r, g, b)), Some((br, bg, bb))) => {
            let mix = |c: u8, k: u8| (k as f64 + (c as f64 - k as f64) * t).round() as u8;
            Color::Rgb(mix(r, br), mix(g, bg), mix(b, bb))
        }
        _ => {
            if t >= 0.5 {
                color
            } else {
                base
            }
        }
    }
}

/// Fade a foreground color against the page background.
pub fn fade(color: Color, opacity: f64) -> Color {
    blend(color, C_BG, opacity)
}

fn rgb(color: Color) -> Option<(u8, u8, u8)> {
    match color {
        Color::Rgb(r, g, b) => Some((r, g, b)),
        Color::Black => Some((0, 0, 0)),
        Color::White => Some((255, 255, 255)),
        _ => None,
    }
}

// ── Predefined styles ─────────────────────────────────────────────────────────

pub fn style_focused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER_FOCUSED)
}

pub fn style_unfocused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_endpoints() {
        let c = Color::Rgb(200, 100, 50);
        assert_eq!(blend(c, Color::Rgb(0, 0, 0), 1.0), c);
        assert_eq!(blend(c, Color::Rgb(0, 0, 0), 0.0), Color::Rgb(0, 0, 0));
        assert_eq!(blend(c, Color::Black, 0.5), Color::Rgb(100, 50, 25));
        // indexed colors snap instead of blending
        assert_eq!(blend(Color::Red, C_BG, 0.8), Color::Red);
        assert_eq!(blend(Color::Red, C_BG, 0.2), C_BG);
    }
}
