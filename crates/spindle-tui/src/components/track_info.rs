//! TrackInfo component — floating caption in the bottom-right of the stage.
//!
//! ```text
//!   07
//!   Violet Hour
//!   Neon Drift
//!   3:42 | SIDE B
//!   ▶ PLAYING
//! ```
//!
//! Fades in with the player view.  Not focusable.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::{
    action::ComponentId,
    app_state::AppState,
    component::Component,
    theme::{fade, side_color, C_DIM, C_MUTED, C_PLAYING, C_PRIMARY, C_SECONDARY},
};

const WIDTH: u16 = 36;
const HEIGHT: u16 = 6;

pub struct TrackInfo;

impl TrackInfo {
    pub fn new() -> Self {
        Self
    }
}

/// Where the caption sits inside the stage.
pub fn caption_rect(area: Rect) -> Rect {
    let w = WIDTH.min(area.width);
    let h = HEIGHT.min(area.height);
    Rect::new(
        area.right().saturating_sub(w + 2).max(area.x),
        area.bottom().saturating_sub(h + 1).max(area.y),
        w,
        h,
    )
}

/// Two-digit track number, 1-based.
pub fn track_number(index: usize) -> String {
    format!("{:02}", index + 1)
}

/// Truncate to `max` display columns with an ellipsis.
pub fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    let mut w = 0;
    for c in s.chars() {
        let cw = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if w + cw + 1 > max {
            break;
        }
        out.push(c);
        w += cw;
    }
    out.push('…');
    out
}

impl Component for TrackInfo {
    fn id(&self) -> ComponentId {
        ComponentId::Turntable
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        let opacity = state.animator.track_info_opacity();
        if opacity < 0.02 || area.width < 12 || area.height < HEIGHT {
            return;
        }
        let rect = caption_rect(area);
        let max = rect.width as usize;
        let track = state.current_track();
        let scene = state.scene();

        let status_color = if scene.playing { C_PLAYING } else { C_SECONDARY };
        let status_glyph = if scene.playing { "▶" } else { "❚❚" };
        let lines = vec![
            Line::from(Span::styled(
                track_number(state.frame.current_track),
                Style::default().fg(fade(C_DIM, opacity)).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                truncate(&track.title, max),
                Style::default()
                    .fg(fade(C_PRIMARY, opacity))
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                truncate(&track.artist, max),
                Style::default().fg(fade(C_SECONDARY, opacity)),
            )),
            Line::from(vec![
                Span::styled(
                    track.duration.clone(),
                    Style::default().fg(fade(C_MUTED, opacity)),
                ),
                Span::styled(" | ", Style::default().fg(fade(C_DIM, opacity))),
                Span::styled(
                    scene.side.label(),
                    Style::default()
                        .fg(fade(side_color(scene.side), opacity))
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(Span::styled(
                format!("{} {}", status_glyph, scene.status_label),
                Style::default().fg(fade(status_color, opacity)),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Right), rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_number() {
        assert_eq!(track_number(0), "01");
        assert_eq!(track_number(11), "12");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Violet Hour", 20), "Violet Hour");
        assert_eq!(truncate("Violet Hour", 6), "Viole…");
        assert_eq!(truncate("ＡＢＣ", 5), "ＡＢ…");
    }

    #[test]
    fn test_caption_hugs_bottom_right() {
        let r = caption_rect(Rect::new(0, 1, 100, 30));
        assert_eq!(r, Rect::new(62, 24, 36, 6));
        let small = caption_rect(Rect::new(0, 0, 20, 4));
        assert_eq!(small.width, 20);
        assert_eq!(small.x, 0);
    }
}
