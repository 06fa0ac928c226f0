//! Hero component — title block shown above the tilted record before the
//! first scroll.  Fades and lifts away as the view switches to the player.
//!
//! Not focusable.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{
    action::ComponentId,
    app_state::AppState,
    component::Component,
    components::header::spaced,
    theme::{fade, C_MUTED, C_PRIMARY, C_SECONDARY},
};

const TITLE: [&str; 2] = ["SONIC", "RITUAL"];
const TAGLINE: &str = "A curated collection of auditory experiences.";
/// Terminal rows per 100px of hero offset.
const ROWS_PER_100PX: f64 = 3.0;
/// Chevron bounce period.
const BOUNCE_SECS: f64 = 2.0;

pub struct Hero;

impl Hero {
    pub fn new() -> Self {
        Self
    }
}

/// Vertical chevron offset (0 or 1 rows) for the looping bounce.
pub fn bounce_offset(clock: f64) -> u16 {
    let phase = (clock / BOUNCE_SECS).fract();
    // [0, 10, 0] keyframes: down for the middle half of the loop
    if (0.25..0.75).contains(&phase) {
        1
    } else {
        0
    }
}

impl Component for Hero {
    fn id(&self) -> ComponentId {
        ComponentId::Turntable
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        let pose = state.animator.hero_pose();
        if pose.opacity < 0.02 || area.height < 6 {
            return;
        }

        let lift = (-pose.offset_y / 100.0 * ROWS_PER_100PX).round().max(0.0) as u16;
        let top = area.y + (area.height / 6).saturating_sub(lift);
        let wide = pose.scale >= 0.95;

        let mut lines = Vec::new();
        for (i, word) in TITLE.iter().enumerate() {
            let text = if wide { spaced(word) } else { (*word).to_string() };
            // second word fades white → gray
            let color = if i == 0 {
                C_PRIMARY
            } else {
                Color::Rgb(170, 170, 178)
            };
            lines.push(Line::from(Span::styled(
                text,
                Style::default()
                    .fg(fade(color, pose.opacity))
                    .add_modifier(Modifier::BOLD),
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            TAGLINE,
            Style::default().fg(fade(C_SECONDARY, pose.opacity)),
        )));
        lines.push(Line::from(""));
        if bounce_offset(state.clock()) == 1 {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            "⌄",
            Style::default().fg(fade(C_MUTED, pose.opacity)),
        )));

        let height = (lines.len() as u16).min(area.bottom().saturating_sub(top));
        let rect = Rect::new(area.x, top, area.width, height);
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), rect);
    }
}
