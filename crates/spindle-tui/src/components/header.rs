//! Header component — one-row nav bar.
//!
//! Left: disc glyph (spins while the record plays) and the artist name.
//! Right: scroll hint for the current view.
//!
//! Not focusable.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{
    action::ComponentId,
    app_state::AppState,
    component::Component,
    theme::{C_PRIMARY, C_SECONDARY},
};

const DISC_FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];
/// Seconds per quarter turn of the nav-bar disc.
const DISC_STEP_SECS: f64 = 0.75;

pub struct Header;

impl Header {
    pub fn new() -> Self {
        Self
    }
}

/// Glyph for the nav disc: cycling while playing, still otherwise.
pub fn disc_glyph(playing: bool, clock: f64) -> &'static str {
    if !playing {
        return "◉";
    }
    DISC_FRAMES[(clock / DISC_STEP_SECS) as usize % DISC_FRAMES.len()]
}

impl Component for Header {
    fn id(&self) -> ComponentId {
        ComponentId::Turntable
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        if area.height == 0 {
            return;
        }
        let scene = state.scene();
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(20)])
            .split(area);

        let brand = Line::from(vec![
            Span::raw(" "),
            Span::styled(
                disc_glyph(scene.playing, state.clock()),
                Style::default().fg(C_PRIMARY),
            ),
            Span::raw(" "),
            Span::styled(
                spaced(&state.brand()),
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
            ),
        ]);
        frame.render_widget(Paragraph::new(brand), cols[0]);

        let hint = Line::from(Span::styled(
            format!("{} ", scene.header_hint),
            Style::default().fg(C_SECONDARY),
        ));
        frame.render_widget(Paragraph::new(hint).alignment(Alignment::Right), cols[1]);
    }
}

/// Letter-spaced uppercase text (`tracking-widest`).
pub fn spaced(s: &str) -> String {
    let mut out = String::with_capacity(s.len() * 2);
    for (i, c) in s.chars().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}
