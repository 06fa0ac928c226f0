//! HelpOverlay component — centered popup listing every binding.
//! Swallows every key while open; `?`, `q` or Esc close it.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{C_MUTED, C_PANEL_BORDER, C_PRIMARY, C_SECONDARY, C_SELECTION_BG},
};

const KEY_COL: usize = 22;
const POPUP_W: u16 = 62;

/// Section title, then (keys, description) rows.
const BINDINGS: &[(&str, &[(&str, &str)])] = &[
    (
        "scrolling",
        &[
            ("wheel  or  j / k", "scroll down / up"),
            ("shift + wheel", "scroll one row"),
            ("pg dn / pg up", "scroll one screen"),
            ("space", "scroll one screen down"),
            ("home / end  or  g / G", "top of the page / last track"),
            ("click progress bar", "jump to that point"),
        ],
    ),
    (
        "tracks",
        &[
            ("n / p  or  → / ←", "next / previous track"),
            ("enter", "play the track under the cursor"),
            ("click a track", "play it"),
        ],
    ),
    (
        "panes & ui",
        &[
            ("tab / shift-tab", "focus next / previous pane"),
            ("1 / 2", "focus turntable / track list"),
            ("K", "toggle keys bar"),
            ("f", "toggle film grain"),
            ("?", "toggle this help"),
            ("q / ctrl-c", "quit"),
        ],
    ),
];

pub struct HelpOverlay {
    pub visible: bool,
}

impl HelpOverlay {
    pub fn new() -> Self {
        Self { visible: false }
    }
}

fn help_lines() -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        " keyboard & mouse",
        Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
    ))];
    for (section, rows) in BINDINGS {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", section),
            Style::default().fg(C_MUTED).add_modifier(Modifier::BOLD),
        )));
        lines.extend(rows.iter().map(|(keys, desc)| {
            Line::from(vec![
                Span::styled(
                    format!(" {:<width$}", keys, width = KEY_COL),
                    Style::default().fg(C_PRIMARY),
                ),
                Span::styled(*desc, Style::default().fg(C_SECONDARY)),
            ])
        }));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " press ? or esc to close",
        Style::default().fg(C_MUTED),
    )));
    lines
}

/// A `width` x `height` rect centered in `r`, clipped to it.
fn centered_rect(width: u16, height: u16, r: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(r);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}

impl Component for HelpOverlay {
    fn id(&self) -> ComponentId {
        ComponentId::HelpOverlay
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if !self.visible || key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Esc => vec![Action::ToggleHelp],
            _ => vec![],
        }
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if *action == Action::ToggleHelp {
            self.visible = !self.visible;
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, _state: &AppState) {
        if !self.visible {
            return;
        }
        let lines = help_lines();
        // borders add two rows
        let popup = centered_rect(POPUP_W, lines.len() as u16 + 2, area);
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(C_PANEL_BORDER))
                    .style(Style::default().bg(C_SELECTION_BG)),
            ),
            popup,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;
    use spindle_core::catalog::Catalog;
    use spindle_core::mapper::ScrollStateMapper;

    #[test]
    fn test_centered_rect() {
        let r = centered_rect(60, 26, Rect::new(0, 0, 100, 40));
        assert_eq!(r, Rect::new(20, 7, 60, 26));
        // clipped on a small terminal
        let small = centered_rect(60, 26, Rect::new(0, 0, 40, 10));
        assert_eq!(small, Rect::new(0, 0, 40, 10));
    }

    #[test]
    fn test_every_row_fits_the_key_column() {
        for (_, rows) in BINDINGS {
            assert!(rows.iter().all(|(keys, _)| keys.chars().count() < KEY_COL));
        }
        // title, then a blank and a heading per section, then blank + footer
        let rows: usize = BINDINGS.iter().map(|(_, r)| r.len()).sum();
        assert_eq!(help_lines().len(), 1 + BINDINGS.len() * 2 + rows + 2);
    }

    #[test]
    fn test_closes_only_on_close_keys() {
        let catalog = Catalog::builtin();
        let mapper = ScrollStateMapper::new(catalog.len(), Default::default(), Default::default());
        let state = AppState::new(catalog, mapper.frame(), false);
        let mut help = HelpOverlay::new();
        help.on_action(&Action::ToggleHelp, &state);
        assert!(help.visible);

        let key = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
        assert!(help.handle_key(key('j'), &state).is_empty());
        assert_eq!(help.handle_key(key('q'), &state), vec![Action::ToggleHelp]);
        assert_eq!(
            help.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE), &state),
            vec![Action::ToggleHelp]
        );
    }
}
