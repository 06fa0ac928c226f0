//! Status bar — bottom line with the view mode and keybindings.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use spindle_core::mapper::ViewState;

use crate::action::ComponentId;
use crate::theme::{
    C_MUTED, C_PANEL_BORDER, C_PANEL_BORDER_FOCUSED, C_PLAYING, C_SECONDARY,
};

/// Mode label and color for the left of the bar.
pub fn mode_label(view: ViewState, is_scrolling: bool) -> (&'static str, Color) {
    match (view, is_scrolling) {
        (ViewState::Hero, _) => ("INTRO", C_SECONDARY),
        (ViewState::Player, true) => ("SEEK", C_PANEL_BORDER_FOCUSED),
        (ViewState::Player, false) => ("PLAY", C_PLAYING),
    }
}

/// Key hints for the focused pane.
pub fn key_hints(focus: Option<ComponentId>) -> &'static str {
    match focus {
        Some(ComponentId::TrackList) => {
            " ↑↓/jk move  Enter play  g/G first/last  wheel scroll  Tab/1-2 panes  K keys  ? help  q quit"
        }
        _ => {
            " wheel/jk scroll  PgUp/PgDn screen  g/G top/end  n/p track  Tab/1-2 panes  f grain  K keys  ? help  q quit"
        }
    }
}

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(
    frame: &mut Frame,
    area: Rect,
    view: ViewState,
    is_scrolling: bool,
    focus: Option<ComponentId>,
) {
    let (label, color) = mode_label(view, is_scrolling);
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", label),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled("│", Style::default().fg(C_PANEL_BORDER)),
        Span::styled(key_hints(focus), Style::default().fg(C_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_label() {
        assert_eq!(mode_label(ViewState::Hero, true).0, "INTRO");
        assert_eq!(mode_label(ViewState::Player, true).0, "SEEK");
        assert_eq!(mode_label(ViewState::Player, false).0, "PLAY");
    }

    #[test]
    fn test_hints_follow_focus() {
        assert!(key_hints(Some(ComponentId::TrackList)).contains("Enter play"));
        assert!(key_hints(None).contains("n/p track"));
    }
}
