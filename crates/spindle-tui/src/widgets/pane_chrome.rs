//! PaneChrome — bordered pane with focus styling and a side badge.

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders},
};

use spindle_core::catalog::Side;

use crate::theme::{
    side_color, style_focused_border, style_unfocused_border, C_MUTED, C_PRIMARY, C_SECONDARY,
};

/// Title line: `[N] title`, bright when focused.
fn title_line(title: &str, number_key: char, focused: bool) -> Line<'_> {
    let title_style = if focused {
        Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(C_MUTED)
    };
    Line::from(vec![
        Span::styled(format!("[{}] ", number_key), Style::default().fg(C_SECONDARY)),
        Span::styled(title, title_style),
    ])
}

/// Bordered block for a pane.  `side` adds a right-aligned "SIDE X" badge in
/// that side's color.
pub fn pane_chrome(title: &str, number_key: char, focused: bool, side: Option<Side>) -> Block<'_> {
    let border_style = if focused {
        style_focused_border()
    } else {
        style_unfocused_border()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title_line(title, number_key, focused));

    match side {
        Some(side) => block.title_top(
            Line::from(Span::styled(
                format!(" {} ", side.label()),
                Style::default()
                    .fg(side_color(side))
                    .add_modifier(Modifier::BOLD),
            ))
            .right_aligned(),
        ),
        None => block,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_marks_focus() {
        let focused = title_line("tracks", '2', true);
        assert_eq!(focused.spans[0].content, "[2] ");
        assert!(focused.spans[1].style.add_modifier.contains(Modifier::BOLD));
        let idle = title_line("tracks", '2', false);
        assert_eq!(idle.spans[1].style.fg, Some(C_MUTED));
    }
}
