//! Smooth Unicode progress bar for the scroll position.
//!
//! The hero zone is drawn dim, the track zone in the playing color; a tick
//! marks where track selection starts.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use spindle_core::mapper::Zones;

use crate::theme::{C_DIM, C_MUTED, C_PLAYING, C_SECONDARY};

const BLOCKS: [char; 9] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];
/// Width reserved for the "100% " label.
const LABEL_W: u16 = 5;

/// Fill string for `progress` over `width` cells, 8 steps per cell.
pub fn bar_cells(progress: f64, width: usize) -> String {
    let eighths = (progress.clamp(0.0, 1.0) * width as f64 * 8.0) as usize;
    let full_blocks = eighths / 8;
    let partial = eighths % 8;

    let mut bar = String::with_capacity(width * 3);
    for _ in 0..full_blocks.min(width) {
        bar.push('█');
    }
    if full_blocks < width {
        bar.push(BLOCKS[partial]);
        for _ in (full_blocks + 1)..width {
            bar.push(' ');
        }
    }
    bar
}

/// Normalised position under `column` for a click on the bar in `area`.
pub fn progress_at(column: u16, area: Rect) -> Option<f64> {
    let bar_x = area.x + LABEL_W;
    let bar_w = area.width.saturating_sub(LABEL_W);
    if bar_w == 0 || column < bar_x || column >= bar_x + bar_w {
        return None;
    }
    Some((column - bar_x) as f64 / (bar_w - 1).max(1) as f64)
}

/// Render the scroll bar in `area`.
pub fn draw_progress(frame: &mut Frame, area: Rect, progress: f64, zones: &Zones) {
    if area.width <= LABEL_W + 4 || area.height == 0 {
        return;
    }
    let bar_w = (area.width - LABEL_W) as usize;
    let bar = bar_cells(progress, bar_w);
    let color = if progress > zones.hero_threshold {
        C_PLAYING
    } else {
        C_SECONDARY
    };

    // tick at the start of the track zone when the fill hasn't reached it
    let tick_col = (zones.track_zone_start * bar_w as f64).round() as usize;
    let mut spans = vec![Span::styled(
        format!("{:>3}% ", (progress.clamp(0.0, 1.0) * 100.0).round() as u32),
        Style::default().fg(C_MUTED),
    )];
    let chars: Vec<char> = bar.chars().collect();
    let filled = (progress.clamp(0.0, 1.0) * bar_w as f64) as usize;
    if tick_col > filled && tick_col < chars.len() {
        let head: String = chars[..tick_col].iter().collect();
        let tail: String = chars[tick_col + 1..].iter().collect();
        spans.push(Span::styled(head, Style::default().fg(color)));
        spans.push(Span::styled("┊", Style::default().fg(C_DIM)));
        spans.push(Span::styled(tail, Style::default().fg(color)));
    } else {
        spans.push(Span::styled(bar, Style::default().fg(color)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_cells() {
        assert_eq!(bar_cells(0.0, 4), "    ");
        assert_eq!(bar_cells(1.0, 4), "████");
        assert_eq!(bar_cells(0.5, 4), "██  ");
        // 0.3 * 4 * 8 = 9.6 eighths: one full cell and one eighth
        assert_eq!(bar_cells(0.3, 4), "█▏  ");
    }

    #[test]
    fn test_click_maps_to_progress() {
        let area = Rect::new(0, 0, 25, 1);
        assert_eq!(progress_at(2, area), None);
        assert_eq!(progress_at(5, area), Some(0.0));
        assert_eq!(progress_at(24, area), Some(1.0));
        assert_eq!(progress_at(25, area), None);
    }
}
