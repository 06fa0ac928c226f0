//! TrackList component — right-hand playlist.
//!
//! Every track with its number, side and duration.  The active track carries
//! a play/seek glyph; Enter or a click selects a track directly, bypassing
//! the scroll position.  When unfocused the cursor follows the active track.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use spindle_core::catalog::Track;
use spindle_core::mapper::{side_of, ViewState};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    components::track_info::{track_number, truncate},
    theme::{side_color, C_MUTED, C_PLAYING, C_PRIMARY, C_SECONDARY, C_SELECTION_BG},
    widgets::{pane_chrome::pane_chrome, scrollable_list::ScrollableList},
};

/// Columns used by everything except the title: marker, number, side, duration.
const FIXED_COLS: usize = 2 + 4 + 3 + 9;

pub struct TrackList {
    list: ScrollableList<Track>,
    list_state: ListState,
}

impl TrackList {
    pub fn new(tracks: &[Track]) -> Self {
        let mut list = ScrollableList::new();
        list.set_items(tracks.to_vec());
        Self {
            list,
            list_state: ListState::default(),
        }
    }

    pub fn selected(&self) -> usize {
        self.list.selected
    }

    fn render_item(
        &self,
        index: usize,
        track: &Track,
        is_cursor: bool,
        width: usize,
        state: &AppState,
    ) -> ListItem<'static> {
        let active =
            index == state.frame.current_track && state.frame.view_state == ViewState::Player;
        let (marker, marker_style) = if active {
            let glyph = if state.frame.is_scrolling { "❚❚" } else { "▶ " };
            (glyph, Style::default().fg(C_PLAYING))
        } else {
            ("  ", Style::default())
        };
        let title_style = if active {
            Style::default().fg(C_PLAYING).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(C_PRIMARY)
        };
        let side = side_of(index);

        let title_w = width.saturating_sub(FIXED_COLS).max(4);
        let title = truncate(&track.title, title_w);
        let pad = title_w.saturating_sub(title.width());

        let line = Line::from(vec![
            Span::styled(marker, marker_style),
            Span::styled(
                format!("{}  ", track_number(index)),
                Style::default().fg(C_MUTED),
            ),
            Span::styled(
                format!("{}  ", side.letter()),
                Style::default().fg(side_color(side)),
            ),
            Span::styled(format!("{}{}", title, " ".repeat(pad)), title_style),
            Span::styled(
                format!(" {:>8}", track.duration),
                Style::default().fg(C_SECONDARY),
            ),
        ]);
        let item = ListItem::new(line);
        if is_cursor {
            item.style(Style::default().bg(C_SELECTION_BG))
        } else {
            item
        }
    }
}

impl Component for TrackList {
    fn id(&self) -> ComponentId {
        ComponentId::TrackList
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.list.select_down(1),
            KeyCode::Char('k') | KeyCode::Up => self.list.select_up(1),
            KeyCode::Char('g') | KeyCode::Home => self.list.select_first(),
            KeyCode::Char('G') | KeyCode::End => self.list.select_last(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                return vec![Action::SelectTrack(self.list.selected)];
            }
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, _state: &AppState) -> Vec<Action> {
        if let MouseEventKind::Down(MouseButton::Left) = event.kind {
            if event.row <= area.y {
                return vec![Action::FocusPane(ComponentId::TrackList)];
            }
            let rel_row = (event.row - area.y - 1) as usize; // below the top border
            if let Some(idx) = self.list.handle_click(rel_row) {
                return vec![
                    Action::FocusPane(ComponentId::TrackList),
                    Action::SelectTrack(idx),
                ];
            }
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if let Action::SelectTrack(idx) = action {
            self.list.set_selected(*idx);
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let scene = state.scene();
        let badge = scene.playing.then_some(scene.side);
        let block = pane_chrome("tracks", '2', focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.list.is_empty() {
            return;
        }
        if !focused {
            self.list.set_selected(state.frame.current_track);
        }

        let content_h = inner.height as usize;
        self.list.ensure_visible(content_h);
        let sel_in_view = self.list.selected_in_view(content_h);
        let width = inner.width as usize;
        let items: Vec<ListItem> = self
            .list
            .visible_items(content_h)
            .into_iter()
            .enumerate()
            .map(|(row, (idx, track))| {
                self.render_item(idx, track, focused && row == sel_in_view, width, state)
            })
            .collect();

        let list = List::new(items)
            .highlight_style(Style::default())
            .highlight_symbol("");
        self.list_state.select(Some(sel_in_view));
        frame.render_stateful_widget(list, inner, &mut self.list_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;
    use spindle_core::catalog::Catalog;
    use spindle_core::mapper::{ViewFrame, ViewState};

    fn state() -> AppState {
        let frame = ViewFrame {
            progress: 0.5,
            view_state: ViewState::Player,
            current_track: 3,
            is_scrolling: false,
        };
        AppState::new(Catalog::builtin(), frame, false)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_enter_selects_cursor_track() {
        let state = state();
        let mut list = TrackList::new(state.catalog.tracks());
        list.handle_key(key(KeyCode::Down), &state);
        list.handle_key(key(KeyCode::Down), &state);
        assert_eq!(
            list.handle_key(key(KeyCode::Enter), &state),
            vec![Action::SelectTrack(2)]
        );
        list.handle_key(key(KeyCode::Char('G')), &state);
        assert_eq!(list.selected(), 11);
    }

    #[test]
    fn test_click_selects_row() {
        let state = state();
        let mut list = TrackList::new(state.catalog.tracks());
        let area = Rect::new(60, 1, 40, 20);
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 70,
            row: 6,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(
            list.handle_mouse(click, area, &state),
            vec![Action::FocusPane(ComponentId::TrackList), Action::SelectTrack(4)]
        );
    }
}
