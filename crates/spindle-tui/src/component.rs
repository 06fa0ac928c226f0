//! Component trait — the interface every UI panel implements.
//!
//! - Components own their local UI state (cursor, hit areas) and render
//!   themselves.
//! - Components receive `AppState` (read-only) for the view frame, the
//!   catalog and the animated values.
//! - Components produce `Vec<Action>` and never mutate shared state directly;
//!   the App event loop dispatches those actions.

use ratatui::crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{layout::Rect, Frame};

use crate::action::{Action, ComponentId};
use crate::app_state::AppState;

pub trait Component {
    fn id(&self) -> ComponentId;

    /// Handle a key event. Only called when this component has focus.
    fn handle_key(&mut self, _key: KeyEvent, _state: &AppState) -> Vec<Action> {
        Vec::new()
    }

    /// Handle a mouse event that landed inside `area`.
    fn handle_mouse(
        &mut self,
        _event: MouseEvent,
        _area: Rect,
        _state: &AppState,
    ) -> Vec<Action> {
        Vec::new()
    }

    /// Receive an action dispatched by the App, focused or not.
    fn on_action(&mut self, _action: &Action, _state: &AppState) -> Vec<Action> {
        Vec::new()
    }

    /// Render the component into `area`.
    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState);
}
