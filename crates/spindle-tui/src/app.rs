//! App — component-based event loop.
//!
//! Architecture:
//! - `App` owns all components and `AppState` (shared read-only data for components).
//! - A `tokio::mpsc` channel carries `AppMessage` events in from background
//!   tasks: the terminal reader and the scroll idle timer.
//! - The event loop draws each frame, then awaits the next message or frame tick.
//! - Components return `Vec<Action>`; App dispatches each Action.
//!
//! Data flow for a scroll:
//! `ScrollSignal` (progress) → `ScrollStateMapper::update` → `ViewFrame`
//! → `Scene::from_frame` → `Animator` targets.  Every update re-arms the
//! `IdleTimer`; when it fires, `ScrollStateMapper::settle` drops the
//! scrolling flag and the record starts playing.

use std::io;
use std::time::{Duration, Instant};

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use spindle_core::catalog::Catalog;
use spindle_core::config::Config;
use spindle_core::debounce::IdleTimer;
use spindle_core::mapper::{ScrollStateMapper, ViewFrame};
use spindle_core::scene::Scene;
use spindle_core::scroll::ScrollSignal;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    components::{
        header::Header, help_overlay::HelpOverlay, hero::Hero, track_info::TrackInfo,
        track_list::TrackList, turntable::Turntable,
    },
    focus::FocusRing,
    widgets::{progress_bar, status_bar},
};

/// Track list docks on the right once the terminal is at least this wide.
const LIST_MIN_TERM_WIDTH: u16 = 90;
const LIST_WIDTH: u16 = 42;
/// Upper bound on queued messages handled before the next draw.
const MAX_DRAIN: usize = 256;

// ── Internal event bus ────────────────────────────────────────────────────────

#[derive(Debug)]
enum AppMessage {
    Event(Event),
    /// The scroll idle window elapsed without another scroll event.
    ScrollIdle,
}

// ── Pane area tracking ────────────────────────────────────────────────────────

/// Stores the last-drawn layout rects for each clickable pane.
/// Used by `handle_mouse` to do hit-testing without recomputing the layout.
#[derive(Default, Clone)]
struct PaneAreas {
    stage: Rect,
    track_list: Rect,
    progress: Rect,
}

/// Scroll clock.  Follows tokio's clock so a paused test runtime drives the
/// idle deadline and the idle timer together.
fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    // ── Shared state (passed read-only to components) ─────────────────────────
    pub state: AppState,

    // ── Scroll pipeline ───────────────────────────────────────────────────────
    scroll: ScrollSignal,
    mapper: ScrollStateMapper,
    /// Created in `run()`, once there is a runtime and a channel to post to.
    idle: Option<IdleTimer<AppMessage>>,
    idle_window: Duration,
    frame_interval: Duration,
    last_step: Instant,

    // ── Components ────────────────────────────────────────────────────────────
    header: Header,
    hero: Hero,
    turntable: Turntable,
    track_info: TrackInfo,
    track_list: TrackList,
    help_overlay: HelpOverlay,

    // ── Layout / ui ───────────────────────────────────────────────────────────
    focus: FocusRing,
    show_keys_bar: bool,
    /// Whether to quit on next iteration.
    should_quit: bool,
    /// Last-drawn layout rects — used for mouse hit-testing.
    pane_areas: PaneAreas,
}

impl App {
    pub fn new(config: &Config, catalog: Catalog) -> Self {
        let idle_window = config.debounce.idle_window();
        let mapper = ScrollStateMapper::new(catalog.len(), config.zones, idle_window);
        let track_list = TrackList::new(catalog.tracks());
        let state = AppState::new(catalog, mapper.frame(), config.ui.grain);
        Self {
            state,
            scroll: ScrollSignal::new(&config.scroll),
            mapper,
            idle: None,
            idle_window,
            frame_interval: config.frame_interval(),
            last_step: now(),
            header: Header::new(),
            hero: Hero::new(),
            turntable: Turntable::new(),
            track_info: TrackInfo::new(),
            track_list,
            help_overlay: HelpOverlay::new(),
            focus: FocusRing::default(),
            show_keys_bar: config.ui.show_keys_bar,
            should_quit: false,
            pane_areas: PaneAreas::default(),
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let result = self.event_loop(&mut terminal).await;

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        info!("spindle exiting");

        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel::<AppMessage>(1024);
        self.idle = Some(IdleTimer::new(self.idle_window, tx.clone()));

        // ── Background task: keyboard/mouse events ────────────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // ── Frame tick: animation, grain, looping decorations ─────────────────
        let mut frame_tick = tokio::time::interval(self.frame_interval);
        frame_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        self.last_step = now();

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    let mut redraw = self.handle_message(msg);
                    let mut drained = 0usize;
                    while drained < MAX_DRAIN {
                        let next = match rx.try_recv() {
                            Ok(v) => v,
                            Err(_) => break,
                        };
                        drained += 1;
                        redraw |= self.handle_message(next);
                    }
                    needs_redraw = redraw;
                }

                _ = frame_tick.tick() => {
                    self.on_frame_tick(now());
                    needs_redraw = true;
                }
            }

            if self.should_quit {
                break;
            }
        }
        Ok(())
    }

    // ── Message handler ───────────────────────────────────────────────────────

    /// Returns `true` if the message requires a redraw.
    fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::Event(ev) => match ev {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Release {
                        return false;
                    }
                    for a in self.handle_key(key) {
                        self.dispatch(a);
                    }
                    true
                }
                Event::Mouse(mouse) => {
                    let actions = self.handle_mouse(mouse);
                    let redraw = !actions.is_empty();
                    for a in actions {
                        self.dispatch(a);
                    }
                    redraw
                }
                Event::Resize(w, h) => {
                    self.dispatch(Action::Resize(w, h));
                    true
                }
                _ => false,
            },

            AppMessage::ScrollIdle => match self.mapper.settle(now()) {
                Some(frame) => {
                    debug!("scroll idle: settled at {:.3}", frame.progress);
                    self.publish(frame);
                    true
                }
                None => false,
            },
        }
    }

    /// Advance animations by the wall time since the last tick.
    fn on_frame_tick(&mut self, at: Instant) {
        let dt = at.saturating_duration_since(self.last_step);
        self.last_step = at;
        if self.state.animator.is_animating() {
            self.state.animator.step(dt);
        }
        self.state.frame_count = self.state.frame_count.wrapping_add(1);
    }

    // ── Keyboard handling ─────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        // Global keys — always active regardless of focus
        match key.code {
            KeyCode::Char('c') if key.modifiers == KeyModifiers::CONTROL => {
                return vec![Action::Quit];
            }
            KeyCode::Char('q')
                if key.modifiers == KeyModifiers::NONE && !self.help_overlay.visible =>
            {
                return vec![Action::Quit];
            }
            _ => {}
        }

        // Help overlay captures all keys when visible
        if self.help_overlay.visible {
            return self.help_overlay.handle_key(key, &self.state);
        }

        match key.code {
            KeyCode::Char('?') => return vec![Action::ToggleHelp],
            KeyCode::Tab => return vec![Action::FocusNext],
            KeyCode::BackTab => return vec![Action::FocusPrev],
            KeyCode::Char('1') => return vec![Action::FocusPane(ComponentId::Turntable)],
            KeyCode::Char('2') => return vec![Action::FocusPane(ComponentId::TrackList)],
            KeyCode::Char('K') => return vec![Action::ToggleKeys],
            KeyCode::Char('f') => return vec![Action::ToggleGrain],
            _ => {}
        }

        // Dispatch to the focused component
        let s = &self.state;
        match self.focus.current() {
            Some(ComponentId::Turntable) => self.turntable.handle_key(key, s),
            Some(ComponentId::TrackList) => self.track_list.handle_key(key, s),
            Some(ComponentId::HelpOverlay) => self.help_overlay.handle_key(key, s),
            None => vec![],
        }
    }

    // ── Mouse handling ────────────────────────────────────────────────────────

    fn handle_mouse(&mut self, event: MouseEvent) -> Vec<Action> {
        if self.help_overlay.visible {
            return vec![];
        }

        // The wheel scrolls the document wherever the pointer is.
        let fine = event.modifiers.contains(KeyModifiers::SHIFT);
        match event.kind {
            MouseEventKind::ScrollDown if fine => return vec![Action::ScrollBy(1)],
            MouseEventKind::ScrollUp if fine => return vec![Action::ScrollBy(-1)],
            MouseEventKind::ScrollDown => return vec![Action::WheelDown],
            MouseEventKind::ScrollUp => return vec![Action::WheelUp],
            MouseEventKind::Down(MouseButton::Left) => {}
            _ => return vec![],
        }

        let col = event.column;
        let row = event.row;

        // Helper: check if (col, row) is inside a Rect
        fn hit(r: Rect, col: u16, row: u16) -> bool {
            r.width > 0
                && r.height > 0
                && col >= r.x
                && col < r.x + r.width
                && row >= r.y
                && row < r.y + r.height
        }

        let areas = self.pane_areas.clone();
        if hit(areas.progress, col, row) {
            if let Some(p) = progress_bar::progress_at(col, areas.progress) {
                return vec![Action::ScrollTo(p)];
            }
            return vec![];
        }
        if hit(areas.track_list, col, row) {
            return self
                .track_list
                .handle_mouse(event, areas.track_list, &self.state);
        }
        if hit(areas.stage, col, row) && !self.focus.is_focused(ComponentId::Turntable) {
            return vec![Action::FocusPane(ComponentId::Turntable)];
        }
        vec![]
    }

    // ── Action dispatcher ─────────────────────────────────────────────────────

    fn dispatch(&mut self, action: Action) {
        // Broadcast action to all components first
        let secondary: Vec<Action> = {
            let s = &self.state;
            let mut out = Vec::new();
            out.extend(self.turntable.on_action(&action, s));
            out.extend(self.track_list.on_action(&action, s));
            out.extend(self.help_overlay.on_action(&action, s));
            out
        };

        // Handle the action at the app level
        self.apply_action(action);

        // Dispatch any secondary actions (depth-limited to 1 level)
        for a in secondary {
            self.apply_action(a);
        }
    }

    fn apply_action(&mut self, action: Action) {
        match &action {
            Action::WheelUp | Action::WheelDown | Action::ScrollBy(_) | Action::Resize(..) => {}
            _ => debug!("apply_action: {:?}", action),
        }
        match action {
            // ── Scroll document ───────────────────────────────────────────────
            Action::ScrollBy(rows) => {
                let changed = self.scroll.scroll_by(rows);
                self.on_scroll(changed);
            }
            Action::WheelUp => {
                let changed = self.scroll.wheel_up();
                self.on_scroll(changed);
            }
            Action::WheelDown => {
                let changed = self.scroll.wheel_down();
                self.on_scroll(changed);
            }
            Action::PageUp => {
                let changed = self.scroll.page_up();
                self.on_scroll(changed);
            }
            Action::PageDown => {
                let changed = self.scroll.page_down();
                self.on_scroll(changed);
            }
            Action::ScrollHome => {
                let changed = self.scroll.home();
                self.on_scroll(changed);
            }
            Action::ScrollEnd => {
                let changed = self.scroll.end();
                self.on_scroll(changed);
            }
            Action::ScrollTo(p) => {
                let changed = self.scroll.scroll_to(p);
                self.on_scroll(changed);
            }

            // ── Direct selection ──────────────────────────────────────────────
            Action::SelectTrack(idx) => {
                let frame = self.mapper.select_track(idx);
                self.publish(frame);
            }
            Action::NextTrack => {
                let last = self.mapper.track_count().saturating_sub(1);
                let next = (self.state.frame.current_track + 1).min(last);
                self.apply_action(Action::SelectTrack(next));
            }
            Action::PrevTrack => {
                let prev = self.state.frame.current_track.saturating_sub(1);
                self.apply_action(Action::SelectTrack(prev));
            }

            // ── Navigation ────────────────────────────────────────────────────
            Action::FocusNext => {
                self.focus.next();
            }
            Action::FocusPrev => {
                self.focus.prev();
            }
            Action::FocusPane(id) => {
                self.focus.set(id);
            }

            // ── UI toggles ────────────────────────────────────────────────────
            // help visibility lives in the overlay itself (see on_action)
            Action::ToggleHelp => {}
            Action::ToggleKeys => {
                self.show_keys_bar = !self.show_keys_bar;
            }
            Action::ToggleGrain => {
                self.state.grain = !self.state.grain;
            }

            // ── System ────────────────────────────────────────────────────────
            Action::Quit => {
                info!("quit requested");
                self.should_quit = true;
            }
            Action::Resize(..) => {}
        }
    }

    /// A scroll-change event.  A position that didn't move (already at an
    /// edge) is not an event.
    fn on_scroll(&mut self, changed: bool) {
        if !changed {
            return;
        }
        let frame = self.mapper.update(self.scroll.progress(), now());
        if let Some(idle) = self.idle.as_mut() {
            idle.rearm(AppMessage::ScrollIdle);
        }
        self.publish(frame);
    }

    /// Push a new frame through to the scene and the backdrop.
    fn publish(&mut self, frame: ViewFrame) {
        let prev = self.state.frame;
        if frame.view_state != prev.view_state {
            info!("view: {:?} → {:?}", prev.view_state, frame.view_state);
        }
        if frame.current_track != prev.current_track {
            let track = self.state.catalog.track(frame.current_track);
            info!(
                "track {} → {}: {} ({})",
                prev.current_track,
                frame.current_track,
                track.title,
                frame.side().label()
            );
        }
        self.state.frame = frame;
        let video = self.state.catalog.track(frame.current_track).video.clone();
        self.state.animator.set_scene(Scene::from_frame(&frame));
        self.state.animator.set_video(&video);
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        use crate::theme::C_BG;
        use ratatui::widgets::Block;
        let area = frame.area();

        // Fill the entire terminal with the base background colour so that
        // any unstyled cells appear black rather than the terminal default.
        frame.render_widget(
            Block::default().style(ratatui::style::Style::default().bg(C_BG)),
            area,
        );

        // ── Outer layout: header | body | progress | (keys) ──────────────────
        let status_h = if self.show_keys_bar { 1u16 } else { 0 };
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(status_h),
            ])
            .split(area);
        let header_area = outer[0];
        let body_area = outer[1];
        let progress_area = outer[2];
        let status_area = outer[3];

        // ── Body: stage | (track list) ────────────────────────────────────────
        let list_w = if area.width >= LIST_MIN_TERM_WIDTH {
            LIST_WIDTH
        } else {
            0
        };
        if list_w == 0 && self.focus.is_focused(ComponentId::TrackList) {
            self.focus.set(ComponentId::Turntable);
        }
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(list_w)])
            .split(body_area);
        let stage = body[0];
        let list_area = body[1];

        let turntable_focused = self.focus.is_focused(ComponentId::Turntable);
        self.turntable
            .draw(frame, stage, turntable_focused, &self.state);
        self.hero.draw(frame, stage, false, &self.state);
        self.track_info.draw(frame, stage, false, &self.state);
        if list_w > 0 {
            let focused = self.focus.is_focused(ComponentId::TrackList);
            self.track_list.draw(frame, list_area, focused, &self.state);
        }
        self.header.draw(frame, header_area, false, &self.state);

        progress_bar::draw_progress(
            frame,
            progress_area,
            self.state.frame.progress,
            self.mapper.zones(),
        );
        if self.show_keys_bar {
            status_bar::draw_keys_bar(
                frame,
                status_area,
                self.state.frame.view_state,
                self.state.frame.is_scrolling,
                self.focus.current(),
            );
        }

        self.pane_areas = PaneAreas {
            stage,
            track_list: if list_w > 0 { list_area } else { Rect::default() },
            progress: progress_area,
        };

        // ── Help overlay (on top of everything) ──────────────────────────────
        self.help_overlay.draw(frame, area, false, &self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spindle_core::mapper::ViewState;

    fn app() -> App {
        App::new(&Config::default(), Catalog::builtin())
    }

    fn key(code: KeyCode) -> AppMessage {
        AppMessage::Event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    #[test]
    fn test_starts_in_hero() {
        let app = app();
        assert_eq!(app.state.frame.view_state, ViewState::Hero);
        assert_eq!(app.state.frame.current_track, 0);
        assert!(!app.state.frame.is_scrolling);
        assert_eq!(app.state.scene().header_hint, "SCROLL TO START");
    }

    #[test]
    fn test_wheel_at_top_edge_is_not_an_event() {
        let mut app = app();
        app.dispatch(Action::WheelUp);
        assert!(!app.state.frame.is_scrolling);
        assert!(app.mapper.idle_deadline().is_none());
    }

    #[test]
    fn test_page_down_reaches_player() {
        let mut app = app();
        // 12 screens of 100 rows: two pages = 200/1100 ≈ 0.18
        app.dispatch(Action::PageDown);
        app.dispatch(Action::PageDown);
        assert_eq!(app.state.frame.view_state, ViewState::Player);
        assert!(app.state.frame.is_scrolling);
        assert_eq!(app.state.scene().status_label, "SEEKING");
        assert!(!app.state.scene().playing);
    }

    #[test]
    fn test_end_selects_last_track_on_side_b() {
        let mut app = app();
        app.dispatch(Action::ScrollEnd);
        assert_eq!(app.state.frame.current_track, 11);
        assert_eq!(app.state.scene().side, spindle_core::catalog::Side::B);
        let top = app.state.animator.backdrop().last().map(|l| l.key.clone());
        assert_eq!(top.as_deref(), Some(app.state.current_track().video.as_str()));
    }

    #[test]
    fn test_select_track_keeps_scroll_position() {
        let mut app = app();
        app.dispatch(Action::PageDown);
        app.dispatch(Action::PageDown);
        let progress = app.state.frame.progress;
        app.dispatch(Action::SelectTrack(7));
        assert_eq!(app.state.frame.current_track, 7);
        assert_eq!(app.state.frame.progress, progress);
        assert_eq!(app.track_list.selected(), 7);

        app.dispatch(Action::NextTrack);
        app.dispatch(Action::NextTrack);
        app.dispatch(Action::NextTrack);
        app.dispatch(Action::NextTrack);
        app.dispatch(Action::NextTrack);
        assert_eq!(app.state.frame.current_track, 11);
    }

    #[test]
    fn test_keys_route_through_focus() {
        let mut app = app();
        app.handle_message(key(KeyCode::Char('j')));
        assert_eq!(app.scroll.offset(), 10);

        app.handle_message(key(KeyCode::Tab));
        assert!(app.focus.is_focused(ComponentId::TrackList));
        // j now moves the list cursor, not the document
        app.handle_message(key(KeyCode::Char('j')));
        assert_eq!(app.scroll.offset(), 10);
        assert_eq!(app.track_list.selected(), 1);
    }

    #[test]
    fn test_help_swallows_keys() {
        let mut app = app();
        app.handle_message(key(KeyCode::Char('?')));
        assert!(app.help_overlay.visible);
        app.handle_message(key(KeyCode::Char('q')));
        assert!(!app.help_overlay.visible);
        assert!(!app.should_quit);
        app.handle_message(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_wheel_anywhere_scrolls() {
        let mut app = app();
        let wheel = MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 3,
            row: 3,
            modifiers: KeyModifiers::NONE,
        };
        app.handle_message(AppMessage::Event(Event::Mouse(wheel)));
        assert_eq!(app.scroll.offset(), 10);
        let fine = MouseEvent {
            modifiers: KeyModifiers::SHIFT,
            ..wheel
        };
        app.handle_message(AppMessage::Event(Event::Mouse(fine)));
        assert_eq!(app.scroll.offset(), 11);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_timer_settles_into_playback() {
        let mut app = app();
        let (tx, mut rx) = mpsc::channel(16);
        app.idle = Some(IdleTimer::new(app.idle_window, tx));

        for _ in 0..20 {
            app.dispatch(Action::WheelDown);
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert!(app.state.frame.is_scrolling);

        let msg = rx.recv().await;
        assert!(matches!(msg, Some(AppMessage::ScrollIdle)));
        assert!(app.handle_message(AppMessage::ScrollIdle));
        assert!(!app.state.frame.is_scrolling);
        assert!(app.state.scene().playing);
        assert_eq!(app.state.scene().status_label, "PLAYING");

        // a second, stale idle message changes nothing
        assert!(!app.handle_message(AppMessage::ScrollIdle));
    }

    #[test]
    fn test_frame_tick_eases_toward_scene() {
        let mut app = app();
        app.dispatch(Action::ScrollTo(0.2));
        let t0 = app.last_step;
        assert_eq!(app.state.animator.tonearm_opacity(), 0.0);
        for i in 1..=60 {
            app.on_frame_tick(t0 + Duration::from_millis(33 * i));
        }
        assert!(app.state.animator.tonearm_opacity() > 0.99);
        // still seeking: the arm is visible but parked
        assert_eq!(app.state.scene().tonearm_angle, 0.0);
        assert_eq!(app.state.frame_count, 60);
    }
}
