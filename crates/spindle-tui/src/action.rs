//! Action enum — all user-initiated intents and internal events.

/// Unique identifier for a focusable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    Turntable,
    TrackList,
    HelpOverlay,
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Scroll document ──────────────────────────────────────────────────────
    /// Move the viewport by virtual rows (negative = up); shift-wheel.
    ScrollBy(i64),
    WheelUp,
    WheelDown,
    PageUp,
    PageDown,
    ScrollHome,
    ScrollEnd,
    /// Jump to a normalised position (e.g. click on the progress bar).
    ScrollTo(f64),

    // ── Direct selection ─────────────────────────────────────────────────────
    SelectTrack(usize),
    NextTrack,
    PrevTrack,

    // ── Navigation ───────────────────────────────────────────────────────────
    FocusNext,
    FocusPrev,
    FocusPane(ComponentId),

    // ── UI toggles ───────────────────────────────────────────────────────────
    ToggleHelp,
    ToggleKeys,
    ToggleGrain,

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
    Resize(u16, u16),
}
