//! Core model for the spindle record player: the track catalog, the
//! scroll-progress → view-state mapper, the idle debounce that decides when
//! the record is "playing", and the animation parameters derived from all of
//! that.
//!
//! Nothing in here touches a terminal; the TUI crate only renders what these
//! types compute.

pub mod catalog;
pub mod config;
pub mod debounce;
pub mod mapper;
pub mod motion;
pub mod platform;
pub mod scene;
pub mod scroll;

pub use catalog::{Catalog, CatalogError, Side, Track};
pub use mapper::{ScrollStateMapper, ViewFrame, ViewState};
