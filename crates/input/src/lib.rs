//! Terminal input module.
//!
//! Maps `crossterm` key events into [`crate::types::GameControl`] and tracks
//! held controls so each press fires once and vertical shifts repeat while
//! held (including terminals without key-release events).

pub mod map;
pub mod tracker;

pub use ntetris_types as types;

pub use map::{control_for_key, should_quit};
pub use tracker::{ControlTracker, MAX_CONTROLS_PER_UPDATE};
