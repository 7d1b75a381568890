//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer: the game is drawn into a plain
//! framebuffer, which the renderer diffs and flushes to the terminal. No
//! widget toolkit sits in between, so the 2:1 cell aspect ratio and the
//! sub-cell motion of falling shapes stay under direct control.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use ntetris_core as core;
pub use ntetris_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
