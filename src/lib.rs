//! ntetris (workspace facade crate).
//!
//! Re-exports the implementation crates under `crates/` as
//! `ntetris::{core, input, term, types}`, plus the file logger the binaries
//! install.

pub mod logging;

pub use ntetris_core as core;
pub use ntetris_input as input;
pub use ntetris_term as term;
pub use ntetris_types as types;
