//! Core simulation - pure, deterministic, and testable
//!
//! Two players drop pieces horizontally toward each other across a shared
//! scene. Pieces that hit rubble or each other turn into rubble; a rubble
//! column that fills up collapses and sets the rubble behind it falling
//! toward the player who filled it.
//!
//! Nothing here touches the terminal or the wall clock: the caller feeds
//! [`Game::frame`] a monotonic time and the controls pressed since the last
//! frame, so the same seed and inputs always replay the same game.
//!
//! # Module Structure
//!
//! - [`pattern`]: immutable boolean rows and rectangular patterns
//! - [`pieces`]: the nine standard piece patterns
//! - [`shape`]: a pattern placed in the scene, with speed and rubble state
//! - [`scene`]: the rubble grid, player pieces, lowering and collapse
//! - [`snapshot`]: textual grid snapshots for tests and debugging
//! - [`clock`]: step accounting, pause and acceleration
//! - [`game`]: the per-frame orchestrator
//!
//! # Example
//!
//! ```
//! use ntetris_core::{Game, GameConfig};
//! use ntetris_core::types::{GameControl, Player};
//!
//! let mut game = Game::new(GameConfig::default()).unwrap();
//! game.frame(0, &[]).unwrap();
//! assert!(game.scene().player_shape(Player::Left).is_some());
//!
//! let report = game.frame(16, &[GameControl::LeftPlayerDrop]).unwrap();
//! assert_eq!(report.lowerings[0].0, Player::Left);
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod game;
pub mod pattern;
pub mod pieces;
pub mod rng;
pub mod scene;
pub mod shape;
pub mod snapshot;

pub use ntetris_types as types;

pub use clock::{PauseClock, SpeedSchedule, StepClock};
pub use config::GameConfig;
pub use error::{Result, SimError, SnapshotError};
pub use game::{FrameReport, Game, ShapeTransition};
pub use pattern::{Pattern, Row};
pub use pieces::pattern_for;
pub use rng::{RandomSource, ScriptedRng, SimpleRng};
pub use scene::{ConversionReason, LoweringResult, RubbleEvent, RubbleMove, Scene};
pub use shape::{Shape, ShapeKind};
