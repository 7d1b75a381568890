//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (simulation core, terminal rendering, input mapping).
//!
//! # Scene Dimensions
//!
//! Pieces travel along the horizontal ("fall") axis, from the left and right
//! edges toward each other:
//!
//! - **Height**: 12 rows (the perpendicular axis)
//! - **Width**: 20 columns (height * 5 / 3, the fall axis)
//!
//! # Game Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `PLAYER_STEP_MS` | 1000 | One player piece drop step |
//! | `RUBBLE_STEP_MS` | 200 | One falling rubble step |
//! | `PLAYER_PENALTY_MS` | 3000 | Respawn cooldown after reaching the far edge |
//! | `TRANSITION_STEP_MS` | 100 | Render-time interpolation window after a step |
//! | `KEY_REPEAT_MS` | 100 | Repeat period of held repeatable controls |
//!
//! # Examples
//!
//! ```
//! use ntetris_types::{GameControl, PieceKind, Player, DEFAULT_SCENE_HEIGHT, DEFAULT_SCENE_WIDTH};
//!
//! let piece = PieceKind::from_str("plus").unwrap();
//! assert_eq!(piece, PieceKind::Plus);
//!
//! assert_eq!(Player::Left.opponent(), Player::Right);
//! assert_eq!(Player::Right.fall_speed(), -1);
//!
//! let control = GameControl::from_str("leftPlayerDrop").unwrap();
//! assert_eq!(control.player(), Some(Player::Left));
//! assert!(!control.is_repeatable());
//!
//! assert_eq!(DEFAULT_SCENE_HEIGHT, 12);
//! assert_eq!(DEFAULT_SCENE_WIDTH, 20);
//! ```

/// Scene height in cells (perpendicular axis).
pub const DEFAULT_SCENE_HEIGHT: usize = 12;

/// Scene width in cells (fall axis).
pub const DEFAULT_SCENE_WIDTH: usize = DEFAULT_SCENE_HEIGHT * 5 / 3;

/// Widest supported scene; the textual snapshot encodes wall offsets in two digits.
pub const MAX_SCENE_WIDTH: usize = 100;

/// Tallest supported scene.
pub const MAX_SCENE_HEIGHT: usize = 100;

/// Player piece drop step duration (1000ms = 1 cell per second)
pub const PLAYER_STEP_MS: u32 = 1000;

/// Falling rubble step duration (200ms)
pub const RUBBLE_STEP_MS: u32 = 200;

/// Respawn cooldown after a piece crosses the whole scene.
pub const PLAYER_PENALTY_MS: u32 = PLAYER_STEP_MS * 3;

/// Interpolation window for rendering the move made by the last step.
pub const TRANSITION_STEP_MS: u32 = 100;

/// Repeat period for held repeatable controls.
pub const KEY_REPEAT_MS: u32 = 100;

/// Upper bound on catch-up steps executed in a single frame.
pub const MAX_CATCH_UP_STEPS: u32 = 64;

/// Player step speed multiplier applied after every minute of game time.
pub const DEFAULT_ACCELERATION_PER_MINUTE: f64 = 1.1;

/// One minute of game time.
pub const MINUTE_MS: u64 = 60_000;

/// The two players.
///
/// - **Left**: spawns at fall offset 0 and falls toward increasing columns
/// - **Right**: spawns at the right edge and falls toward decreasing columns
///
/// The game is built around exactly two players; pairwise collision checks
/// rely on [`Player::opponent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Player {
    Left,
    Right,
}

impl Player {
    /// Fixed iteration order used for per-frame lowering.
    pub const ALL: [Player; 2] = [Player::Left, Player::Right];

    /// Dense index (0 for Left, 1 for Right), usable as an array slot.
    pub fn index(self) -> usize {
        match self {
            Player::Left => 0,
            Player::Right => 1,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Player::Left => Player::Right,
            Player::Right => Player::Left,
        }
    }

    /// Signed unit speed along the fall axis for pieces of this player.
    ///
    /// ```
    /// use ntetris_types::Player;
    ///
    /// assert_eq!(Player::Left.fall_speed(), 1);
    /// assert_eq!(Player::Right.fall_speed(), -1);
    /// ```
    pub fn fall_speed(self) -> i32 {
        match self {
            Player::Left => 1,
            Player::Right => -1,
        }
    }

    /// Parse player from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" | "l" => Some(Player::Left),
            "right" | "r" => Some(Player::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Player::Left => "left",
            Player::Right => "right",
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Player::Left => "LEFT",
            Player::Right => "RIGHT",
        })
    }
}

/// The standard piece set
///
/// Listed as rows along the fall axis (`X` = occupied):
/// - **Q**: `XX / XX`
/// - **Z**: `XXO / OXX`
/// - **S**: `OXX / XXO`
/// - **T**: `XXX / OXO`
/// - **Plus**: `OXO / XXX / OXO`
/// - **Dash**: `XXXX`
/// - **I**: `X / X / X / X`
/// - **L**: `XO / XO / XX`
/// - **J**: `OX / OX / XX`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Q,
    Z,
    S,
    T,
    Plus,
    Dash,
    I,
    L,
    J,
}

impl PieceKind {
    /// Every piece kind, in random-selection order.
    pub const ALL: [PieceKind; 9] = [
        PieceKind::Q,
        PieceKind::Z,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Plus,
        PieceKind::Dash,
        PieceKind::I,
        PieceKind::L,
        PieceKind::J,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use ntetris_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("q"), Some(PieceKind::Q));
    /// assert_eq!(PieceKind::from_str("DASH"), Some(PieceKind::Dash));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "q" => Some(PieceKind::Q),
            "z" => Some(PieceKind::Z),
            "s" => Some(PieceKind::S),
            "t" => Some(PieceKind::T),
            "plus" => Some(PieceKind::Plus),
            "dash" => Some(PieceKind::Dash),
            "i" => Some(PieceKind::I),
            "l" => Some(PieceKind::L),
            "j" => Some(PieceKind::J),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::Q => "q",
            PieceKind::Z => "z",
            PieceKind::S => "s",
            PieceKind::T => "t",
            PieceKind::Plus => "plus",
            PieceKind::Dash => "dash",
            PieceKind::I => "i",
            PieceKind::L => "l",
            PieceKind::J => "j",
        }
    }
}

/// Control signals handed to the simulation once per frame.
///
/// These are already de-duplicated and de-repeated by the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameControl {
    /// Shift the left player's piece one row up
    LeftPlayerUp,
    /// Shift the left player's piece one row down
    LeftPlayerDown,
    /// Rotate the left player's piece clockwise
    LeftPlayerRotate,
    /// Hard drop the left player's piece
    LeftPlayerDrop,
    RightPlayerUp,
    RightPlayerDown,
    RightPlayerRotate,
    RightPlayerDrop,
    /// Toggle pause state
    Pause,
}

impl GameControl {
    pub const ALL: [GameControl; 9] = [
        GameControl::LeftPlayerUp,
        GameControl::LeftPlayerDown,
        GameControl::LeftPlayerRotate,
        GameControl::LeftPlayerDrop,
        GameControl::RightPlayerUp,
        GameControl::RightPlayerDown,
        GameControl::RightPlayerRotate,
        GameControl::RightPlayerDrop,
        GameControl::Pause,
    ];

    /// The player this control acts on (`None` for pause).
    pub fn player(&self) -> Option<Player> {
        match self {
            GameControl::LeftPlayerUp
            | GameControl::LeftPlayerDown
            | GameControl::LeftPlayerRotate
            | GameControl::LeftPlayerDrop => Some(Player::Left),
            GameControl::RightPlayerUp
            | GameControl::RightPlayerDown
            | GameControl::RightPlayerRotate
            | GameControl::RightPlayerDrop => Some(Player::Right),
            GameControl::Pause => None,
        }
    }

    /// Whether holding the control keeps re-firing it.
    ///
    /// Only the vertical shifts repeat; drop, rotate and pause fire once per press.
    pub fn is_repeatable(&self) -> bool {
        matches!(
            self,
            GameControl::LeftPlayerUp
                | GameControl::LeftPlayerDown
                | GameControl::RightPlayerUp
                | GameControl::RightPlayerDown
        )
    }

    /// Parse control from string (camelCase, case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use ntetris_types::GameControl;
    ///
    /// assert_eq!(GameControl::from_str("rightPlayerRotate"), Some(GameControl::RightPlayerRotate));
    /// assert_eq!(GameControl::from_str("pause"), Some(GameControl::Pause));
    /// assert_eq!(GameControl::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "leftplayerup" => Some(GameControl::LeftPlayerUp),
            "leftplayerdown" => Some(GameControl::LeftPlayerDown),
            "leftplayerrotate" => Some(GameControl::LeftPlayerRotate),
            "leftplayerdrop" => Some(GameControl::LeftPlayerDrop),
            "rightplayerup" => Some(GameControl::RightPlayerUp),
            "rightplayerdown" => Some(GameControl::RightPlayerDown),
            "rightplayerrotate" => Some(GameControl::RightPlayerRotate),
            "rightplayerdrop" => Some(GameControl::RightPlayerDrop),
            "pause" => Some(GameControl::Pause),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameControl::LeftPlayerUp => "leftPlayerUp",
            GameControl::LeftPlayerDown => "leftPlayerDown",
            GameControl::LeftPlayerRotate => "leftPlayerRotate",
            GameControl::LeftPlayerDrop => "leftPlayerDrop",
            GameControl::RightPlayerUp => "rightPlayerUp",
            GameControl::RightPlayerDown => "rightPlayerDown",
            GameControl::RightPlayerRotate => "rightPlayerRotate",
            GameControl::RightPlayerDrop => "rightPlayerDrop",
            GameControl::Pause => "pause",
        }
    }
}
