//! Key mapping from terminal events to game controls.
//!
//! Left player: `W`/`S` shift, `A` rotates, `D` drops.
//! Right player: `O`/`L` shift, `;` rotates, `K` drops.
//! `Backspace` or `P` pauses.

use crate::types::GameControl;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map a key to the control it triggers.
pub fn control_for_key(key: KeyEvent) -> Option<GameControl> {
    match key.code {
        KeyCode::Char('w') | KeyCode::Char('W') => Some(GameControl::LeftPlayerUp),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(GameControl::LeftPlayerDown),
        KeyCode::Char('a') | KeyCode::Char('A') => Some(GameControl::LeftPlayerRotate),
        KeyCode::Char('d') | KeyCode::Char('D') => Some(GameControl::LeftPlayerDrop),

        KeyCode::Char('o') | KeyCode::Char('O') => Some(GameControl::RightPlayerUp),
        KeyCode::Char('l') | KeyCode::Char('L') => Some(GameControl::RightPlayerDown),
        KeyCode::Char(';') | KeyCode::Char(':') => Some(GameControl::RightPlayerRotate),
        KeyCode::Char('k') | KeyCode::Char('K') => Some(GameControl::RightPlayerDrop),

        KeyCode::Backspace | KeyCode::Char('p') | KeyCode::Char('P') => Some(GameControl::Pause),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
