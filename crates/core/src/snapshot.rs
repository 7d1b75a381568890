//! Textual grid snapshot - a line per perpendicular row, a token per column.
//!
//! | Token | Meaning |
//! |-------|---------|
//! | `[   ]` | empty cell |
//! | `[ O ]` | static rubble |
//! | `[<NN]` | rubble falling toward column 0, invisible wall at `NN` (`--` = none) |
//! | `[>NN]` | rubble falling toward the last column |
//! | `[ L ]` / `[ R ]` | cell of the left / right player's piece |
//!
//! The falling cause is not printed; it is inferred from the arrow: cells
//! falling left were set off by the right player and vice versa.
//!
//! ```
//! use ntetris_core::Scene;
//!
//! let text = "[ O ][<00][   ]\n[   ][ O ][ O ]";
//! let scene = Scene::from_pretty_print(text).unwrap();
//! assert_eq!((scene.width(), scene.height()), (3, 2));
//! assert_eq!(scene.pretty_print(), text);
//! ```

use std::fmt::Write as _;

use crate::error::{Result, SimError, SnapshotError};
use crate::pattern::{Pattern, Row};
use crate::scene::Scene;
use crate::shape::Shape;
use crate::types::Player;

const TOKEN_LEN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Empty,
    Rubble {
        speed: i32,
        wall: Option<i32>,
    },
    Piece(Player),
}

fn parse_token(token: &str, line: usize, cell: usize, width: usize) -> Result<Token> {
    let bad = || SnapshotError::BadToken {
        line,
        cell,
        token: token.to_string(),
    };
    let inner = token
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .ok_or_else(bad)?;
    let parsed = match inner {
        "   " => Token::Empty,
        " O " => Token::Rubble {
            speed: 0,
            wall: None,
        },
        " L " => Token::Piece(Player::Left),
        " R " => Token::Piece(Player::Right),
        _ => {
            let mut chars = inner.chars();
            let speed = match chars.next() {
                Some('<') => -1,
                Some('>') => 1,
                _ => return Err(bad().into()),
            };
            let digits = chars.as_str();
            let wall = if digits == "--" {
                None
            } else {
                let wall: usize = digits
                    .parse()
                    .ok()
                    .filter(|_| digits.len() == 2)
                    .ok_or_else(bad)?;
                if wall >= width {
                    return Err(SnapshotError::BadWall { line, cell, wall }.into());
                }
                Some(wall as i32)
            };
            Token::Rubble { speed, wall }
        }
    };
    Ok(parsed)
}

fn tokenize(text: &str) -> Result<Vec<Vec<Token>>> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let Some(first) = lines.first() else {
        return Err(SnapshotError::Empty.into());
    };
    let width = first.chars().count() / TOKEN_LEN;

    let mut grid = Vec::with_capacity(lines.len());
    for (line_idx, line) in lines.iter().enumerate() {
        let chars: Vec<char> = line.chars().collect();
        if chars.len() % TOKEN_LEN != 0 || chars.len() / TOKEN_LEN != width {
            return Err(SnapshotError::Ragged {
                line: line_idx,
                expected: width,
                found: chars.len() / TOKEN_LEN,
            }
            .into());
        }
        let row = chars
            .chunks(TOKEN_LEN)
            .enumerate()
            .map(|(cell, chunk)| {
                let token: String = chunk.iter().collect();
                parse_token(&token, line_idx, cell, width)
            })
            .collect::<Result<Vec<_>>>()?;
        grid.push(row);
    }
    Ok(grid)
}

/// Rebuild a player piece from the cells it covers.
fn piece_from_cells(player: Player, cells: &[(i32, i32)]) -> Result<Option<Shape>> {
    let (Some(min_col), Some(max_col), Some(min_row), Some(max_row)) = (
        cells.iter().map(|c| c.0).min(),
        cells.iter().map(|c| c.0).max(),
        cells.iter().map(|c| c.1).min(),
        cells.iter().map(|c| c.1).max(),
    ) else {
        return Ok(None);
    };
    let rows = (min_col..=max_col)
        .map(|col| {
            Row::new(
                (min_row..=max_row)
                    .map(|row| cells.contains(&(col, row)))
                    .collect(),
            )
        })
        .collect();
    let pattern = Pattern::new(rows)?;
    Ok(Some(Shape::player(
        pattern,
        min_col,
        min_row,
        player.fall_speed(),
    )))
}

impl Scene {
    /// Rubble-only snapshot.
    pub fn pretty_print(&self) -> String {
        self.render_text(false)
    }

    /// Snapshot that also marks the cells of live player pieces.
    pub fn pretty_print_with_players(&self) -> String {
        self.render_text(true)
    }

    fn render_text(&self, with_players: bool) -> String {
        let mut out = String::with_capacity(self.height() * (self.width() * TOKEN_LEN + 1));
        for row in 0..self.height() as i32 {
            if row > 0 {
                out.push('\n');
            }
            for col in 0..self.width() as i32 {
                let piece = with_players
                    .then(|| {
                        Player::ALL.into_iter().find(|&p| {
                            self.player_shape(p)
                                .is_some_and(|s| s.has_element_at_absolute(col, row))
                        })
                    })
                    .flatten();
                match (self.rubble_at(col, row), piece) {
                    (_, Some(Player::Left)) => out.push_str("[ L ]"),
                    (_, Some(Player::Right)) => out.push_str("[ R ]"),
                    (None, None) => out.push_str("[   ]"),
                    (Some(shape), None) if !shape.is_falling() => out.push_str("[ O ]"),
                    (Some(shape), None) => {
                        let arrow = if shape.horizontal_speed() < 0 { '<' } else { '>' };
                        match shape.invisible_wall() {
                            Some(wall) => {
                                let _ = write!(out, "[{}{:02}]", arrow, wall);
                            }
                            None => {
                                let _ = write!(out, "[{}--]", arrow);
                            }
                        }
                    }
                }
            }
        }
        out
    }

    /// Build a scene from a snapshot; dimensions come from the text.
    pub fn from_pretty_print(text: &str) -> Result<Scene> {
        let grid = tokenize(text)?;
        let height = grid.len();
        let width = grid.first().map_or(0, Vec::len);
        let mut scene = Scene::new(width, height)?;
        scene.load_tokens(&grid)?;
        Ok(scene)
    }

    /// Replace this scene's contents with a snapshot of the same dimensions.
    pub fn initialise_from_pretty_print(&mut self, text: &str) -> Result<()> {
        let grid = tokenize(text)?;
        let width = grid.first().map_or(0, Vec::len);
        if width != self.width() || grid.len() != self.height() {
            return Err(SimError::InvalidDimensions {
                width,
                height: grid.len(),
            });
        }
        *self = Scene::new(self.width(), self.height())?;
        self.load_tokens(&grid)
    }

    fn load_tokens(&mut self, grid: &[Vec<Token>]) -> Result<()> {
        let mut pieces: [Vec<(i32, i32)>; 2] = [Vec::new(), Vec::new()];
        for (row, line) in grid.iter().enumerate() {
            for (col, token) in line.iter().enumerate() {
                let (col, row) = (col as i32, row as i32);
                match *token {
                    Token::Empty => {}
                    Token::Rubble { speed: 0, .. } => self.add_rubble(Shape::rubble(col, row))?,
                    Token::Rubble { speed, wall } => {
                        let cause = if speed < 0 { Player::Right } else { Player::Left };
                        self.add_rubble(Shape::falling_rubble(col, row, speed, wall, Some(cause)))?
                    }
                    Token::Piece(player) => pieces[player.index()].push((col, row)),
                }
            }
        }
        for player in Player::ALL {
            if let Some(shape) = piece_from_cells(player, &pieces[player.index()])? {
                self.attempt_add_player_shape(player, shape)?;
            }
        }
        self.drain_events();
        Ok(())
    }
}
