//! Pieces module - the standard piece set
//!
//! Patterns are listed as rows along the fall axis, `X` = occupied. Rotation
//! is a generic pattern transform (see [`Pattern::rotate`]), so there are no
//! per-rotation tables.

use std::sync::OnceLock;

use crate::pattern::{Pattern, Row};
use crate::types::PieceKind;

fn rows_of(kind: PieceKind) -> &'static [&'static str] {
    match kind {
        PieceKind::Q => &["XX", "XX"],
        PieceKind::Z => &["XXO", "OXX"],
        PieceKind::S => &["OXX", "XXO"],
        PieceKind::T => &["XXX", "OXO"],
        PieceKind::Plus => &["OXO", "XXX", "OXO"],
        PieceKind::Dash => &["XXXX"],
        PieceKind::I => &["X", "X", "X", "X"],
        PieceKind::L => &["XO", "XO", "XX"],
        PieceKind::J => &["OX", "OX", "XX"],
    }
}

static PATTERNS: OnceLock<Vec<Pattern>> = OnceLock::new();

/// Spawn-orientation pattern for a piece kind.
pub fn pattern_for(kind: PieceKind) -> Pattern {
    let patterns = PATTERNS.get_or_init(|| {
        PieceKind::ALL
            .iter()
            .map(|&k| {
                let rows: Vec<Row> = rows_of(k).iter().map(|r| Row::parse(r)).collect();
                let width = rows[0].len();
                Pattern::from_rows_unchecked(rows, width)
            })
            .collect()
    });
    let idx = PieceKind::ALL
        .iter()
        .position(|&k| k == kind)
        .unwrap_or_default();
    patterns[idx].clone()
}
