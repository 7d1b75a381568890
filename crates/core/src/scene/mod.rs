//! Scene module - the rubble grid and the live player pieces
//!
//! The scene is `width` columns along the fall axis by `height` rows along the
//! perpendicular axis. Rubble is stored in a flat, column-major array of
//! optional single-cell shapes; every stored shape sits at its own cell
//! coordinates. Each of the two players holds at most one live piece, which
//! never overlaps rubble or the other player's piece.
//!
//! Mutations record [`RubbleEvent`]s that observers drain with
//! [`Scene::drain_events`]; events never feed back into the simulation.

mod collapse;

use std::fmt;

use log::{debug, info};

use crate::error::{Result, SimError};
use crate::shape::Shape;
use crate::types::{Player, MAX_SCENE_HEIGHT, MAX_SCENE_WIDTH};

pub use collapse::RubbleMove;

/// Terminal outcome of one lowering step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoweringResult {
    /// The piece advanced one cell.
    Lowered,
    /// The piece was decomposed into rubble.
    BecameRubble,
    /// The piece crossed the whole scene and was removed.
    ReachedBottom,
}

/// Rubble lifecycle notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RubbleEvent {
    Added(Shape),
    Removed(Shape),
    Amended { old: Shape, new: Shape },
    ColumnCollapsed(usize),
}

/// Why a player piece turned into rubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionReason {
    HitRubble,
    HitPlayer,
    HitByPlayer,
}

impl fmt::Display for ConversionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConversionReason::HitRubble => "it hit rubble",
            ConversionReason::HitPlayer => "it hit the other player",
            ConversionReason::HitByPlayer => "the other player hit it",
        })
    }
}

#[derive(Debug, Clone)]
pub struct Scene {
    width: usize,
    height: usize,
    /// Column-major cells (`col * height + row`).
    rubble: Vec<Option<Shape>>,
    players: [Option<Shape>; 2],
    events: Vec<RubbleEvent>,
}

impl Scene {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 || width > MAX_SCENE_WIDTH || height > MAX_SCENE_HEIGHT {
            return Err(SimError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            rubble: vec![None; width * height],
            players: [None, None],
            events: Vec::new(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, col: i32, row: i32) -> Option<usize> {
        if col < 0 || row < 0 || col as usize >= self.width || row as usize >= self.height {
            return None;
        }
        Some(col as usize * self.height + row as usize)
    }

    /// Rubble at `(col, row)`; `None` when empty or out of bounds.
    pub fn rubble_at(&self, col: i32, row: i32) -> Option<&Shape> {
        self.index(col, row).and_then(|idx| self.rubble[idx].as_ref())
    }

    /// All rubble cells, column by column.
    pub fn rubble(&self) -> impl Iterator<Item = &Shape> {
        self.rubble.iter().flatten()
    }

    pub fn rubble_count(&self) -> usize {
        self.rubble().count()
    }

    pub fn has_falling_rubble(&self) -> bool {
        self.rubble().any(Shape::is_falling)
    }

    pub fn player_shape(&self, player: Player) -> Option<&Shape> {
        self.players[player.index()].as_ref()
    }

    /// Take the events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<RubbleEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[RubbleEvent] {
        &self.events
    }

    /// Place a single rubble cell into an empty grid cell.
    pub fn add_rubble(&mut self, shape: Shape) -> Result<()> {
        if !shape.is_rubble() || !shape.fits_within(self.width, self.height) {
            return Err(SimError::ShapeOutOfBounds {
                horizontal: shape.horizontal_offset(),
                vertical: shape.vertical_offset(),
            });
        }
        self.put_cell(shape.clone())?;
        self.events.push(RubbleEvent::Added(shape));
        Ok(())
    }

    /// Fill column `col` with static rubble, leaving `hole_row` empty.
    pub fn add_rubble_column_with_hole(&mut self, col: usize, hole_row: usize) -> Result<()> {
        for row in (0..self.height).filter(|&r| r != hole_row) {
            self.add_rubble(Shape::rubble(col as i32, row as i32))?;
        }
        Ok(())
    }

    /// Register a freshly spawned player piece.
    ///
    /// Returns `Ok(false)` when the piece overlaps rubble or the other
    /// player's piece. Holding a piece already is a contract violation.
    pub fn attempt_add_player_shape(&mut self, player: Player, shape: Shape) -> Result<bool> {
        if self.players[player.index()].is_some() {
            return Err(SimError::DuplicateSpawn(player));
        }
        if shape.is_rubble() || !shape.is_falling() {
            return Err(SimError::StationaryPlayerShape(player));
        }
        if !shape.fits_within(self.width, self.height) {
            return Err(SimError::ShapeOutOfBounds {
                horizontal: shape.horizontal_offset(),
                vertical: shape.vertical_offset(),
            });
        }
        if self.overlaps_with_rubble(&shape) || self.overlaps_with_other_player(&shape, player) {
            debug!("player {} spawn rejected at {:?}", player, shape);
            return Ok(false);
        }
        info!("player {} spawned {:?}", player, shape);
        self.players[player.index()] = Some(shape);
        Ok(true)
    }

    /// Drop a player's piece without turning it into rubble.
    pub fn remove_player_shape(&mut self, player: Player) -> Option<Shape> {
        self.players[player.index()].take()
    }

    /// Shift a player's piece by `delta` rows.
    ///
    /// Returns `true` if the piece moved. A shift into the other player's
    /// piece turns both into rubble.
    pub fn move_player_shape_vertically(&mut self, player: Player, delta: i32) -> Result<bool> {
        let Some(shape) = self.players[player.index()].clone() else {
            return Ok(false);
        };
        let candidate = shape.with_vertical_offset(shape.vertical_offset() + delta);
        if !candidate.fits_within(self.width, self.height) || self.overlaps_with_rubble(&candidate)
        {
            return Ok(false);
        }
        if self.overlaps_with_other_player(&candidate, player) {
            self.convert_to_rubble(player, ConversionReason::HitPlayer)?;
            self.convert_to_rubble(player.opponent(), ConversionReason::HitByPlayer)?;
            return Ok(false);
        }
        self.players[player.index()] = Some(candidate);
        Ok(true)
    }

    /// Rotate a player's piece clockwise if the result is in bounds and free.
    ///
    /// A blocked rotation leaves the piece unchanged and returns `false`.
    pub fn rotate_players_shape(&mut self, player: Player) -> bool {
        let Some(shape) = self.players[player.index()].as_ref() else {
            return false;
        };
        let candidate = shape.rotated();
        if !candidate.fits_within(self.width, self.height)
            || self.overlaps_with_other_player(&candidate, player)
            || self.overlaps_with_rubble(&candidate)
        {
            debug!("player {} rotation blocked", player);
            return false;
        }
        self.players[player.index()] = Some(candidate);
        true
    }

    /// One discrete lowering step for a player's piece.
    ///
    /// Returns `Ok(None)` if the player holds no piece.
    pub fn lower_shape(&mut self, player: Player) -> Result<Option<LoweringResult>> {
        let Some(shape) = self.players[player.index()].clone() else {
            return Ok(None);
        };
        let moved = shape.moved();

        if self.overlaps_with_other_player(&moved, player) {
            self.convert_to_rubble(player, ConversionReason::HitPlayer)?;
            self.convert_to_rubble(player.opponent(), ConversionReason::HitByPlayer)?;
            return Ok(Some(LoweringResult::BecameRubble));
        }
        if self.overlaps_with_rubble(&moved) {
            self.convert_to_rubble(player, ConversionReason::HitRubble)?;
            return Ok(Some(LoweringResult::BecameRubble));
        }
        if moved.touching_far_edge(self.width) || !moved.fits_within(self.width, self.height) {
            self.players[player.index()] = None;
            info!("player {} reached the far edge", player);
            return Ok(Some(LoweringResult::ReachedBottom));
        }
        self.players[player.index()] = Some(moved);
        Ok(Some(LoweringResult::Lowered))
    }

    /// Hard drop: lower until the piece stops being merely lowered.
    pub fn drop_shape(&mut self, player: Player) -> Result<Option<LoweringResult>> {
        loop {
            match self.lower_shape(player)? {
                Some(LoweringResult::Lowered) => continue,
                other => return Ok(other),
            }
        }
    }

    fn overlaps_with_rubble(&self, shape: &Shape) -> bool {
        shape
            .absolute_cells()
            .any(|(col, row)| self.rubble_at(col, row).is_some())
    }

    fn overlaps_with_other_player(&self, shape: &Shape, player: Player) -> bool {
        self.player_shape(player.opponent())
            .is_some_and(|other| shape.overlaps_with(other))
    }

    fn player_with_element_at(&self, col: i32, row: i32) -> Option<&Shape> {
        self.players
            .iter()
            .flatten()
            .find(|shape| shape.has_element_at_absolute(col, row))
    }

    /// Decompose a player's piece into rubble and check its span for collapses.
    fn convert_to_rubble(&mut self, player: Player, reason: ConversionReason) -> Result<()> {
        let Some(shape) = self.players[player.index()].take() else {
            return Ok(());
        };
        let mut cells = Vec::with_capacity(shape.pattern().cell_count());
        shape.to_single_block_shapes(|cell| cells.push(cell));
        for cell in cells {
            self.put_cell(cell.clone())?;
            self.events.push(RubbleEvent::Added(cell));
        }
        debug!("player {} shape {:?} became rubble because {}", player, shape, reason);
        self.maybe_collapse_rubble(player, shape.horizontal_offset(), shape.fall_extent())
    }

    /// Store `shape` at its own coordinates; the cell must be empty.
    fn put_cell(&mut self, shape: Shape) -> Result<()> {
        let (col, row) = (shape.horizontal_offset(), shape.vertical_offset());
        let idx = self.index(col, row).ok_or(SimError::ShapeOutOfBounds {
            horizontal: col,
            vertical: row,
        })?;
        if let Some(existing) = &self.rubble[idx] {
            return Err(SimError::GridInconsistency {
                col: col as usize,
                row: row as usize,
                detail: format!("cell already holds {:?}", existing),
            });
        }
        self.rubble[idx] = Some(shape);
        Ok(())
    }

    /// Remove `expected` from its cell; the cell must hold exactly that shape.
    fn take_cell(&mut self, expected: &Shape) -> Result<Shape> {
        let (col, row) = (expected.horizontal_offset(), expected.vertical_offset());
        let taken = self.index(col, row).and_then(|idx| self.rubble[idx].take());
        match taken {
            Some(shape) if &shape == expected => Ok(shape),
            other => {
                let detail = format!("expected {:?} but found {:?}", expected, other);
                if let (Some(idx), Some(shape)) = (self.index(col, row), other) {
                    self.rubble[idx] = Some(shape);
                }
                Err(SimError::GridInconsistency {
                    col: col.max(0) as usize,
                    row: row.max(0) as usize,
                    detail,
                })
            }
        }
    }
}
