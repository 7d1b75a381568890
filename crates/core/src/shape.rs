//! Shape module - positioned, moving instances of a pattern
//!
//! A [`Shape`] is an immutable value: every mutation returns a new shape.
//! Player pieces and rubble cells share the same geometry; the rubble-only
//! falling metadata lives in the [`ShapeKind`] tag.
//!
//! Coordinates: pattern row `r`, column `c` of a shape at
//! `(horizontal_offset, vertical_offset)` occupies grid column
//! `horizontal_offset + r` (fall axis) and grid row `vertical_offset + c`.

use std::fmt;

use crate::pattern::{Pattern, Row};
use crate::types::Player;

/// Kind-specific data of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// A live player piece.
    Player,
    /// A single rubble cell.
    Rubble {
        /// Fall-axis position the cell must not enter while falling.
        invisible_wall: Option<i32>,
        /// Player whose collapse set this cell falling.
        fall_caused_by: Option<Player>,
    },
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    pattern: Pattern,
    horizontal_offset: i32,
    vertical_offset: i32,
    horizontal_speed: i32,
    kind: ShapeKind,
}

impl Shape {
    pub fn player(
        pattern: Pattern,
        horizontal_offset: i32,
        vertical_offset: i32,
        horizontal_speed: i32,
    ) -> Self {
        Self {
            pattern,
            horizontal_offset,
            vertical_offset,
            horizontal_speed,
            kind: ShapeKind::Player,
        }
    }

    /// Static single-cell rubble.
    pub fn rubble(horizontal_offset: i32, vertical_offset: i32) -> Self {
        Self {
            pattern: Pattern::single_block(),
            horizontal_offset,
            vertical_offset,
            horizontal_speed: 0,
            kind: ShapeKind::Rubble {
                invisible_wall: None,
                fall_caused_by: None,
            },
        }
    }

    /// Single-cell rubble that is falling.
    pub fn falling_rubble(
        horizontal_offset: i32,
        vertical_offset: i32,
        horizontal_speed: i32,
        invisible_wall: Option<i32>,
        fall_caused_by: Option<Player>,
    ) -> Self {
        Self::rubble(horizontal_offset, vertical_offset).with_fall(
            horizontal_speed,
            invisible_wall,
            fall_caused_by,
        )
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn horizontal_offset(&self) -> i32 {
        self.horizontal_offset
    }

    pub fn vertical_offset(&self) -> i32 {
        self.vertical_offset
    }

    pub fn horizontal_speed(&self) -> i32 {
        self.horizontal_speed
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn is_rubble(&self) -> bool {
        matches!(self.kind, ShapeKind::Rubble { .. })
    }

    pub fn is_falling(&self) -> bool {
        self.horizontal_speed != 0
    }

    pub fn invisible_wall(&self) -> Option<i32> {
        match self.kind {
            ShapeKind::Rubble { invisible_wall, .. } => invisible_wall,
            ShapeKind::Player => None,
        }
    }

    pub fn fall_caused_by(&self) -> Option<Player> {
        match self.kind {
            ShapeKind::Rubble { fall_caused_by, .. } => fall_caused_by,
            ShapeKind::Player => None,
        }
    }

    /// Extent along the fall axis.
    pub fn fall_extent(&self) -> i32 {
        self.pattern.height() as i32
    }

    /// Extent along the perpendicular axis.
    pub fn cross_extent(&self) -> i32 {
        self.pattern.width() as i32
    }

    /// The shape shifted by its own speed along the fall axis.
    pub fn moved(&self) -> Shape {
        self.with_horizontal_offset(self.horizontal_offset + self.horizontal_speed)
    }

    pub fn with_horizontal_offset(&self, horizontal_offset: i32) -> Shape {
        Shape {
            horizontal_offset,
            ..self.clone()
        }
    }

    pub fn with_vertical_offset(&self, vertical_offset: i32) -> Shape {
        Shape {
            vertical_offset,
            ..self.clone()
        }
    }

    /// Rubble copy carrying new falling metadata. Player shapes only take the speed.
    pub fn with_fall(
        &self,
        horizontal_speed: i32,
        invisible_wall: Option<i32>,
        fall_caused_by: Option<Player>,
    ) -> Shape {
        let kind = match self.kind {
            ShapeKind::Player => ShapeKind::Player,
            ShapeKind::Rubble { .. } => ShapeKind::Rubble {
                invisible_wall,
                fall_caused_by,
            },
        };
        Shape {
            horizontal_speed,
            kind,
            ..self.clone()
        }
    }

    /// Copy with speed zeroed and the wall and fall cause cleared.
    pub fn stop_falling(&self) -> Shape {
        self.with_fall(0, None, None)
    }

    /// Absolute `(column, row)` grid cells covered by this shape.
    pub fn absolute_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.pattern.cells().map(move |(r, c)| {
            (
                self.horizontal_offset + r as i32,
                self.vertical_offset + c as i32,
            )
        })
    }

    /// Cell lookup in grid coordinates; `false` outside the bounding box.
    pub fn has_element_at_absolute(&self, horizontal: i32, vertical: i32) -> bool {
        let row = horizontal - self.horizontal_offset;
        let col = vertical - self.vertical_offset;
        if row < 0 || col < 0 {
            return false;
        }
        self.pattern
            .get(row as usize, col as usize)
            .unwrap_or(false)
    }

    fn bounding_boxes_intersect(&self, other: &Shape) -> bool {
        self.horizontal_offset < other.horizontal_offset + other.fall_extent()
            && other.horizontal_offset < self.horizontal_offset + self.fall_extent()
            && self.vertical_offset < other.vertical_offset + other.cross_extent()
            && other.vertical_offset < self.vertical_offset + self.cross_extent()
    }

    /// True if both shapes occupy a common grid cell.
    ///
    /// Rows nearest the direction of travel are scanned first.
    pub fn overlaps_with(&self, other: &Shape) -> bool {
        if !self.bounding_boxes_intersect(other) {
            return false;
        }
        let rows = self.pattern.rows();
        let hits = |(row_idx, row): (usize, &Row)| {
            row.iter().enumerate().any(|(col_idx, set)| {
                set && other.has_element_at_absolute(
                    self.horizontal_offset + row_idx as i32,
                    self.vertical_offset + col_idx as i32,
                )
            })
        };
        if self.horizontal_speed > 0 {
            rows.iter().enumerate().rev().any(hits)
        } else {
            rows.iter().enumerate().any(hits)
        }
    }

    /// True if the shape's leading or trailing edge sits on a scene edge.
    pub fn touching_far_edge(&self, scene_width: usize) -> bool {
        self.horizontal_offset == 0
            || self.horizontal_offset + self.fall_extent() == scene_width as i32
    }

    /// True if every cell lies inside a `width` x `height` scene.
    pub fn fits_within(&self, width: usize, height: usize) -> bool {
        self.horizontal_offset >= 0
            && self.vertical_offset >= 0
            && self.horizontal_offset + self.fall_extent() <= width as i32
            && self.vertical_offset + self.cross_extent() <= height as i32
    }

    /// Clockwise rotation, recentred on the bounding box centre.
    pub fn rotated(&self) -> Shape {
        let pattern = self.pattern.rotate();
        let horizontal_offset =
            self.horizontal_offset + (self.fall_extent() - pattern.height() as i32) / 2;
        let vertical_offset =
            self.vertical_offset + (self.cross_extent() - pattern.width() as i32) / 2;
        Shape {
            pattern,
            horizontal_offset,
            vertical_offset,
            ..self.clone()
        }
    }

    /// Decompose into static single-cell rubble, one per occupied cell.
    pub fn to_single_block_shapes(&self, mut consumer: impl FnMut(Shape)) {
        for (h, v) in self.absolute_cells() {
            consumer(Shape::rubble(h, v));
        }
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ShapeKind::Player => write!(
                f,
                "Player{{{:?} at ({}, {}) speed {}}}",
                self.pattern, self.horizontal_offset, self.vertical_offset, self.horizontal_speed
            ),
            ShapeKind::Rubble {
                invisible_wall,
                fall_caused_by,
            } => write!(
                f,
                "Rubble{{({}, {}) speed {} wall {:?} cause {:?}}}",
                self.horizontal_offset,
                self.vertical_offset,
                self.horizontal_speed,
                invisible_wall,
                fall_caused_by
            ),
        }
    }
}
