//! Pattern module - immutable boolean occupancy masks
//!
//! A [`Pattern`] is an ordered list of [`Row`]s, first row first. Rows run
//! along the fall axis: `height` is the number of rows (extent along the fall
//! axis) and `width` is the common row length (extent along the perpendicular
//! axis).
//!
//! Rows share their backing storage, so sub-region views and clones are cheap.
//! Equality and hashing look only at the visible cells, never at the backing
//! storage.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use crate::error::{Result, SimError};

/// Fixed-length boolean row with an optional zero-copy window.
#[derive(Clone)]
pub struct Row {
    cells: Arc<[bool]>,
    start: usize,
    len: usize,
}

impl Row {
    pub fn new(cells: Vec<bool>) -> Self {
        let len = cells.len();
        Self {
            cells: cells.into(),
            start: 0,
            len,
        }
    }

    /// Row of `len` unset cells.
    pub fn empty(len: usize) -> Self {
        Self::new(vec![false; len])
    }

    /// Parse a row where `X` marks a set cell and any other character an unset one.
    ///
    /// ```
    /// use ntetris_core::Row;
    ///
    /// let row = Row::parse("XOX");
    /// assert_eq!(row.len(), 3);
    /// assert_eq!(row.get(1), Some(false));
    /// ```
    pub fn parse(s: &str) -> Self {
        Self::new(s.chars().map(|c| c == 'X' || c == 'x').collect())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.cells[self.start..self.start + self.len]
    }

    pub fn get(&self, idx: usize) -> Option<bool> {
        self.as_slice().get(idx).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.as_slice().iter().copied()
    }

    pub fn count(&self) -> usize {
        self.iter().filter(|&c| c).count()
    }

    pub fn is_full(&self) -> bool {
        self.iter().all(|c| c)
    }

    /// Window of `len` cells starting at `start`, sharing this row's storage.
    pub fn sub_row(&self, start: usize, len: usize) -> Result<Row> {
        if start + len > self.len {
            return Err(SimError::OutOfRange {
                row: 0,
                col: start + len,
                height: 1,
                width: self.len,
            });
        }
        Ok(Row {
            cells: Arc::clone(&self.cells),
            start: self.start + start,
            len,
        })
    }

    /// True if any position is set in both rows.
    pub fn overlaps_with(&self, other: &Row) -> bool {
        self.iter().zip(other.iter()).any(|(a, b)| a && b)
    }

    /// Boolean OR of `other` onto this row, `other` aligned at index 0.
    pub fn impose(&self, other: &Row) -> Result<Row> {
        self.impose_at(other, 0)
    }

    /// Boolean OR of `other` onto this row starting at `offset`.
    ///
    /// Fails with `OverlapViolation` if any cell set in `other` is already set
    /// here, and with `OutOfRange` if `other` sticks out past the end.
    pub fn impose_at(&self, other: &Row, offset: usize) -> Result<Row> {
        if offset + other.len > self.len {
            return Err(SimError::OutOfRange {
                row: 0,
                col: offset + other.len,
                height: 1,
                width: self.len,
            });
        }
        let mut cells = self.as_slice().to_vec();
        for (i, set) in other.iter().enumerate() {
            if !set {
                continue;
            }
            if cells[offset + i] {
                return Err(SimError::OverlapViolation { offset: offset + i });
            }
            cells[offset + i] = true;
        }
        Ok(Row::new(cells))
    }
}

impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for Row {}

impl Hash for Row {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl fmt::Debug for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for set in self.iter() {
            f.write_str(if set { "X" } else { "O" })?;
        }
        Ok(())
    }
}

/// Immutable rectangular occupancy mask.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    rows: Arc<[Row]>,
    width: usize,
}

static SINGLE_BLOCK: OnceLock<Pattern> = OnceLock::new();

impl Pattern {
    /// Build a pattern, checking that every row has the same width.
    pub fn new(rows: Vec<Row>) -> Result<Self> {
        let width = match rows.first() {
            Some(first) if !first.is_empty() => first.len(),
            _ => return Err(SimError::EmptyPattern),
        };
        if let Some((row, bad)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(SimError::MalformedPattern {
                row,
                expected: width,
                found: bad.len(),
            });
        }
        Ok(Self::from_rows_unchecked(rows, width))
    }

    /// Parse a pattern from one string per row (see [`Row::parse`]).
    ///
    /// ```
    /// use ntetris_core::Pattern;
    ///
    /// let z = Pattern::parse(&["XXO", "OXX"]).unwrap();
    /// assert_eq!((z.height(), z.width()), (2, 3));
    /// assert!(Pattern::parse(&["XX", "X"]).is_err());
    /// ```
    pub fn parse(rows: &[&str]) -> Result<Self> {
        Self::new(rows.iter().map(|r| Row::parse(r)).collect())
    }

    /// Pattern of `height` x `width` unset cells.
    pub fn blank(height: usize, width: usize) -> Result<Self> {
        Self::new((0..height).map(|_| Row::empty(width)).collect())
    }

    /// The shared single-cell pattern used by every rubble cell.
    pub fn single_block() -> Pattern {
        SINGLE_BLOCK
            .get_or_init(|| Self::from_rows_unchecked(vec![Row::new(vec![true])], 1))
            .clone()
    }

    pub(crate) fn from_rows_unchecked(rows: Vec<Row>, width: usize) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == width));
        Self {
            rows: rows.into(),
            width,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Unchecked-style lookup: `None` outside the pattern.
    pub fn get(&self, row: usize, col: usize) -> Option<bool> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Bounds-checked cell lookup.
    pub fn has_element_at(&self, row: usize, col: usize) -> Result<bool> {
        self.get(row, col).ok_or(SimError::OutOfRange {
            row,
            col,
            height: self.height(),
            width: self.width,
        })
    }

    /// Set cells as `(row, col)` pairs, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, set)| *set)
                .map(move |(c, _)| (r, c))
        })
    }

    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(Row::count).sum()
    }

    /// Sub-region view sharing row storage with this pattern.
    pub fn region(&self, row: usize, col: usize, height: usize, width: usize) -> Result<Pattern> {
        if height == 0 || width == 0 {
            return Err(SimError::EmptyPattern);
        }
        if row + height > self.height() || col + width > self.width {
            return Err(SimError::OutOfRange {
                row: row + height,
                col: col + width,
                height: self.height(),
                width: self.width,
            });
        }
        let rows = self.rows[row..row + height]
            .iter()
            .map(|r| r.sub_row(col, width))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_rows_unchecked(rows, width))
    }

    /// 90 degree clockwise rotation: width and height swap, cells are
    /// transposed with reversed column order.
    pub fn rotate(&self) -> Pattern {
        let old_height = self.height();
        let rows = (0..self.width)
            .map(|r| {
                Row::new(
                    (0..old_height)
                        .map(|c| self.rows[old_height - 1 - c].as_slice()[r])
                        .collect(),
                )
            })
            .collect();
        Self::from_rows_unchecked(rows, old_height)
    }

    /// True if both patterns, with `other` placed at `(row, col)` relative to
    /// this one, set a common cell.
    pub fn overlaps_with(&self, other: &Pattern, row: i32, col: i32) -> bool {
        other.cells().any(|(r, c)| {
            let (r, c) = (r as i32 + row, c as i32 + col);
            r >= 0 && c >= 0 && self.get(r as usize, c as usize).unwrap_or(false)
        })
    }

    /// Copy of this pattern with `other` OR-ed in at `(row, col)`.
    pub fn impose_at(&self, other: &Pattern, row: usize, col: usize) -> Result<Pattern> {
        if row + other.height() > self.height() {
            return Err(SimError::OutOfRange {
                row: row + other.height(),
                col,
                height: self.height(),
                width: self.width,
            });
        }
        let mut rows = self.rows.to_vec();
        for (i, other_row) in other.rows.iter().enumerate() {
            rows[row + i] = rows[row + i].impose_at(other_row, col)?;
        }
        Ok(Self::from_rows_unchecked(rows, self.width))
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pattern[")?;
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{:?}", row)?;
        }
        f.write_str("]")
    }
}
