//! Grid bounds and 8-connected adjacency.
//!
//! Adjacency is purely coordinate based: two cells are neighbours when their
//! rows and columns each differ by at most one. Coordinates falling outside
//! the grid are dropped, never wrapped.

use farmit_types::GridCoord;
use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// Row/column offsets of the eight neighbours, clockwise from north.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, 0),  // N
    (-1, 1),  // NE
    (0, 1),   // E
    (1, 1),   // SE
    (1, 0),   // S
    (1, -1),  // SW
    (0, -1),  // W
    (-1, -1), // NW
];

/// Dimensions of the map grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridBounds {
    rows: u32,
    cols: u32,
}

impl GridBounds {
    /// Create bounds for a `rows` x `cols` grid.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidDimensions`] if either dimension is zero.
    pub const fn new(rows: u32, cols: u32) -> Result<Self, WorldError> {
        if rows == 0 || cols == 0 {
            return Err(WorldError::InvalidDimensions { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    /// Grid height.
    pub const fn rows(self) -> u32 {
        self.rows
    }

    /// Grid width.
    pub const fn cols(self) -> u32 {
        self.cols
    }

    /// Total number of cells.
    pub fn cell_count(self) -> usize {
        usize::try_from(u64::from(self.rows).saturating_mul(u64::from(self.cols)))
            .unwrap_or(usize::MAX)
    }

    /// Whether `coord` lies inside the grid.
    pub const fn contains(self, coord: GridCoord) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }

    /// Row-major index of `coord`, or `None` if it lies outside the grid.
    pub fn index_of(self, coord: GridCoord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        let offset = u64::from(coord.row)
            .checked_mul(u64::from(self.cols))?
            .checked_add(u64::from(coord.col))?;
        usize::try_from(offset).ok()
    }

    /// All coordinates of the grid in row-major order.
    pub fn coords(self) -> impl Iterator<Item = GridCoord> {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| GridCoord::new(row, col)))
    }

    /// The in-bounds neighbours of `coord`, clockwise from north.
    ///
    /// Returns at most eight coordinates; corner cells have three and edge
    /// cells five. `coord` itself is never included.
    pub fn neighbors(self, coord: GridCoord) -> Vec<GridCoord> {
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(|&(dr, dc)| {
                let row = coord.row.checked_add_signed(dr)?;
                let col = coord.col.checked_add_signed(dc)?;
                let candidate = GridCoord::new(row, col);
                self.contains(candidate).then_some(candidate)
            })
            .collect()
    }

    /// Whether `a` and `b` are distinct 8-connected neighbours.
    pub const fn are_adjacent(a: GridCoord, b: GridCoord) -> bool {
        let dr = a.row.abs_diff(b.row);
        let dc = a.col.abs_diff(b.col);
        dr <= 1 && dc <= 1 && (dr != 0 || dc != 0)
    }
}
