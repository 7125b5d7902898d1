//! Tile storage with a coordinate index.
//!
//! The [`TileGrid`] holds every land tile of a game keyed by [`TileId`], plus
//! a reverse index from [`GridCoord`] to id so neighbour lookups are direct
//! map hits. Water cells have no tile and are skipped silently by every
//! adjacency query.

use std::collections::{BTreeMap, BTreeSet};

use farmit_types::{GridCoord, Tile, TileId};

use crate::error::WorldError;
use crate::grid::GridBounds;

/// All tiles of one game, indexed by id and by coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    /// Grid dimensions.
    bounds: GridBounds,
    /// Tiles by id.
    tiles: BTreeMap<TileId, Tile>,
    /// Coordinate index: position -> tile occupying it.
    by_coord: BTreeMap<GridCoord, TileId>,
}

impl TileGrid {
    /// Create an empty grid with the given bounds.
    pub const fn new(bounds: GridBounds) -> Self {
        Self {
            bounds,
            tiles: BTreeMap::new(),
            by_coord: BTreeMap::new(),
        }
    }

    /// Build a grid from a collection of tiles.
    ///
    /// # Errors
    ///
    /// Fails on the first tile that [`insert`](Self::insert) rejects.
    pub fn from_tiles(
        bounds: GridBounds,
        tiles: impl IntoIterator<Item = Tile>,
    ) -> Result<Self, WorldError> {
        let mut grid = Self::new(bounds);
        for tile in tiles {
            grid.insert(tile)?;
        }
        Ok(grid)
    }

    /// Add a tile.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] if the tile lies outside the grid,
    /// [`WorldError::DuplicateTile`] if the id is taken, or
    /// [`WorldError::DuplicateCoordinate`] if another tile occupies the same
    /// position.
    pub fn insert(&mut self, tile: Tile) -> Result<(), WorldError> {
        if !self.bounds.contains(tile.coord) {
            return Err(WorldError::OutOfBounds {
                coord: tile.coord,
                rows: self.bounds.rows(),
                cols: self.bounds.cols(),
            });
        }
        if self.tiles.contains_key(&tile.id) {
            return Err(WorldError::DuplicateTile(tile.id));
        }
        if let Some(&existing) = self.by_coord.get(&tile.coord) {
            return Err(WorldError::DuplicateCoordinate {
                coord: tile.coord,
                existing,
                incoming: tile.id,
            });
        }
        self.by_coord.insert(tile.coord, tile.id);
        self.tiles.insert(tile.id, tile);
        Ok(())
    }

    /// Grid dimensions.
    pub const fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// Number of tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the grid has no tiles.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Look up a tile by id.
    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    /// Look up a tile by id for mutation.
    ///
    /// The coordinate of a tile must not be changed through this reference.
    pub fn get_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tiles.get_mut(&id)
    }

    /// Look up the tile at a coordinate.
    pub fn get_at(&self, coord: GridCoord) -> Option<&Tile> {
        self.by_coord.get(&coord).and_then(|id| self.tiles.get(id))
    }

    /// Iterate over all tiles in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    /// Iterate over all tiles mutably in id order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.tiles.values_mut()
    }

    /// All tile ids in ascending order.
    pub fn ids(&self) -> Vec<TileId> {
        self.tiles.keys().copied().collect()
    }

    // -------------------------------------------------------------------
    // Adjacency queries
    // -------------------------------------------------------------------

    /// Tiles adjacent to `tile`. Water cells are skipped.
    pub fn adjacent_tiles(&self, tile: &Tile) -> Vec<&Tile> {
        self.bounds
            .neighbors(tile.coord)
            .into_iter()
            .filter_map(|coord| self.get_at(coord))
            .collect()
    }

    /// Number of neighbouring forests left in conserve mode.
    pub fn count_adjacent_conserved_forests(&self, tile: &Tile) -> u32 {
        let count = self
            .adjacent_tiles(tile)
            .into_iter()
            .filter(|t| t.is_conserved_forest())
            .count();
        // At most eight neighbours.
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Whether any neighbour carries a water reserve.
    pub fn has_adjacent_water_reserve(&self, tile: &Tile) -> bool {
        self.adjacent_tiles(tile)
            .into_iter()
            .any(|t| t.has_water_reserve)
    }

    /// Every tile adjacent to at least one water reserve, regardless of
    /// ownership or contents.
    pub fn tiles_adjacent_to_water_reserves(&self) -> BTreeSet<TileId> {
        let mut eligible = BTreeSet::new();
        for reserve in self.tiles.values().filter(|t| t.has_water_reserve) {
            for neighbor in self.adjacent_tiles(reserve) {
                eligible.insert(neighbor.id);
            }
        }
        eligible
    }
}
