//! Board representation.
//!
//! This module contains:
//! - `PlacedTile`: a tile type at a position and orientation
//! - `BoardBounds`: the occupied extent of the grid
//! - `BoardState`: the placed tiles, in placement order, with a position index
//!
//! Boards are values. `with_tile` clones and returns a new board, which keeps
//! every `GameState` snapshot independent. Iteration order is placement order,
//! so anything derived from a board (feature component ids in particular) is
//! stable for a given board value.

use crate::catalog::{TileCatalog, TileId};
use crate::coords::{Coordinate, Direction, Orientation};
use crate::tile::{oriented_tile_definition, OrientedTileDefinition};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A tile on the board
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacedTile {
    pub tile_id: TileId,
    pub position: Coordinate,
    pub orientation: Orientation,
}

impl PlacedTile {
    pub fn new(tile_id: impl Into<TileId>, position: Coordinate, orientation: Orientation) -> Self {
        Self {
            tile_id: tile_id.into(),
            position,
            orientation,
        }
    }

    /// The rotated definition of this tile
    pub fn definition(&self, catalog: &TileCatalog) -> Option<OrientedTileDefinition> {
        oriented_tile_definition(catalog, &self.tile_id, self.orientation)
    }
}

/// Occupied extent of the grid (inclusive on both ends)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoardBounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl BoardBounds {
    fn at(position: Coordinate) -> Self {
        Self {
            min_x: position.x,
            max_x: position.x,
            min_y: position.y,
            max_y: position.y,
        }
    }

    fn include(&mut self, position: Coordinate) {
        self.min_x = self.min_x.min(position.x);
        self.max_x = self.max_x.max(position.x);
        self.min_y = self.min_y.min(position.y);
        self.max_y = self.max_y.max(position.y);
    }

    pub fn width(&self) -> u32 {
        self.max_x.abs_diff(self.min_x) + 1
    }

    pub fn height(&self) -> u32 {
        self.max_y.abs_diff(self.min_y) + 1
    }
}

/// The complete tile board
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "BoardRepr", into = "BoardRepr")]
pub struct BoardState {
    /// Tiles in placement order
    tiles: Vec<PlacedTile>,
    /// Position -> index into `tiles`
    index: HashMap<Coordinate, usize>,
    bounds: BoardBounds,
}

#[derive(Serialize, Deserialize)]
struct BoardRepr {
    tiles: Vec<PlacedTile>,
    bounds: BoardBounds,
}

impl From<BoardRepr> for BoardState {
    fn from(repr: BoardRepr) -> Self {
        // Bounds are recomputed from the tiles, the serialized copy is informational
        let mut board = BoardState::new();
        for tile in repr.tiles {
            board.insert(tile);
        }
        board
    }
}

impl From<BoardState> for BoardRepr {
    fn from(board: BoardState) -> Self {
        Self {
            tiles: board.tiles,
            bounds: board.bounds,
        }
    }
}

impl PartialEq for BoardState {
    fn eq(&self, other: &Self) -> bool {
        self.tiles == other.tiles
    }
}

impl Eq for BoardState {}

impl BoardState {
    /// Create an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a board holding a single starting tile at the origin
    pub fn with_starting_tile(tile_id: impl Into<TileId>) -> Self {
        Self::new().with_tile(PlacedTile::new(tile_id, Coordinate::new(0, 0), Orientation::Deg0))
    }

    /// A new board with one more tile. A tile already at that position is replaced.
    pub fn with_tile(&self, tile: PlacedTile) -> Self {
        let mut board = self.clone();
        board.insert(tile);
        board
    }

    fn insert(&mut self, tile: PlacedTile) {
        let position = tile.position;
        if let Some(&i) = self.index.get(&position) {
            self.tiles[i] = tile;
            return;
        }
        if self.tiles.is_empty() {
            self.bounds = BoardBounds::at(position);
        } else {
            self.bounds.include(position);
        }
        self.index.insert(position, self.tiles.len());
        self.tiles.push(tile);
    }

    /// Get the tile at a position
    pub fn get(&self, position: &Coordinate) -> Option<&PlacedTile> {
        self.index.get(position).map(|&i| &self.tiles[i])
    }

    /// How many tiles were placed before the one at a position
    pub fn placement_order(&self, position: &Coordinate) -> Option<usize> {
        self.index.get(position).copied()
    }

    pub fn is_occupied(&self, position: &Coordinate) -> bool {
        self.index.contains_key(position)
    }

    /// All tiles in placement order
    pub fn tiles(&self) -> impl Iterator<Item = &PlacedTile> {
        self.tiles.iter()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn bounds(&self) -> BoardBounds {
        self.bounds
    }

    /// Occupied orthogonal neighbors of a cell with the direction they lie in
    pub fn neighbors(&self, position: Coordinate) -> impl Iterator<Item = (Direction, &PlacedTile)> {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| self.get(&position.neighbor(direction)).map(|t| (direction, t)))
    }

    /// Empty cells orthogonally adjacent to any placed tile.
    ///
    /// Ordered by first discovery: placement order, then N, E, S, W.
    pub fn frontier(&self) -> Vec<Coordinate> {
        let mut seen = std::collections::HashSet::new();
        let mut frontier = Vec::new();
        for tile in &self.tiles {
            for cell in tile.position.neighbors() {
                if !self.is_occupied(&cell) && seen.insert(cell) {
                    frontier.push(cell);
                }
            }
        }
        frontier
    }

    /// Number of the 8 surrounding cells that hold a tile
    pub fn surrounding_tile_count(&self, position: Coordinate) -> usize {
        position
            .surrounding()
            .iter()
            .filter(|cell| self.is_occupied(cell))
            .count()
    }
}
