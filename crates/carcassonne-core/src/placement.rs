//! Tile placement legality.
//!
//! Edge matching: a tile may go on an empty cell with at least one occupied
//! orthogonal neighbor when every facing edge pair has the same type. The
//! state-aware checks add the River II continuity rules when the game runs in
//! standard mode with the river add-on.

use crate::board::BoardState;
use crate::catalog::{Addon, TileCatalog};
use crate::coords::{Coordinate, Direction, Orientation};
use crate::game::{GameMode, GameState};
use crate::river::{check_river_continuity, RiverViolation};
use crate::tile::oriented_tile_definition;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A candidate cell and rotation for a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TilePlacement {
    pub position: Coordinate,
    pub orientation: Orientation,
}

/// Why a placement is illegal
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum PlacementViolation {
    #[error("Cell is already occupied")]
    Occupied,

    #[error("Tile must touch at least one placed tile")]
    NoNeighbor,

    #[error("Edge {0:?} does not match the neighboring tile")]
    EdgeMismatch(Direction),

    #[error("Unknown tile")]
    UnknownTile,

    #[error("River rule: {0}")]
    River(#[from] RiverViolation),
}

/// Check edge matching for a tile at a position and orientation
pub fn check_tile_placement(
    catalog: &TileCatalog,
    board: &BoardState,
    tile_id: &str,
    position: Coordinate,
    orientation: Orientation,
) -> Result<(), PlacementViolation> {
    if board.is_occupied(&position) {
        return Err(PlacementViolation::Occupied);
    }

    let tile = oriented_tile_definition(catalog, tile_id, orientation)
        .ok_or(PlacementViolation::UnknownTile)?;

    let mut has_neighbor = false;
    for (direction, neighbor) in board.neighbors(position) {
        has_neighbor = true;
        let neighbor_def = neighbor
            .definition(catalog)
            .ok_or(PlacementViolation::UnknownTile)?;
        if tile.edge(direction) != neighbor_def.edge(direction.opposite()) {
            return Err(PlacementViolation::EdgeMismatch(direction));
        }
    }

    if !has_neighbor {
        return Err(PlacementViolation::NoNeighbor);
    }
    Ok(())
}

/// Whether a tile fits at a position and orientation by edge matching alone
pub fn is_tile_placement_valid(
    catalog: &TileCatalog,
    board: &BoardState,
    tile_id: &str,
    position: Coordinate,
    orientation: Orientation,
) -> bool {
    check_tile_placement(catalog, board, tile_id, position, orientation).is_ok()
}

/// Every edge-legal placement of a tile on the board.
///
/// Cells come from `BoardState::frontier` order; orientations ascend.
pub fn legal_tile_placements(
    catalog: &TileCatalog,
    board: &BoardState,
    tile_id: &str,
) -> Vec<TilePlacement> {
    collect_placements(board, |position, orientation| {
        is_tile_placement_valid(catalog, board, tile_id, position, orientation)
    })
}

/// Whether the river continuity rules govern this tile in this game
pub fn river_rule_applies(catalog: &TileCatalog, state: &GameState, tile_id: &str) -> bool {
    state.mode == GameMode::Standard
        && state.addons.contains(&Addon::River)
        && catalog.get(tile_id).is_some_and(|entry| entry.has_river())
}

/// Check a placement against everything the game's rules require
pub fn check_tile_placement_for_state(
    catalog: &TileCatalog,
    state: &GameState,
    tile_id: &str,
    position: Coordinate,
    orientation: Orientation,
) -> Result<(), PlacementViolation> {
    check_tile_placement(catalog, &state.board, tile_id, position, orientation)?;
    if river_rule_applies(catalog, state, tile_id) {
        check_river_continuity(catalog, &state.board, tile_id, position, orientation)?;
    }
    Ok(())
}

pub fn is_tile_placement_valid_for_state(
    catalog: &TileCatalog,
    state: &GameState,
    tile_id: &str,
    position: Coordinate,
    orientation: Orientation,
) -> bool {
    check_tile_placement_for_state(catalog, state, tile_id, position, orientation).is_ok()
}

/// Every placement of a tile that the game's rules allow
pub fn legal_tile_placements_for_state(
    catalog: &TileCatalog,
    state: &GameState,
    tile_id: &str,
) -> Vec<TilePlacement> {
    collect_placements(&state.board, |position, orientation| {
        is_tile_placement_valid_for_state(catalog, state, tile_id, position, orientation)
    })
}

fn collect_placements<F>(board: &BoardState, mut is_valid: F) -> Vec<TilePlacement>
where
    F: FnMut(Coordinate, Orientation) -> bool,
{
    let mut placements = Vec::new();
    for position in board.frontier() {
        for orientation in Orientation::ALL {
            if is_valid(position, orientation) {
                placements.push(TilePlacement {
                    position,
                    orientation,
                });
            }
        }
    }
    placements
}
