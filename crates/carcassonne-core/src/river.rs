//! River II continuity rules.
//!
//! With the river add-on in standard mode, a river tile must extend the river:
//! it has to make exactly one river-to-river connection, that connection must
//! attach to an open river endpoint, and the tile may not turn the same way as
//! the tile it attaches to (two same-direction curves in a row send the river
//! straight back on itself).
//!
//! Turns are read along the flow: a tile entered through edge `in` and left
//! through edge `out` turns right when `out` is one step clockwise of the
//! travel heading, left when one step counter-clockwise. A tile with several
//! exits (a fork) never counts as a turn.

use crate::board::{BoardState, PlacedTile};
use crate::catalog::{EdgeType, TileCatalog};
use crate::coords::{Coordinate, Direction, Orientation};
use crate::tile::{oriented_tile_definition, OrientedTileDefinition};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Direction a river bends while crossing one tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiverTurn {
    Left,
    Right,
    #[serde(rename = "none")]
    Straight,
}

/// A river edge of a placed tile with nothing beyond it yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RiverEndpoint {
    pub position: Coordinate,
    pub direction: Direction,
}

/// Why a river tile cannot go where it was put
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum RiverViolation {
    #[error("river tile must connect to exactly one river edge, found {0}")]
    ConnectionCount(usize),

    #[error("river must attach to an open river endpoint")]
    ClosedEndpoint,

    #[error("river may not turn {0:?} twice in a row")]
    UTurn(RiverTurn),

    #[error("unknown tile")]
    UnknownTile,
}

/// Classify the bend of a river entering through `incoming` and leaving through `outgoing`
pub fn turn_between(incoming: Direction, outgoing: Direction) -> RiverTurn {
    let heading = incoming.opposite().index();
    match (outgoing.index() + 4 - heading) % 4 {
        1 => RiverTurn::Right,
        3 => RiverTurn::Left,
        _ => RiverTurn::Straight,
    }
}

/// Every open river endpoint on the board, in board order
pub fn open_river_endpoints(catalog: &TileCatalog, board: &BoardState) -> Vec<RiverEndpoint> {
    let mut endpoints = Vec::new();
    for tile in board.tiles() {
        let Some(def) = tile.definition(catalog) else {
            continue;
        };
        for direction in def.river_edges() {
            if !board.is_occupied(&tile.position.neighbor(direction)) {
                endpoints.push(RiverEndpoint {
                    position: tile.position,
                    direction,
                });
            }
        }
    }
    endpoints
}

pub fn is_open_river_endpoint(
    catalog: &TileCatalog,
    board: &BoardState,
    endpoint: RiverEndpoint,
) -> bool {
    let Some(def) = board.get(&endpoint.position).and_then(|t| t.definition(catalog)) else {
        return false;
    };
    def.edge(endpoint.direction) == EdgeType::River
        && !board.is_occupied(&endpoint.position.neighbor(endpoint.direction))
}

/// The bend the river already makes on the tile that owns an endpoint.
///
/// The inflow is the river edge joining a neighbor placed before this tile.
/// Springs, lakes and forks count as straight.
pub fn turn_at_endpoint(catalog: &TileCatalog, board: &BoardState, endpoint: RiverEndpoint) -> RiverTurn {
    let Some(def) = board.get(&endpoint.position).and_then(|t| t.definition(catalog)) else {
        return RiverTurn::Straight;
    };
    let rivers = def.river_edges();
    if rivers.len() != 2 {
        return RiverTurn::Straight;
    }
    let Some(own) = board.placement_order(&endpoint.position) else {
        return RiverTurn::Straight;
    };

    let inflow = rivers.into_iter().filter(|&d| d != endpoint.direction).find(|&d| {
        connects_to_river(catalog, board, endpoint.position, d)
            && board
                .placement_order(&endpoint.position.neighbor(d))
                .is_some_and(|order| order < own)
    });

    match inflow {
        Some(incoming) => turn_between(incoming, endpoint.direction),
        None => RiverTurn::Straight,
    }
}

/// The bend a tile makes when entered through `incoming`
pub fn tile_turn(def: &OrientedTileDefinition, incoming: Direction) -> RiverTurn {
    let exits: Vec<Direction> = def
        .river_edges()
        .into_iter()
        .filter(|&d| d != incoming)
        .collect();
    match exits.as_slice() {
        [outgoing] => turn_between(incoming, *outgoing),
        _ => RiverTurn::Straight,
    }
}

/// Check the continuity rules for a river tile that already passes edge matching
pub fn check_river_continuity(
    catalog: &TileCatalog,
    board: &BoardState,
    tile_id: &str,
    position: Coordinate,
    orientation: Orientation,
) -> Result<(), RiverViolation> {
    let def = oriented_tile_definition(catalog, tile_id, orientation).ok_or(RiverViolation::UnknownTile)?;

    let connections: Vec<(Direction, &PlacedTile)> = def
        .river_edges()
        .into_iter()
        .filter_map(|d| {
            let neighbor = board.get(&position.neighbor(d))?;
            let neighbor_def = neighbor.definition(catalog)?;
            (neighbor_def.edge(d.opposite()) == EdgeType::River).then_some((d, neighbor))
        })
        .collect();

    let [(incoming, neighbor)] = connections.as_slice() else {
        return Err(RiverViolation::ConnectionCount(connections.len()));
    };

    let endpoint = RiverEndpoint {
        position: neighbor.position,
        direction: incoming.opposite(),
    };
    if !is_open_river_endpoint(catalog, board, endpoint) {
        return Err(RiverViolation::ClosedEndpoint);
    }

    let previous = turn_at_endpoint(catalog, board, endpoint);
    let next = tile_turn(&def, *incoming);
    if next != RiverTurn::Straight && next == previous {
        return Err(RiverViolation::UTurn(next));
    }
    Ok(())
}

fn connects_to_river(
    catalog: &TileCatalog,
    board: &BoardState,
    position: Coordinate,
    direction: Direction,
) -> bool {
    board
        .get(&position.neighbor(direction))
        .and_then(|t| t.definition(catalog))
        .is_some_and(|def| def.edge(direction.opposite()) == EdgeType::River)
}
