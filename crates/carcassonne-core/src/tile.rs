//! Orientation-aware tile definitions.
//!
//! A placed tile is a catalog entry plus an orientation. Rotating a tile by
//! `steps` quarter turns makes every output slot read the source slot `steps`
//! positions earlier in its N-E-S-W (or NW-NE-SE-SW) cycle, so the source
//! north edge ends up facing east at 90 degrees. Edge matching everywhere
//! depends on this direction.

use crate::catalog::{CityDefinition, EdgeType, FarmDefinition, RoadDefinition, TileCatalog, TileId};
use crate::coords::{Corner, Direction, Orientation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of features a meeple can stand on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureType {
    City,
    Road,
    Farm,
    Monastery,
    Garden,
}

impl FeatureType {
    pub const ALL: [FeatureType; 5] = [
        FeatureType::City,
        FeatureType::Road,
        FeatureType::Farm,
        FeatureType::Monastery,
        FeatureType::Garden,
    ];

    /// Lowercase name used in feature keys
    pub const fn as_str(self) -> &'static str {
        match self {
            FeatureType::City => "city",
            FeatureType::Road => "road",
            FeatureType::Farm => "farm",
            FeatureType::Monastery => "monastery",
            FeatureType::Garden => "garden",
        }
    }

    /// Parse the lowercase name used in feature keys
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// Monasteries and gardens: scored by their 8 surrounding cells
    pub const fn is_cloister(self) -> bool {
        matches!(self, FeatureType::Monastery | FeatureType::Garden)
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog entry rotated into place, with reverse lookup tables.
///
/// Derived on demand and never stored in game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrientedTileDefinition {
    pub tile_id: TileId,
    pub orientation: Orientation,
    /// Edge types indexed N, E, S, W after rotation
    pub edges: [EdgeType; 4],
    pub cities: Vec<CityDefinition>,
    pub roads: Vec<RoadDefinition>,
    pub farms: Vec<FarmDefinition>,
    pub monastery: bool,
    pub garden: bool,
    city_by_edge: [Option<usize>; 4],
    road_by_edge: [Option<usize>; 4],
    farm_by_corner: [Option<usize>; 4],
}

impl OrientedTileDefinition {
    /// Edge type facing a direction
    pub fn edge(&self, direction: Direction) -> EdgeType {
        self.edges[direction.index()]
    }

    /// City segment touching an edge, if any
    pub fn city_at(&self, direction: Direction) -> Option<usize> {
        self.city_by_edge[direction.index()]
    }

    /// Road segment leaving through an edge, if any
    pub fn road_at(&self, direction: Direction) -> Option<usize> {
        self.road_by_edge[direction.index()]
    }

    /// Farm region touching a corner, if any
    pub fn farm_at(&self, corner: Corner) -> Option<usize> {
        self.farm_by_corner[corner.index()]
    }

    /// Edge-based feature at an edge for the given type
    pub fn feature_at(&self, feature_type: FeatureType, direction: Direction) -> Option<usize> {
        match feature_type {
            FeatureType::City => self.city_at(direction),
            FeatureType::Road => self.road_at(direction),
            _ => None,
        }
    }

    /// Number of feature instances of a type on this tile
    pub fn feature_count(&self, feature_type: FeatureType) -> usize {
        match feature_type {
            FeatureType::City => self.cities.len(),
            FeatureType::Road => self.roads.len(),
            FeatureType::Farm => self.farms.len(),
            FeatureType::Monastery => usize::from(self.monastery),
            FeatureType::Garden => usize::from(self.garden),
        }
    }

    /// Edges carrying a river, in N, E, S, W order
    pub fn river_edges(&self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|&d| self.edge(d) == EdgeType::River)
            .collect()
    }

    pub fn has_river(&self) -> bool {
        self.edges.contains(&EdgeType::River)
    }
}

/// Rotate a tile type into an orientation.
///
/// Returns `None` for tile ids the catalog does not know.
pub fn oriented_tile_definition(
    catalog: &TileCatalog,
    tile_id: &str,
    orientation: Orientation,
) -> Option<OrientedTileDefinition> {
    let entry = catalog.get(tile_id)?;
    let steps = orientation.steps();

    let edges: [EdgeType; 4] = std::array::from_fn(|i| entry.edges[(i + 4 - steps) % 4]);

    let cities: Vec<CityDefinition> = entry
        .cities
        .iter()
        .map(|city| CityDefinition {
            edges: rotate_directions(&city.edges, steps),
            ..city.clone()
        })
        .collect();

    let roads: Vec<RoadDefinition> = entry
        .roads
        .iter()
        .map(|road| RoadDefinition {
            edges: rotate_directions(&road.edges, steps),
            ..road.clone()
        })
        .collect();

    let farms: Vec<FarmDefinition> = entry
        .farms
        .iter()
        .map(|farm| FarmDefinition {
            corners: farm.corners.iter().map(|c| c.rotate(steps)).collect(),
            adjacent_cities: farm.adjacent_cities.clone(),
        })
        .collect();

    let mut city_by_edge = [None; 4];
    for (i, city) in cities.iter().enumerate() {
        for edge in &city.edges {
            city_by_edge[edge.index()] = Some(i);
        }
    }

    let mut road_by_edge = [None; 4];
    for (i, road) in roads.iter().enumerate() {
        for edge in &road.edges {
            road_by_edge[edge.index()] = Some(i);
        }
    }

    let mut farm_by_corner = [None; 4];
    for (i, farm) in farms.iter().enumerate() {
        for corner in &farm.corners {
            farm_by_corner[corner.index()] = Some(i);
        }
    }

    Some(OrientedTileDefinition {
        tile_id: entry.id.clone(),
        orientation,
        edges,
        cities,
        roads,
        farms,
        monastery: entry.monastery,
        garden: entry.garden,
        city_by_edge,
        road_by_edge,
        farm_by_corner,
    })
}

fn rotate_directions(directions: &[Direction], steps: usize) -> Vec<Direction> {
    directions.iter().map(|d| d.rotate(steps)).collect()
}
