//! Static tile catalog.
//!
//! This module contains:
//! - Edge types and per-feature definitions (cities, roads, farms)
//! - `TileCatalogEntry`, the unrotated definition of one tile type
//! - `TileCatalog`, a validated lookup table of entries
//! - The built-in catalog: base game, Inns & Cathedrals, Abbot gardens, River II
//! - Seeded deck construction from per-type copy counts
//!
//! Tile ids follow the `<set>_R<row>C<col>` convention of the tile sheets.
//! All membership lists are written for orientation 0 with north pointing up.

use crate::coords::{Corner, Direction};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Identifier of a tile type in the catalog
pub type TileId = String;

/// Starting tile of the base game (city north, road east-west)
pub const BASE_STARTING_TILE_ID: &str = "T_R3C4";

/// River II spring, the starting tile when the river add-on is enabled
pub const RIVER_SPRING_TILE_ID: &str = "RV2_R1C1";

/// River II lake, always the last river tile in a built deck
pub const RIVER_LAKE_TILE_ID: &str = "RV2_R1C2";

/// What runs along a tile edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    City,
    Road,
    Farm,
    River,
}

/// Optional rule sets that add tiles and worker kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Addon {
    /// Inns on roads, cathedrals in cities, the big meeple
    InnsAndCathedrals,
    /// Gardens and the abbot worker
    Abbot,
    /// River II tiles and their continuity rules
    River,
}

/// A city segment on one tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityDefinition {
    /// Edges this city segment touches
    pub edges: Vec<Direction>,
    /// Pennant (coat of arms) markers on this segment
    #[serde(default)]
    pub pennants: u32,
    /// Whether a cathedral stands in this segment
    #[serde(default)]
    pub cathedral: bool,
}

/// A road segment on one tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadDefinition {
    /// Edges this road segment leaves through
    pub edges: Vec<Direction>,
    /// Whether an inn sits beside this segment
    #[serde(default)]
    pub inn: bool,
}

/// A farm (grassland) region on one tile, described by the corners it touches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmDefinition {
    /// Corners this farm region touches
    pub corners: Vec<Corner>,
    /// Indices into the tile's `cities` that border this farm
    #[serde(default)]
    pub adjacent_cities: Vec<usize>,
}

/// Static definition of one tile type at orientation 0
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileCatalogEntry {
    pub id: TileId,
    /// Edge types indexed N, E, S, W
    pub edges: [EdgeType; 4],
    #[serde(default)]
    pub cities: Vec<CityDefinition>,
    #[serde(default)]
    pub roads: Vec<RoadDefinition>,
    #[serde(default)]
    pub farms: Vec<FarmDefinition>,
    #[serde(default)]
    pub monastery: bool,
    #[serde(default)]
    pub garden: bool,
    /// Copies of this tile in a full deck
    pub count: u32,
    /// Add-on that ships this tile (`None` for the base game)
    #[serde(default)]
    pub addon: Option<Addon>,
}

impl TileCatalogEntry {
    /// Start a definition with the given edges and no features
    pub fn new(id: impl Into<TileId>, edges: [EdgeType; 4]) -> Self {
        Self {
            id: id.into(),
            edges,
            cities: Vec::new(),
            roads: Vec::new(),
            farms: Vec::new(),
            monastery: false,
            garden: false,
            count: 1,
            addon: None,
        }
    }

    /// Add a plain city segment
    pub fn city(self, edges: &[Direction]) -> Self {
        self.city_with(edges, 0, false)
    }

    /// Add a city segment carrying one pennant
    pub fn pennant_city(self, edges: &[Direction]) -> Self {
        self.city_with(edges, 1, false)
    }

    /// Add a city segment containing a cathedral
    pub fn cathedral_city(self, edges: &[Direction]) -> Self {
        self.city_with(edges, 0, true)
    }

    fn city_with(mut self, edges: &[Direction], pennants: u32, cathedral: bool) -> Self {
        self.cities.push(CityDefinition {
            edges: edges.to_vec(),
            pennants,
            cathedral,
        });
        self
    }

    /// Add a road segment
    pub fn road(mut self, edges: &[Direction]) -> Self {
        self.roads.push(RoadDefinition {
            edges: edges.to_vec(),
            inn: false,
        });
        self
    }

    /// Add a road segment with an inn beside it
    pub fn inn_road(mut self, edges: &[Direction]) -> Self {
        self.roads.push(RoadDefinition {
            edges: edges.to_vec(),
            inn: true,
        });
        self
    }

    /// Add a farm region bordering the given city indices
    pub fn farm(mut self, corners: &[Corner], adjacent_cities: &[usize]) -> Self {
        self.farms.push(FarmDefinition {
            corners: corners.to_vec(),
            adjacent_cities: adjacent_cities.to_vec(),
        });
        self
    }

    pub fn monastery(mut self) -> Self {
        self.monastery = true;
        self
    }

    pub fn garden(mut self) -> Self {
        self.garden = true;
        self
    }

    /// Set the number of copies in a full deck
    pub fn copies(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Mark the add-on this tile belongs to
    pub fn addon(mut self, addon: Addon) -> Self {
        self.addon = Some(addon);
        self
    }

    /// Whether any edge carries a river
    pub fn has_river(&self) -> bool {
        self.edges.contains(&EdgeType::River)
    }
}

/// Defects in catalog data. These are programming errors in the data source,
/// not rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Duplicate tile id {0}")]
    DuplicateTile(TileId),

    #[error("Tile {tile}: {feature} lists edge {edge} whose type is {actual:?}")]
    EdgeTypeMismatch {
        tile: TileId,
        feature: &'static str,
        edge: &'static str,
        actual: EdgeType,
    },

    #[error("Tile {tile}: edge {edge} is claimed by more than one feature")]
    EdgeClaimedTwice { tile: TileId, edge: &'static str },

    #[error("Tile {tile}: corner is claimed by more than one farm")]
    CornerClaimedTwice { tile: TileId },

    #[error("Tile {tile}: farm references missing city {city}")]
    UnknownAdjacentCity { tile: TileId, city: usize },
}

/// Validated lookup table of tile definitions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<TileCatalogEntry>", into = "Vec<TileCatalogEntry>")]
pub struct TileCatalog {
    entries: Vec<TileCatalogEntry>,
    index: HashMap<TileId, usize>,
}

impl TileCatalog {
    /// Build a catalog, rejecting malformed entries
    pub fn new(entries: Vec<TileCatalogEntry>) -> Result<Self, CatalogError> {
        for entry in &entries {
            validate_entry(entry)?;
        }
        let mut index = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            if index.insert(entry.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateTile(entry.id.clone()));
            }
        }
        Ok(Self { entries, index })
    }

    /// The built-in catalog with every add-on's tiles
    pub fn standard() -> Self {
        let entries = standard_entries();
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.id.clone(), i))
            .collect();
        Self { entries, index }
    }

    /// Look up a tile definition by id
    pub fn get(&self, id: &str) -> Option<&TileCatalogEntry> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All entries in catalog order
    pub fn entries(&self) -> &[TileCatalogEntry] {
        &self.entries
    }

    /// Whether a tile type is part of the game with these add-ons
    pub fn is_enabled(&self, id: &str, addons: &[Addon]) -> bool {
        self.get(id)
            .is_some_and(|entry| entry.addon.map_or(true, |addon| addons.contains(&addon)))
    }

    /// Starting tile for a set of add-ons
    pub fn default_starting_tile(addons: &[Addon]) -> &'static str {
        if addons.contains(&Addon::River) {
            RIVER_SPRING_TILE_ID
        } else {
            BASE_STARTING_TILE_ID
        }
    }

    /// Build a shuffled draw pile for the enabled add-ons.
    ///
    /// One copy of `starting_tile` is held back. River tiles are shuffled
    /// separately and drawn first, with the lake last among them.
    pub fn build_deck(&self, addons: &[Addon], starting_tile: &str, seed: u64) -> Vec<TileId> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut river = Vec::new();
        let mut land = Vec::new();
        let mut held_back = false;

        for entry in &self.entries {
            if !self.is_enabled(&entry.id, addons) {
                continue;
            }
            for _ in 0..entry.count {
                if !held_back && entry.id == starting_tile {
                    held_back = true;
                    continue;
                }
                if entry.has_river() {
                    river.push(entry.id.clone());
                } else {
                    land.push(entry.id.clone());
                }
            }
        }

        let lake_count = river.iter().filter(|id| *id == RIVER_LAKE_TILE_ID).count();
        river.retain(|id| id != RIVER_LAKE_TILE_ID);
        river.shuffle(&mut rng);
        river.extend(std::iter::repeat(RIVER_LAKE_TILE_ID.to_string()).take(lake_count));

        land.shuffle(&mut rng);
        river.extend(land);
        river
    }
}

impl TryFrom<Vec<TileCatalogEntry>> for TileCatalog {
    type Error = CatalogError;

    fn try_from(entries: Vec<TileCatalogEntry>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<TileCatalog> for Vec<TileCatalogEntry> {
    fn from(catalog: TileCatalog) -> Self {
        catalog.entries
    }
}

fn validate_entry(entry: &TileCatalogEntry) -> Result<(), CatalogError> {
    let mut claimed: HashSet<Direction> = HashSet::new();
    let edge_features = entry
        .cities
        .iter()
        .map(|city| ("city", EdgeType::City, &city.edges))
        .chain(entry.roads.iter().map(|road| ("road", EdgeType::Road, &road.edges)));

    for (feature, expected, edges) in edge_features {
        for &edge in edges {
            let actual = entry.edges[edge.index()];
            if actual != expected {
                return Err(CatalogError::EdgeTypeMismatch {
                    tile: entry.id.clone(),
                    feature,
                    edge: edge.label(),
                    actual,
                });
            }
            if !claimed.insert(edge) {
                return Err(CatalogError::EdgeClaimedTwice {
                    tile: entry.id.clone(),
                    edge: edge.label(),
                });
            }
        }
    }

    let mut corners: HashSet<Corner> = HashSet::new();
    for farm in &entry.farms {
        for &corner in &farm.corners {
            if !corners.insert(corner) {
                return Err(CatalogError::CornerClaimedTwice {
                    tile: entry.id.clone(),
                });
            }
        }
        if let Some(&city) = farm.adjacent_cities.iter().find(|&&c| c >= entry.cities.len()) {
            return Err(CatalogError::UnknownAdjacentCity {
                tile: entry.id.clone(),
                city,
            });
        }
    }

    Ok(())
}

/// Every tile type known to the engine
pub fn standard_entries() -> Vec<TileCatalogEntry> {
    let mut entries = base_entries();
    entries.extend(inns_and_cathedrals_entries());
    entries.extend(garden_entries());
    entries.extend(river_entries());
    entries
}

use Corner::{NorthEast as NE, NorthWest as NW, SouthEast as SE, SouthWest as SW};
use Direction::{East as E, North as N, South as S, West as W};
use EdgeType::{City as C, Farm as F, River as V, Road as R};

const ALL_CORNERS: [Corner; 4] = [NW, NE, SE, SW];

fn base_entries() -> Vec<TileCatalogEntry> {
    vec![
        // Row 1: monasteries, big cities
        TileCatalogEntry::new("T_R1C1", [F, F, F, F])
            .monastery()
            .farm(&ALL_CORNERS, &[])
            .copies(4),
        TileCatalogEntry::new("T_R1C2", [F, F, R, F])
            .monastery()
            .road(&[S])
            .farm(&ALL_CORNERS, &[])
            .copies(2),
        TileCatalogEntry::new("T_R1C3", [C, C, C, C])
            .pennant_city(&[N, E, S, W])
            .copies(1),
        TileCatalogEntry::new("T_R1C4", [C, C, F, C])
            .city(&[N, E, W])
            .farm(&[SE, SW], &[0])
            .copies(3),
        TileCatalogEntry::new("T_R1C5", [C, C, F, C])
            .pennant_city(&[N, E, W])
            .farm(&[SE, SW], &[0])
            .copies(1),
        TileCatalogEntry::new("T_R1C6", [C, C, R, C])
            .city(&[N, E, W])
            .road(&[S])
            .farm(&[SW], &[0])
            .farm(&[SE], &[0])
            .copies(1),
        TileCatalogEntry::new("T_R1C7", [C, C, R, C])
            .pennant_city(&[N, E, W])
            .road(&[S])
            .farm(&[SW], &[0])
            .farm(&[SE], &[0])
            .copies(2),
        TileCatalogEntry::new("T_R1C8", [C, F, F, C])
            .city(&[N, W])
            .farm(&[NE, SE, SW], &[0])
            .copies(3),
        // Row 2: diagonal cities, bands, caps
        TileCatalogEntry::new("T_R2C1", [C, F, F, C])
            .pennant_city(&[N, W])
            .farm(&[NE, SE, SW], &[0])
            .copies(2),
        TileCatalogEntry::new("T_R2C2", [C, R, R, C])
            .city(&[N, W])
            .road(&[E, S])
            .farm(&[SE], &[])
            .farm(&[NE, SW], &[0])
            .copies(3),
        TileCatalogEntry::new("T_R2C3", [C, R, R, C])
            .pennant_city(&[N, W])
            .road(&[E, S])
            .farm(&[SE], &[])
            .farm(&[NE, SW], &[0])
            .copies(2),
        TileCatalogEntry::new("T_R2C4", [F, C, F, C])
            .city(&[E, W])
            .farm(&[NW, NE], &[0])
            .farm(&[SE, SW], &[0])
            .copies(1),
        TileCatalogEntry::new("T_R2C5", [F, C, F, C])
            .pennant_city(&[E, W])
            .farm(&[NW, NE], &[0])
            .farm(&[SE, SW], &[0])
            .copies(2),
        TileCatalogEntry::new("T_R2C6", [F, C, F, C])
            .city(&[E])
            .city(&[W])
            .farm(&ALL_CORNERS, &[0, 1])
            .copies(3),
        TileCatalogEntry::new("T_R2C7", [C, F, F, C])
            .city(&[N])
            .city(&[W])
            .farm(&ALL_CORNERS, &[0, 1])
            .copies(2),
        TileCatalogEntry::new("T_R2C8", [C, F, F, F])
            .city(&[N])
            .farm(&ALL_CORNERS, &[0])
            .copies(5),
        // Row 3: city caps with roads, plain roads
        TileCatalogEntry::new("T_R3C1", [C, R, R, F])
            .city(&[N])
            .road(&[E, S])
            .farm(&[SE], &[])
            .farm(&[NW, NE, SW], &[0])
            .copies(3),
        TileCatalogEntry::new("T_R3C2", [C, F, R, R])
            .city(&[N])
            .road(&[S, W])
            .farm(&[SW], &[])
            .farm(&[NW, NE, SE], &[0])
            .copies(3),
        TileCatalogEntry::new("T_R3C3", [C, R, R, R])
            .city(&[N])
            .road(&[E])
            .road(&[S])
            .road(&[W])
            .farm(&[NW, NE], &[0])
            .farm(&[SE], &[])
            .farm(&[SW], &[])
            .copies(3),
        TileCatalogEntry::new("T_R3C4", [C, R, F, R])
            .city(&[N])
            .road(&[E, W])
            .farm(&[NW, NE], &[0])
            .farm(&[SE, SW], &[])
            .copies(4),
        TileCatalogEntry::new("T_R3C5", [R, F, R, F])
            .road(&[N, S])
            .farm(&[NW, SW], &[])
            .farm(&[NE, SE], &[])
            .copies(8),
        TileCatalogEntry::new("T_R3C6", [F, F, R, R])
            .road(&[S, W])
            .farm(&[SW], &[])
            .farm(&[NW, NE, SE], &[])
            .copies(9),
        TileCatalogEntry::new("T_R3C7", [F, R, R, R])
            .road(&[E])
            .road(&[S])
            .road(&[W])
            .farm(&[NW, NE], &[])
            .farm(&[SE], &[])
            .farm(&[SW], &[])
            .copies(4),
        TileCatalogEntry::new("T_R3C8", [R, R, R, R])
            .road(&[N])
            .road(&[E])
            .road(&[S])
            .road(&[W])
            .farm(&[NW], &[])
            .farm(&[NE], &[])
            .farm(&[SE], &[])
            .farm(&[SW], &[])
            .copies(1),
    ]
}

fn inns_and_cathedrals_entries() -> Vec<TileCatalogEntry> {
    vec![
        TileCatalogEntry::new("IC_R1C1", [C, C, C, C])
            .cathedral_city(&[N, E, S, W])
            .copies(2),
        TileCatalogEntry::new("IC_R1C2", [R, F, R, F])
            .inn_road(&[N, S])
            .farm(&[NW, SW], &[])
            .farm(&[NE, SE], &[]),
        TileCatalogEntry::new("IC_R1C3", [F, F, R, R])
            .inn_road(&[S, W])
            .farm(&[SW], &[])
            .farm(&[NW, NE, SE], &[]),
        TileCatalogEntry::new("IC_R1C4", [C, R, F, R])
            .city(&[N])
            .inn_road(&[E, W])
            .farm(&[NW, NE], &[0])
            .farm(&[SE, SW], &[]),
        TileCatalogEntry::new("IC_R1C5", [F, F, R, R])
            .monastery()
            .road(&[S])
            .road(&[W])
            .farm(&[SW], &[])
            .farm(&[NW, NE, SE], &[]),
    ]
    .into_iter()
    .map(|entry| entry.addon(Addon::InnsAndCathedrals))
    .collect()
}

fn garden_entries() -> Vec<TileCatalogEntry> {
    vec![
        TileCatalogEntry::new("GD_R1C1", [C, F, F, F])
            .garden()
            .city(&[N])
            .farm(&ALL_CORNERS, &[0])
            .copies(2),
        TileCatalogEntry::new("GD_R1C2", [F, F, R, R])
            .garden()
            .road(&[S, W])
            .farm(&[SW], &[])
            .farm(&[NW, NE, SE], &[])
            .copies(2),
        TileCatalogEntry::new("GD_R1C3", [F, F, F, F])
            .garden()
            .farm(&ALL_CORNERS, &[])
            .copies(2),
    ]
    .into_iter()
    .map(|entry| entry.addon(Addon::Abbot))
    .collect()
}

fn river_entries() -> Vec<TileCatalogEntry> {
    vec![
        TileCatalogEntry::new(RIVER_SPRING_TILE_ID, [F, F, V, F]).farm(&ALL_CORNERS, &[]),
        TileCatalogEntry::new(RIVER_LAKE_TILE_ID, [V, F, F, F]).farm(&ALL_CORNERS, &[]),
        TileCatalogEntry::new("RV2_R1C3", [V, F, V, F])
            .farm(&[NW, SW], &[])
            .farm(&[NE, SE], &[])
            .copies(2),
        TileCatalogEntry::new("RV2_R1C4", [F, F, V, V])
            .farm(&[SW], &[])
            .farm(&[NW, NE, SE], &[])
            .copies(2),
        TileCatalogEntry::new("RV2_R1C5", [V, R, V, R])
            .road(&[E, W])
            .farm(&[NW], &[])
            .farm(&[NE], &[])
            .farm(&[SE], &[])
            .farm(&[SW], &[]),
        TileCatalogEntry::new("RV2_R1C6", [C, V, V, F])
            .city(&[N])
            .farm(&[SE], &[])
            .farm(&[NW, NE, SW], &[0]),
        TileCatalogEntry::new("RV2_R1C7", [F, V, V, V])
            .farm(&[NW, NE], &[])
            .farm(&[SE], &[])
            .farm(&[SW], &[]),
        TileCatalogEntry::new("RV2_R1C8", [F, F, V, V])
            .monastery()
            .farm(&[SW], &[])
            .farm(&[NW, NE, SE], &[]),
    ]
    .into_iter()
    .map(|entry| entry.addon(Addon::River))
    .collect()
}
