//! Connected feature analysis.
//!
//! Every city, road, farm, monastery and garden on every placed tile becomes a
//! `FeatureNode`. Nodes link to matching nodes on adjacent tiles:
//! - cities and roads across an edge whose neighbor edge has the same type
//! - farms across the two corners of any edge that is not a city edge
//! - monasteries and gardens never link
//!
//! Linked nodes of the same type are grouped breadth-first into
//! `FeatureComponent`s, the unit of scoring and meeple occupancy. Component ids
//! follow node order (board placement order, then cities, roads, farms,
//! monastery, garden on each tile), so they are stable for one board value and
//! meaningless across boards. Nothing is cached: each call starts from scratch.

use crate::board::BoardState;
use crate::catalog::{EdgeType, TileCatalog};
use crate::coords::{Coordinate, Direction};
use crate::meeple::{MeeplePlacement, PlacedMeeple};
use crate::tile::{FeatureType, OrientedTileDefinition};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{trace, warn};

/// Identifies one feature instance on one placed tile.
///
/// Renders and serializes as `"x,y:type:index"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureKey {
    pub position: Coordinate,
    pub feature_type: FeatureType,
    pub index: usize,
}

impl FeatureKey {
    pub const fn new(position: Coordinate, feature_type: FeatureType, index: usize) -> Self {
        Self {
            position,
            feature_type,
            index,
        }
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.position, self.feature_type, self.index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed feature key {0:?}")]
pub struct ParseFeatureKeyError(String);

impl FromStr for FeatureKey {
    type Err = ParseFeatureKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseFeatureKeyError(s.to_string());
        let mut parts = s.split(':');
        let (Some(position), Some(feature_type), Some(index), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };
        let (x, y) = position.split_once(',').ok_or_else(malformed)?;
        Ok(Self {
            position: Coordinate::new(
                x.parse().map_err(|_| malformed())?,
                y.parse().map_err(|_| malformed())?,
            ),
            feature_type: FeatureType::parse(feature_type).ok_or_else(malformed)?,
            index: index.parse().map_err(|_| malformed())?,
        })
    }
}

impl Serialize for FeatureKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FeatureKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One feature instance with its links to adjacent tiles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureNode {
    pub key: FeatureKey,
    pub feature_type: FeatureType,
    pub tile: Coordinate,
    /// Same-type features on adjacent tiles this one continues into
    pub neighbors: Vec<FeatureKey>,
    /// Edges (or surrounding cells) not yet bordered by a tile
    pub open_ends: u32,
    pub pennants: u32,
    pub has_inn: bool,
    pub has_cathedral: bool,
    /// Cities on the same tile bordering this farm
    pub adjacent_cities: Vec<FeatureKey>,
}

/// A maximal set of connected same-type features
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureComponent {
    pub id: usize,
    pub feature_type: FeatureType,
    pub feature_keys: Vec<FeatureKey>,
    /// Distinct tiles, in discovery order
    pub tile_keys: Vec<Coordinate>,
    pub open_ends: u32,
    pub pennants: u32,
    pub has_inn: bool,
    pub has_cathedral: bool,
    /// Farms only: ids of city components this farm borders, ascending
    pub adjacent_city_components: Vec<usize>,
}

impl FeatureComponent {
    pub fn is_closed(&self) -> bool {
        self.open_ends == 0
    }

    pub fn tile_count(&self) -> u32 {
        self.tile_keys.len() as u32
    }
}

/// Totals for an edge-based feature type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeatureCounts {
    pub total: usize,
    pub open: usize,
    pub closed: usize,
}

impl FeatureCounts {
    fn record(&mut self, closed: bool) {
        self.total += 1;
        if closed {
            self.closed += 1;
        } else {
            self.open += 1;
        }
    }
}

/// Component tallies shown by feature counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeatureSummary {
    pub cities: FeatureCounts,
    pub roads: FeatureCounts,
    pub monasteries: usize,
    pub gardens: usize,
    /// Farm components
    pub grasslands: usize,
}

/// Result of `analyze_board_features`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardFeatureAnalysis {
    pub summary: FeatureSummary,
    pub component_by_feature_key: HashMap<FeatureKey, usize>,
    pub components: Vec<FeatureComponent>,
    pub nodes: Vec<FeatureNode>,
}

impl BoardFeatureAnalysis {
    /// Component holding a feature
    pub fn component_for(&self, key: &FeatureKey) -> Option<&FeatureComponent> {
        self.component_by_feature_key
            .get(key)
            .and_then(|&id| self.components.get(id))
    }

    pub fn components_of_type(&self, feature_type: FeatureType) -> impl Iterator<Item = &FeatureComponent> {
        self.components
            .iter()
            .filter(move |c| c.feature_type == feature_type)
    }
}

/// Build the feature graph of a board and group it into components
pub fn analyze_board_features(catalog: &TileCatalog, board: &BoardState) -> BoardFeatureAnalysis {
    let definitions = oriented_definitions(catalog, board);
    let nodes = build_nodes(board, &definitions);

    let node_index: HashMap<FeatureKey, usize> =
        nodes.iter().enumerate().map(|(i, n)| (n.key, i)).collect();

    let mut component_by_feature_key: HashMap<FeatureKey, usize> = HashMap::with_capacity(nodes.len());
    let mut components: Vec<FeatureComponent> = Vec::new();
    let mut visited = vec![false; nodes.len()];

    for start in 0..nodes.len() {
        if visited[start] {
            continue;
        }
        let id = components.len();
        let feature_type = nodes[start].feature_type;
        let mut members = Vec::new();
        let mut queue = VecDeque::from([start]);
        visited[start] = true;

        while let Some(current) = queue.pop_front() {
            members.push(current);
            for neighbor in &nodes[current].neighbors {
                let Some(&next) = node_index.get(neighbor) else {
                    continue;
                };
                if !visited[next] && nodes[next].feature_type == feature_type {
                    visited[next] = true;
                    queue.push_back(next);
                }
            }
        }

        let mut component = FeatureComponent {
            id,
            feature_type,
            feature_keys: Vec::with_capacity(members.len()),
            tile_keys: Vec::new(),
            open_ends: 0,
            pennants: 0,
            has_inn: false,
            has_cathedral: false,
            adjacent_city_components: Vec::new(),
        };
        for &member in &members {
            let node = &nodes[member];
            component_by_feature_key.insert(node.key, id);
            component.feature_keys.push(node.key);
            if !component.tile_keys.contains(&node.tile) {
                component.tile_keys.push(node.tile);
            }
            component.open_ends += node.open_ends;
            component.pennants += node.pennants;
            component.has_inn |= node.has_inn;
            component.has_cathedral |= node.has_cathedral;
        }
        components.push(component);
    }

    // Farm -> city adjacency needs every city's component id first
    for component in components.iter_mut().filter(|c| c.feature_type == FeatureType::Farm) {
        let cities: BTreeSet<usize> = component
            .feature_keys
            .iter()
            .filter_map(|key| node_index.get(key))
            .flat_map(|&i| nodes[i].adjacent_cities.iter())
            .filter_map(|city| component_by_feature_key.get(city).copied())
            .collect();
        component.adjacent_city_components = cities.into_iter().collect();
    }

    let summary = summarize(&components);
    trace!(
        tiles = board.len(),
        nodes = nodes.len(),
        components = components.len(),
        "analyzed board features"
    );

    BoardFeatureAnalysis {
        summary,
        component_by_feature_key,
        components,
        nodes,
    }
}

/// Whether the component a placement would join already holds a meeple.
///
/// Pass a fresh `analysis` of the same board to skip recomputing it.
pub fn is_connected_feature_occupied(
    catalog: &TileCatalog,
    board: &BoardState,
    meeples: &[PlacedMeeple],
    placement: &MeeplePlacement,
    analysis: Option<&BoardFeatureAnalysis>,
) -> bool {
    let computed;
    let analysis = match analysis {
        Some(analysis) => analysis,
        None => {
            computed = analyze_board_features(catalog, board);
            &computed
        }
    };

    let Some(target) = analysis.component_by_feature_key.get(&placement.feature_key()) else {
        return false;
    };
    meeples.iter().any(|meeple| {
        analysis.component_by_feature_key.get(&meeple.feature_key()) == Some(target)
    })
}

fn oriented_definitions(
    catalog: &TileCatalog,
    board: &BoardState,
) -> HashMap<Coordinate, OrientedTileDefinition> {
    let mut definitions = HashMap::with_capacity(board.len());
    for tile in board.tiles() {
        match tile.definition(catalog) {
            Some(def) => {
                definitions.insert(tile.position, def);
            }
            None => warn!(tile_id = %tile.tile_id, position = %tile.position, "tile missing from catalog"),
        }
    }
    definitions
}

fn build_nodes(
    board: &BoardState,
    definitions: &HashMap<Coordinate, OrientedTileDefinition>,
) -> Vec<FeatureNode> {
    let mut nodes = Vec::new();

    for tile in board.tiles() {
        let position = tile.position;
        let Some(def) = definitions.get(&position) else {
            continue;
        };
        let neighbor_def = |direction: Direction| definitions.get(&position.neighbor(direction));

        for (i, city) in def.cities.iter().enumerate() {
            let mut node = FeatureNode::new(FeatureKey::new(position, FeatureType::City, i));
            node.pennants = city.pennants;
            node.has_cathedral = city.cathedral;
            link_across_edges(&mut node, &city.edges, EdgeType::City, neighbor_def);
            nodes.push(node);
        }

        for (i, road) in def.roads.iter().enumerate() {
            let mut node = FeatureNode::new(FeatureKey::new(position, FeatureType::Road, i));
            node.has_inn = road.inn;
            link_across_edges(&mut node, &road.edges, EdgeType::Road, neighbor_def);
            nodes.push(node);
        }

        for (i, farm) in def.farms.iter().enumerate() {
            let mut node = FeatureNode::new(FeatureKey::new(position, FeatureType::Farm, i));
            for &corner in &farm.corners {
                for edge in corner.edges() {
                    if def.edge(edge) == EdgeType::City {
                        continue;
                    }
                    let Some(neighbor) = neighbor_def(edge) else {
                        node.open_ends += 1;
                        continue;
                    };
                    if neighbor.edge(edge.opposite()) == EdgeType::City {
                        continue;
                    }
                    let linked = corner
                        .across(edge)
                        .and_then(|other| neighbor.farm_at(other))
                        .map(|j| FeatureKey::new(position.neighbor(edge), FeatureType::Farm, j));
                    if let Some(key) = linked {
                        if !node.neighbors.contains(&key) {
                            node.neighbors.push(key);
                        }
                    }
                }
            }
            node.adjacent_cities = farm
                .adjacent_cities
                .iter()
                .map(|&c| FeatureKey::new(position, FeatureType::City, c))
                .collect();
            nodes.push(node);
        }

        let empty_surroundings = position
            .surrounding()
            .iter()
            .filter(|cell| !board.is_occupied(cell))
            .count() as u32;
        if def.monastery {
            let mut node = FeatureNode::new(FeatureKey::new(position, FeatureType::Monastery, 0));
            node.open_ends = empty_surroundings;
            nodes.push(node);
        }
        if def.garden {
            let mut node = FeatureNode::new(FeatureKey::new(position, FeatureType::Garden, 0));
            node.open_ends = empty_surroundings;
            nodes.push(node);
        }
    }

    nodes
}

fn link_across_edges<'a, F>(node: &mut FeatureNode, edges: &[Direction], edge_type: EdgeType, neighbor_def: F)
where
    F: Fn(Direction) -> Option<&'a OrientedTileDefinition>,
{
    let position = node.tile;
    let feature_type = node.feature_type;
    for &edge in edges {
        let linked = neighbor_def(edge)
            .filter(|neighbor| neighbor.edge(edge.opposite()) == edge_type)
            .and_then(|neighbor| neighbor.feature_at(feature_type, edge.opposite()))
            .map(|j| FeatureKey::new(position.neighbor(edge), feature_type, j));
        match linked {
            Some(key) => {
                if !node.neighbors.contains(&key) {
                    node.neighbors.push(key);
                }
            }
            None => node.open_ends += 1,
        }
    }
}

impl FeatureNode {
    fn new(key: FeatureKey) -> Self {
        Self {
            key,
            feature_type: key.feature_type,
            tile: key.position,
            neighbors: Vec::new(),
            open_ends: 0,
            pennants: 0,
            has_inn: false,
            has_cathedral: false,
            adjacent_cities: Vec::new(),
        }
    }
}

fn summarize(components: &[FeatureComponent]) -> FeatureSummary {
    let mut summary = FeatureSummary::default();
    for component in components {
        match component.feature_type {
            FeatureType::City => summary.cities.record(component.is_closed()),
            FeatureType::Road => summary.roads.record(component.is_closed()),
            FeatureType::Monastery => summary.monasteries += 1,
            FeatureType::Garden => summary.gardens += 1,
            FeatureType::Farm => summary.grasslands += 1,
        }
    }
    summary
}
