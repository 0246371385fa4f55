//! Meeple kinds and placement legality.
//!
//! A meeple may only go on a feature of the tile placed this turn, and only
//! when the connected component of that feature holds no meeple yet. Normal
//! and big meeples claim cities, roads, farms and monasteries; the abbot
//! claims a monastery or a garden.

use crate::catalog::TileCatalog;
use crate::coords::Coordinate;
use crate::features::{analyze_board_features, is_connected_feature_occupied, FeatureKey};
use crate::game::{GamePhase, GameState};
use crate::player::PlayerId;
use crate::tile::FeatureType;
use serde::{Deserialize, Serialize};

/// Worker kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeepleKind {
    #[default]
    Normal,
    /// Counts twice toward majority (Inns & Cathedrals)
    Big,
    /// Monasteries and gardens only, can be recalled for points (Abbot)
    Abbot,
}

impl MeepleKind {
    /// Weight of this meeple when deciding majority
    pub const fn strength(self) -> u32 {
        match self {
            MeepleKind::Big => 2,
            MeepleKind::Normal | MeepleKind::Abbot => 1,
        }
    }

    /// Name used in event details
    pub const fn label(self) -> &'static str {
        match self {
            MeepleKind::Normal => "meeple",
            MeepleKind::Big => "big meeple",
            MeepleKind::Abbot => "abbot",
        }
    }

    /// Feature types this kind may claim
    pub const fn targets(self) -> &'static [FeatureType] {
        match self {
            MeepleKind::Normal | MeepleKind::Big => &[
                FeatureType::City,
                FeatureType::Road,
                FeatureType::Farm,
                FeatureType::Monastery,
            ],
            MeepleKind::Abbot => &[FeatureType::Monastery, FeatureType::Garden],
        }
    }
}

/// A feature on a placed tile, as targeted by a meeple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeeplePlacement {
    pub tile_position: Coordinate,
    pub feature_type: FeatureType,
    pub feature_index: usize,
}

impl MeeplePlacement {
    pub const fn new(tile_position: Coordinate, feature_type: FeatureType, feature_index: usize) -> Self {
        Self {
            tile_position,
            feature_type,
            feature_index,
        }
    }

    pub fn feature_key(&self) -> FeatureKey {
        FeatureKey::new(self.tile_position, self.feature_type, self.feature_index)
    }
}

/// A meeple standing on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedMeeple {
    pub tile_position: Coordinate,
    pub feature_type: FeatureType,
    pub feature_index: usize,
    pub player_id: PlayerId,
    #[serde(default)]
    pub kind: MeepleKind,
}

impl PlacedMeeple {
    pub fn new(placement: MeeplePlacement, player_id: impl Into<PlayerId>, kind: MeepleKind) -> Self {
        Self {
            tile_position: placement.tile_position,
            feature_type: placement.feature_type,
            feature_index: placement.feature_index,
            player_id: player_id.into(),
            kind,
        }
    }

    pub fn feature_key(&self) -> FeatureKey {
        FeatureKey::new(self.tile_position, self.feature_type, self.feature_index)
    }

    pub fn placement(&self) -> MeeplePlacement {
        MeeplePlacement::new(self.tile_position, self.feature_type, self.feature_index)
    }
}

/// Legal targets for a normal meeple this turn
pub fn legal_meeple_placements(catalog: &TileCatalog, state: &GameState) -> Vec<MeeplePlacement> {
    legal_meeple_placements_for_kind(catalog, state, MeepleKind::Normal)
}

/// Legal targets for a meeple of the given kind this turn.
///
/// Empty outside the place-meeple phase or when the active player has no
/// meeple of that kind left. Ordered cities, roads, farms, monastery, garden.
pub fn legal_meeple_placements_for_kind(
    catalog: &TileCatalog,
    state: &GameState,
    kind: MeepleKind,
) -> Vec<MeeplePlacement> {
    if state.phase != GamePhase::PlaceMeeple {
        return Vec::new();
    }
    let Some(last) = &state.last_placed_tile else {
        return Vec::new();
    };
    if !state.active_player().is_some_and(|p| p.has_meeple(kind)) {
        return Vec::new();
    }
    let Some(def) = last.definition(catalog) else {
        return Vec::new();
    };

    let analysis = analyze_board_features(catalog, &state.board);
    kind.targets()
        .iter()
        .flat_map(|&feature_type| {
            (0..def.feature_count(feature_type))
                .map(move |i| MeeplePlacement::new(last.position, feature_type, i))
        })
        .filter(|placement| {
            !is_connected_feature_occupied(catalog, &state.board, &state.meeples, placement, Some(&analysis))
        })
        .collect()
}

/// Whether a normal meeple may go on this feature this turn
pub fn is_meeple_placement_valid(catalog: &TileCatalog, state: &GameState, placement: &MeeplePlacement) -> bool {
    is_meeple_placement_valid_for_kind(catalog, state, placement, MeepleKind::Normal)
}

pub fn is_meeple_placement_valid_for_kind(
    catalog: &TileCatalog,
    state: &GameState,
    placement: &MeeplePlacement,
    kind: MeepleKind,
) -> bool {
    state
        .last_placed_tile
        .as_ref()
        .is_some_and(|last| last.position == placement.tile_position)
        && legal_meeple_placements_for_kind(catalog, state, kind).contains(placement)
}
