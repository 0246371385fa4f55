//! Feature scoring.
//!
//! Two resolvers, both pure: they read a `GameState` and return the players
//! and meeples it should have afterwards plus a record of every award.
//! - Completed scoring runs after each turn. Closed cities, roads,
//!   monasteries and gardens pay full value and release their meeples.
//! - Final scoring runs once when the tiles run out. Everything still
//!   occupied pays reduced value, farms included, and meeples stay put.
//!
//! Majority is decided by meeple strength; every tied leader scores in full.

use crate::catalog::TileCatalog;
use crate::features::{analyze_board_features, BoardFeatureAnalysis, FeatureComponent};
use crate::game::GameState;
use crate::meeple::{MeepleKind, PlacedMeeple};
use crate::player::{PlayerId, PlayerState};
use crate::tile::FeatureType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Points per tile of a completed city
pub const CITY_TILE_POINTS: u32 = 2;
/// Points per pennant of a completed city
pub const CITY_PENNANT_POINTS: u32 = 2;
/// Per tile and per pennant for a completed city with a cathedral
pub const CATHEDRAL_CITY_POINTS: u32 = 3;
/// Points per tile of a completed road
pub const ROAD_TILE_POINTS: u32 = 1;
/// Per tile for a completed road with an inn
pub const INN_ROAD_POINTS: u32 = 2;
/// A monastery or garden with all 8 neighbors filled
pub const CLOISTER_POINTS: u32 = 9;
/// Per completed city bordering a farm at game end
pub const FARM_CITY_POINTS: u32 = 3;

/// When an award was made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreReason {
    Completed,
    Final,
    AbbotReturn,
}

/// Points paid out for one component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreAward {
    pub reason: ScoreReason,
    pub feature_type: FeatureType,
    pub component_id: usize,
    pub tile_count: u32,
    pub points: u32,
    /// Owners with the strongest presence, in seat order
    pub player_ids: Vec<PlayerId>,
}

/// Result of a scoring pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringOutcome {
    pub players: Vec<PlayerState>,
    pub meeples: Vec<PlacedMeeple>,
    pub events: Vec<ScoreAward>,
}

impl ScoringOutcome {
    fn unchanged(state: &GameState) -> Self {
        Self {
            players: state.players.clone(),
            meeples: state.meeples.clone(),
            events: Vec::new(),
        }
    }

    /// Total points awarded in this pass
    pub fn total_points(&self) -> u32 {
        self.events
            .iter()
            .map(|award| award.points * award.player_ids.len() as u32)
            .sum()
    }
}

/// Score every closed, occupied city, road, monastery and garden.
///
/// Scored meeples go back to their owners' supplies.
pub fn resolve_completed_feature_scoring(catalog: &TileCatalog, state: &GameState) -> ScoringOutcome {
    let analysis = analyze_board_features(catalog, &state.board);
    let mut outcome = ScoringOutcome::unchanged(state);
    let mut released = vec![false; state.meeples.len()];

    for (component_id, occupants) in occupants_by_component(&analysis, &state.meeples) {
        let component = &analysis.components[component_id];
        if component.feature_type == FeatureType::Farm || !component.is_closed() {
            continue;
        }
        let points = completed_feature_points(component);
        let winners = majority_owners(&state.players, &state.meeples, &occupants);
        award(&mut outcome, ScoreReason::Completed, component, points, winners);

        for &i in &occupants {
            released[i] = true;
            let meeple = &state.meeples[i];
            if let Some(owner) = outcome.players.iter_mut().find(|p| p.id == meeple.player_id) {
                owner.return_meeple(meeple.kind);
            }
        }
    }

    outcome.meeples = state
        .meeples
        .iter()
        .zip(&released)
        .filter(|&(_, &gone)| !gone)
        .map(|(meeple, _)| meeple.clone())
        .collect();
    outcome
}

/// Score everything still occupied at game end. Meeples are not returned.
pub fn resolve_final_scoring(catalog: &TileCatalog, state: &GameState) -> ScoringOutcome {
    let analysis = analyze_board_features(catalog, &state.board);
    let mut outcome = ScoringOutcome::unchanged(state);

    for (component_id, occupants) in occupants_by_component(&analysis, &state.meeples) {
        let component = &analysis.components[component_id];
        let points = final_feature_points(component, &analysis);
        if points == 0 {
            continue;
        }
        let winners = majority_owners(&state.players, &state.meeples, &occupants);
        award(&mut outcome, ScoreReason::Final, component, points, winners);
    }
    outcome
}

/// Recall a player's abbot, scoring its monastery or garden as it stands.
///
/// Returns `None` when the player has no abbot on the board.
pub fn score_abbot_return(catalog: &TileCatalog, state: &GameState, player_id: &str) -> Option<ScoringOutcome> {
    let index = state
        .meeples
        .iter()
        .position(|m| m.player_id == player_id && m.kind == MeepleKind::Abbot)?;
    let abbot = &state.meeples[index];

    let analysis = analyze_board_features(catalog, &state.board);
    let component = analysis.component_for(&abbot.feature_key())?;
    let points = CLOISTER_POINTS.saturating_sub(component.open_ends);

    let mut outcome = ScoringOutcome::unchanged(state);
    outcome.meeples.remove(index);
    award(
        &mut outcome,
        ScoreReason::AbbotReturn,
        component,
        points,
        vec![abbot.player_id.clone()],
    );
    if let Some(owner) = outcome.players.iter_mut().find(|p| p.id == player_id) {
        owner.return_meeple(MeepleKind::Abbot);
    }
    Some(outcome)
}

/// Full value of a closed component
pub fn completed_feature_points(component: &FeatureComponent) -> u32 {
    let tiles = component.tile_count();
    match component.feature_type {
        FeatureType::City => {
            let (per_tile, per_pennant) = if component.has_cathedral {
                (CATHEDRAL_CITY_POINTS, CATHEDRAL_CITY_POINTS)
            } else {
                (CITY_TILE_POINTS, CITY_PENNANT_POINTS)
            };
            per_tile * tiles + per_pennant * component.pennants
        }
        FeatureType::Road => {
            let per_tile = if component.has_inn {
                INN_ROAD_POINTS
            } else {
                ROAD_TILE_POINTS
            };
            per_tile * tiles
        }
        FeatureType::Monastery | FeatureType::Garden => CLOISTER_POINTS,
        FeatureType::Farm => 0,
    }
}

/// Reduced value of a component at game end
pub fn final_feature_points(component: &FeatureComponent, analysis: &BoardFeatureAnalysis) -> u32 {
    match component.feature_type {
        FeatureType::City => component.tile_count() + component.pennants,
        FeatureType::Road => component.tile_count(),
        FeatureType::Monastery | FeatureType::Garden => CLOISTER_POINTS.saturating_sub(component.open_ends),
        FeatureType::Farm => {
            let completed = component
                .adjacent_city_components
                .iter()
                .filter_map(|&id| analysis.components.get(id))
                .filter(|city| city.is_closed())
                .count() as u32;
            FARM_CITY_POINTS * completed
        }
    }
}

/// Meeple indices grouped by the component they stand in, ascending by id
fn occupants_by_component(analysis: &BoardFeatureAnalysis, meeples: &[PlacedMeeple]) -> BTreeMap<usize, Vec<usize>> {
    let mut occupants: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (i, meeple) in meeples.iter().enumerate() {
        if let Some(&id) = analysis.component_by_feature_key.get(&meeple.feature_key()) {
            occupants.entry(id).or_default().push(i);
        }
    }
    occupants
}

/// Owners with the highest total strength among the given meeples, in seat order
fn majority_owners(players: &[PlayerState], meeples: &[PlacedMeeple], occupants: &[usize]) -> Vec<PlayerId> {
    let mut strength: BTreeMap<&str, u32> = BTreeMap::new();
    for &i in occupants {
        let meeple = &meeples[i];
        *strength.entry(meeple.player_id.as_str()).or_default() += meeple.kind.strength();
    }
    let Some(&best) = strength.values().max() else {
        return Vec::new();
    };

    players
        .iter()
        .filter(|p| strength.get(p.id.as_str()) == Some(&best))
        .map(|p| p.id.clone())
        .collect()
}

fn award(
    outcome: &mut ScoringOutcome,
    reason: ScoreReason,
    component: &FeatureComponent,
    points: u32,
    player_ids: Vec<PlayerId>,
) {
    for id in &player_ids {
        if let Some(player) = outcome.players.iter_mut().find(|p| &p.id == id) {
            player.add_score(points);
        }
    }
    outcome.events.push(ScoreAward {
        reason,
        feature_type: component.feature_type,
        component_id: component.id,
        tile_count: component.tile_count(),
        points,
        player_ids,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardState, PlacedTile};
    use crate::catalog::Addon;
    use crate::coords::{Coordinate, Orientation};
    use crate::game::{create_game, GameSetup, PlayerSetup};
    use crate::meeple::MeeplePlacement;
    use pretty_assertions::assert_eq;

    fn game(addons: &[Addon]) -> GameState {
        let setup = GameSetup::new(
            vec![PlayerSetup::new("p1", "Ann"), PlayerSetup::new("p2", "Ben")],
            vec!["T_R3C5".into()],
        )
        .with_addons(addons.to_vec());
        create_game(&TileCatalog::standard(), setup).unwrap()
    }

    fn place(state: &mut GameState, id: &str, x: i32, y: i32, orientation: Orientation) {
        state.board = state
            .board
            .with_tile(PlacedTile::new(id, Coordinate::new(x, y), orientation));
    }

    fn meeple(player: &str, x: i32, y: i32, feature_type: FeatureType, kind: MeepleKind) -> PlacedMeeple {
        PlacedMeeple::new(MeeplePlacement::new(Coordinate::new(x, y), feature_type, 0), player, kind)
    }

    fn closed_road(state: &mut GameState) {
        place(state, "T_R1C2", -1, 0, Orientation::Deg270);
        place(state, "T_R1C2", 1, 0, Orientation::Deg90);
    }

    fn score_of(outcome: &ScoringOutcome, id: &str) -> u32 {
        outcome.players.iter().find(|p| p.id == id).map_or(0, |p| p.score)
    }

    #[test]
    fn test_closed_road_pays_owner_and_returns_meeple() {
        let catalog = TileCatalog::standard();
        let mut state = game(&[]);
        closed_road(&mut state);
        state.players[0].meeples_available = 6;
        state.meeples.push(meeple("p1", -1, 0, FeatureType::Road, MeepleKind::Normal));

        let outcome = resolve_completed_feature_scoring(&catalog, &state);
        assert_eq!(score_of(&outcome, "p1"), 3);
        assert_eq!(outcome.players[0].meeples_available, 7);
        assert!(outcome.meeples.is_empty());
        assert_eq!(outcome.events.len(), 1);
        assert_eq!(outcome.events[0].reason, ScoreReason::Completed);
        assert_eq!(outcome.events[0].tile_count, 3);
        // Input is untouched
        assert_eq!(state.meeples.len(), 1);
    }

    #[test]
    fn test_open_features_are_not_scored() {
        let catalog = TileCatalog::standard();
        let mut state = game(&[]);
        place(&mut state, "T_R1C2", -1, 0, Orientation::Deg270);
        state.meeples.push(meeple("p1", -1, 0, FeatureType::Road, MeepleKind::Normal));
        let outcome = resolve_completed_feature_scoring(&catalog, &state);
        assert!(outcome.events.is_empty());
        assert_eq!(outcome.meeples, state.meeples);
    }

    #[test]
    fn test_tied_owners_both_score() {
        let catalog = TileCatalog::standard();
        let mut state = game(&[]);
        closed_road(&mut state);
        state.meeples.push(meeple("p1", -1, 0, FeatureType::Road, MeepleKind::Normal));
        state.meeples.push(meeple("p2", 1, 0, FeatureType::Road, MeepleKind::Normal));

        let outcome = resolve_completed_feature_scoring(&catalog, &state);
        assert_eq!(score_of(&outcome, "p1"), 3);
        assert_eq!(score_of(&outcome, "p2"), 3);
        assert_eq!(outcome.events[0].player_ids, vec!["p1".to_string(), "p2".to_string()]);
        assert!(outcome.meeples.is_empty());
    }

    #[test]
    fn test_big_meeple_wins_majority() {
        let catalog = TileCatalog::standard();
        let mut state = game(&[Addon::InnsAndCathedrals]);
        closed_road(&mut state);
        state.players[1].big_meeple_available = false;
        state.meeples.push(meeple("p1", -1, 0, FeatureType::Road, MeepleKind::Normal));
        state.meeples.push(meeple("p2", 1, 0, FeatureType::Road, MeepleKind::Big));

        let outcome = resolve_completed_feature_scoring(&catalog, &state);
        assert_eq!(score_of(&outcome, "p1"), 0);
        assert_eq!(score_of(&outcome, "p2"), 3);
        // Both meeples leave the road, each to its own pool
        assert!(outcome.players[1].big_meeple_available);
        assert_eq!(outcome.players[0].meeples_available, 8);
    }

    #[test]
    fn test_completed_city_formula() {
        let mut component = FeatureComponent {
            id: 0,
            feature_type: FeatureType::City,
            feature_keys: Vec::new(),
            tile_keys: vec![Coordinate::new(0, 0), Coordinate::new(0, 1), Coordinate::new(1, 1)],
            open_ends: 0,
            pennants: 2,
            has_inn: false,
            has_cathedral: false,
            adjacent_city_components: Vec::new(),
        };
        assert_eq!(completed_feature_points(&component), 10);
        component.has_cathedral = true;
        assert_eq!(completed_feature_points(&component), 15);

        component.feature_type = FeatureType::Road;
        assert_eq!(completed_feature_points(&component), 3);
        component.has_inn = true;
        assert_eq!(completed_feature_points(&component), 6);

        component.feature_type = FeatureType::Garden;
        assert_eq!(completed_feature_points(&component), CLOISTER_POINTS);
    }

    #[test]
    fn test_closed_pennant_city_pays_bonus() {
        let catalog = TileCatalog::standard();
        let mut state = game(&[]);
        // A pennant band capped on both ends
        state.board = BoardState::new();
        place(&mut state, "T_R2C5", 0, 0, Orientation::Deg0);
        place(&mut state, "T_R2C8", 1, 0, Orientation::Deg270);
        place(&mut state, "T_R2C8", -1, 0, Orientation::Deg90);
        state.players[1].meeples_available = 6;
        state.meeples.push(meeple("p2", 0, 0, FeatureType::City, MeepleKind::Normal));

        let outcome = resolve_completed_feature_scoring(&catalog, &state);
        assert_eq!(score_of(&outcome, "p2"), 3 * CITY_TILE_POINTS + CITY_PENNANT_POINTS);
        assert_eq!(outcome.players[1].meeples_available, 7);
        assert_eq!(outcome.events[0].feature_type, FeatureType::City);
    }

    #[test]
    fn test_closed_cathedral_city_pays_triple() {
        let catalog = TileCatalog::standard();
        let mut state = game(&[Addon::InnsAndCathedrals]);
        state.board = BoardState::new();
        place(&mut state, "IC_R1C1", 0, 0, Orientation::Deg0);
        place(&mut state, "T_R2C8", 0, 1, Orientation::Deg180);
        place(&mut state, "T_R2C8", 1, 0, Orientation::Deg270);
        place(&mut state, "T_R2C8", 0, -1, Orientation::Deg0);
        state.meeples.push(meeple("p1", 0, 0, FeatureType::City, MeepleKind::Normal));

        // Still open to the west
        let open = resolve_completed_feature_scoring(&catalog, &state);
        assert!(open.events.is_empty());

        place(&mut state, "T_R2C8", -1, 0, Orientation::Deg90);
        let outcome = resolve_completed_feature_scoring(&catalog, &state);
        assert_eq!(score_of(&outcome, "p1"), 5 * CATHEDRAL_CITY_POINTS);
        assert_eq!(outcome.events[0].tile_count, 5);
    }

    #[test]
    fn test_final_scoring_keeps_meeples_and_scores_farms() {
        let catalog = TileCatalog::standard();
        let mut state = game(&[]);
        // Close the start tile's city with a cap above it
        place(&mut state, "T_R2C8", 0, 1, Orientation::Deg180);
        state.meeples.push(meeple("p1", 0, 0, FeatureType::Farm, MeepleKind::Normal));
        // Open road on the start tile for the other player
        state.meeples.push(meeple("p2", 0, 0, FeatureType::Road, MeepleKind::Normal));

        let outcome = resolve_final_scoring(&catalog, &state);
        assert_eq!(score_of(&outcome, "p1"), FARM_CITY_POINTS);
        assert_eq!(score_of(&outcome, "p2"), 1);
        assert_eq!(outcome.meeples, state.meeples);
        assert!(outcome.events.iter().all(|e| e.reason == ScoreReason::Final));
    }

    #[test]
    fn test_final_monastery_counts_filled_neighbors() {
        let catalog = TileCatalog::standard();
        let mut state = game(&[]);
        place(&mut state, "T_R1C2", -1, 0, Orientation::Deg270);
        state.meeples.push(meeple("p1", -1, 0, FeatureType::Monastery, MeepleKind::Normal));
        let outcome = resolve_final_scoring(&catalog, &state);
        // Itself plus the start tile
        assert_eq!(score_of(&outcome, "p1"), 2);
    }

    #[test]
    fn test_final_farm_without_completed_city_scores_nothing() {
        let catalog = TileCatalog::standard();
        let mut state = game(&[]);
        state.meeples.push(meeple("p1", 0, 0, FeatureType::Farm, MeepleKind::Normal));
        let outcome = resolve_final_scoring(&catalog, &state);
        assert!(outcome.events.is_empty());
        assert_eq!(score_of(&outcome, "p1"), 0);
    }

    #[test]
    fn test_abbot_return_scores_partial_garden() {
        let catalog = TileCatalog::standard();
        let mut state = game(&[Addon::Abbot]);
        place(&mut state, "GD_R1C1", 0, -1, Orientation::Deg180);
        state.players[0].abbot_available = false;
        state.meeples.push(meeple("p1", 0, -1, FeatureType::Garden, MeepleKind::Abbot));

        let outcome = score_abbot_return(&catalog, &state, "p1").unwrap();
        assert_eq!(score_of(&outcome, "p1"), 2);
        assert!(outcome.players[0].abbot_available);
        assert!(outcome.meeples.is_empty());
        assert_eq!(outcome.events[0].reason, ScoreReason::AbbotReturn);

        assert!(score_abbot_return(&catalog, &state, "p2").is_none());
    }
}
