//! Integration tests for the rules engine.
//!
//! These tests verify complete game flows from setup through to game over.

use carcassonne_core::river::RiverViolation;
use carcassonne_core::*;
use pretty_assertions::assert_eq;

fn players(ids: &[&str]) -> Vec<PlayerSetup> {
    ids.iter().map(|id| PlayerSetup::new(*id, id.to_uppercase())).collect()
}

fn deck(ids: &[&str]) -> Vec<TileId> {
    ids.iter().map(|s| s.to_string()).collect()
}

fn act(catalog: &TileCatalog, state: &GameState, action: GameAction) -> GameState {
    match state.apply_action(catalog, action.clone()) {
        Ok(next) => next,
        Err(e) => panic!("{action:?} failed: {e}"),
    }
}

fn draw(catalog: &TileCatalog, state: &GameState, player: &str) -> GameState {
    act(
        catalog,
        state,
        GameAction::DrawTile {
            player_id: player.into(),
        },
    )
}

fn place(
    catalog: &TileCatalog,
    state: &GameState,
    player: &str,
    tile: &str,
    x: i32,
    y: i32,
    orientation: Orientation,
) -> Result<GameState, GameError> {
    state.apply_action(
        catalog,
        GameAction::PlaceTile {
            player_id: player.into(),
            tile_id: tile.into(),
            position: Coordinate::new(x, y),
            orientation,
        },
    )
}

fn skip(catalog: &TileCatalog, state: &GameState, player: &str) -> GameState {
    act(
        catalog,
        state,
        GameAction::SkipMeeple {
            player_id: player.into(),
        },
    )
}

#[test]
fn test_closing_a_road_scores_its_owner() {
    let catalog = TileCatalog::standard();
    let setup = GameSetup::new(
        players(&["p1", "p2"]),
        deck(&["T_R1C2", "T_R1C2", "T_R3C5", "T_R3C5"]),
    );
    let game = create_game(&catalog, setup).unwrap();

    // Player 1 extends the start tile's road west and claims it
    let game = draw(&catalog, &game, "p1");
    let game = place(&catalog, &game, "p1", "T_R1C2", -1, 0, Orientation::Deg270).unwrap();
    let game = act(
        &catalog,
        &game,
        GameAction::PlaceMeeple {
            player_id: "p1".into(),
            placement: MeeplePlacement::new(Coordinate::new(-1, 0), FeatureType::Road, 0),
            kind: MeepleKind::Normal,
        },
    );
    assert_eq!(game.players[0].meeples_available, STARTING_MEEPLES - 1);

    // Player 2 closes the road on the east side
    let game = draw(&catalog, &game, "p2");
    let game = place(&catalog, &game, "p2", "T_R1C2", 1, 0, Orientation::Deg90).unwrap();
    let game = skip(&catalog, &game, "p2");

    assert_eq!(game.players[0].score, 3);
    assert_eq!(game.players[0].meeples_available, STARTING_MEEPLES);
    assert_eq!(game.players[1].score, 0);
    assert!(game.meeples.is_empty());
    assert_eq!(game.status, GameStatus::Active);
    assert_eq!(game.phase, GamePhase::DrawTile);
    assert_eq!(game.turn_number, 3);

    let scored: Vec<_> = game
        .event_log
        .iter()
        .filter(|e| e.kind == GameEventKind::FeatureScored)
        .collect();
    assert_eq!(scored.len(), 1);
    assert_eq!(scored[0].player_id.as_deref(), Some("p1"));
}

#[test]
fn test_two_monasteries_share_a_closed_road() {
    let catalog = TileCatalog::standard();
    let board = BoardState::new()
        .with_tile(PlacedTile::new("T_R1C2", Coordinate::new(0, 0), Orientation::Deg0))
        .with_tile(PlacedTile::new("T_R1C2", Coordinate::new(0, -1), Orientation::Deg180));
    let summary = analyze_board_features(&catalog, &board).summary;
    assert_eq!(summary.roads.total, 1);
    assert_eq!(summary.roads.closed, 1);
    assert_eq!(summary.roads.open, 0);
    assert_eq!(summary.monasteries, 2);
}

#[test]
fn test_two_city_caps_form_a_closed_city() {
    let catalog = TileCatalog::standard();
    let board = BoardState::new()
        .with_tile(PlacedTile::new("T_R2C8", Coordinate::new(0, 0), Orientation::Deg0))
        .with_tile(PlacedTile::new("T_R2C8", Coordinate::new(0, 1), Orientation::Deg180));
    let summary = analyze_board_features(&catalog, &board).summary;
    assert_eq!(summary.cities.total, 1);
    assert_eq!(summary.cities.closed, 1);
    assert_eq!(summary.cities.open, 0);
}

fn river_game(mode: GameMode) -> GameState {
    let catalog = TileCatalog::standard();
    let setup = GameSetup::new(
        players(&["p1", "p2"]),
        deck(&["RV2_R1C4", "RV2_R1C4", "T_R3C5"]),
    )
    .with_addons(vec![Addon::River])
    .with_mode(mode);
    let game = create_game(&catalog, setup).unwrap();
    assert_eq!(
        game.board.get(&Coordinate::new(0, 0)).map(|t| t.tile_id.as_str()),
        Some(catalog::RIVER_SPRING_TILE_ID)
    );

    // The river leaves the spring southwards and bends east
    let game = draw(&catalog, &game, "p1");
    let game = place(&catalog, &game, "p1", "RV2_R1C4", 0, -1, Orientation::Deg180).unwrap();
    let game = skip(&catalog, &game, "p1");
    draw(&catalog, &game, "p2")
}

#[test]
fn test_river_u_turn_rejected_in_standard_mode() {
    let catalog = TileCatalog::standard();
    let game = river_game(GameMode::Standard);

    let result = place(&catalog, &game, "p2", "RV2_R1C4", 1, -1, Orientation::Deg90);
    assert_eq!(
        result,
        Err(GameError::RiverViolation(RiverViolation::UTurn(RiverTurn::Left)))
    );
    assert_eq!(
        result.unwrap_err().to_string(),
        "River rule violated: river may not turn Left twice in a row"
    );

    let legal = legal_tile_placements_for_state(&catalog, &game, "RV2_R1C4");
    assert!(!legal.iter().any(|p| p.position == Coordinate::new(1, -1) && p.orientation == Orientation::Deg90));
    assert!(legal.iter().any(|p| p.position == Coordinate::new(1, -1) && p.orientation == Orientation::Deg0));
}

#[test]
fn test_river_u_turn_allowed_in_sandbox_mode() {
    let catalog = TileCatalog::standard();
    let game = river_game(GameMode::Sandbox);

    let placed = place(&catalog, &game, "p2", "RV2_R1C4", 1, -1, Orientation::Deg90).unwrap();
    assert_eq!(placed.phase, GamePhase::PlaceMeeple);
    assert_eq!(placed.board.len(), 3);
}

#[test]
fn test_river_endpoints_advance_with_the_river() {
    let catalog = TileCatalog::standard();
    let game = river_game(GameMode::Standard);
    assert_eq!(
        open_river_endpoints(&catalog, &game.board),
        vec![RiverEndpoint {
            position: Coordinate::new(0, -1),
            direction: Direction::East,
        }]
    );
}

#[test]
fn test_river_fork_branches_turn_freely() {
    let catalog = TileCatalog::standard();
    let setup = GameSetup::new(
        players(&["p1", "p2"]),
        deck(&["RV2_R1C4", "RV2_R1C7", "RV2_R1C3", "RV2_R1C4", "T_R3C5"]),
    )
    .with_addons(vec![Addon::River]);
    let game = create_game(&catalog, setup).unwrap();

    // Spring south, curve east, then a fork splitting east and south
    let game = draw(&catalog, &game, "p1");
    let game = place(&catalog, &game, "p1", "RV2_R1C4", 0, -1, Orientation::Deg180).unwrap();
    let game = skip(&catalog, &game, "p1");
    let game = draw(&catalog, &game, "p2");
    let game = place(&catalog, &game, "p2", "RV2_R1C7", 1, -1, Orientation::Deg0).unwrap();
    let game = skip(&catalog, &game, "p2");

    // Extend the east branch
    let game = draw(&catalog, &game, "p1");
    let game = place(&catalog, &game, "p1", "RV2_R1C3", 2, -1, Orientation::Deg90).unwrap();
    let game = skip(&catalog, &game, "p1");
    assert_eq!(open_river_endpoints(&catalog, &game.board).len(), 2);

    // The south branch may bend either way
    let game = draw(&catalog, &game, "p2");
    for orientation in [Orientation::Deg90, Orientation::Deg180] {
        let placed = place(&catalog, &game, "p2", "RV2_R1C4", 1, -2, orientation);
        assert!(placed.is_ok(), "curve at {orientation}: {placed:?}");
    }
}

#[test]
fn test_closing_a_pennant_city_through_play() {
    let catalog = TileCatalog::standard();
    let setup = GameSetup::new(players(&["p1", "p2"]), deck(&["T_R2C5", "T_R2C8", "T_R3C5"]));
    let game = create_game(&catalog, setup).unwrap();

    // A pennant band north of the start tile's city
    let game = draw(&catalog, &game, "p1");
    let game = place(&catalog, &game, "p1", "T_R2C5", 0, 1, Orientation::Deg90).unwrap();
    let game = act(
        &catalog,
        &game,
        GameAction::PlaceMeeple {
            player_id: "p1".into(),
            placement: MeeplePlacement::new(Coordinate::new(0, 1), FeatureType::City, 0),
            kind: MeepleKind::Normal,
        },
    );

    // Player 2 caps it
    let game = draw(&catalog, &game, "p2");
    let game = place(&catalog, &game, "p2", "T_R2C8", 0, 2, Orientation::Deg180).unwrap();
    let game = skip(&catalog, &game, "p2");

    // Three tiles and one pennant at 2 points each
    assert_eq!(game.players[0].score, 8);
    assert_eq!(game.players[0].meeples_available, STARTING_MEEPLES);
    assert_eq!(game.players[1].score, 0);
    assert!(game.meeples.is_empty());
}

#[test]
fn test_abbot_can_be_recalled_for_points() {
    let catalog = TileCatalog::standard();
    let setup = GameSetup::new(
        players(&["p1", "p2"]),
        deck(&["GD_R1C3", "T_R3C5", "T_R3C5"]),
    )
    .with_addons(vec![Addon::Abbot]);
    let game = create_game(&catalog, setup).unwrap();

    let game = draw(&catalog, &game, "p1");
    let game = place(&catalog, &game, "p1", "GD_R1C3", 0, -1, Orientation::Deg0).unwrap();
    let game = act(
        &catalog,
        &game,
        GameAction::PlaceMeeple {
            player_id: "p1".into(),
            placement: MeeplePlacement::new(Coordinate::new(0, -1), FeatureType::Garden, 0),
            kind: MeepleKind::Abbot,
        },
    );
    assert!(!game.players[0].abbot_available);

    // Player 2 builds beside the garden
    let game = draw(&catalog, &game, "p2");
    let game = place(&catalog, &game, "p2", "T_R3C5", 0, -2, Orientation::Deg90).unwrap();
    let game = skip(&catalog, &game, "p2");

    // Player 1 recalls the abbot instead of placing a meeple
    let game = draw(&catalog, &game, "p1");
    let spot = game.current_tile_placements(&catalog)[0];
    let game = place(&catalog, &game, "p1", "T_R3C5", spot.position.x, spot.position.y, spot.orientation).unwrap();
    let filled = 8 - analyze_board_features(&catalog, &game.board)
        .component_for(&FeatureKey::new(Coordinate::new(0, -1), FeatureType::Garden, 0))
        .map(|c| c.open_ends)
        .unwrap();
    let game = act(
        &catalog,
        &game,
        GameAction::ReturnAbbot {
            player_id: "p1".into(),
        },
    );

    assert_eq!(game.players[0].score, filled + 1);
    assert!(game.players[0].abbot_available);
    assert!(game.meeples.is_empty());
    assert!(game.event_log.iter().any(|e| e.kind == GameEventKind::AbbotReturned));
}

/// Play a whole game, picking actions from the valid set by a fixed rotation
fn play_out(setup: GameSetup) -> GameState {
    let catalog = TileCatalog::standard();
    let mut game = create_game(&catalog, setup).unwrap();
    let mut last_scores: Vec<u32> = game.players.iter().map(|p| p.score).collect();
    let mut iterations = 0;
    let max_iterations = 2000;

    while !game.is_finished() && iterations < max_iterations {
        let player = game.active_player().map(|p| p.id.clone()).unwrap();
        let actions = game.valid_actions(&catalog, &player);
        assert!(!actions.is_empty(), "no actions in phase {}", game.phase);

        let pick = (game.turn_number as usize * 7 + iterations) % actions.len();
        game = act(&catalog, &game, actions[pick].clone());

        let scores: Vec<u32> = game.players.iter().map(|p| p.score).collect();
        assert!(scores.iter().zip(&last_scores).all(|(now, before)| now >= before));
        last_scores = scores;
        iterations += 1;
    }

    assert!(game.is_finished(), "game should finish within {max_iterations} iterations");
    game
}

#[test]
fn test_full_game_runs_to_completion() {
    let setup = GameSetup::standard(
        players(&["p1", "p2", "p3"]),
        vec![Addon::InnsAndCathedrals, Addon::Abbot, Addon::River],
        7,
    );
    let game = play_out(setup);
    let catalog = TileCatalog::standard();

    assert_eq!(game.phase, GamePhase::GameOver);
    assert!(game.tile_deck.is_empty());
    assert!(game.event_log.len() <= EVENT_LOG_CAPACITY);
    assert_eq!(game.event_log.latest().map(|e| e.kind), Some(GameEventKind::GameOver));

    // Every normal meeple is either in supply or on the board
    for player in &game.players {
        let on_board = game
            .meeples
            .iter()
            .filter(|m| m.player_id == player.id && m.kind == MeepleKind::Normal)
            .count() as u32;
        assert_eq!(player.meeples_available + on_board, STARTING_MEEPLES);
    }

    // Every meeple stands on a real feature
    let analysis = analyze_board_features(&catalog, &game.board);
    for meeple in &game.meeples {
        assert!(analysis.component_for(&meeple.feature_key()).is_some());
    }

    // Every placed tile matches all its neighbors
    for tile in game.board.tiles() {
        let def = tile.definition(&catalog).unwrap();
        for (direction, neighbor) in game.board.neighbors(tile.position) {
            let other = neighbor.definition(&catalog).unwrap();
            assert_eq!(def.edge(direction), other.edge(direction.opposite()));
        }
    }
}

#[test]
fn test_seeded_games_replay_identically() {
    let make = || GameSetup::standard(players(&["a", "b"]), vec![Addon::InnsAndCathedrals], 99);
    let first = play_out(make());
    let second = play_out(make());
    assert_eq!(first, second);
}

#[test]
fn test_sandbox_game_can_pick_from_the_deck() {
    let catalog = TileCatalog::standard();
    let setup = GameSetup::new(players(&["p1"]), deck(&["T_R3C5", "IC_R1C4"]))
        .with_mode(GameMode::Sandbox)
        .with_addons(vec![Addon::InnsAndCathedrals]);
    let game = create_game(&catalog, setup).unwrap();

    let game = act(
        &catalog,
        &game,
        GameAction::DrawSandboxTile {
            player_id: "p1".into(),
            tile_id: "IC_R1C4".into(),
        },
    );
    let spots = game.current_tile_placements(&catalog);
    assert!(!spots.is_empty());
    let spot = spots[0];
    let game = place(&catalog, &game, "p1", "IC_R1C4", spot.position.x, spot.position.y, spot.orientation).unwrap();
    let game = skip(&catalog, &game, "p1");
    // The head of the deck was never drawn, so play goes on
    assert_eq!(game.status, GameStatus::Active);
    assert_eq!(game.remaining_tiles(), 1);
}

#[test]
fn test_state_snapshot_json_shape() {
    let catalog = TileCatalog::standard();
    let setup = GameSetup::new(players(&["p1", "p2"]), deck(&["T_R1C2"]));
    let game = draw(&catalog, &create_game(&catalog, setup).unwrap(), "p1");
    let value = serde_json::to_value(&game).unwrap();

    assert_eq!(value["phase"], "place_tile");
    assert_eq!(value["current_tile_id"], "T_R1C2");
    assert_eq!(value["current_tile_orientation"], 0);
    assert_eq!(value["board"]["tiles"][0]["tile_id"], "T_R3C4");
    assert!(value["event_log"].is_array());
    assert_eq!(value["players"][0]["meeples_available"], 7);
}
