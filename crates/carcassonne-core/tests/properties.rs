//! Property tests over randomly grown boards and randomly played games.

use carcassonne_core::*;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Grow a base-game board by dropping random tiles on random legal spots
fn grow_board(catalog: &TileCatalog, seed: u64, tiles: usize) -> BoardState {
    let mut rng = StdRng::seed_from_u64(seed);
    let ids: Vec<&str> = catalog
        .entries()
        .iter()
        .filter(|e| catalog.is_enabled(&e.id, &[]))
        .map(|e| e.id.as_str())
        .collect();

    let mut board = BoardState::with_starting_tile(catalog::BASE_STARTING_TILE_ID);
    for _ in 0..tiles {
        let id = ids[rng.gen_range(0..ids.len())];
        if let Some(spot) = legal_tile_placements(catalog, &board, id).choose(&mut rng) {
            board = board.with_tile(PlacedTile::new(id, spot.position, spot.orientation));
        }
    }
    board
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_legal_placements_match_every_neighbor(seed in any::<u64>(), tiles in 0usize..25, pick in any::<prop::sample::Index>()) {
        let catalog = TileCatalog::standard();
        let board = grow_board(&catalog, seed, tiles);
        let entries = catalog.entries();
        let tile_id = entries[pick.index(entries.len())].id.clone();

        for spot in legal_tile_placements(&catalog, &board, &tile_id) {
            prop_assert!(is_tile_placement_valid(&catalog, &board, &tile_id, spot.position, spot.orientation));
            prop_assert!(!board.is_occupied(&spot.position));

            let def = oriented_tile_definition(&catalog, &tile_id, spot.orientation).unwrap();
            let mut touching = 0;
            for (direction, neighbor) in board.neighbors(spot.position) {
                let other = neighbor.definition(&catalog).unwrap();
                prop_assert_eq!(def.edge(direction), other.edge(direction.opposite()));
                touching += 1;
            }
            prop_assert!(touching > 0);
        }
    }

    #[test]
    fn prop_analysis_partitions_every_feature(seed in any::<u64>(), tiles in 0usize..30) {
        let catalog = TileCatalog::standard();
        let board = grow_board(&catalog, seed, tiles);
        let analysis = analyze_board_features(&catalog, &board);

        prop_assert_eq!(analysis.component_by_feature_key.len(), analysis.nodes.len());
        let mut seen = 0;
        for (id, component) in analysis.components.iter().enumerate() {
            prop_assert_eq!(component.id, id);
            prop_assert!(!component.feature_keys.is_empty());
            for key in &component.feature_keys {
                prop_assert_eq!(key.feature_type, component.feature_type);
                prop_assert_eq!(analysis.component_by_feature_key.get(key), Some(&id));
            }
            seen += component.feature_keys.len();
        }
        prop_assert_eq!(seen, analysis.nodes.len());

        let summary = &analysis.summary;
        for counts in [&summary.cities, &summary.roads] {
            prop_assert_eq!(counts.open + counts.closed, counts.total);
        }

        // Same board, same answer
        prop_assert_eq!(analyze_board_features(&catalog, &board), analysis);
    }

    #[test]
    fn prop_random_games_keep_meeples_and_scores_consistent(seed in any::<u64>(), choices in any::<u64>()) {
        let catalog = TileCatalog::standard();
        let setup = GameSetup::standard(
            vec![PlayerSetup::new("a", "A"), PlayerSetup::new("b", "B")],
            vec![Addon::InnsAndCathedrals, Addon::Abbot],
            seed,
        );
        let mut game = create_game(&catalog, setup).unwrap();
        let mut rng = StdRng::seed_from_u64(choices);

        // A partial game keeps the case fast
        for _ in 0..60 {
            if game.is_finished() {
                break;
            }
            let player = game.active_player().unwrap().id.clone();
            let actions = game.valid_actions(&catalog, &player);
            let action = actions.choose(&mut rng).unwrap().clone();
            let before: Vec<u32> = game.players.iter().map(|p| p.score).collect();
            game = game.apply_action(&catalog, action).unwrap();

            for (player, old) in game.players.iter().zip(before) {
                prop_assert!(player.score >= old);
                let standing = game
                    .meeples
                    .iter()
                    .filter(|m| m.player_id == player.id && m.kind == MeepleKind::Normal)
                    .count() as u32;
                prop_assert_eq!(player.meeples_available + standing, STARTING_MEEPLES);
            }
            prop_assert!(game.event_log.len() <= EVENT_LOG_CAPACITY);
        }
    }

    #[test]
    fn prop_seeded_decks_are_reproducible(seed in any::<u64>()) {
        let catalog = TileCatalog::standard();
        let addons = [Addon::River, Addon::Abbot];
        let a = catalog.build_deck(&addons, catalog::RIVER_SPRING_TILE_ID, seed);
        let b = catalog.build_deck(&addons, catalog::RIVER_SPRING_TILE_ID, seed);
        prop_assert_eq!(&a, &b);

        // River tiles come first and the lake closes them
        let is_river = |id: &TileId| catalog.get(id).is_some_and(|e| e.has_river());
        let river_len = a.iter().take_while(|id| is_river(id)).count();
        prop_assert!(river_len > 0);
        prop_assert!(!a[river_len..].iter().any(|id| is_river(id)));
        prop_assert_eq!(a[river_len - 1].as_str(), catalog::RIVER_LAKE_TILE_ID);
    }
}
