//! Carcassonne Core - rules engine for a Carcassonne-style tile placement game
//!
//! This crate provides the core game logic, including:
//! - Square grid coordinates, tile rotation and the tile catalog
//! - Edge matching and River II continuity for tile placement
//! - Connected feature analysis (cities, roads, farms, monasteries, gardens)
//! - Meeple placement rules and scoring
//! - Game state machine with full rule enforcement
//!
//! # Architecture
//!
//! The engine is pure and synchronous: every operation takes an immutable
//! snapshot and returns a new one. It can be compiled to:
//! - Native Rust for server-side game hosting
//! - WebAssembly for client-side play
//!
//! Logging goes through `tracing`; hosts install their own subscriber.
//!
//! # Modules
//!
//! - [`coords`]: Grid cells, edges, corners and orientations
//! - [`catalog`]: Static tile definitions and deck building
//! - [`tile`]: Tile definitions rotated into place
//! - [`board`]: Placed tiles
//! - [`placement`] and [`river`]: Tile placement legality
//! - [`features`]: Connected feature components
//! - [`meeple`]: Meeple kinds and placement legality
//! - [`scoring`]: Completed, final and abbot scoring
//! - [`game`]: Game state machine

pub mod actions;
pub mod board;
pub mod catalog;
pub mod coords;
pub mod features;
pub mod game;
pub mod meeple;
pub mod placement;
pub mod player;
pub mod river;
pub mod scoring;
pub mod tile;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use actions::{EventLog, GameAction, GameEvent, GameEventKind, EVENT_LOG_CAPACITY};
pub use board::{BoardBounds, BoardState, PlacedTile};
pub use catalog::{Addon, EdgeType, TileCatalog, TileCatalogEntry, TileId};
pub use coords::{Coordinate, Corner, Direction, Orientation};
pub use features::{
    analyze_board_features, is_connected_feature_occupied, BoardFeatureAnalysis, FeatureComponent, FeatureKey,
    FeatureSummary,
};
pub use game::{create_game, GameError, GameMode, GamePhase, GameSetup, GameState, GameStatus, PlayerSetup};
pub use meeple::{
    is_meeple_placement_valid, legal_meeple_placements, legal_meeple_placements_for_kind, MeepleKind,
    MeeplePlacement, PlacedMeeple,
};
pub use placement::{
    is_tile_placement_valid, is_tile_placement_valid_for_state, legal_tile_placements,
    legal_tile_placements_for_state, TilePlacement,
};
pub use player::{PlayerColor, PlayerId, PlayerState, STARTING_MEEPLES};
pub use river::{open_river_endpoints, RiverEndpoint, RiverTurn};
pub use scoring::{resolve_completed_feature_scoring, resolve_final_scoring, score_abbot_return, ScoringOutcome};
pub use tile::{oriented_tile_definition, FeatureType, OrientedTileDefinition};
