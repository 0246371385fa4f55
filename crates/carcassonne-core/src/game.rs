//! Core game state machine.
//!
//! This module contains the `GameState` snapshot and all turn logic. A turn
//! runs `draw_tile -> place_tile -> place_meeple`, then completed features
//! are scored and play passes on. When the deck runs out the game moves
//! through final scoring to `game_over`.
//!
//! `apply_action` never mutates its receiver: it validates against the
//! current snapshot and returns the next one.

use crate::actions::{EventLog, GameAction, GameEventKind};
use crate::board::{BoardState, PlacedTile};
use crate::catalog::{Addon, TileCatalog, TileId};
use crate::coords::{Coordinate, Orientation};
use crate::features::{analyze_board_features, is_connected_feature_occupied, BoardFeatureAnalysis};
use crate::meeple::{
    is_meeple_placement_valid_for_kind, legal_meeple_placements_for_kind, MeepleKind, MeeplePlacement, PlacedMeeple,
};
use crate::placement::{check_tile_placement_for_state, legal_tile_placements_for_state, PlacementViolation, TilePlacement};
use crate::player::{PlayerColor, PlayerId, PlayerState};
use crate::river::RiverViolation;
use crate::scoring::{
    resolve_completed_feature_scoring, resolve_final_scoring, score_abbot_return, ScoreAward, ScoringOutcome,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

/// Rule set a game runs under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    #[default]
    Standard,
    /// Free tile choice, river continuity not enforced
    Sandbox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Waiting,
    Active,
    Finished,
}

/// Game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Setup,
    /// Active player must draw
    DrawTile,
    /// Active player holds a tile and must place it
    PlaceTile,
    /// Active player may put a meeple on the tile just placed
    PlaceMeeple,
    /// Final scoring in progress; never observed between actions
    Scoring,
    GameOver,
}

impl GamePhase {
    pub const fn as_str(self) -> &'static str {
        match self {
            GamePhase::Setup => "setup",
            GamePhase::DrawTile => "draw_tile",
            GamePhase::PlaceTile => "place_tile",
            GamePhase::PlaceMeeple => "place_meeple",
            GamePhase::Scoring => "scoring",
            GamePhase::GameOver => "game_over",
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur when creating a game or applying actions
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Game is over")]
    GameOver,

    #[error("Cannot {action} during the {phase} phase")]
    InvalidPhase { action: String, phase: GamePhase },

    #[error("Not your turn")]
    NotYourTurn,

    #[error("No tile has been drawn")]
    NoTileDrawn,

    #[error("Tile {placed} is not the drawn tile {drawn}")]
    TileMismatch { drawn: TileId, placed: TileId },

    #[error("Illegal tile placement: {0}")]
    IllegalPlacement(PlacementViolation),

    #[error("River rule violated: {0}")]
    RiverViolation(RiverViolation),

    #[error("No meeples remaining")]
    NoMeeplesRemaining,

    #[error("Big meeple is not available")]
    BigMeepleUnavailable,

    #[error("Abbot is not available")]
    AbbotUnavailable,

    #[error("No abbot on the board")]
    NoAbbotOnBoard,

    #[error("A {kind:?} meeple cannot go on that feature")]
    InvalidMeepleTarget { kind: MeepleKind },

    #[error("That feature is already occupied")]
    FeatureOccupied,

    #[error("Only available in sandbox mode")]
    SandboxOnly,

    #[error("Tile {0} is not in the deck")]
    SandboxTileUnavailable(TileId),

    #[error("Invalid setup: {0}")]
    InvalidSetup(String),

    #[error("Unknown tile {0}")]
    UnknownTile(TileId),

    #[error("Unknown player {0}")]
    UnknownPlayer(PlayerId),
}

fn missing_meeple(kind: MeepleKind) -> GameError {
    match kind {
        MeepleKind::Normal => GameError::NoMeeplesRemaining,
        MeepleKind::Big => GameError::BigMeepleUnavailable,
        MeepleKind::Abbot => GameError::AbbotUnavailable,
    }
}

impl From<PlacementViolation> for GameError {
    fn from(violation: PlacementViolation) -> Self {
        match violation {
            PlacementViolation::River(river) => GameError::RiverViolation(river),
            other => GameError::IllegalPlacement(other),
        }
    }
}

/// A seat at the table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSetup {
    pub id: PlayerId,
    pub name: String,
    /// Defaults to the seat color
    #[serde(default)]
    pub color: Option<PlayerColor>,
}

impl PlayerSetup {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: None,
        }
    }
}

/// Everything needed to start a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSetup {
    #[serde(default)]
    pub game_id: String,
    pub players: Vec<PlayerSetup>,
    #[serde(default)]
    pub mode: GameMode,
    #[serde(default)]
    pub addons: Vec<Addon>,
    /// Defaults to the River II spring with the river add-on, else the base start tile
    #[serde(default)]
    pub starting_tile_id: Option<TileId>,
    /// Draw pile, front first
    #[serde(default)]
    pub tile_deck: Vec<TileId>,
    /// Carried for hosts that run turn timers
    #[serde(default)]
    pub turn_timer_seconds: Option<u32>,
    #[serde(default)]
    pub seed: u64,
}

impl GameSetup {
    /// A standard-mode setup with an explicit draw pile
    pub fn new(players: Vec<PlayerSetup>, tile_deck: Vec<TileId>) -> Self {
        Self {
            game_id: String::new(),
            players,
            mode: GameMode::Standard,
            addons: Vec::new(),
            starting_tile_id: None,
            tile_deck,
            turn_timer_seconds: None,
            seed: 0,
        }
    }

    /// A setup with a full shuffled deck from the built-in catalog
    pub fn standard(players: Vec<PlayerSetup>, addons: Vec<Addon>, seed: u64) -> Self {
        Self::from_catalog(&TileCatalog::standard(), players, addons, seed)
    }

    /// A setup with a full shuffled deck from the given catalog
    pub fn from_catalog(catalog: &TileCatalog, players: Vec<PlayerSetup>, addons: Vec<Addon>, seed: u64) -> Self {
        let starting_tile = TileCatalog::default_starting_tile(&addons);
        let tile_deck = catalog.build_deck(&addons, starting_tile, seed);
        Self {
            starting_tile_id: Some(starting_tile.to_string()),
            addons,
            seed,
            ..Self::new(players, tile_deck)
        }
    }

    pub fn with_mode(mut self, mode: GameMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_addons(mut self, addons: Vec<Addon>) -> Self {
        self.addons = addons;
        self
    }

    pub fn with_starting_tile(mut self, tile_id: impl Into<TileId>) -> Self {
        self.starting_tile_id = Some(tile_id.into());
        self
    }

    pub fn with_game_id(mut self, game_id: impl Into<String>) -> Self {
        self.game_id = game_id.into();
        self
    }

    pub fn with_turn_timer(mut self, seconds: u32) -> Self {
        self.turn_timer_seconds = Some(seconds);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// The complete game state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub game_id: String,
    pub mode: GameMode,
    pub addons: Vec<Addon>,
    pub status: GameStatus,
    pub phase: GamePhase,
    /// Players in seat order
    pub players: Vec<PlayerState>,
    pub active_player_index: usize,
    pub board: BoardState,
    /// Draw pile, front first
    pub tile_deck: Vec<TileId>,
    /// Drawn tiles that had no legal placement
    pub tile_discard: Vec<TileId>,
    /// Tile drawn this turn
    pub current_tile_id: Option<TileId>,
    /// Rotation chosen for the drawn tile
    pub current_tile_orientation: Orientation,
    /// Tile placed this turn, the only valid meeple target
    pub last_placed_tile: Option<PlacedTile>,
    pub meeples: Vec<PlacedMeeple>,
    pub event_log: EventLog,
    /// Turn number (starts at 1)
    pub turn_number: u32,
    pub turn_timer_seconds: Option<u32>,
    /// Seed the deck was shuffled with (for deterministic replays)
    pub seed: u64,
}

/// Start a game: starting tile at the origin, first player to draw
pub fn create_game(catalog: &TileCatalog, setup: GameSetup) -> Result<GameState, GameError> {
    if setup.players.is_empty() {
        return Err(GameError::InvalidSetup("at least one player is required".into()));
    }
    let mut seen = HashSet::new();
    for player in &setup.players {
        if player.id.is_empty() {
            return Err(GameError::InvalidSetup("player ids must not be empty".into()));
        }
        if !seen.insert(player.id.as_str()) {
            return Err(GameError::InvalidSetup(format!("duplicate player id {}", player.id)));
        }
    }

    let mut addons: Vec<Addon> = Vec::with_capacity(setup.addons.len());
    for addon in setup.addons {
        if !addons.contains(&addon) {
            addons.push(addon);
        }
    }

    let starting_tile = setup
        .starting_tile_id
        .unwrap_or_else(|| TileCatalog::default_starting_tile(&addons).to_string());
    if !catalog.contains(&starting_tile) {
        return Err(GameError::UnknownTile(starting_tile));
    }
    if let Some(unknown) = setup.tile_deck.iter().find(|id| !catalog.contains(id)) {
        return Err(GameError::UnknownTile(unknown.clone()));
    }

    let players: Vec<PlayerState> = setup
        .players
        .into_iter()
        .enumerate()
        .map(|(seat, p)| {
            let color = p.color.unwrap_or_else(|| PlayerColor::for_seat(seat));
            PlayerState::new(p.id, p.name, color, &addons)
        })
        .collect();

    let mut state = GameState {
        game_id: setup.game_id,
        mode: setup.mode,
        addons,
        status: GameStatus::Active,
        phase: GamePhase::DrawTile,
        players,
        active_player_index: 0,
        board: BoardState::with_starting_tile(starting_tile.clone()),
        tile_deck: setup.tile_deck,
        tile_discard: Vec::new(),
        current_tile_id: None,
        current_tile_orientation: Orientation::Deg0,
        last_placed_tile: None,
        meeples: Vec::new(),
        event_log: EventLog::new(),
        turn_number: 1,
        turn_timer_seconds: setup.turn_timer_seconds,
        seed: setup.seed,
    };

    let names: Vec<&str> = state.players.iter().map(|p| p.name.as_str()).collect();
    let detail = format!("Game started with {} from {}", names.join(", "), starting_tile);
    state.log(GameEventKind::GameStarted, None, detail);

    info!(
        game_id = %state.game_id,
        players = state.players.len(),
        deck = state.tile_deck.len(),
        mode = ?state.mode,
        "game started"
    );
    Ok(state)
}

impl GameState {
    /// Get the number of players
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Player whose turn it is
    pub fn active_player(&self) -> Option<&PlayerState> {
        self.players.get(self.active_player_index)
    }

    /// Get a player by ID
    pub fn player(&self, id: &str) -> Option<&PlayerState> {
        self.players.iter().find(|p| p.id == id)
    }

    fn player_mut(&mut self, id: &str) -> Option<&mut PlayerState> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Check if the game is finished
    pub fn is_finished(&self) -> bool {
        self.status == GameStatus::Finished
    }

    /// Tiles left to draw
    pub fn remaining_tiles(&self) -> usize {
        self.tile_deck.len()
    }

    /// Players sharing the top score, in seat order
    pub fn leaders(&self) -> Vec<&PlayerState> {
        let Some(best) = self.players.iter().map(|p| p.score).max() else {
            return Vec::new();
        };
        self.players.iter().filter(|p| p.score == best).collect()
    }

    /// Connected features of the current board
    pub fn analyze_features(&self, catalog: &TileCatalog) -> BoardFeatureAnalysis {
        analyze_board_features(catalog, &self.board)
    }

    /// Legal placements of the drawn tile, empty when none is drawn
    pub fn current_tile_placements(&self, catalog: &TileCatalog) -> Vec<TilePlacement> {
        match &self.current_tile_id {
            Some(tile_id) => legal_tile_placements_for_state(catalog, self, tile_id),
            None => Vec::new(),
        }
    }

    /// Get all currently valid actions for a player.
    ///
    /// In sandbox mode every distinct tile left in the deck is offered as a draw.
    pub fn valid_actions(&self, catalog: &TileCatalog, player_id: &str) -> Vec<GameAction> {
        let mut actions = Vec::new();
        if self.is_finished() || !self.active_player().is_some_and(|p| p.id == player_id) {
            return actions;
        }

        match self.phase {
            GamePhase::DrawTile => {
                actions.push(GameAction::DrawTile {
                    player_id: player_id.to_string(),
                });
                if self.mode == GameMode::Sandbox {
                    let mut offered: Vec<&TileId> = Vec::new();
                    for tile_id in &self.tile_deck {
                        if !offered.contains(&tile_id) {
                            offered.push(tile_id);
                            actions.push(GameAction::DrawSandboxTile {
                                player_id: player_id.to_string(),
                                tile_id: tile_id.clone(),
                            });
                        }
                    }
                }
            }
            GamePhase::PlaceTile => {
                let Some(tile_id) = &self.current_tile_id else {
                    return actions;
                };
                for placement in self.current_tile_placements(catalog) {
                    actions.push(GameAction::PlaceTile {
                        player_id: player_id.to_string(),
                        tile_id: tile_id.clone(),
                        position: placement.position,
                        orientation: placement.orientation,
                    });
                }
            }
            GamePhase::PlaceMeeple => {
                for kind in [MeepleKind::Normal, MeepleKind::Big, MeepleKind::Abbot] {
                    for placement in legal_meeple_placements_for_kind(catalog, self, kind) {
                        actions.push(GameAction::PlaceMeeple {
                            player_id: player_id.to_string(),
                            placement,
                            kind,
                        });
                    }
                }
                if self
                    .meeples
                    .iter()
                    .any(|m| m.player_id == player_id && m.kind == MeepleKind::Abbot)
                {
                    actions.push(GameAction::ReturnAbbot {
                        player_id: player_id.to_string(),
                    });
                }
                actions.push(GameAction::SkipMeeple {
                    player_id: player_id.to_string(),
                });
            }
            GamePhase::Setup | GamePhase::Scoring | GamePhase::GameOver => {}
        }
        actions
    }

    /// Apply an action, returning the next state
    pub fn apply_action(&self, catalog: &TileCatalog, action: GameAction) -> Result<GameState, GameError> {
        // Check game not over
        if self.is_finished() || self.phase == GamePhase::GameOver {
            return Err(GameError::GameOver);
        }

        let required = match action {
            GameAction::DrawTile { .. } | GameAction::DrawSandboxTile { .. } => GamePhase::DrawTile,
            GameAction::SetTileOrientation { .. } | GameAction::PlaceTile { .. } => GamePhase::PlaceTile,
            GameAction::PlaceMeeple { .. } | GameAction::SkipMeeple { .. } | GameAction::ReturnAbbot { .. } => {
                GamePhase::PlaceMeeple
            }
        };
        if self.phase != required {
            return Err(GameError::InvalidPhase {
                action: action.name().to_string(),
                phase: self.phase,
            });
        }

        let actor = action.player_id().to_string();
        if self.player(&actor).is_none() {
            return Err(GameError::UnknownPlayer(actor));
        }
        if !self.active_player().is_some_and(|p| p.id == actor) {
            return Err(GameError::NotYourTurn);
        }

        let name = action.name();
        let mut next = self.clone();
        match action {
            // ==================== Draw Phase ====================
            GameAction::DrawTile { .. } => next.draw_tile(catalog),

            GameAction::DrawSandboxTile { tile_id, .. } => {
                if next.mode != GameMode::Sandbox {
                    return Err(GameError::SandboxOnly);
                }
                if next.tile_deck.is_empty() {
                    next.finish_game(catalog);
                } else {
                    let index = next
                        .tile_deck
                        .iter()
                        .position(|id| *id == tile_id)
                        .ok_or(GameError::SandboxTileUnavailable(tile_id))?;
                    let tile_id = next.tile_deck.remove(index);
                    next.receive_tile(catalog, tile_id);
                }
            }

            // ==================== Tile Phase ====================
            GameAction::SetTileOrientation { orientation, .. } => {
                if next.current_tile_id.is_none() {
                    return Err(GameError::NoTileDrawn);
                }
                next.current_tile_orientation = orientation;
            }

            GameAction::PlaceTile {
                player_id,
                tile_id,
                position,
                orientation,
            } => next.place_tile(catalog, &player_id, tile_id, position, orientation)?,

            // ==================== Meeple Phase ====================
            GameAction::PlaceMeeple {
                player_id,
                placement,
                kind,
            } => {
                next.place_meeple(catalog, &player_id, placement, kind)?;
                next.end_turn(catalog);
            }

            GameAction::SkipMeeple { player_id } => {
                let detail = format!("{} placed no meeple", next.display_name(&player_id));
                next.log(GameEventKind::MeepleSkipped, Some(&player_id), detail);
                next.end_turn(catalog);
            }

            GameAction::ReturnAbbot { player_id } => {
                let outcome = score_abbot_return(catalog, &next, &player_id).ok_or(GameError::NoAbbotOnBoard)?;
                next.apply_scoring(outcome, GameEventKind::AbbotReturned);
                next.end_turn(catalog);
            }
        }

        debug!(
            action = name,
            player = %actor,
            phase = %next.phase,
            turn = next.turn_number,
            "applied action"
        );
        Ok(next)
    }

    fn draw_tile(&mut self, catalog: &TileCatalog) {
        if self.tile_deck.is_empty() {
            self.finish_game(catalog);
            return;
        }
        let tile_id = self.tile_deck.remove(0);
        self.receive_tile(catalog, tile_id);
    }

    /// Hand a tile to the active player, discarding it if it fits nowhere
    fn receive_tile(&mut self, catalog: &TileCatalog, tile_id: TileId) {
        let player_id = self.active_player().map(|p| p.id.clone());
        let name = player_id.as_deref().map(|id| self.display_name(id)).unwrap_or_default();

        if legal_tile_placements_for_state(catalog, self, &tile_id).is_empty() {
            let detail = format!("{name} drew {tile_id}, which fits nowhere, and discarded it");
            self.log(GameEventKind::TileDiscarded, player_id.as_deref(), detail);
            debug!(tile = %tile_id, "discarded unplaceable tile");
            self.tile_discard.push(tile_id);
            if self.tile_deck.is_empty() {
                self.finish_game(catalog);
            } else {
                self.advance_turn();
            }
            return;
        }

        let detail = format!("{name} drew {tile_id}");
        self.log(GameEventKind::TileDrawn, player_id.as_deref(), detail);
        self.current_tile_id = Some(tile_id);
        self.current_tile_orientation = Orientation::Deg0;
        self.phase = GamePhase::PlaceTile;
    }

    fn place_tile(
        &mut self,
        catalog: &TileCatalog,
        player_id: &str,
        tile_id: TileId,
        position: Coordinate,
        orientation: Orientation,
    ) -> Result<(), GameError> {
        let drawn = self.current_tile_id.clone().ok_or(GameError::NoTileDrawn)?;
        if drawn != tile_id {
            return Err(GameError::TileMismatch { drawn, placed: tile_id });
        }
        check_tile_placement_for_state(catalog, self, &tile_id, position, orientation)?;

        let tile = PlacedTile::new(tile_id, position, orientation);
        self.board = self.board.with_tile(tile.clone());
        let detail = format!(
            "{} placed {} at {} ({} degrees)",
            self.display_name(player_id),
            tile.tile_id,
            position,
            orientation
        );
        self.log(GameEventKind::TilePlaced, Some(player_id), detail);
        self.last_placed_tile = Some(tile);
        self.current_tile_orientation = orientation;
        self.phase = GamePhase::PlaceMeeple;
        Ok(())
    }

    fn place_meeple(
        &mut self,
        catalog: &TileCatalog,
        player_id: &str,
        placement: MeeplePlacement,
        kind: MeepleKind,
    ) -> Result<(), GameError> {
        let player = self.player(player_id).ok_or_else(|| GameError::UnknownPlayer(player_id.to_string()))?;
        if !player.has_meeple(kind) {
            return Err(missing_meeple(kind));
        }

        if !is_meeple_placement_valid_for_kind(catalog, self, &placement, kind) {
            let on_last_tile = self
                .last_placed_tile
                .as_ref()
                .is_some_and(|t| t.position == placement.tile_position);
            let occupied = on_last_tile
                && kind.targets().contains(&placement.feature_type)
                && is_connected_feature_occupied(catalog, &self.board, &self.meeples, &placement, None);
            return Err(if occupied {
                GameError::FeatureOccupied
            } else {
                GameError::InvalidMeepleTarget { kind }
            });
        }

        if !self.player_mut(player_id).is_some_and(|p| p.take_meeple(kind)) {
            return Err(missing_meeple(kind));
        }
        self.meeples.push(PlacedMeeple::new(placement, player_id, kind));
        let detail = format!(
            "{} placed a {} on {}",
            self.display_name(player_id),
            kind.label(),
            placement.feature_key()
        );
        self.log(GameEventKind::MeeplePlaced, Some(player_id), detail);
        Ok(())
    }

    /// Score closed features, then finish or pass the turn
    fn end_turn(&mut self, catalog: &TileCatalog) {
        let outcome = resolve_completed_feature_scoring(catalog, self);
        self.apply_scoring(outcome, GameEventKind::FeatureScored);

        if self.tile_deck.is_empty() {
            self.finish_game(catalog);
        } else {
            self.advance_turn();
        }
    }

    fn advance_turn(&mut self) {
        if !self.players.is_empty() {
            self.active_player_index = (self.active_player_index + 1) % self.players.len();
        }
        self.phase = GamePhase::DrawTile;
        self.turn_number += 1;
        self.current_tile_id = None;
        self.current_tile_orientation = Orientation::Deg0;
        self.last_placed_tile = None;
    }

    fn finish_game(&mut self, catalog: &TileCatalog) {
        self.phase = GamePhase::Scoring;
        let outcome = resolve_final_scoring(catalog, self);
        self.apply_scoring(outcome, GameEventKind::FinalScored);

        self.status = GameStatus::Finished;
        self.phase = GamePhase::GameOver;
        self.current_tile_id = None;
        self.last_placed_tile = None;

        let scores: Vec<String> = self
            .players
            .iter()
            .map(|p| format!("{} {}", p.name, p.score))
            .collect();
        let detail = format!("Game over. Final scores: {}", scores.join(", "));
        self.log(GameEventKind::GameOver, None, detail);

        info!(
            game_id = %self.game_id,
            turns = self.turn_number,
            leaders = ?self.leaders().iter().map(|p| p.id.as_str()).collect::<Vec<_>>(),
            "game over"
        );
    }

    fn apply_scoring(&mut self, outcome: ScoringOutcome, kind: GameEventKind) {
        self.players = outcome.players;
        self.meeples = outcome.meeples;
        for award in &outcome.events {
            let detail = self.describe_award(award);
            let owner = match award.player_ids.as_slice() {
                [only] => Some(only.clone()),
                _ => None,
            };
            self.log(kind, owner.as_deref(), detail);
        }
    }

    fn describe_award(&self, award: &ScoreAward) -> String {
        let names: Vec<String> = award.player_ids.iter().map(|id| self.display_name(id)).collect();
        let plural = if award.tile_count == 1 { "" } else { "s" };
        format!(
            "{} ({} tile{}) scored {} for {}",
            award.feature_type,
            award.tile_count,
            plural,
            award.points,
            names.join(" and ")
        )
    }

    fn display_name(&self, player_id: &str) -> String {
        self.player(player_id)
            .map_or_else(|| player_id.to_string(), |p| p.name.clone())
    }

    fn log(&mut self, kind: GameEventKind, player_id: Option<&str>, detail: String) {
        self.event_log.push(self.turn_number, kind, player_id, detail);
    }
}
