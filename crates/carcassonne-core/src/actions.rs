//! Game actions that players can take.
//!
//! This module defines all possible actions in the game and the events
//! that result from those actions, plus the bounded log that keeps the
//! most recent events on the game state.

use crate::catalog::TileId;
use crate::coords::{Coordinate, Orientation};
use crate::meeple::{MeepleKind, MeeplePlacement};
use crate::player::PlayerId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Events kept on the game state; older ones are dropped
pub const EVENT_LOG_CAPACITY: usize = 24;

/// All possible actions a player can take
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameAction {
    // ==================== Draw Phase ====================
    /// Draw the next tile from the deck
    DrawTile { player_id: PlayerId },
    /// Pick any tile left in the deck (sandbox mode only)
    DrawSandboxTile { player_id: PlayerId, tile_id: TileId },

    // ==================== Tile Phase ====================
    /// Rotate the drawn tile before placing it
    SetTileOrientation {
        player_id: PlayerId,
        orientation: Orientation,
    },
    /// Put the drawn tile on the board
    PlaceTile {
        player_id: PlayerId,
        tile_id: TileId,
        position: Coordinate,
        orientation: Orientation,
    },

    // ==================== Meeple Phase ====================
    /// Put a meeple on a feature of the tile just placed
    PlaceMeeple {
        player_id: PlayerId,
        placement: MeeplePlacement,
        #[serde(default)]
        kind: MeepleKind,
    },
    /// End the turn without placing a meeple
    SkipMeeple { player_id: PlayerId },
    /// Recall the abbot instead of placing a meeple, scoring its feature
    ReturnAbbot { player_id: PlayerId },
}

impl GameAction {
    /// Player taking the action
    pub fn player_id(&self) -> &str {
        match self {
            GameAction::DrawTile { player_id }
            | GameAction::DrawSandboxTile { player_id, .. }
            | GameAction::SetTileOrientation { player_id, .. }
            | GameAction::PlaceTile { player_id, .. }
            | GameAction::PlaceMeeple { player_id, .. }
            | GameAction::SkipMeeple { player_id }
            | GameAction::ReturnAbbot { player_id } => player_id,
        }
    }

    /// Snake-case action name, as it appears in the `type` tag
    pub fn name(&self) -> &'static str {
        match self {
            GameAction::DrawTile { .. } => "draw_tile",
            GameAction::DrawSandboxTile { .. } => "draw_sandbox_tile",
            GameAction::SetTileOrientation { .. } => "set_tile_orientation",
            GameAction::PlaceTile { .. } => "place_tile",
            GameAction::PlaceMeeple { .. } => "place_meeple",
            GameAction::SkipMeeple { .. } => "skip_meeple",
            GameAction::ReturnAbbot { .. } => "return_abbot",
        }
    }
}

/// What happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameEventKind {
    GameStarted,
    TileDrawn,
    /// A drawn tile had nowhere to go
    TileDiscarded,
    TilePlaced,
    MeeplePlaced,
    MeepleSkipped,
    AbbotReturned,
    /// A closed feature paid out during play
    FeatureScored,
    /// An occupied feature paid out at game end
    FinalScored,
    GameOver,
}

/// One entry in the event log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub turn: u32,
    pub kind: GameEventKind,
    pub player_id: Option<PlayerId>,
    /// Human-readable description
    pub detail: String,
    /// Position in the game's full event history, starting at 0
    pub sequence: u64,
}

/// Most recent events of a game, oldest first.
///
/// Serialized as a plain list; a longer list loads as its newest entries.
/// Sequence numbers keep counting past dropped entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<GameEvent>", into = "Vec<GameEvent>")]
pub struct EventLog {
    entries: VecDeque<GameEvent>,
}

impl From<Vec<GameEvent>> for EventLog {
    fn from(events: Vec<GameEvent>) -> Self {
        let skip = events.len().saturating_sub(EVENT_LOG_CAPACITY);
        Self {
            entries: events.into_iter().skip(skip).collect(),
        }
    }
}

impl From<EventLog> for Vec<GameEvent> {
    fn from(log: EventLog) -> Self {
        log.entries.into()
    }
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event, dropping the oldest beyond capacity
    pub fn push(
        &mut self,
        turn: u32,
        kind: GameEventKind,
        player_id: Option<&str>,
        detail: impl Into<String>,
    ) -> &GameEvent {
        let sequence = self.next_sequence();
        while self.entries.len() >= EVENT_LOG_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(GameEvent {
            turn,
            kind,
            player_id: player_id.map(str::to_string),
            detail: detail.into(),
            sequence,
        });
        &self.entries[self.entries.len() - 1]
    }

    /// Sequence number the next event will get
    pub fn next_sequence(&self) -> u64 {
        self.entries.back().map_or(0, |e| e.sequence + 1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&GameEvent> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Events with a sequence number of at least `sequence`
    pub fn since(&self, sequence: u64) -> impl Iterator<Item = &GameEvent> {
        self.entries.iter().filter(move |e| e.sequence >= sequence)
    }
}
