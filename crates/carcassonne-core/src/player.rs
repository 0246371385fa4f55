//! Player state and worker pools.
//!
//! This module contains:
//! - PlayerColor for UI rendering
//! - PlayerState with score and the three meeple pools (normal, big, abbot)

use crate::catalog::Addon;
use crate::meeple::MeepleKind;
use serde::{Deserialize, Serialize};

/// Player identifier, chosen by the host
pub type PlayerId = String;

/// Normal meeples each player starts with
pub const STARTING_MEEPLES: u32 = 7;

/// Player color for UI rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerColor {
    Red,
    Blue,
    Yellow,
    Green,
    Black,
    Pink,
}

impl PlayerColor {
    /// Get color for a seat index
    pub fn for_seat(seat: usize) -> Self {
        match seat % 6 {
            0 => PlayerColor::Red,
            1 => PlayerColor::Blue,
            2 => PlayerColor::Yellow,
            3 => PlayerColor::Green,
            4 => PlayerColor::Black,
            _ => PlayerColor::Pink,
        }
    }

    /// Get hex color code for rendering
    pub fn hex_code(&self) -> u32 {
        match self {
            PlayerColor::Red => 0xE74C3C,
            PlayerColor::Blue => 0x3498DB,
            PlayerColor::Yellow => 0xF1C40F,
            PlayerColor::Green => 0x27AE60,
            PlayerColor::Black => 0x2C3E50,
            PlayerColor::Pink => 0xE91E8C,
        }
    }
}

/// A single player's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: PlayerId,
    /// Display name
    pub name: String,
    pub color: PlayerColor,
    /// Normal meeples in supply
    pub meeples_available: u32,
    /// Big meeple in supply (Inns & Cathedrals)
    pub big_meeple_available: bool,
    /// Abbot in supply (Abbot add-on)
    pub abbot_available: bool,
    pub score: u32,
}

impl PlayerState {
    /// Create a new player with a full supply for the enabled add-ons
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>, color: PlayerColor, addons: &[Addon]) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color,
            meeples_available: STARTING_MEEPLES,
            big_meeple_available: addons.contains(&Addon::InnsAndCathedrals),
            abbot_available: addons.contains(&Addon::Abbot),
            score: 0,
        }
    }

    /// Whether a meeple of this kind is in supply
    pub fn has_meeple(&self, kind: MeepleKind) -> bool {
        match kind {
            MeepleKind::Normal => self.meeples_available > 0,
            MeepleKind::Big => self.big_meeple_available,
            MeepleKind::Abbot => self.abbot_available,
        }
    }

    /// Take a meeple from supply, returning false if none is left
    pub fn take_meeple(&mut self, kind: MeepleKind) -> bool {
        if !self.has_meeple(kind) {
            return false;
        }
        match kind {
            MeepleKind::Normal => self.meeples_available -= 1,
            MeepleKind::Big => self.big_meeple_available = false,
            MeepleKind::Abbot => self.abbot_available = false,
        }
        true
    }

    /// Put a meeple back into supply
    pub fn return_meeple(&mut self, kind: MeepleKind) {
        match kind {
            MeepleKind::Normal => self.meeples_available += 1,
            MeepleKind::Big => self.big_meeple_available = true,
            MeepleKind::Abbot => self.abbot_available = true,
        }
    }

    pub fn add_score(&mut self, points: u32) {
        self.score += points;
    }
}
