//! WebAssembly bindings for the rules engine.
//!
//! This module exposes the game engine to JavaScript through wasm-bindgen.
//! Everything crosses the boundary as JSON in the serde shapes of the core
//! types.

use wasm_bindgen::prelude::*;

use crate::actions::GameAction;
use crate::catalog::TileCatalog;
use crate::coords::{Coordinate, Orientation};
use crate::game::{create_game, GameSetup, GameState};
use crate::meeple::{legal_meeple_placements_for_kind, MeepleKind};
use crate::placement::{is_tile_placement_valid_for_state, legal_tile_placements_for_state};
use serde::Serialize;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn to_json<T: Serialize + ?Sized>(value: &T, fallback: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| fallback.to_string())
}

/// WASM-exposed game wrapper
#[wasm_bindgen]
pub struct WasmGame {
    catalog: TileCatalog,
    state: GameState,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a new game from a `GameSetup` JSON document
    #[wasm_bindgen(constructor)]
    pub fn new(setup_json: &str) -> Result<WasmGame, JsValue> {
        Self::start(TileCatalog::standard(), setup_json)
    }

    /// Create a new game over a caller-supplied tile catalog (a JSON array of entries)
    #[wasm_bindgen(js_name = withCatalog)]
    pub fn with_catalog(setup_json: &str, catalog_json: &str) -> Result<WasmGame, JsValue> {
        let catalog: TileCatalog = serde_json::from_str(catalog_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid catalog: {}", e)))?;
        Self::start(catalog, setup_json)
    }

    fn start(catalog: TileCatalog, setup_json: &str) -> Result<WasmGame, JsValue> {
        let setup: GameSetup = serde_json::from_str(setup_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid setup: {}", e)))?;
        let state = create_game(&catalog, setup).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WasmGame { catalog, state })
    }

    /// Get the current game state as JSON
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        to_json(&self.state, "{}")
    }

    /// Get the active player's id
    #[wasm_bindgen(js_name = getActivePlayer)]
    pub fn get_active_player(&self) -> Option<String> {
        self.state.active_player().map(|p| p.id.clone())
    }

    /// Get valid actions for a player as JSON array
    #[wasm_bindgen(js_name = getValidActions)]
    pub fn get_valid_actions(&self, player_id: &str) -> String {
        to_json(&self.state.valid_actions(&self.catalog, player_id), "[]")
    }

    /// Apply an action from JSON. On success the new state replaces the old one
    /// and its recent events are returned as JSON.
    #[wasm_bindgen(js_name = applyAction)]
    pub fn apply_action(&mut self, action_json: &str) -> Result<String, JsValue> {
        let action: GameAction = serde_json::from_str(action_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid action JSON: {}", e)))?;

        let since = self.state.event_log.next_sequence();
        match self.state.apply_action(&self.catalog, action) {
            Ok(next) => {
                self.state = next;
                let events: Vec<_> = self.state.event_log.since(since).collect();
                Ok(to_json(&events, "[]"))
            }
            Err(e) => Err(JsValue::from_str(&e.to_string())),
        }
    }

    /// Legal placements for a tile as JSON, honoring the river rules
    #[wasm_bindgen(js_name = getLegalTilePlacements)]
    pub fn get_legal_tile_placements(&self, tile_id: &str) -> String {
        to_json(&legal_tile_placements_for_state(&self.catalog, &self.state, tile_id), "[]")
    }

    /// Legal meeple targets as JSON; kind is "normal", "big" or "abbot"
    #[wasm_bindgen(js_name = getLegalMeeplePlacements)]
    pub fn get_legal_meeple_placements(&self, kind: &str) -> String {
        let kind = match kind {
            "big" => MeepleKind::Big,
            "abbot" => MeepleKind::Abbot,
            _ => MeepleKind::Normal,
        };
        to_json(&legal_meeple_placements_for_kind(&self.catalog, &self.state, kind), "[]")
    }

    /// Whether the drawn tile fits at a cell in an orientation
    #[wasm_bindgen(js_name = canPlaceCurrentTile)]
    pub fn can_place_current_tile(&self, x: i32, y: i32, degrees: u16) -> bool {
        let (Some(tile_id), Some(orientation)) = (&self.state.current_tile_id, Orientation::from_degrees(degrees))
        else {
            return false;
        };
        is_tile_placement_valid_for_state(&self.catalog, &self.state, tile_id, Coordinate::new(x, y), orientation)
    }

    /// Feature analysis of the board as JSON (for feature counters)
    #[wasm_bindgen(js_name = getFeatureAnalysis)]
    pub fn get_feature_analysis(&self) -> String {
        to_json(&self.state.analyze_features(&self.catalog), "{}")
    }

    /// The tile catalog as JSON (for rendering)
    #[wasm_bindgen(js_name = getCatalog)]
    pub fn get_catalog(&self) -> String {
        to_json(&self.catalog, "[]")
    }

    /// Check if the game is finished
    #[wasm_bindgen(js_name = isFinished)]
    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Get the current phase as a string
    #[wasm_bindgen(js_name = getPhase)]
    pub fn get_phase(&self) -> String {
        self.state.phase.to_string()
    }

    /// Get a specific player's state as JSON
    #[wasm_bindgen(js_name = getPlayer)]
    pub fn get_player(&self, player_id: &str) -> String {
        match self.state.player(player_id) {
            Some(p) => to_json(p, "{}"),
            None => "null".to_string(),
        }
    }
}
