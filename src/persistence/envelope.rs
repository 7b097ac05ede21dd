//! Versioned save envelope

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{STAR_COUNT, STAR_SCORE};
use crate::platform::KeyValueStore;
use crate::sim::{GamePhase, GameState};

/// Storage key for the in-progress run
pub const SAVE_KEY: &str = "star_hop_save";
/// Current envelope format
pub const SAVE_VERSION: u32 = 1;

#[derive(Debug)]
pub enum PersistenceError {
    /// Not valid JSON or not the expected shape
    Malformed(serde_json::Error),
    /// Written by a different format version
    UnsupportedVersion(u32),
    /// Decoded fine but describes an impossible game
    Invalid(&'static str),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Malformed(e) => write!(f, "malformed save: {}", e),
            PersistenceError::UnsupportedVersion(v) => {
                write!(f, "unsupported save version {} (expected {})", v, SAVE_VERSION)
            }
            PersistenceError::Invalid(why) => write!(f, "invalid save: {}", why),
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistenceError::Malformed(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(e: serde_json::Error) -> Self {
        PersistenceError::Malformed(e)
    }
}

/// What actually goes to storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveEnvelope {
    pub version: u32,
    pub state: GameState,
}

/// Serialize a running game
pub fn encode(state: &GameState) -> Result<String, PersistenceError> {
    let envelope = SaveEnvelope {
        version: SAVE_VERSION,
        state: state.clone(),
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Parse and validate a saved game
pub fn decode(json: &str) -> Result<GameState, PersistenceError> {
    let envelope: SaveEnvelope = serde_json::from_str(json)?;
    if envelope.version != SAVE_VERSION {
        return Err(PersistenceError::UnsupportedVersion(envelope.version));
    }
    validate(&envelope.state)?;
    Ok(envelope.state)
}

fn validate(state: &GameState) -> Result<(), PersistenceError> {
    if state.phase == GamePhase::GameOver {
        return Err(PersistenceError::Invalid("run already ended"));
    }
    if state.score % STAR_SCORE != 0 {
        return Err(PersistenceError::Invalid("score is not a whole number of stars"));
    }
    if state.stars.len() != STAR_COUNT {
        return Err(PersistenceError::Invalid("wrong star count"));
    }
    if state.bombs.len() as u32 > state.rounds_cleared {
        return Err(PersistenceError::Invalid("more bombs than cleared rounds"));
    }
    let world_ok = |v: f32| v.is_finite() && v > 0.0;
    if !world_ok(state.config.width) || !world_ok(state.config.height) {
        return Err(PersistenceError::Invalid("world size must be positive"));
    }
    if !state.config.gravity_y.is_finite() {
        return Err(PersistenceError::Invalid("gravity is not finite"));
    }

    let Some(last_id) = state.last_entity_id() else {
        return Err(PersistenceError::Invalid("no entity ids allocated"));
    };
    let mut ids: Vec<u32> = state
        .platforms
        .iter()
        .map(|p| p.id)
        .chain(state.stars.iter().map(|s| s.id))
        .chain(state.bombs.iter().map(|b| b.id))
        .collect();
    if ids.iter().any(|&id| id == 0 || id > last_id) {
        return Err(PersistenceError::Invalid("entity id out of range"));
    }
    let count = ids.len();
    ids.sort_unstable();
    ids.dedup();
    if ids.len() != count {
        return Err(PersistenceError::Invalid("duplicate entity id"));
    }
    Ok(())
}

/// Save the run to `store`
pub fn save_game(store: &dyn KeyValueStore, state: &GameState) -> Result<(), PersistenceError> {
    let json = encode(state)?;
    if store.set(SAVE_KEY, &json) {
        log::info!("Game saved (score {})", state.score);
    }
    Ok(())
}

/// Keeps a stored run intact while the player is still deciding whether
/// to continue it
#[derive(Debug, Default)]
pub struct SaveGuard {
    offer_pending: bool,
}

impl SaveGuard {
    /// Guard for a session that found `saved` at startup
    pub fn for_saved(saved: Option<&GameState>) -> Self {
        Self {
            offer_pending: saved.is_some(),
        }
    }

    pub fn offer_pending(&self) -> bool {
        self.offer_pending
    }

    /// The player chose Continue or New game
    pub fn resolve(&mut self) {
        self.offer_pending = false;
    }

    /// Save unless an offered run would be overwritten. Returns whether a
    /// save was written.
    pub fn save(&self, store: &dyn KeyValueStore, state: &GameState) -> Result<bool, PersistenceError> {
        if self.offer_pending {
            log::debug!("Save skipped while a stored run is on offer");
            return Ok(false);
        }
        save_game(store, state)?;
        Ok(true)
    }
}

/// Load the saved run, discarding it if it does not validate
pub fn load_game(store: &dyn KeyValueStore) -> Option<GameState> {
    let json = store.get(SAVE_KEY)?;
    match decode(&json) {
        Ok(state) => Some(state),
        Err(e) => {
            log::warn!("Discarding saved game: {}", e);
            store.remove(SAVE_KEY);
            None
        }
    }
}

/// Forget the saved run
pub fn clear_game(store: &dyn KeyValueStore) {
    store.remove(SAVE_KEY);
    log::info!("Saved game cleared");
}
