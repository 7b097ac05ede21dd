//! Save/continue persistence
//!
//! Features:
//! - Versioned JSON envelope
//! - Validation of the decoded state before it is handed back
//! - Store-agnostic save/load/clear helpers

pub mod envelope;

pub use envelope::{
    PersistenceError, SAVE_KEY, SAVE_VERSION, SaveEnvelope, SaveGuard, clear_game, decode, encode,
    load_game, save_game,
};
