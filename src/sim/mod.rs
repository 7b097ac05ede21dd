//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod anim;
pub mod body;
pub mod config;
pub mod level;
pub mod state;
pub mod tick;

pub use anim::{AnimKey, AnimPlayer, Animation, Repeat};
pub use body::{Aabb, Body, Touching};
pub use config::WorldConfig;
pub use level::create_level;
pub use state::{Bomb, GameEvent, GamePhase, GameState, Platform, Player, RngState, Star};
pub use tick::{TickInput, tick};
