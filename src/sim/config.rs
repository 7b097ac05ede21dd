//! World configuration
//!
//! Runtime physics/world parameters. Persisted with the game state so a
//! continued run keeps the world it started with.

use serde::{Deserialize, Serialize};

use crate::consts::{GRAVITY_Y, WORLD_HEIGHT, WORLD_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// World width in pixels
    pub width: f32,
    /// World height in pixels
    pub height: f32,
    /// Downward acceleration (pixels/s²)
    pub gravity_y: f32,
    /// Draw body outlines
    #[serde(default)]
    pub debug: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            gravity_y: GRAVITY_Y,
            debug: false,
        }
    }
}

impl WorldConfig {
    /// Horizontal midpoint, used to bias bomb spawns away from the player
    pub fn mid_x(&self) -> f32 {
        self.width / 2.0
    }
}
