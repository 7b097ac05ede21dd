//! Star Hop - A small star-collecting platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (arcade bodies, animation, game state)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser/native storage abstraction
//! - `persistence`: Versioned save/continue envelope
//! - `highscores` / `settings`: Persisted player records

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::{Settings, Toggle};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matches the display refresh)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default world dimensions (pixels)
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 600.0;
    /// Default downward gravity (pixels/s²)
    pub const GRAVITY_Y: f32 = 300.0;

    /// Player movement
    pub const PLAYER_SPEED: f32 = 160.0;
    pub const JUMP_VELOCITY: f32 = -330.0;
    pub const PLAYER_BOUNCE: f32 = 0.2;
    pub const PLAYER_START_X: f32 = 100.0;
    pub const PLAYER_START_Y: f32 = 450.0;

    /// Sprite sizes (width, height)
    pub const PLAYER_SIZE: (f32, f32) = (32.0, 48.0);
    pub const STAR_SIZE: (f32, f32) = (24.0, 22.0);
    pub const BOMB_SIZE: (f32, f32) = (14.0, 14.0);
    pub const PLATFORM_SIZE: (f32, f32) = (400.0, 32.0);

    /// Star layout: one row dropped from the top of the world
    pub const STAR_COUNT: usize = 12;
    pub const STAR_START_X: f32 = 12.0;
    pub const STAR_STEP_X: f32 = 70.0;
    pub const STAR_BOUNCE_MIN: f32 = 0.4;
    pub const STAR_BOUNCE_MAX: f32 = 0.8;
    /// Points per collected star
    pub const STAR_SCORE: u32 = 10;

    /// Bomb spawn parameters
    pub const BOMB_SPAWN_Y: f32 = 16.0;
    pub const BOMB_SPEED_X: i32 = 200;
    pub const BOMB_START_VY: f32 = 20.0;

    /// Tint applied to the player on death
    pub const HIT_TINT: u32 = 0xff0000;
}

/// Convert a packed 0xRRGGBB color to linear RGBA floats
#[inline]
pub fn rgb_to_rgba(rgb: u32, alpha: f32) -> [f32; 4] {
    let r = ((rgb >> 16) & 0xff) as f32 / 255.0;
    let g = ((rgb >> 8) & 0xff) as f32 / 255.0;
    let b = (rgb & 0xff) as f32 / 255.0;
    [r, g, b, alpha]
}
