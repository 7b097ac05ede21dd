//! Game state and core simulation types
//!
//! All state that must be persisted for Continue/determinism lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::anim::AnimPlayer;
use super::body::{Aabb, Body};
use super::config::WorldConfig;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Player touched a bomb; the run is over
    GameOver,
}

/// Things that happened during a tick, for audio/HUD hooks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    StarCollected { id: u32 },
    /// Every star was collected and the row dropped again
    StarsRespawned,
    BombSpawned { id: u32 },
    PlayerJumped,
    PlayerHit { bomb_id: u32 },
}

/// The player sprite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub anim: AnimPlayer,
    /// Color multiplier applied on death (0xRRGGBB)
    pub tint: Option<u32>,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        let mut body = Body::new(pos, Vec2::new(PLAYER_SIZE.0, PLAYER_SIZE.1));
        body.bounce = Vec2::splat(PLAYER_BOUNCE);
        body.collide_world_bounds = true;
        Self {
            body,
            anim: AnimPlayer::default(),
            tint: None,
        }
    }

    pub fn on_ground(&self) -> bool {
        self.body.touching.down
    }
}

/// A collectible star
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub id: u32,
    pub body: Body,
}

impl Star {
    pub fn new(id: u32, x: f32, bounce_y: f32) -> Self {
        let mut body = Body::new(Vec2::new(x, 0.0), Vec2::new(STAR_SIZE.0, STAR_SIZE.1));
        body.bounce = Vec2::new(0.0, bounce_y);
        Self { id, body }
    }

    pub fn active(&self) -> bool {
        self.body.enabled
    }
}

/// A bouncing hazard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bomb {
    pub id: u32,
    pub body: Body,
}

impl Bomb {
    pub fn new(id: u32, pos: Vec2, vel: Vec2) -> Self {
        let mut body = Body::new(pos, Vec2::new(BOMB_SIZE.0, BOMB_SIZE.1));
        body.bounce = Vec2::ONE;
        body.collide_world_bounds = true;
        body.vel = vel;
        Self { id, body }
    }
}

/// A static platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: u32,
    pub aabb: Aabb,
}

/// RNG cursor that survives serialization.
///
/// Each draw batch derives a fresh generator from `(seed, stream)` and
/// bumps `stream`, so a saved game resumes the same sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    pub fn next_rng(&mut self) -> Pcg32 {
        let mixed = self
            .seed
            .wrapping_add(self.stream.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        self.stream += 1;
        Pcg32::seed_from_u64(mixed)
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG state
    pub rng_state: RngState,
    pub config: WorldConfig,
    /// Score (STAR_SCORE per star)
    pub score: u32,
    /// How many times the whole star row was collected
    pub rounds_cleared: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Current phase
    pub phase: GamePhase,
    pub player: Player,
    /// Static platforms (sorted by id)
    pub platforms: Vec<Platform>,
    /// Stars, active or collected (sorted by id)
    pub stars: Vec<Star>,
    /// Live bombs (sorted by id)
    pub bombs: Vec<Bomb>,
    /// Events raised since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game with the default world
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, WorldConfig::default())
    }

    /// Create a new game and build the level
    pub fn with_config(seed: u64, config: WorldConfig) -> Self {
        let mut state = Self {
            seed,
            rng_state: RngState::new(seed),
            config,
            score: 0,
            rounds_cleared: 0,
            time_ticks: 0,
            phase: GamePhase::Playing,
            player: Player::new(Vec2::new(PLAYER_START_X, PLAYER_START_Y)),
            platforms: Vec::new(),
            stars: Vec::new(),
            bombs: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        };

        super::level::create_level(&mut state);

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Text shown in the score HUD
    pub fn score_text(&self) -> String {
        format!("Score: {}", self.score)
    }

    pub fn active_star_count(&self) -> usize {
        self.stars.iter().filter(|s| s.active()).count()
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.platforms.sort_by_key(|p| p.id);
        self.stars.sort_by_key(|s| s.id);
        self.bombs.sort_by_key(|b| b.id);
    }

    /// Highest id handed out so far, `None` before the first allocation
    /// (used when validating saves)
    pub fn last_entity_id(&self) -> Option<u32> {
        self.next_id.checked_sub(1).filter(|&id| id > 0)
    }
}
