//! Level construction
//!
//! One fixed screen: a double-scale ground slab, three ledges and a row
//! of stars dropped from the top edge.

use glam::Vec2;
use rand::Rng;

use super::body::Aabb;
use super::state::{GameState, Platform, Star};
use crate::consts::*;

/// Ledge placements: (center x, center y, scale)
pub const PLATFORM_LAYOUT: [(f32, f32, f32); 4] = [
    (400.0, 568.0, 2.0),
    (600.0, 400.0, 1.0),
    (50.0, 250.0, 1.0),
    (750.0, 220.0, 1.0),
];

/// Populate a fresh state with platforms and stars
pub fn create_level(state: &mut GameState) {
    state.platforms.clear();
    state.stars.clear();
    state.bombs.clear();

    let base = Vec2::new(PLATFORM_SIZE.0, PLATFORM_SIZE.1);
    for &(x, y, scale) in &PLATFORM_LAYOUT {
        let id = state.next_entity_id();
        state.platforms.push(Platform {
            id,
            aabb: Aabb::new(Vec2::new(x, y), base * scale),
        });
    }

    let mut rng = state.rng_state.next_rng();
    for i in 0..STAR_COUNT {
        let id = state.next_entity_id();
        let x = STAR_START_X + STAR_STEP_X * i as f32;
        let bounce_y = rng.random_range(STAR_BOUNCE_MIN..STAR_BOUNCE_MAX);
        state.stars.push(Star::new(id, x, bounce_y));
    }

    log::debug!(
        "Level created: {} platforms, {} stars (seed {})",
        state.platforms.len(),
        state.stars.len(),
        state.seed
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_spans_world() {
        let state = GameState::new(3);
        let ground = &state.platforms[0].aabb;
        assert_eq!(ground.min(), Vec2::new(0.0, 536.0));
        assert_eq!(ground.max(), Vec2::new(800.0, 600.0));
    }

    #[test]
    fn test_star_row() {
        let state = GameState::new(3);
        for (i, star) in state.stars.iter().enumerate() {
            assert_eq!(star.body.pos, Vec2::new(12.0 + 70.0 * i as f32, 0.0));
            assert!(star.body.bounce.y >= STAR_BOUNCE_MIN && star.body.bounce.y < STAR_BOUNCE_MAX);
            assert!(!star.body.collide_world_bounds);
        }
        assert_eq!(state.stars.last().map(|s| s.body.pos.x), Some(782.0));
    }

    #[test]
    fn test_same_seed_same_bounces() {
        let a = GameState::new(99);
        let b = GameState::new(99);
        let c = GameState::new(100);
        let bounces = |s: &GameState| s.stars.iter().map(|s| s.body.bounce.y).collect::<Vec<_>>();
        assert_eq!(bounces(&a), bounces(&b));
        assert_ne!(bounces(&a), bounces(&c));
    }
}
