//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::anim::AnimKey;
use super::config::WorldConfig;
use super::state::{Bomb, GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input commands for a single tick (held key state)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Left arrow held
    pub left: bool,
    /// Right arrow held
    pub right: bool,
    /// Up arrow held (jump)
    pub up: bool,
    /// Pause toggle (one-shot)
    pub pause: bool,
    /// Idle/demo mode - autopilot plays the game
    pub idle_mode: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            GamePhase::GameOver => {}
        }
    }

    // Physics is frozen while paused and after game over
    match state.phase {
        GamePhase::Paused | GamePhase::GameOver => return,
        GamePhase::Playing => {}
    }

    let mut input = input.clone();
    if input.idle_mode {
        autopilot(state, &mut input);
    }
    let input = &input;

    state.time_ticks += 1;

    apply_controls(state, input);
    step_physics(state, dt);
    collect_stars(state);
    check_bomb_hits(state);

    state.player.anim.advance(dt);

    // Ensure deterministic ordering
    state.normalize_order();
}

/// Turn held keys into player velocity and animation
fn apply_controls(state: &mut GameState, input: &TickInput) {
    let player = &mut state.player;

    if input.left {
        player.body.vel.x = -PLAYER_SPEED;
        player.anim.play(AnimKey::Left, true);
    } else if input.right {
        player.body.vel.x = PLAYER_SPEED;
        player.anim.play(AnimKey::Right, true);
    } else {
        player.body.vel.x = 0.0;
        player.anim.play(AnimKey::Turn, false);
    }

    // Grounded flag comes from the previous physics step
    if input.up && player.on_ground() {
        player.body.vel.y = JUMP_VELOCITY;
        state.events.push(GameEvent::PlayerJumped);
    }
}

/// Integrate every dynamic body and resolve it against platforms/world
fn step_physics(state: &mut GameState, dt: f32) {
    let gravity = Vec2::new(0.0, state.config.gravity_y);
    let (width, height) = (state.config.width, state.config.height);

    // Player
    let player = &mut state.player.body;
    player.touching = Default::default();
    player.integrate(gravity, dt);
    for platform in &state.platforms {
        player.separate_static(&platform.aabb);
    }
    player.clamp_to_world(width, height);

    // Stars only collide with platforms
    for star in state.stars.iter_mut().filter(|s| s.active()) {
        star.body.touching = Default::default();
        star.body.integrate(gravity, dt);
        for platform in &state.platforms {
            star.body.separate_static(&platform.aabb);
        }
    }

    // Bombs bounce off platforms and world edges
    for bomb in &mut state.bombs {
        bomb.body.touching = Default::default();
        bomb.body.integrate(gravity, dt);
        for platform in &state.platforms {
            bomb.body.separate_static(&platform.aabb);
        }
        bomb.body.clamp_to_world(width, height);
    }
}

/// Disable every star the player overlaps and score it
fn collect_stars(state: &mut GameState) {
    let mut collected = Vec::new();
    for star in &mut state.stars {
        if star.active() && state.player.body.overlaps(&star.body) {
            star.body.disable();
            collected.push(star.id);
        }
    }

    if collected.is_empty() {
        return;
    }

    for id in collected {
        state.score += STAR_SCORE;
        state.events.push(GameEvent::StarCollected { id });
    }

    if state.active_star_count() == 0 {
        respawn_stars(state);
        spawn_bomb(state);
    }
}

/// Drop the whole star row again from the top edge
fn respawn_stars(state: &mut GameState) {
    for star in &mut state.stars {
        let x = star.body.pos.x;
        star.body.enable_at(Vec2::new(x, 0.0));
    }
    state.rounds_cleared += 1;
    state.events.push(GameEvent::StarsRespawned);
    log::info!(
        "Round {} cleared, score {}",
        state.rounds_cleared,
        state.score
    );
}

/// Spawn one bomb on the half of the screen the player is not on
fn spawn_bomb(state: &mut GameState) {
    let mut rng = state.rng_state.next_rng();
    let x = bomb_spawn_x(state.player.body.pos.x, &state.config, &mut rng);
    let vx = rng.random_range(-BOMB_SPEED_X..=BOMB_SPEED_X) as f32;

    let id = state.next_entity_id();
    state.bombs.push(Bomb::new(
        id,
        Vec2::new(x, BOMB_SPAWN_Y),
        Vec2::new(vx, BOMB_START_VY),
    ));
    state.events.push(GameEvent::BombSpawned { id });
    log::debug!("Bomb {} spawned at x={} vx={}", id, x, vx);
}

/// Pick a bomb x on the opposite half from `player_x` (inclusive integer range)
pub fn bomb_spawn_x(player_x: f32, config: &WorldConfig, rng: &mut Pcg32) -> f32 {
    let mid = config.mid_x() as i32;
    let width = config.width as i32;
    let x = if player_x < config.mid_x() {
        rng.random_range(mid..=width)
    } else {
        rng.random_range(0..=mid)
    };
    x as f32
}

/// Any bomb touching the player ends the run
fn check_bomb_hits(state: &mut GameState) {
    let hit = state
        .bombs
        .iter()
        .find(|b| state.player.body.overlaps(&b.body))
        .map(|b| b.id);

    if let Some(bomb_id) = hit {
        state.phase = GamePhase::GameOver;
        state.player.tint = Some(HIT_TINT);
        state.player.anim.play(AnimKey::Turn, false);
        state.events.push(GameEvent::PlayerHit { bomb_id });
        log::info!("Game over: hit bomb {} with score {}", bomb_id, state.score);
    }
}

/// Demo controller: chase the nearest star, hop over incoming bombs
fn autopilot(state: &GameState, input: &mut TickInput) {
    let me = &state.player.body;
    input.left = false;
    input.right = false;
    input.up = false;

    let target = state
        .stars
        .iter()
        .filter(|s| s.active())
        .min_by(|a, b| {
            a.body
                .pos
                .distance_squared(me.pos)
                .partial_cmp(&b.body.pos.distance_squared(me.pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    if let Some(star) = target {
        let dx = star.body.pos.x - me.pos.x;
        if dx < -4.0 {
            input.left = true;
        } else if dx > 4.0 {
            input.right = true;
        }
        // Star resting on a ledge above us
        if star.body.pos.y < me.pos.y - 40.0 && dx.abs() < 120.0 {
            input.up = true;
        }
    }

    let threatened = state.bombs.iter().any(|bomb| {
        let d = bomb.body.pos - me.pos;
        d.x.abs() < 90.0 && d.y.abs() < 60.0 && d.x * bomb.body.vel.x < 0.0
    });
    if threatened {
        input.up = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn settle(state: &mut GameState) {
        let input = TickInput::default();
        for _ in 0..240 {
            tick(state, &input, SIM_DT);
        }
    }

    #[test]
    fn test_player_lands_on_ground() {
        let mut state = GameState::new(12345);
        settle(&mut state);
        assert!(state.player.on_ground());
        assert!((state.player.body.pos.y - 512.0).abs() < 1.0);
    }

    #[test]
    fn test_horizontal_controls() {
        let mut state = GameState::new(12345);

        let left = TickInput {
            left: true,
            ..Default::default()
        };
        tick(&mut state, &left, SIM_DT);
        assert_eq!(state.player.body.vel.x, -PLAYER_SPEED);
        assert_eq!(state.player.anim.current, AnimKey::Left);

        // Left wins when both are held
        let both = TickInput {
            left: true,
            right: true,
            ..Default::default()
        };
        tick(&mut state, &both, SIM_DT);
        assert_eq!(state.player.body.vel.x, -PLAYER_SPEED);

        let right = TickInput {
            right: true,
            ..Default::default()
        };
        tick(&mut state, &right, SIM_DT);
        assert_eq!(state.player.body.vel.x, PLAYER_SPEED);
        assert_eq!(state.player.anim.current, AnimKey::Right);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.player.body.vel.x, 0.0);
        assert_eq!(state.player.anim.current, AnimKey::Turn);
        assert_eq!(state.player.anim.frame(), 4);
    }

    #[test]
    fn test_jump_only_from_ground() {
        let mut state = GameState::new(12345);
        let up = TickInput {
            up: true,
            ..Default::default()
        };

        // Spawned mid-air
        tick(&mut state, &up, SIM_DT);
        assert!(state.player.body.vel.y > JUMP_VELOCITY / 2.0);
        assert!(!state.drain_events().contains(&GameEvent::PlayerJumped));

        settle(&mut state);
        state.drain_events();
        tick(&mut state, &up, SIM_DT);
        assert!(state.player.body.vel.y < -300.0);
        assert!(state.drain_events().contains(&GameEvent::PlayerJumped));
        assert!(!state.player.on_ground());
    }

    #[test]
    fn test_collect_star_scores() {
        let mut state = GameState::new(12345);
        let id = state.stars[5].id;
        state.stars[5].body.pos = state.player.body.pos;

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.score, STAR_SCORE);
        assert_eq!(state.score_text(), "Score: 10");
        assert!(!state.stars[5].active());
        assert_eq!(state.active_star_count(), STAR_COUNT - 1);
        assert!(state.drain_events().contains(&GameEvent::StarCollected { id }));
        assert!(state.bombs.is_empty());
    }

    #[test]
    fn test_last_star_respawns_row_and_spawns_bomb() {
        let mut state = GameState::new(12345);
        for star in state.stars.iter_mut().skip(1) {
            star.body.disable();
        }
        state.stars[3].body.pos.x = 333.0;
        state.stars[0].body.pos = state.player.body.pos;
        let xs_before: Vec<f32> = state.stars.iter().map(|s| s.body.pos.x).collect();

        tick(&mut state, &TickInput::default(), SIM_DT);

        // Each star drops from where it was collected, not from its layout slot
        let xs_after: Vec<f32> = state.stars.iter().map(|s| s.body.pos.x).collect();
        assert_eq!(xs_after, xs_before);
        assert_eq!(state.stars[3].body.pos.x, 333.0);

        assert_eq!(state.score, STAR_SCORE);
        assert_eq!(state.rounds_cleared, 1);
        assert_eq!(state.active_star_count(), STAR_COUNT);
        assert!(state.stars.iter().all(|s| s.body.pos.y == 0.0));
        assert!(state.stars.iter().all(|s| s.body.vel == Vec2::ZERO));

        assert_eq!(state.bombs.len(), 1);
        let bomb = &state.bombs[0].body;
        // Player is on the left half, so the bomb drops on the right
        assert!(bomb.pos.x >= 400.0 && bomb.pos.x <= 800.0);
        assert_eq!(bomb.pos.y, BOMB_SPAWN_Y);
        assert!(bomb.vel.x.abs() <= 200.0);
        assert_eq!(bomb.vel.y, BOMB_START_VY);
        assert_eq!(bomb.bounce, Vec2::ONE);

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::StarsRespawned));
        assert!(events.iter().any(|e| matches!(e, GameEvent::BombSpawned { .. })));
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_bomb_hit_is_terminal() {
        let mut state = GameState::new(12345);
        let id = state.next_entity_id();
        let pos = state.player.body.pos;
        state.bombs.push(Bomb::new(id, pos, Vec2::ZERO));

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.is_game_over());
        assert_eq!(state.player.tint, Some(HIT_TINT));
        assert_eq!(state.player.anim.frame(), 4);
        assert!(state.drain_events().contains(&GameEvent::PlayerHit { bomb_id: id }));

        // Update is a no-op from here on, pause included
        let frozen_pos = state.player.body.pos;
        let frozen_ticks = state.time_ticks;
        let input = TickInput {
            right: true,
            up: true,
            pause: true,
            ..Default::default()
        };
        for _ in 0..10 {
            tick(&mut state, &input, SIM_DT);
        }
        assert!(state.is_game_over());
        assert_eq!(state.player.body.pos, frozen_pos);
        assert_eq!(state.time_ticks, frozen_ticks);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = GameState::new(12345);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };

        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);
        let paused_pos = state.player.body.pos;

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.player.body.pos, paused_pos);

        // Unpause
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_ne!(state.player.body.pos, paused_pos);
    }

    #[test]
    fn test_stars_come_to_rest_on_platforms() {
        let mut state = GameState::new(12345);
        // Long enough for the bounciest star to stop bouncing
        for _ in 0..3600 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.active_star_count(), STAR_COUNT);

        // x = 82 lands on the left ledge (top 234), x = 292 on the ground (top 536)
        let ledge_star = &state.stars[1].body;
        assert_eq!(ledge_star.pos.x, 82.0);
        assert!(ledge_star.touching.down);
        assert!((ledge_star.pos.y - 223.0).abs() < 0.5);

        let ground_star = &state.stars[4].body;
        assert_eq!(ground_star.pos.x, 292.0);
        assert!(ground_star.touching.down);
        assert!((ground_star.pos.y - 525.0).abs() < 0.5);
    }

    #[test]
    fn test_bomb_bounces_off_ground() {
        let mut state = GameState::new(12345);
        let id = state.next_entity_id();
        state
            .bombs
            .push(Bomb::new(id, Vec2::new(300.0, 527.0), Vec2::new(0.0, 200.0)));

        tick(&mut state, &TickInput::default(), SIM_DT);

        let bomb = &state.bombs[0].body;
        assert!(bomb.touching.down);
        assert!((bomb.pos.y - 529.0).abs() < 1e-3);
        // Full bounce: same speed, reversed
        assert!((bomb.vel.y + (200.0 + GRAVITY_Y * SIM_DT)).abs() < 1e-3);
        assert!(!state.is_game_over());
    }

    #[test]
    fn test_bomb_bounces_off_ledge_underside() {
        let mut state = GameState::new(12345);
        let id = state.next_entity_id();
        // Rising into the right ledge (y 384..416) from below
        state
            .bombs
            .push(Bomb::new(id, Vec2::new(600.0, 424.0), Vec2::new(0.0, -200.0)));

        tick(&mut state, &TickInput::default(), SIM_DT);

        let bomb = &state.bombs[0].body;
        assert!(bomb.touching.up);
        assert!((bomb.pos.y - 423.0).abs() < 1e-3);
        assert!(bomb.vel.y > 0.0);
    }

    #[test]
    fn test_bombs_stay_in_world() {
        let mut state = GameState::new(777);
        let id = state.next_entity_id();
        state
            .bombs
            .push(Bomb::new(id, Vec2::new(700.0, 16.0), Vec2::new(200.0, 20.0)));
        // Keep the player far from the bomb's path
        state.player.body.pos = Vec2::new(20.0, 200.0);
        state.player.body.allow_gravity = false;

        for _ in 0..600 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            if state.is_game_over() {
                break;
            }
            let aabb = state.bombs[0].body.aabb();
            assert!(aabb.min().x >= 0.0 && aabb.max().x <= 800.0);
            assert!(aabb.min().y >= 0.0 && aabb.max().y <= 600.0);
        }
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);

        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };

        for _ in 0..1200 {
            tick(&mut state1, &input, SIM_DT);
            tick(&mut state2, &input, SIM_DT);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.bombs.len(), state2.bombs.len());
        assert_eq!(state1.player.body.pos, state2.player.body.pos);
    }

    #[test]
    fn test_autopilot_collects_stars() {
        let mut state = GameState::new(4242);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..1800 {
            tick(&mut state, &input, SIM_DT);
        }
        assert!(state.score > 0);
    }

    proptest! {
        #[test]
        fn prop_bomb_spawns_on_far_half(player_x in 0.0f32..800.0, seed in any::<u64>()) {
            let config = WorldConfig::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let x = bomb_spawn_x(player_x, &config, &mut rng);
            prop_assert_eq!(x.fract(), 0.0);
            if player_x < 400.0 {
                prop_assert!((400.0..=800.0).contains(&x));
            } else {
                prop_assert!((0.0..=400.0).contains(&x));
            }
        }
    }
}
