//! Builds the frame's vertex list from game state

use glam::Vec2;

use super::shapes;
use super::vertex::{Palette, Vertex, tinted};
use crate::sim::{Aabb, Body, GameState, Player};

/// Height of the grass strip drawn on top of platforms
const PLATFORM_TOP: f32 = 6.0;

/// Everything visible this frame, back to front
pub fn build_scene(state: &GameState, palette: &Palette, debug: bool) -> Vec<Vertex> {
    let config = &state.config;
    let world = Aabb::new(
        Vec2::new(config.width / 2.0, config.height / 2.0),
        Vec2::new(config.width, config.height),
    );

    let mut vertices = shapes::gradient_rect(&world, palette.sky_top, palette.sky_bottom);

    for platform in &state.platforms {
        let aabb = &platform.aabb;
        vertices.extend(shapes::rect(aabb, palette.platform));
        let top = Aabb::new(
            Vec2::new(aabb.center.x, aabb.min().y + PLATFORM_TOP / 2.0),
            Vec2::new(aabb.size().x, PLATFORM_TOP),
        );
        vertices.extend(shapes::rect(&top, palette.platform_top));
    }

    for star in state.stars.iter().filter(|s| s.active()) {
        let outer = star.body.half.x;
        vertices.extend(shapes::star(star.body.pos, outer, outer * 0.45, palette.star));
    }

    for bomb in &state.bombs {
        let body = &bomb.body;
        vertices.extend(shapes::circle(body.pos, body.half.x, palette.bomb, 12));
        let fuse = Aabb::new(
            body.pos + Vec2::new(body.half.x * 0.5, -body.half.y),
            Vec2::new(3.0, 4.0),
        );
        vertices.extend(shapes::rect(&fuse, palette.bomb_fuse));
    }

    vertices.extend(player_sprite(&state.player, palette));

    if debug || config.debug {
        let mut outline = |body: &Body| {
            vertices.extend(shapes::rect_outline(&body.aabb(), 1.0, palette.debug));
        };
        outline(&state.player.body);
        state
            .stars
            .iter()
            .filter(|s| s.active())
            .for_each(|s| outline(&s.body));
        state.bombs.iter().for_each(|b| outline(&b.body));
    }

    vertices
}

/// The player drawn from sprite-sheet frame semantics:
/// 0-3 walking left, 4 facing front, 5-8 walking right
fn player_sprite(player: &Player, palette: &Palette) -> Vec<Vertex> {
    let body = &player.body;
    let frame = player.anim.frame();
    let color = |c: [f32; 4]| tinted(c, player.tint);

    // Body and head share the top two thirds, legs the rest
    let torso_h = body.half.y * 2.0 * 0.7;
    let leg_h = body.half.y * 2.0 - torso_h;
    let top = body.pos.y - body.half.y;

    let torso = Aabb::new(
        Vec2::new(body.pos.x, top + torso_h / 2.0),
        Vec2::new(body.half.x * 2.0, torso_h),
    );
    let mut vertices = shapes::rect(&torso, color(palette.player));

    // Eyes look toward the direction of travel
    let eye = Vec2::new(4.0, 5.0);
    let eye_y = top + 10.0;
    let eye_xs: &[f32] = match frame {
        0..=3 => &[-9.0],
        5..=8 => &[9.0],
        _ => &[-6.0, 6.0],
    };
    for dx in eye_xs {
        let aabb = Aabb::new(Vec2::new(body.pos.x + dx, eye_y), eye);
        vertices.extend(shapes::rect(&aabb, color(palette.player_eye)));
    }

    // Legs alternate stride on walk frames
    let stride = match frame {
        4 => 0.0,
        f if f % 2 == 0 => 3.0,
        _ => -3.0,
    };
    let leg_y = top + torso_h + leg_h / 2.0;
    for (side, offset) in [(-1.0, stride), (1.0, -stride)] {
        let leg = Aabb::new(
            Vec2::new(body.pos.x + side * 7.0 + offset, leg_y),
            Vec2::new(8.0, leg_h),
        );
        vertices.extend(shapes::rect(&leg, color(palette.player_legs)));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collected_stars_are_hidden() {
        let mut state = GameState::new(5);
        let full = build_scene(&state, &Palette::NORMAL, false).len();
        state.stars[0].body.disable();
        let fewer = build_scene(&state, &Palette::NORMAL, false).len();
        assert_eq!(full - fewer, 30);
    }

    #[test]
    fn test_debug_adds_outlines() {
        let state = GameState::new(5);
        let plain = build_scene(&state, &Palette::NORMAL, false).len();
        let debug = build_scene(&state, &Palette::NORMAL, true).len();
        // Player plus twelve stars, 24 vertices each
        assert_eq!(debug - plain, 13 * 24);
    }

    #[test]
    fn test_dead_player_is_tinted_red() {
        let mut state = GameState::new(5);
        state.player.tint = Some(crate::consts::HIT_TINT);
        let verts = player_sprite(&state.player, &Palette::NORMAL);
        assert!(verts.iter().all(|v| v.color[1] == 0.0 && v.color[2] == 0.0));
    }
}
