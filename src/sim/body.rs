//! Arcade physics bodies
//!
//! Axis-aligned boxes with velocity, gravity and per-axis bounce. Dynamic
//! bodies are separated from static ones along the axis of least
//! penetration, which is all a single-screen platformer needs.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box (center + half extents)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: size * 0.5,
        }
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half
    }

    pub fn size(&self) -> Vec2 {
        self.half * 2.0
    }

    /// Strict overlap test (touching edges do not overlap)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.overlap(other).is_some()
    }

    /// Overlap depth on each axis, `None` if the boxes are apart
    pub fn overlap(&self, other: &Aabb) -> Option<Vec2> {
        let d = (self.center - other.center).abs();
        let depth = self.half + other.half - d;
        if depth.x > 0.0 && depth.y > 0.0 {
            Some(depth)
        } else {
            None
        }
    }
}

/// Which sides of a body touched a static body during the last step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Touching {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Touching {
    pub fn none(&self) -> bool {
        !(self.up || self.down || self.left || self.right)
    }
}

/// A dynamic arcade body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    /// Center position
    pub pos: Vec2,
    pub vel: Vec2,
    pub half: Vec2,
    /// Fraction of velocity kept (and reversed) on impact, per axis
    pub bounce: Vec2,
    pub collide_world_bounds: bool,
    pub allow_gravity: bool,
    /// Disabled bodies neither move nor collide
    pub enabled: bool,
    #[serde(default)]
    pub touching: Touching,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            half: size * 0.5,
            bounce: Vec2::ZERO,
            collide_world_bounds: false,
            allow_gravity: true,
            enabled: true,
            touching: Touching::default(),
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb {
            center: self.pos,
            half: self.half,
        }
    }

    /// Disable and park the body (collected stars)
    pub fn disable(&mut self) {
        self.enabled = false;
        self.vel = Vec2::ZERO;
        self.touching = Touching::default();
    }

    /// Re-enable at a new position with velocity reset
    pub fn enable_at(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.enabled = true;
        self.touching = Touching::default();
    }

    /// Advance one step: apply gravity, then move
    pub fn integrate(&mut self, gravity: Vec2, dt: f32) {
        if !self.enabled {
            return;
        }
        if self.allow_gravity {
            self.vel += gravity * dt;
        }
        self.pos += self.vel * dt;
    }

    /// Push this body out of a static box.
    ///
    /// Returns true if the bodies overlapped and were separated.
    pub fn separate_static(&mut self, wall: &Aabb) -> bool {
        if !self.enabled {
            return false;
        }
        let Some(depth) = self.aabb().overlap(wall) else {
            return false;
        };
        let delta = self.pos - wall.center;

        if depth.x < depth.y {
            if delta.x < 0.0 {
                // Body is left of the wall
                self.pos.x -= depth.x;
                self.touching.right = true;
                if self.vel.x > 0.0 {
                    self.vel.x = -self.vel.x * self.bounce.x;
                }
            } else {
                self.pos.x += depth.x;
                self.touching.left = true;
                if self.vel.x < 0.0 {
                    self.vel.x = -self.vel.x * self.bounce.x;
                }
            }
        } else if delta.y < 0.0 {
            // Body is above the wall (landing)
            self.pos.y -= depth.y;
            self.touching.down = true;
            if self.vel.y > 0.0 {
                self.vel.y = -self.vel.y * self.bounce.y;
            }
        } else {
            self.pos.y += depth.y;
            self.touching.up = true;
            if self.vel.y < 0.0 {
                self.vel.y = -self.vel.y * self.bounce.y;
            }
        }
        true
    }

    /// Keep the body inside `[0, width] x [0, height]`.
    ///
    /// World edges do not count as touching; only static bodies do.
    pub fn clamp_to_world(&mut self, width: f32, height: f32) -> bool {
        if !self.enabled || !self.collide_world_bounds {
            return false;
        }
        let mut hit = false;

        if self.pos.x - self.half.x < 0.0 {
            self.pos.x = self.half.x;
            if self.vel.x < 0.0 {
                self.vel.x = -self.vel.x * self.bounce.x;
            }
            hit = true;
        } else if self.pos.x + self.half.x > width {
            self.pos.x = width - self.half.x;
            if self.vel.x > 0.0 {
                self.vel.x = -self.vel.x * self.bounce.x;
            }
            hit = true;
        }

        if self.pos.y - self.half.y < 0.0 {
            self.pos.y = self.half.y;
            if self.vel.y < 0.0 {
                self.vel.y = -self.vel.y * self.bounce.y;
            }
            hit = true;
        } else if self.pos.y + self.half.y > height {
            self.pos.y = height - self.half.y;
            if self.vel.y > 0.0 {
                self.vel.y = -self.vel.y * self.bounce.y;
            }
            hit = true;
        }

        hit
    }

    /// Overlap between two enabled bodies
    pub fn overlaps(&self, other: &Body) -> bool {
        self.enabled && other.enabled && self.aabb().overlaps(&other.aabb())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ground() -> Aabb {
        Aabb::new(Vec2::new(400.0, 568.0), Vec2::new(800.0, 64.0))
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = Aabb::new(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(!a.overlaps(&b));
        let c = Aabb::new(Vec2::new(9.0, 0.0), Vec2::new(10.0, 10.0));
        assert_eq!(a.overlap(&c), Some(Vec2::new(1.0, 10.0)));
    }

    #[test]
    fn test_landing_sets_touching_down_and_bounces() {
        let mut body = Body::new(Vec2::new(100.0, 515.0), Vec2::new(32.0, 48.0));
        body.bounce = Vec2::new(0.0, 0.2);
        body.vel = Vec2::new(0.0, 100.0);

        assert!(body.separate_static(&ground()));
        assert!(body.touching.down);
        assert!((body.pos.y - 512.0).abs() < 1e-4);
        assert!((body.vel.y + 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_zero_bounce_stops_on_impact() {
        let mut body = Body::new(Vec2::new(100.0, 515.0), Vec2::new(32.0, 48.0));
        body.vel = Vec2::new(0.0, 250.0);
        body.separate_static(&ground());
        assert_eq!(body.vel.y, 0.0);
    }

    #[test]
    fn test_side_hit_sets_touching_right() {
        let wall = Aabb::new(Vec2::new(600.0, 400.0), Vec2::new(400.0, 32.0));
        // Overlapping the left edge by 2px, well inside vertically
        let mut body = Body::new(Vec2::new(400.0 - 16.0 + 2.0, 400.0), Vec2::new(32.0, 48.0));
        body.vel = Vec2::new(160.0, 0.0);

        assert!(body.separate_static(&wall));
        assert!(body.touching.right);
        assert!(!body.touching.down);
        assert_eq!(body.vel.x, 0.0);
    }

    #[test]
    fn test_disabled_body_is_inert() {
        let mut body = Body::new(Vec2::new(100.0, 540.0), Vec2::new(24.0, 22.0));
        body.disable();
        body.integrate(Vec2::new(0.0, 300.0), 1.0 / 60.0);
        assert_eq!(body.pos, Vec2::new(100.0, 540.0));
        assert!(!body.separate_static(&ground()));

        body.enable_at(Vec2::new(100.0, 0.0));
        assert!(body.enabled);
        assert_eq!(body.vel, Vec2::ZERO);
    }

    #[test]
    fn test_world_bounds_reflect_full_bounce() {
        let mut body = Body::new(Vec2::new(3.0, 300.0), Vec2::new(14.0, 14.0));
        body.bounce = Vec2::ONE;
        body.collide_world_bounds = true;
        body.vel = Vec2::new(-120.0, 0.0);

        assert!(body.clamp_to_world(800.0, 600.0));
        assert_eq!(body.pos.x, 7.0);
        assert_eq!(body.vel.x, 120.0);
        assert!(body.touching.none());
    }

    proptest! {
        #[test]
        fn prop_clamped_body_stays_in_world(
            x in -200.0f32..1000.0,
            y in -200.0f32..800.0,
            vx in -500.0f32..500.0,
            vy in -500.0f32..500.0,
        ) {
            let mut body = Body::new(Vec2::new(x, y), Vec2::new(32.0, 48.0));
            body.collide_world_bounds = true;
            body.vel = Vec2::new(vx, vy);
            body.clamp_to_world(800.0, 600.0);

            let aabb = body.aabb();
            prop_assert!(aabb.min().x >= 0.0 && aabb.max().x <= 800.0);
            prop_assert!(aabb.min().y >= 0.0 && aabb.max().y <= 600.0);
        }

        #[test]
        fn prop_separation_resolves_overlap(
            x in 0.0f32..800.0,
            y in 520.0f32..600.0,
            vy in 0.0f32..400.0,
        ) {
            let mut body = Body::new(Vec2::new(x, y), Vec2::new(24.0, 22.0));
            body.vel = Vec2::new(0.0, vy);
            body.separate_static(&ground());

            let residual = body.aabb().overlap(&ground());
            prop_assert!(residual.map_or(true, |d| d.x.min(d.y) < 1e-3));
        }
    }
}
