//! Shape generation for 2D primitives
//!
//! All builders emit triangle lists in world coordinates.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::sim::Aabb;

/// Two triangles covering an axis-aligned box
pub fn rect(aabb: &Aabb, color: [f32; 4]) -> Vec<Vertex> {
    gradient_rect(aabb, color, color)
}

/// Box with a vertical color gradient (top to bottom)
pub fn gradient_rect(aabb: &Aabb, top: [f32; 4], bottom: [f32; 4]) -> Vec<Vertex> {
    let min = aabb.min();
    let max = aabb.max();

    vec![
        Vertex::new(min.x, min.y, top),
        Vertex::new(max.x, min.y, top),
        Vertex::new(min.x, max.y, bottom),
        Vertex::new(min.x, max.y, bottom),
        Vertex::new(max.x, min.y, top),
        Vertex::new(max.x, max.y, bottom),
    ]
}

/// Hollow box drawn as four thin bars
pub fn rect_outline(aabb: &Aabb, thickness: f32, color: [f32; 4]) -> Vec<Vertex> {
    let min = aabb.min();
    let max = aabb.max();
    let size = aabb.size();
    let t = thickness;

    let bars = [
        Aabb::new(Vec2::new(aabb.center.x, min.y + t / 2.0), Vec2::new(size.x, t)),
        Aabb::new(Vec2::new(aabb.center.x, max.y - t / 2.0), Vec2::new(size.x, t)),
        Aabb::new(Vec2::new(min.x + t / 2.0, aabb.center.y), Vec2::new(t, size.y)),
        Aabb::new(Vec2::new(max.x - t / 2.0, aabb.center.y), Vec2::new(t, size.y)),
    ];

    bars.iter().flat_map(|bar| rect(bar, color)).collect()
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Five-pointed star, first point straight up (screen space, y down)
pub fn star(center: Vec2, outer: f32, inner: f32, color: [f32; 4]) -> Vec<Vertex> {
    const POINTS: usize = 5;
    let mut vertices = Vec::with_capacity(POINTS * 2 * 3);

    let corner = |k: usize| {
        let r = if k % 2 == 0 { outer } else { inner };
        let theta = -PI / 2.0 + k as f32 * PI / POINTS as f32;
        center + Vec2::new(theta.cos(), theta.sin()) * r
    };

    for k in 0..POINTS * 2 {
        let a = corner(k);
        let b = corner(k + 1);
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(a.x, a.y, color));
        vertices.push(Vertex::new(b.x, b.y, color));
    }

    vertices
}
