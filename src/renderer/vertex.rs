//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub sky_top: [f32; 4],
    pub sky_bottom: [f32; 4],
    pub platform: [f32; 4],
    pub platform_top: [f32; 4],
    pub star: [f32; 4],
    pub bomb: [f32; 4],
    pub bomb_fuse: [f32; 4],
    pub player: [f32; 4],
    pub player_eye: [f32; 4],
    pub player_legs: [f32; 4],
    pub debug: [f32; 4],
    pub background: [f32; 4],
}

impl Palette {
    pub const NORMAL: Palette = Palette {
        sky_top: [0.36, 0.62, 0.91, 1.0],
        sky_bottom: [0.75, 0.88, 0.98, 1.0],
        platform: [0.45, 0.32, 0.2, 1.0],
        platform_top: [0.3, 0.7, 0.25, 1.0],
        star: [1.0, 0.85, 0.2, 1.0],
        bomb: [0.12, 0.12, 0.14, 1.0],
        bomb_fuse: [0.95, 0.45, 0.1, 1.0],
        player: [0.55, 0.35, 0.75, 1.0],
        player_eye: [1.0, 1.0, 1.0, 1.0],
        player_legs: [0.3, 0.2, 0.45, 1.0],
        debug: [1.0, 0.0, 1.0, 0.9],
        background: [0.0, 0.0, 0.0, 1.0],
    };

    pub const HIGH_CONTRAST: Palette = Palette {
        sky_top: [0.0, 0.0, 0.0, 1.0],
        sky_bottom: [0.0, 0.0, 0.0, 1.0],
        platform: [1.0, 1.0, 1.0, 1.0],
        platform_top: [1.0, 1.0, 1.0, 1.0],
        star: [1.0, 1.0, 0.0, 1.0],
        bomb: [1.0, 0.2, 0.2, 1.0],
        bomb_fuse: [1.0, 0.6, 0.0, 1.0],
        player: [0.0, 1.0, 1.0, 1.0],
        player_eye: [0.0, 0.0, 0.0, 1.0],
        player_legs: [0.0, 0.7, 0.7, 1.0],
        debug: [0.0, 1.0, 0.0, 1.0],
        background: [0.0, 0.0, 0.0, 1.0],
    };

    pub fn for_settings(high_contrast: bool) -> Palette {
        if high_contrast {
            Palette::HIGH_CONTRAST
        } else {
            Palette::NORMAL
        }
    }
}

/// Multiply a color by a packed 0xRRGGBB tint
pub fn tinted(color: [f32; 4], tint: Option<u32>) -> [f32; 4] {
    match tint {
        Some(rgb) => {
            let t = crate::rgb_to_rgba(rgb, 1.0);
            [color[0] * t[0], color[1] * t[1], color[2] * t[2], color[3]]
        }
        None => color,
    }
}
