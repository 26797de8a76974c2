//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Straight (non-premultiplied) sRGB colour with alpha
pub type Rgba = [f32; 4];

/// 2D vertex with position and color. Positions are in playfield pixels
/// until the pipeline maps them to clip space.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: Rgba,
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: Rgba) -> Self {
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

/// Colors for scene elements
pub mod colors {
    use super::Rgba;

    // Sky gradient
    pub const SKY: Rgba = [0.529, 0.808, 0.922, 1.0]; // #87CEEB
    pub const PERIWINKLE: Rgba = [0.8, 0.8, 1.0, 1.0]; // #CCCCFF
    pub const LAVENDER: Rgba = [0.902, 0.902, 0.980, 1.0]; // #E6E6FA

    // Ground
    pub const GROUND: Rgba = [0.565, 0.933, 0.565, 1.0]; // #90EE90
    pub const GROUND_DARK: Rgba = [0.486, 0.804, 0.486, 1.0]; // #7CCD7C
    pub const GROUND_SHADOW: Rgba = [0.0, 0.0, 0.0, 0.1];

    // Characters
    pub const LEFT_CHARACTER: Rgba = [1.0, 0.420, 0.420, 1.0]; // #FF6B6B
    pub const RIGHT_CHARACTER: Rgba = [0.306, 0.804, 0.769, 1.0]; // #4ECDC4
    pub const PERFECT_ZONE: Rgba = [1.0, 1.0, 1.0, 0.2];
    pub const DROP_SHADOW: Rgba = [0.0, 0.0, 0.0, 0.2];

    pub const WHITE: Rgba = [1.0, 1.0, 1.0, 1.0];
    pub const CLOUD: Rgba = [1.0, 1.0, 1.0, 0.8];
    pub const BALL_GLOW: Rgba = [1.0, 1.0, 1.0, 0.8];
    pub const TRAIL_SPARK: Rgba = [1.0, 1.0, 1.0, 0.5];

    /// Same colour, alpha scaled by `factor`
    pub fn faded(color: Rgba, factor: f32) -> Rgba {
        [color[0], color[1], color[2], color[3] * factor.clamp(0.0, 1.0)]
    }

    /// Same colour, fully transparent
    pub fn transparent(color: Rgba) -> Rgba {
        [color[0], color[1], color[2], 0.0]
    }
}
