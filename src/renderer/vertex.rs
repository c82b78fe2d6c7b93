//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
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
pub mod colors {
    pub const SKY_TOP: [f32; 4] = [0.27, 0.71, 0.78, 1.0];
    pub const SKY_BOTTOM: [f32; 4] = [0.75, 0.91, 0.96, 1.0];
    pub const PIPE: [f32; 4] = [0.475, 0.667, 0.176, 1.0]; // #79aa2d
    pub const PIPE_CAP: [f32; 4] = [0.24, 0.39, 0.08, 1.0];
    pub const GRASS: [f32; 4] = [0.33, 0.66, 0.22, 1.0];
    pub const DIRT: [f32; 4] = [0.82, 0.73, 0.43, 1.0];
    pub const BIRD: [f32; 4] = [0.96, 0.78, 0.26, 1.0];
    pub const BIRD_WING: [f32; 4] = [0.84, 0.65, 0.14, 1.0];
    pub const BIRD_EYE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const BIRD_PUPIL: [f32; 4] = [0.08, 0.08, 0.08, 1.0];
    pub const BIRD_BEAK: [f32; 4] = [0.88, 0.29, 0.14, 1.0];
    pub const METER_BG: [f32; 4] = [0.0, 0.0, 0.0, 0.35];
    pub const METER_QUIET: [f32; 4] = [0.6, 0.6, 0.6, 0.9];
    pub const METER_LOUD: [f32; 4] = [1.0, 0.9, 0.2, 0.9];
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
}
