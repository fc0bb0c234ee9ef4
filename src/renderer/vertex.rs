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

/// Colors for game elements (sRGB, 0-1)
pub mod colors {
    const fn rgba(r: u8, g: u8, b: u8, a: u8) -> [f32; 4] {
        [
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        ]
    }

    /// Night sky
    pub const BACKGROUND: [f32; 4] = rgba(20, 20, 50, 255);
    pub const SNOW: [f32; 4] = rgba(240, 240, 240, 255);
    pub const GIFT_WRAP: [f32; 4] = rgba(0, 150, 0, 255);
    pub const RIBBON: [f32; 4] = rgba(255, 215, 0, 255);
    pub const ORNAMENT: [f32; 4] = rgba(200, 0, 0, 255);
    pub const ORNAMENT_SHINE: [f32; 4] = rgba(255, 255, 255, 200);
    pub const ORNAMENT_HANGER: [f32; 4] = rgba(218, 165, 32, 255);
    pub const BAND: [f32; 4] = rgba(255, 255, 255, 255);
}
