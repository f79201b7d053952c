use bytemuck::{Pod, Zeroable};
use wgpu::{VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

/// A vertex type that knows how the vertex shader reads it
pub trait VertexLayout: Pod {
    const ATTRIBUTES: &'static [VertexAttribute];

    /// Returns the interleaved buffer layout for this vertex type
    fn desc() -> VertexBufferLayout<'static> {
        VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as u64,
            step_mode: VertexStepMode::Vertex,
            attributes: Self::ATTRIBUTES,
        }
    }
}

/// Position & color, interleaved as 6 floats
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ColorVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl ColorVertex {
    pub const fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Self { position, color }
    }
}

impl VertexLayout for ColorVertex {
    /// - location 0: `vec3<f32>` (position)
    /// - location 1: `vec3<f32>` (color)
    const ATTRIBUTES: &'static [VertexAttribute] = &[
        VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: VertexFormat::Float32x3,
        },
        VertexAttribute {
            offset: 12,
            shader_location: 1,
            format: VertexFormat::Float32x3,
        },
    ];
}

/// Position, color & texture coordinates, interleaved as 8 floats
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct TexturedVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl TexturedVertex {
    /// - `tex_coords`: `[u, v]` in normalized (0–1) texture space
    pub const fn new(position: [f32; 3], color: [f32; 3], tex_coords: [f32; 2]) -> Self {
        Self {
            position,
            color,
            tex_coords,
        }
    }
}

impl VertexLayout for TexturedVertex {
    const ATTRIBUTES: &'static [VertexAttribute] = &[
        VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: VertexFormat::Float32x3,
        },
        VertexAttribute {
            offset: 12,
            shader_location: 1,
            format: VertexFormat::Float32x3,
        },
        VertexAttribute {
            offset: 24,
            shader_location: 2,
            format: VertexFormat::Float32x2,
        },
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLOAT: u64 = std::mem::size_of::<f32>() as u64;

    #[test]
    fn color_vertex_is_six_interleaved_floats() {
        let desc = ColorVertex::desc();
        assert_eq!(desc.array_stride, 6 * FLOAT);
        assert_eq!(desc.attributes.len(), 2);

        let position = desc.attributes[0];
        assert_eq!(position.shader_location, 0);
        assert_eq!(position.offset, 0);
        assert_eq!(position.format.size(), 3 * FLOAT);

        let color = desc.attributes[1];
        assert_eq!(color.shader_location, 1);
        assert_eq!(color.offset, 3 * FLOAT);
        assert_eq!(color.format.size(), 3 * FLOAT);
    }

    #[test]
    fn textured_vertex_attributes_fit_the_stride() {
        let desc = TexturedVertex::desc();
        assert_eq!(desc.array_stride, 8 * FLOAT);

        for (location, attr) in desc.attributes.iter().enumerate() {
            assert_eq!(attr.shader_location, location as u32);
            assert!(attr.offset + attr.format.size() <= desc.array_stride);
        }
    }
}
