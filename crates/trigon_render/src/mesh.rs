use std::marker::PhantomData;

use wgpu::{
    Buffer, BufferUsages, Device, IndexFormat, RenderPass,
    util::{BufferInitDescriptor, DeviceExt},
};

use crate::vertex::{ColorVertex, TexturedVertex, VertexLayout};

/// How a mesh gets drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawCall {
    /// Plain draw over the vertex buffer
    Arrays { vertex_count: u32 },
    /// Indexed draw through a `u32` index buffer
    Indexed { index_count: u32 },
}

/// Vertex & optional index data waiting to be uploaded
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData<V> {
    pub vertices: Vec<V>,
    pub indices: Option<Vec<u32>>,
}

impl<V: VertexLayout> MeshData<V> {
    pub fn new(vertices: Vec<V>) -> Self {
        Self {
            vertices,
            indices: None,
        }
    }

    pub fn indexed(vertices: Vec<V>, indices: Vec<u32>) -> Self {
        Self {
            vertices,
            indices: Some(indices),
        }
    }

    /// Number of `f32`s in the interleaved vertex buffer
    pub fn float_count(&self) -> usize {
        bytemuck::cast_slice::<V, f32>(&self.vertices).len()
    }

    pub fn draw_call(&self) -> DrawCall {
        match &self.indices {
            Some(indices) => DrawCall::Indexed {
                index_count: indices.len() as u32,
            },
            None => DrawCall::Arrays {
                vertex_count: self.vertices.len() as u32,
            },
        }
    }
}

impl MeshData<ColorVertex> {
    /// A triangle with a red, green & blue corner
    pub fn triangle() -> Self {
        Self::new(vec![
            ColorVertex::new([0.5, -0.5, 0.0], [1.0, 0.0, 0.0]),
            ColorVertex::new([-0.5, -0.5, 0.0], [0.0, 1.0, 0.0]),
            ColorVertex::new([0.0, 0.75, 0.0], [0.0, 0.0, 1.0]),
        ])
    }
}

impl MeshData<TexturedVertex> {
    /// A full-texture quad made of two triangles sharing the diagonal
    ///
    /// Sits behind the triangle (larger depth) so both stay visible
    pub fn quad() -> Self {
        Self::indexed(
            vec![
                TexturedVertex::new([0.75, 0.75, 0.5], [1.0, 1.0, 1.0], [1.0, 0.0]),
                TexturedVertex::new([0.75, -0.75, 0.5], [1.0, 1.0, 1.0], [1.0, 1.0]),
                TexturedVertex::new([-0.75, -0.75, 0.5], [1.0, 1.0, 1.0], [0.0, 1.0]),
                TexturedVertex::new([-0.75, 0.75, 0.5], [1.0, 1.0, 1.0], [0.0, 0.0]),
            ],
            vec![0, 1, 3, 1, 2, 3],
        )
    }
}

/// GPU-resident mesh with a fixed vertex layout
pub struct Mesh<V> {
    vertex_buffer: Buffer,
    index_buffer: Option<Buffer>,
    draw_call: DrawCall,
    _layout: PhantomData<V>,
}

impl<V: VertexLayout> Mesh<V> {
    /// Uploads the vertex (and index) data once; the buffers are never written again
    pub fn upload(device: &Device, data: &MeshData<V>) -> Self {
        let vertex_buffer = device.create_buffer_init(&BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: BufferUsages::VERTEX,
        });
        let index_buffer = data.indices.as_ref().map(|indices| {
            device.create_buffer_init(&BufferInitDescriptor {
                label: Some("Mesh Index Buffer"),
                contents: bytemuck::cast_slice(indices),
                usage: BufferUsages::INDEX,
            })
        });

        log::debug!(
            "uploaded mesh: {} vertices, {:?}",
            data.vertices.len(),
            data.draw_call()
        );

        Self {
            vertex_buffer,
            index_buffer,
            draw_call: data.draw_call(),
            _layout: PhantomData,
        }
    }

    pub fn draw(&self, pass: &mut RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));

        match (self.draw_call, &self.index_buffer) {
            (DrawCall::Indexed { index_count }, Some(index_buffer)) => {
                pass.set_index_buffer(index_buffer.slice(..), IndexFormat::Uint32);
                pass.draw_indexed(0..index_count, 0, 0..1);
            }
            (DrawCall::Arrays { vertex_count }, _) => pass.draw(0..vertex_count, 0..1),
            (DrawCall::Indexed { .. }, None) => {
                log::error!("indexed mesh has no index buffer; skipping draw");
            }
        }
    }
}
