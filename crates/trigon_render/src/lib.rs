pub mod bindings;
pub mod depth;
pub mod error;
pub mod mesh;
pub mod pipeline;
pub mod renderer;
pub mod shader;
pub mod texture;
pub mod uniform;
pub mod vertex;
pub mod viewport;

pub use bindings::Bindings;
pub use error::RenderError;
pub use mesh::{DrawCall, Mesh, MeshData};
pub use renderer::{Frame, Renderer};
pub use shader::{ShaderBackend, ShaderProgram, Stage};
pub use texture::{Texture, TextureImage};
pub use uniform::TintUniform;
pub use vertex::{ColorVertex, TexturedVertex, VertexLayout};
pub use wgpu::RenderPass;
