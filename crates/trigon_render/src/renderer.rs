use std::path::Path;

use wgpu::{
    Color, CommandEncoder, Device, DeviceDescriptor, Instance, LoadOp, Operations, PresentMode,
    Queue, RenderPass, RenderPassColorAttachment, RenderPassDepthStencilAttachment,
    RenderPassDescriptor, RequestAdapterOptions, StoreOp, Surface, SurfaceConfiguration,
    SurfaceError, SurfaceTarget, SurfaceTexture, TextureView, WindowHandle,
};

use crate::{
    bindings::Bindings,
    depth::{DEPTH_FORMAT, DepthBuffer},
    error::RenderError,
    mesh::{Mesh, MeshData},
    pipeline::Layouts,
    shader::{self, GpuBackend, ProgramLayout, ShaderProgram},
    texture::{Texture, TextureImage},
    uniform::{TintUniform, Uniforms},
    vertex::VertexLayout,
    viewport::Viewport,
};

struct RenderTarget {
    surface: Surface<'static>,
    config: SurfaceConfiguration,
}

struct Gpu {
    device: Device,
    queue: Queue,
}

pub struct Frame {
    pub view: TextureView,
    pub encoder: CommandEncoder,
    surface_texture: SurfaceTexture,
}

/// GPU renderer built on `wgpu`
///
/// Owns the surface, device & shared layouts. Programs, meshes & textures are
/// created through it and owned by the caller
pub struct Renderer {
    gpu: Gpu,
    target: RenderTarget,
    depth: DepthBuffer,
    layouts: Layouts,
    uniforms: Uniforms,
    viewport: Viewport,
    clear_color: Color,
}

impl Renderer {
    /// Creates the surface, adapter & device for `window` & configures the surface
    pub async fn new(
        inner_width: u32,
        inner_height: u32,
        window: impl Into<SurfaceTarget<'static>> + WindowHandle,
    ) -> Result<Renderer, RenderError> {
        let instance = Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&RequestAdapterOptions {
                // Force find adapter that can present to this surface
                compatible_surface: Some(&surface),
                ..Default::default()
            })
            .await?;
        log::info!("using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&DeviceDescriptor {
                label: Some("trigon device"),
                ..Default::default()
            })
            .await?;

        // Surfaces can't be configured with a zero size
        let (w, h) = (inner_width.max(1), inner_height.max(1));
        let mut surface_cfg = surface.get_default_config(&adapter, w, h).ok_or_else(|| {
            RenderError::ContextInit("surface is not supported by the adapter".into())
        })?;
        surface_cfg.present_mode = PresentMode::AutoVsync;
        surface.configure(&device, &surface_cfg);

        let depth = DepthBuffer::new(&device, w, h);
        let layouts = Layouts::new(&device);
        let uniforms = Uniforms::new(&device, &layouts.uniform);

        Ok(Renderer {
            gpu: Gpu { device, queue },
            target: RenderTarget {
                surface,
                config: surface_cfg,
            },
            depth,
            layouts,
            uniforms,
            viewport: Viewport::new(w, h),
            clear_color: Color::BLACK,
        })
    }

    /// Compiles & links a program reading vertices laid out as `V`
    ///
    /// Textured programs get the texture layout at group 1 in addition to the
    /// tint uniform at group 0
    pub fn build_program<V: VertexLayout>(
        &self,
        label: &str,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
        textured: bool,
    ) -> Result<ShaderProgram, RenderError> {
        let mut bind_group_layouts = vec![&self.layouts.uniform];
        if textured {
            bind_group_layouts.push(&self.layouts.texture);
        }
        let vertex_buffers = [V::desc()];

        let backend = GpuBackend::new(
            &self.gpu.device,
            ProgramLayout {
                label,
                bind_group_layouts: &bind_group_layouts,
                vertex_buffers: &vertex_buffers,
                color_format: self.target.config.format,
                depth_format: Some(DEPTH_FORMAT),
            },
        );
        let program = shader::build_from_files(&backend, vertex_path, fragment_path)?;

        log::info!("built program '{label}'");
        Ok(program)
    }

    pub fn upload_mesh<V: VertexLayout>(&self, data: &MeshData<V>) -> Mesh<V> {
        Mesh::upload(&self.gpu.device, data)
    }

    pub fn upload_texture(&self, image: &TextureImage) -> Texture {
        Texture::upload(
            &self.gpu.device,
            &self.gpu.queue,
            &self.layouts.texture,
            image,
        )
    }

    /// Begins a new frame, returning the surface texture and command encoder
    pub fn begin_frame(&mut self) -> Option<Frame> {
        let surface_texture = match self.target.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(SurfaceError::Lost | SurfaceError::Outdated) => {
                log::warn!("surface lost or outdated; reconfiguring");
                self.target
                    .surface
                    .configure(&self.gpu.device, &self.target.config);
                return None;
            }
            Err(err) => {
                log::error!("failed to acquire frame: {err}");
                return None;
            }
        };

        let view = surface_texture.texture.create_view(&Default::default());
        let encoder = self.gpu.device.create_command_encoder(&Default::default());

        Some(Frame {
            view,
            encoder,
            surface_texture,
        })
    }

    /// Ends the frame by submitting commands and presenting
    pub fn end_frame(&mut self, frame: Frame) {
        self.gpu.queue.submit(Some(frame.encoder.finish()));
        frame.surface_texture.present();
    }

    /// Starts a pass clearing color & depth, with any pending viewport update applied
    pub fn begin_render_pass<'f>(&mut self, frame: &'f mut Frame) -> RenderPass<'f> {
        let mut pass = frame
            .encoder
            .begin_render_pass(&RenderPassDescriptor {
                label: Some("Frame Pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(self.clear_color),
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
                    view: self.depth.view(),
                    depth_ops: Some(Operations {
                        load: LoadOp::Clear(1.0),
                        store: StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

        self.viewport.apply(&mut pass);
        pass
    }

    /// Binds exactly what `bindings` names, then draws `mesh`
    pub fn draw<V: VertexLayout>(
        &self,
        pass: &mut RenderPass<'_>,
        bindings: &Bindings<'_>,
        mesh: &Mesh<V>,
    ) {
        if !bindings.is_complete() {
            log::warn!("textured program drawn without a texture; skipping draw");
            return;
        }

        bindings.program.bind(pass);
        self.uniforms.bind(pass);
        if let Some(texture) = bindings.texture {
            texture.bind(pass, 1);
        }
        mesh.draw(pass);
    }

    /// Resizes the surface & depth buffer; the viewport follows on the next pass
    pub fn resize(&mut self, w: u32, h: u32) {
        if !self.viewport.resize(w, h) {
            return;
        }
        (self.target.config.width, self.target.config.height) = (w, h);
        self.target
            .surface
            .configure(&self.gpu.device, &self.target.config);
        self.depth.resize(&self.gpu.device, w, h);
    }

    pub fn set_clear_color(&mut self, color: [f64; 4]) {
        self.clear_color = Color {
            r: color[0],
            g: color[1],
            b: color[2],
            a: color[3],
        };
    }

    /// Uploads the tint the color program multiplies every fragment by
    pub fn set_tint(&self, tint: TintUniform) {
        self.uniforms.write(&self.gpu.queue, tint);
    }
}
