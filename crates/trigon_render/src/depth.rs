use wgpu::{
    Device, Extent3d, TextureDescriptor, TextureDimension, TextureFormat, TextureUsages,
    TextureView,
};

pub const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

/// Depth attachment matching the surface size; recreated on resize
pub(crate) struct DepthBuffer {
    view: TextureView,
    size: (u32, u32),
}

impl DepthBuffer {
    pub fn new(device: &Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&TextureDescriptor {
            label: Some("Depth Texture"),
            size: Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        Self {
            view: texture.create_view(&Default::default()),
            size: (width, height),
        }
    }

    pub fn view(&self) -> &TextureView {
        &self.view
    }

    pub fn resize(&mut self, device: &Device, width: u32, height: u32) {
        if self.size == (width, height) {
            return;
        }
        *self = Self::new(device, width, height);
    }
}
