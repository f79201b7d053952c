use std::path::Path;

use image::{
    DynamicImage, ImageError,
    error::{LimitError, LimitErrorKind},
};
use wgpu::{
    BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayout, BindingResource, Device,
    Extent3d, Origin3d, Queue, RenderPass, TexelCopyBufferLayout, TexelCopyTextureInfo,
    TextureAspect, TextureDescriptor, TextureDimension, TextureFormat, TextureUsages,
};

use crate::error::RenderError;

/// Decoded image data, tightly packed 8-bit RGBA
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl TextureImage {
    /// Opens & decodes the image at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let path = path.as_ref();
        log::info!("loading texture {}", path.display());

        let img = image::open(path).map_err(|err| match err {
            ImageError::IoError(source) => RenderError::FileRead {
                path: path.to_path_buf(),
                source,
            },
            other => RenderError::ImageDecode(other),
        })?;
        Self::from_dynamic(img)
    }

    /// Converts any decoded image to RGBA8
    pub fn from_dynamic(img: DynamicImage) -> Result<Self, RenderError> {
        let rgba = match img {
            DynamicImage::ImageRgba8(buf) => buf,
            other => other.to_rgba8(),
        };
        let (width, height) = rgba.dimensions();
        let pixels = rgba.into_raw();
        let stride = match height {
            0 => 0,
            h => (pixels.len() / h as usize) as u32,
        };
        Self::from_raw(width, height, stride, pixels)
    }

    /// Wraps raw RGBA rows, rejecting anything that isn't tightly packed
    ///
    /// - `stride`: bytes per row; must be exactly `width * 4`
    pub fn from_raw(
        width: u32,
        height: u32,
        stride: u32,
        pixels: Vec<u8>,
    ) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::ImageDecode(ImageError::Limits(
                LimitError::from_kind(LimitErrorKind::DimensionError),
            )));
        }
        let packed = u64::from(width) * 4;
        if u64::from(stride) != packed {
            return Err(RenderError::UnsupportedStride {
                width,
                stride,
                expected: packed,
            });
        }
        let expected = u64::from(stride) * u64::from(height);
        if pixels.len() as u64 != expected {
            return Err(RenderError::PixelDataLength {
                height,
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn stride(&self) -> u32 {
        self.width * 4
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// A GPU texture that can be bound in shaders for rendering
///
/// Wraps a `wgpu::Texture`, its view, sampler, & bind group
pub struct Texture {
    bind_group: BindGroup,
}

impl Texture {
    /// Uploads the image & builds the bind group using the layout
    pub fn upload(
        device: &Device,
        queue: &Queue,
        bind_group_layout: &BindGroupLayout,
        image: &TextureImage,
    ) -> Self {
        let (width, height) = image.dimensions();
        let size = Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&TextureDescriptor {
            label: Some("Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: TextureFormat::Rgba8UnormSrgb,
            usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: Origin3d::ZERO,
                aspect: TextureAspect::All,
            },
            image.pixels(),
            TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(image.stride()),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&Default::default());
        let sampler = device.create_sampler(&Default::default());
        let bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some("Texture Bind Group"),
            layout: bind_group_layout,
            entries: &[
                BindGroupEntry {
                    binding: 0,
                    resource: BindingResource::TextureView(&view),
                },
                BindGroupEntry {
                    binding: 1,
                    resource: BindingResource::Sampler(&sampler),
                },
            ],
        });

        log::debug!("uploaded {width}x{height} texture");
        Self { bind_group }
    }

    /// Binds this texture at the given index in the render pass
    ///
    /// - `index` must match the bind group index used in the pipeline layout
    pub fn bind(&self, pass: &mut RenderPass<'_>, index: u32) {
        pass.set_bind_group(index, &self.bind_group, &[]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb, RgbImage, Rgba};
    use std::{env, fs, path::PathBuf};

    fn scratch(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("trigon-texture-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn rejects_padded_rows() {
        // 2 pixels wide, rows padded to 12 bytes
        let err = TextureImage::from_raw(2, 2, 12, vec![0; 24]).unwrap_err();
        assert!(matches!(
            err,
            RenderError::UnsupportedStride {
                width: 2,
                stride: 12,
                expected: 8
            }
        ));
        assert_eq!(
            err.to_string(),
            "unsupported stride 12 for image of width 2 (expected 8)"
        );
    }

    #[test]
    fn stride_error_for_huge_width_formats() {
        let err = TextureImage::from_raw(u32::MAX, 1, 0, Vec::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unsupported stride 0 for image of width 4294967295 (expected 17179869180)"
        );
    }

    #[test]
    fn rejects_short_pixel_data() {
        let err = TextureImage::from_raw(2, 2, 8, vec![0; 12]).unwrap_err();
        assert!(matches!(
            err,
            RenderError::PixelDataLength {
                height: 2,
                expected: 16,
                actual: 12
            }
        ));
        assert_eq!(
            err.to_string(),
            "pixel data is 12 bytes, expected 16 for 2 rows"
        );
    }

    #[test]
    fn rejects_empty_images() {
        let err = TextureImage::from_raw(0, 0, 0, Vec::new()).unwrap_err();
        assert!(matches!(err, RenderError::ImageDecode(_)));
    }

    #[test]
    fn keeps_tightly_packed_rgba_untouched() {
        let pixels: Vec<u8> = (0..16).collect();
        let img = TextureImage::from_raw(2, 2, 8, pixels.clone()).unwrap();
        assert_eq!(img.dimensions(), (2, 2));
        assert_eq!(img.stride(), 8);
        assert_eq!(img.pixels(), pixels.as_slice());
    }

    #[test]
    fn converts_rgb_to_opaque_rgba() {
        let rgb = RgbImage::from_pixel(3, 2, Rgb([10, 20, 30]));
        let img = TextureImage::from_dynamic(DynamicImage::ImageRgb8(rgb)).unwrap();

        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.stride(), 12);
        assert_eq!(img.pixels().len(), 24);
        assert_eq!(&img.pixels()[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn opens_png_from_disk() {
        let path = scratch("checker.png");
        let buf: ImageBuffer<Rgba<u8>, _> =
            ImageBuffer::from_fn(4, 4, |x, y| Rgba([(x * 60) as u8, (y * 60) as u8, 0, 255]));
        buf.save(&path).unwrap();

        let img = TextureImage::open(&path).unwrap();
        assert_eq!(img.dimensions(), (4, 4));
        assert_eq!(img.pixels(), buf.as_raw().as_slice());
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = TextureImage::open(scratch("missing.png")).unwrap_err();
        assert!(matches!(err, RenderError::FileRead { .. }));
    }

    #[test]
    fn garbage_file_is_a_decode_error() {
        let path = scratch("garbage.png");
        fs::write(&path, b"definitely not a png").unwrap();

        let err = TextureImage::open(&path).unwrap_err();
        assert!(matches!(err, RenderError::ImageDecode(_)));
    }
}
