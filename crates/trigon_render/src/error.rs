use std::{io, path::PathBuf};

use thiserror::Error;

use crate::shader::Stage;

/// Everything that can go wrong while bringing up the GPU or loading resources
///
/// None of these are recoverable for the demo; they bubble up to `main` which
/// prints them & exits
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to initialize graphics context: {0}")]
    ContextInit(String),

    #[error("failed to compile {stage} stage: {log}\n--- source ---\n{code}")]
    ShaderCompile {
        stage: Stage,
        code: String,
        log: String,
    },

    #[error("failed to link program: {log}")]
    ProgramLink { log: String },

    #[error("failed to read {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode image: {0}")]
    ImageDecode(#[source] image::ImageError),

    #[error("unsupported stride {stride} for image of width {width} (expected {expected})")]
    UnsupportedStride {
        width: u32,
        stride: u32,
        expected: u64,
    },

    #[error("pixel data is {actual} bytes, expected {expected} for {height} rows")]
    PixelDataLength {
        height: u32,
        expected: u64,
        actual: usize,
    },
}

impl From<wgpu::CreateSurfaceError> for RenderError {
    fn from(err: wgpu::CreateSurfaceError) -> Self {
        Self::ContextInit(err.to_string())
    }
}

impl From<wgpu::RequestAdapterError> for RenderError {
    fn from(err: wgpu::RequestAdapterError) -> Self {
        Self::ContextInit(err.to_string())
    }
}

impl From<wgpu::RequestDeviceError> for RenderError {
    fn from(err: wgpu::RequestDeviceError) -> Self {
        Self::ContextInit(err.to_string())
    }
}
