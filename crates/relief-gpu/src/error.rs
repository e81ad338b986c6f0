//! Fatal startup errors.
//!
//! Every variant here ends the process: there is no recovery path once a
//! resource fails to build. Per-frame surface errors are wgpu's own type and
//! are handled by the event loop.

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("failed to decode image {}: {source}", .path.display())]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("malformed image data: {0}")]
    MalformedImage(String),

    #[error("shader `{label}` failed to build:\n{message}")]
    ShaderBuild { label: String, message: String },

    #[error("offscreen target incomplete: {0}")]
    IncompleteTarget(String),

    #[error("no suitable GPU adapter found")]
    NoAdapter,

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,

    #[error("failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
}

impl RenderError {
    pub fn shader<L: ToString, M: ToString>(label: L, message: M) -> Self {
        RenderError::ShaderBuild {
            label: label.to_string(),
            message: message.to_string(),
        }
    }

    pub fn malformed<T: ToString>(msg: T) -> Self {
        RenderError::MalformedImage(msg.to_string())
    }

    pub fn incomplete<T: ToString>(msg: T) -> Self {
        RenderError::IncompleteTarget(msg.to_string())
    }
}

pub type RenderResult<T> = Result<T, RenderError>;
