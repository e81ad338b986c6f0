//! Shader build layer: turns WGSL text into pipelines, reporting compile and
//! link problems as [`RenderError::ShaderBuild`] instead of a device panic.

use wgpu::{Device, ShaderModule};

use crate::context::validation_scope;
use crate::error::{RenderError, RenderResult};

pub const SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");
pub const POST_WGSL: &str = include_str!("../shaders/post.wgsl");

/// Build a module and its pipeline. Anything wgpu reports while `build` runs
/// becomes a fatal shader build error carrying the diagnostic text.
pub fn checked<T>(device: &Device, label: &str, build: impl FnOnce() -> T) -> RenderResult<T> {
    validation_scope(device, build).map_err(|err| RenderError::shader(label, err))
}

pub fn create_module(device: &Device, label: &str, source: &str) -> ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    })
}
