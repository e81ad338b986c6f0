use wgpu::{Device, Texture, TextureView};

use crate::context::validation_scope;
use crate::error::{RenderError, RenderResult};

pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24PlusStencil8;

/// Hand-off between the scene pass and the post pass: one color attachment
/// the post pass samples, plus a combined depth/stencil attachment.
/// Rebuilt from scratch whenever the viewport size changes.
pub struct OffscreenTarget {
    pub color_tex: Texture,
    pub color_view: TextureView,
    pub depth_tex: Texture,
    pub depth_view: TextureView,
    pub width: u32,
    pub height: u32,
}

/// Checks a requested size against the device's 2D texture limit.
pub fn check_complete(width: u32, height: u32, max_dimension: u32) -> RenderResult<()> {
    if width == 0 || height == 0 {
        return Err(RenderError::incomplete(format!(
            "zero-sized attachment {width}×{height}"
        )));
    }
    if width > max_dimension || height > max_dimension {
        return Err(RenderError::incomplete(format!(
            "{width}×{height} exceeds device limit {max_dimension}"
        )));
    }
    Ok(())
}

fn creation_failed(err: impl std::fmt::Display) -> RenderError {
    RenderError::incomplete(format!("attachment creation failed: {err}"))
}

impl OffscreenTarget {
    pub fn new(device: &Device, width: u32, height: u32) -> RenderResult<Self> {
        check_complete(width, height, device.limits().max_texture_dimension_2d)?;

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let (color_tex, depth_tex) = validation_scope(device, || {
            let color = device.create_texture(&wgpu::TextureDescriptor {
                label: Some("offscreen_color"),
                size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: COLOR_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                    | wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            });
            let depth = device.create_texture(&wgpu::TextureDescriptor {
                label: Some("offscreen_depth"),
                size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: DEPTH_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            });
            (color, depth)
        })
        .map_err(creation_failed)?;

        let color_view = color_tex.create_view(&Default::default());
        let depth_view = depth_tex.create_view(&Default::default());

        log::debug!("Offscreen target built: {}×{}", width, height);

        Ok(Self {
            color_tex,
            color_view,
            depth_tex,
            depth_view,
            width,
            height,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
