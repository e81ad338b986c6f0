use relief_core::camera::Transforms;
use relief_core::config::SceneConfig;
use relief_core::FrameParams;
use wgpu::{Device, Queue, TextureView};

use crate::error::RenderResult;
use crate::geometry::GeometryBuffer;
use crate::post_pass::{PostPass, PostUniforms};
use crate::scene_pass::{SceneTextures, ScenePass, SceneUniforms};
use crate::target::OffscreenTarget;
use crate::texture::{Filtering, TextureResource};

/// Owns every GPU resource of the two-pass pipeline and records one frame
/// at a time: scene pass into the offscreen target, then post pass onto the
/// caller's output view.
pub struct Renderer {
    config: SceneConfig,
    transforms: Transforms,
    textures: SceneTextures,
    geometry: GeometryBuffer,
    target: OffscreenTarget,
    scene_pass: ScenePass,
    post_pass: PostPass,
}

impl Renderer {
    /// Build everything. Any failure here is fatal to the caller.
    pub fn new(
        device: &Device,
        queue: &Queue,
        config: SceneConfig,
        output_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        use_mipmap: bool,
    ) -> RenderResult<Self> {
        let filtering = Filtering::from_mipmap(use_mipmap);
        let load = |label: &str, path: &str| {
            TextureResource::load(device, queue, label, path, filtering)
        };
        let textures = SceneTextures {
            diffuse: load("diffuse", config.assets.diffuse)?,
            overlay: load("overlay", config.assets.overlay)?,
            normal: load("normal", config.assets.normal)?,
        };

        let geometry = GeometryBuffer::quad(device);
        let target = OffscreenTarget::new(device, width, height)?;
        let scene_pass = ScenePass::new(device)?;
        let post_pass = PostPass::new(device, output_format)?;
        let transforms = Transforms::for_viewport(&config, width, height);

        Ok(Self {
            config,
            transforms,
            textures,
            geometry,
            target,
            scene_pass,
            post_pass,
        })
    }

    /// Rebuild the size-dependent resources. A no-op when the size is
    /// unchanged.
    pub fn resize(&mut self, device: &Device, width: u32, height: u32) -> RenderResult<()> {
        if self.target.size() == (width, height) {
            return Ok(());
        }
        self.target = OffscreenTarget::new(device, width, height)?;
        self.transforms = Transforms::for_viewport(&self.config, width, height);
        Ok(())
    }

    /// Apply the mipmap toggle to all three textures.
    pub fn set_mipmap(&mut self, device: &Device, queue: &Queue, enabled: bool) {
        let filtering = Filtering::from_mipmap(enabled);
        for texture in self.textures.iter_mut() {
            if texture.filtering() != filtering {
                texture.set_filtering(device, queue, filtering);
            }
        }
    }

    /// Record and submit both passes for one frame.
    pub fn render(
        &self,
        device: &Device,
        queue: &Queue,
        output: &TextureView,
        frame: &FrameParams,
    ) {
        let scene_uniforms = SceneUniforms::new(&self.transforms, &self.config, frame);
        let post_uniforms = PostUniforms::new(frame);

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame-encoder"),
        });

        // --- 1. Scene pass into the offscreen target ---------------------------
        self.scene_pass.record(
            device,
            queue,
            &mut encoder,
            &self.target,
            &self.geometry,
            &self.textures,
            &scene_uniforms,
            self.config.clear_color,
        );

        // --- 2. Post pass onto the output --------------------------------------
        self.post_pass
            .record(device, queue, &mut encoder, &self.target, output, &post_uniforms);

        queue.submit(std::iter::once(encoder.finish()));
    }
}
