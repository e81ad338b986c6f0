use relief_core::camera::Transforms;
use relief_core::config::SceneConfig;
use relief_core::FrameParams;
use wgpu::{BindGroupLayout, Buffer, Device, Queue, RenderPipeline};

use crate::error::RenderResult;
use crate::geometry::{vertex_layout, GeometryBuffer};
use crate::shader::{self, SCENE_WGSL};
use crate::target::{OffscreenTarget, COLOR_FORMAT, DEPTH_FORMAT};
use crate::texture::TextureResource;

/// Per-frame data for `scene.wgsl`. Must match its `SceneUniforms` struct.
/// `repr(C)` + `bytemuck` ensures safe casting to `&[u8]`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniforms {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub light_pos: [f32; 3],
    pub time: f32,
    pub view_pos: [f32; 3],
    pub mix_factor: f32,
    pub use_normal_map: u32,
    pub _pad: [u32; 3], // keep 16-byte alignment
}

impl SceneUniforms {
    pub fn new(transforms: &Transforms, config: &SceneConfig, frame: &FrameParams) -> Self {
        Self {
            model: transforms.model.to_cols_array_2d(),
            view: transforms.view.to_cols_array_2d(),
            proj: transforms.proj.to_cols_array_2d(),
            light_pos: config.light.position(frame.time).to_array(),
            time: frame.time,
            view_pos: config.view_position().to_array(),
            mix_factor: config.mix_factor,
            use_normal_map: frame.toggles.use_normal_map as u32,
            _pad: [0; 3],
        }
    }
}

/// The three textures the scene shader samples.
pub struct SceneTextures {
    pub diffuse: TextureResource,
    pub overlay: TextureResource,
    pub normal: TextureResource,
}

impl SceneTextures {
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut TextureResource> {
        [&mut self.diffuse, &mut self.overlay, &mut self.normal].into_iter()
    }
}

/// Renders the lit, normal-mapped quad into the offscreen target.
pub struct ScenePass {
    pipeline: RenderPipeline,
    bind_group_layout: BindGroupLayout,
    uniform_buf: Buffer,
}

impl ScenePass {
    pub fn new(device: &Device) -> RenderResult<Self> {
        // binding 0      : SceneUniforms
        // binding 1/3/5  : diffuse / overlay / normal texture
        // binding 2/4/6  : matching samplers
        let mut entries = vec![wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }];
        for slot in 0..3u32 {
            entries.push(wgpu::BindGroupLayoutEntry {
                binding: 1 + slot * 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            });
            entries.push(wgpu::BindGroupLayoutEntry {
                binding: 2 + slot * 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            });
        }

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bgl"),
            entries: &entries,
        });

        let uniform_buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene_uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let pipeline = shader::checked(device, "scene", || {
            let module = shader::create_module(device, "scene", SCENE_WGSL);
            let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("scene_pl"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("scene_pipeline"),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &module,
                    entry_point: "vs_main",
                    buffers: &[vertex_layout()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &module,
                    entry_point: "fs_main",
                    targets: &[Some(wgpu::ColorTargetState {
                        format: COLOR_FORMAT,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        })?;

        Ok(Self {
            pipeline,
            bind_group_layout,
            uniform_buf,
        })
    }

    /// Upload uniforms and record the scene render pass into `encoder`.
    /// The result lands in `target.color_tex`, ready for the post pass.
    #[allow(clippy::too_many_arguments)]
    pub fn record(
        &self,
        device: &Device,
        queue: &Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &OffscreenTarget,
        geometry: &GeometryBuffer,
        textures: &SceneTextures,
        uniforms: &SceneUniforms,
        clear: [f64; 4],
    ) {
        queue.write_buffer(&self.uniform_buf, 0, bytemuck::bytes_of(uniforms));

        // Rebuilt every frame: samplers change when mipmapping is toggled.
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bg"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.uniform_buf.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&textures.diffuse.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(textures.diffuse.sampler()),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(&textures.overlay.view),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::Sampler(textures.overlay.sampler()),
                },
                wgpu::BindGroupEntry {
                    binding: 5,
                    resource: wgpu::BindingResource::TextureView(&textures.normal.view),
                },
                wgpu::BindGroupEntry {
                    binding: 6,
                    resource: wgpu::BindingResource::Sampler(textures.normal.sampler()),
                },
            ],
        });

        let [r, g, b, a] = clear;
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("scene_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &target.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(0),
                    store: wgpu::StoreOp::Store,
                }),
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.set_vertex_buffer(0, geometry.vertices.slice(..));
        pass.set_index_buffer(geometry.indices.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..geometry.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relief_core::interaction::ToggleState;

    fn uniforms(time: f32, use_normal_map: bool) -> SceneUniforms {
        let config = SceneConfig::default();
        let transforms = Transforms::for_viewport(&config, 1000, 700);
        let toggles = ToggleState {
            use_normal_map,
            ..ToggleState::default()
        };
        SceneUniforms::new(&transforms, &config, &FrameParams::new(time, toggles))
    }

    #[test]
    fn uniforms_match_wgsl_size() {
        // 3 × mat4 + 2 × (vec3 + f32) + u32 + 3 × pad
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 240);
        assert_eq!(std::mem::size_of::<SceneUniforms>() % 16, 0);
    }

    #[test]
    fn normal_map_flag_is_data_driven() {
        assert_eq!(uniforms(0.0, true).use_normal_map, 1);
        assert_eq!(uniforms(0.0, false).use_normal_map, 0);
    }

    #[test]
    fn light_follows_orbit() {
        let u = uniforms(0.0, true);
        assert_eq!(u.light_pos, [1.2, 0.8, 1.5]);
        assert_eq!(u.view_pos, [0.0, 0.0, 2.0]);
        assert!((u.mix_factor - 0.85).abs() < 1e-6);
    }

    #[test]
    fn matrices_upload_column_major() {
        let u = uniforms(0.0, true);
        // Translation sits in the fourth column.
        assert_eq!(u.view[3], [0.0, 0.0, -2.0, 1.0]);
        assert_eq!(u.model[0], [1.0, 0.0, 0.0, 0.0]);
    }
}
