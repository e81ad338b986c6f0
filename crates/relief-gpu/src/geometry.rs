use relief_core::geometry::{Vertex, QUAD_INDICES, QUAD_VERTICES};
use wgpu::util::DeviceExt;
use wgpu::{Buffer, Device};

/// Attribute layout of [`Vertex`]; locations match `scene.wgsl`'s `VertexIn`.
pub const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
    0 => Float32x3, // position
    1 => Float32x2, // uv
    2 => Float32x3, // normal
    3 => Float32x3, // tangent
    4 => Float32x3  // bitangent
];

pub fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRIBUTES,
    }
}

/// Static vertex and index buffers for the quad. Uploaded once.
pub struct GeometryBuffer {
    pub vertices: Buffer,
    pub indices: Buffer,
    pub index_count: u32,
}

impl GeometryBuffer {
    pub fn quad(device: &Device) -> Self {
        Self::new(device, &QUAD_VERTICES, &QUAD_INDICES)
    }

    pub fn new(device: &Device, vertices: &[Vertex], indices: &[u32]) -> Self {
        let vertex_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vertices"),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_indices"),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertices: vertex_buf,
            indices: index_buf,
            index_count: indices.len() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_matches_vertex_size() {
        assert_eq!(vertex_layout().array_stride, 56);
    }

    #[test]
    fn attribute_offsets_follow_field_order() {
        let offsets: Vec<_> = VERTEX_ATTRIBUTES.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 20, 32, 44]);
        let locations: Vec<_> = VERTEX_ATTRIBUTES.iter().map(|a| a.shader_location).collect();
        assert_eq!(locations, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn attributes_cover_whole_vertex() {
        let last = VERTEX_ATTRIBUTES[4];
        assert_eq!(last.offset + last.format.size(), vertex_layout().array_stride);
    }
}
