use bytemuck::{Pod, Zeroable};

/// One quad corner with its full tangent frame.
///
/// `repr(C)` + `bytemuck` lets the slice go straight into a vertex buffer;
/// the attribute layout on the GPU side must match the field order here.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
    pub bitangent: [f32; 3],
}

const fn corner(x: f32, y: f32, u: f32, v: f32) -> Vertex {
    Vertex {
        position: [x, y, 0.0],
        uv: [u, v],
        normal: [0.0, 0.0, 1.0],
        tangent: [1.0, 0.0, 0.0],
        bitangent: [0.0, 1.0, 0.0],
    }
}

/// A 1.6×1.2 quad in the z=0 plane facing +Z, counter-clockwise.
pub const QUAD_VERTICES: [Vertex; 4] = [
    corner(-0.8, -0.6, 0.0, 0.0),
    corner(0.8, -0.6, 1.0, 0.0),
    corner(0.8, 0.6, 1.0, 1.0),
    corner(-0.8, 0.6, 0.0, 1.0),
];

pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 14 * 4);
    }

    #[test]
    fn tangent_frames_are_orthonormal() {
        for v in QUAD_VERTICES {
            let t = Vec3::from(v.tangent);
            let b = Vec3::from(v.bitangent);
            let n = Vec3::from(v.normal);
            for axis in [t, b, n] {
                assert!((axis.length() - 1.0).abs() < 1e-6);
            }
            assert!(t.dot(b).abs() < 1e-6);
            assert!(t.dot(n).abs() < 1e-6);
            assert!(b.dot(n).abs() < 1e-6);
            // Right-handed: T × B = N
            assert!((t.cross(b) - n).length() < 1e-6);
        }
    }

    #[test]
    fn indices_stay_in_range() {
        assert!(QUAD_INDICES.iter().all(|&i| (i as usize) < QUAD_VERTICES.len()));
    }

    #[test]
    fn triangles_wind_counter_clockwise_toward_normal() {
        for tri in QUAD_INDICES.chunks(3) {
            let [a, b, c] =
                [tri[0], tri[1], tri[2]].map(|i| Vec3::from(QUAD_VERTICES[i as usize].position));
            let face = (b - a).cross(c - a);
            assert!(face.z > 0.0, "triangle {tri:?} faces away");
        }
    }

    #[test]
    fn tangent_follows_increasing_u() {
        // Edge 0→1 runs along +X and its U increases, so the tangent must be +X.
        let p0 = Vec3::from(QUAD_VERTICES[0].position);
        let p1 = Vec3::from(QUAD_VERTICES[1].position);
        let du = Vec2::from(QUAD_VERTICES[1].uv) - Vec2::from(QUAD_VERTICES[0].uv);
        assert!(du.x > 0.0);
        assert!((p1 - p0).normalize().dot(Vec3::from(QUAD_VERTICES[0].tangent)) > 0.999);
    }
}
