//! Model/view/projection transforms.
//!
//! Convention, used everywhere in this workspace: matrices are `glam::Mat4`,
//! column-major, multiplying column vectors on the right (`clip = P * V * M * p`).
//! A matrix uploaded with `to_cols_array` is laid out exactly as WGSL's
//! `mat4x4<f32>` expects, so no transposition happens anywhere.
//!
//! Projection follows the wgpu clip-space convention: right-handed view space
//! looking down -Z, depth mapped to `[0, 1]`.

use glam::{Mat3, Mat4, Vec3};

use crate::config::SceneConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transforms {
    pub model: Mat4,
    pub view: Mat4,
    pub proj: Mat4,
}

impl Transforms {
    /// Build the fixed transforms for a viewport of `width`×`height` pixels.
    /// Zero dimensions are clamped to 1 so the aspect stays finite.
    pub fn for_viewport(config: &SceneConfig, width: u32, height: u32) -> Self {
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        Self {
            model: Mat4::IDENTITY,
            view: Mat4::from_translation(Vec3::new(0.0, 0.0, -config.camera_distance)),
            proj: Mat4::perspective_rh(
                config.fov_y_degrees.to_radians(),
                aspect,
                config.z_near,
                config.z_far,
            ),
        }
    }

    /// Rotational part of the model matrix, applied to normals, tangents and
    /// bitangents. Assumes no non-uniform scale.
    pub fn model_rotation(&self) -> Mat3 {
        Mat3::from_mat4(self.model)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.proj * self.view
    }
}
