//! Per-pixel lighting for the textured quad.
//!
//! CPU model of `scene.wgsl`. Keep the two in step: every constant below has
//! a twin in the shader.

use glam::{Mat3, Vec2, Vec3, Vec4};

use crate::camera::Transforms;
use crate::geometry::Vertex;

/// Horizontal scroll speed, in UV units per second.
pub const SCROLL_SPEED: f32 = 0.10;
pub const RIPPLE_AMPLITUDE: f32 = 0.02;
pub const RIPPLE_FREQUENCY: f32 = 10.0;
/// Angular speed of the ripple phase; its period in time is `TAU / RIPPLE_SPEED`.
pub const RIPPLE_SPEED: f32 = 2.0;

pub const AMBIENT: f32 = 0.15;
pub const SPECULAR_COLOR: Vec3 = Vec3::splat(0.25);
pub const SHININESS: f32 = 48.0;

/// Scrolls U with time and ripples V with a sine whose phase follows the
/// unscrolled U. Stateless.
pub fn animated_uv(uv: Vec2, time: f32) -> Vec2 {
    Vec2::new(
        uv.x + time * SCROLL_SPEED,
        uv.y + ripple(uv.x, time),
    )
}

/// Vertical offset added by the ripple.
pub fn ripple(u: f32, time: f32) -> f32 {
    (u * RIPPLE_FREQUENCY + time * RIPPLE_SPEED).sin() * RIPPLE_AMPLITUDE
}

// ---------------------------------------------------------------------------
// Tangent frame
// ---------------------------------------------------------------------------

/// World-space tangent basis at a vertex (or, interpolated, at a pixel).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TangentFrame {
    pub tangent: Vec3,
    pub bitangent: Vec3,
    pub normal: Vec3,
}

impl TangentFrame {
    /// Rotate a vertex's basis into world space and renormalize each axis.
    pub fn from_vertex(transforms: &Transforms, vertex: &Vertex) -> Self {
        let rot = transforms.model_rotation();
        Self {
            tangent: (rot * Vec3::from(vertex.tangent)).normalize(),
            bitangent: (rot * Vec3::from(vertex.bitangent)).normalize(),
            normal: (rot * Vec3::from(vertex.normal)).normalize(),
        }
    }

    /// Columns are T, B, N: multiplies a tangent-space vector into world space.
    pub fn matrix(&self) -> Mat3 {
        Mat3::from_cols(self.tangent, self.bitangent, self.normal)
    }
}

/// Texture values fetched at the animated UV.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    pub diffuse: Vec3,
    pub overlay: Vec4,
    /// Raw normal-map texel in `[0, 1]`.
    pub normal_texel: Vec3,
}

/// Light and eye placement for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSetup {
    pub light_position: Vec3,
    pub view_position: Vec3,
    pub mix_factor: f32,
}

/// Diffuse plus the overlay, weighted by its alpha and the mix factor.
pub fn base_color(sample: &SurfaceSample, mix_factor: f32) -> Vec3 {
    sample.diffuse + sample.overlay.truncate() * sample.overlay.w * mix_factor
}

/// Decode a `[0, 1]` normal-map texel to a `[-1, 1]` tangent-space vector.
pub fn decode_normal(texel: Vec3) -> Vec3 {
    texel * 2.0 - Vec3::ONE
}

/// Normal used for lighting. With the map disabled this is the interpolated
/// geometric normal regardless of what the map holds.
pub fn shading_normal(frame: &TangentFrame, normal_texel: Vec3, use_normal_map: bool) -> Vec3 {
    if use_normal_map {
        (frame.matrix() * decode_normal(normal_texel).normalize()).normalize()
    } else {
        frame.normal.normalize()
    }
}

/// Ambient + Lambert + Blinn-Phong for one pixel. Output alpha is implicitly 1.
pub fn shade(
    frame: &TangentFrame,
    sample: &SurfaceSample,
    frag_pos: Vec3,
    light: &LightSetup,
    use_normal_map: bool,
) -> Vec3 {
    let color = base_color(sample, light.mix_factor);
    let n = shading_normal(frame, sample.normal_texel, use_normal_map);
    let l = (light.light_position - frag_pos).normalize();
    let v = (light.view_position - frag_pos).normalize();
    let h = (l + v).normalize();

    let diffuse = n.dot(l).max(0.0);
    let specular = n.dot(h).max(0.0).powf(SHININESS);

    AMBIENT * color + diffuse * color + SPECULAR_COLOR * specular
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;
    use crate::geometry::QUAD_VERTICES;
    use crate::post::{self, ColorImage, PostMode};
    use std::f32::consts::TAU;

    fn flat_frame() -> TangentFrame {
        let t = Transforms::for_viewport(&SceneConfig::default(), 1000, 700);
        TangentFrame::from_vertex(&t, &QUAD_VERTICES[0])
    }

    fn sample(diffuse: Vec3, normal_texel: Vec3) -> SurfaceSample {
        SurfaceSample {
            diffuse,
            overlay: Vec4::ZERO,
            normal_texel,
        }
    }

    // --- Animated UV ----------------------------------------------------------

    #[test]
    fn animated_uv_at_time_zero_only_ripples() {
        let uv = Vec2::new(0.0, 0.5);
        let out = animated_uv(uv, 0.0);
        assert_eq!(out.x, 0.0);
        assert!((out.y - 0.5).abs() < 1e-6, "sin(0) ripple should vanish");
    }

    #[test]
    fn ripple_is_periodic_in_time() {
        let period = TAU / RIPPLE_SPEED;
        for i in 0..16 {
            let u = i as f32 / 16.0;
            let a = ripple(u, 0.4);
            let b = ripple(u, 0.4 + period);
            assert!((a - b).abs() < 1e-5, "u={u}: {a} vs {b}");
        }
    }

    #[test]
    fn scroll_repeats_under_modulo_one() {
        let uv = Vec2::new(0.3, 0.2);
        let period = 1.0 / SCROLL_SPEED;
        let a = animated_uv(uv, 1.0).x.rem_euclid(1.0);
        let b = animated_uv(uv, 1.0 + period).x.rem_euclid(1.0);
        assert!((a - b).abs() < 1e-4, "{a} vs {b}");
    }

    #[test]
    fn ripple_stays_within_amplitude() {
        for i in 0..100 {
            let r = ripple(i as f32 * 0.013, i as f32 * 0.07);
            assert!(r.abs() <= RIPPLE_AMPLITUDE + 1e-7);
        }
    }

    // --- Normal selection -----------------------------------------------------

    #[test]
    fn disabled_normal_map_ignores_texel() {
        let frame = flat_frame();
        for texel in [Vec3::ZERO, Vec3::ONE, Vec3::new(0.9, 0.1, 0.3)] {
            assert_eq!(shading_normal(&frame, texel, false), Vec3::Z);
        }
    }

    #[test]
    fn flat_normal_texel_reproduces_geometric_normal() {
        let frame = flat_frame();
        let n = shading_normal(&frame, Vec3::new(0.5, 0.5, 1.0), true);
        assert!((n - Vec3::Z).length() < 1e-6, "got {n}");
    }

    #[test]
    fn tilted_texel_rotates_through_tangent_frame() {
        let frame = flat_frame();
        // Tangent-space +X maps to the quad's world +X tangent.
        let n = shading_normal(&frame, Vec3::new(1.0, 0.5, 0.5), true);
        assert!((n - Vec3::X).length() < 1e-6, "got {n}");
    }

    // --- Lighting -------------------------------------------------------------

    #[test]
    fn overlay_is_weighted_by_alpha_and_mix() {
        let s = SurfaceSample {
            diffuse: Vec3::splat(0.2),
            overlay: Vec4::new(1.0, 0.0, 0.0, 0.5),
            normal_texel: Vec3::new(0.5, 0.5, 1.0),
        };
        let c = base_color(&s, 0.8);
        assert!((c - Vec3::new(0.6, 0.2, 0.2)).length() < 1e-6, "got {c}");
    }

    #[test]
    fn light_behind_surface_leaves_ambient_only() {
        let frame = flat_frame();
        let base = Vec3::new(0.5, 0.4, 0.3);
        let light = LightSetup {
            light_position: Vec3::new(0.0, 0.0, -3.0),
            view_position: Vec3::new(0.0, 0.0, -2.0),
            mix_factor: 0.85,
        };
        let out = shade(&frame, &sample(base, Vec3::new(0.5, 0.5, 1.0)), Vec3::ZERO, &light, true);
        assert!((out - AMBIENT * base).length() < 1e-6, "got {out}");
    }

    #[test]
    fn head_on_light_through_grayscale_post() {
        // Light and eye straight above the fragment: N·L = 1 and N·H = 1.
        let frame = flat_frame();
        let base = Vec3::new(0.3, 0.5, 0.2);
        let light = LightSetup {
            light_position: Vec3::new(0.0, 0.0, 1.5),
            view_position: Vec3::new(0.0, 0.0, 2.0),
            mix_factor: 0.85,
        };
        let lit = shade(&frame, &sample(base, Vec3::new(0.5, 0.5, 1.0)), Vec3::ZERO, &light, true);
        let expected_lit = (AMBIENT + 1.0) * base + SPECULAR_COLOR;
        assert!((lit - expected_lit).length() < 1e-5, "lit {lit} vs {expected_lit}");

        let img = ColorImage::new(1, 1, lit);
        let time = 0.0;
        let out = post::process_texel(PostMode::Grayscale, &img, 0, 0, time);
        let expected = post::gamma_encode(Vec3::splat(
            post::luma(expected_lit) * post::scanline(0.5, time),
        ));
        assert!((out - expected).length() < 1e-5, "out {out} vs {expected}");
    }

    #[test]
    fn toggling_normal_map_changes_shading_for_tilted_map() {
        let frame = flat_frame();
        let light = LightSetup {
            light_position: Vec3::new(0.0, 0.0, 1.5),
            view_position: Vec3::new(0.0, 0.0, 2.0),
            mix_factor: 0.85,
        };
        let s = sample(Vec3::ONE, Vec3::new(1.0, 0.5, 0.5));
        let with_map = shade(&frame, &s, Vec3::ZERO, &light, true);
        let without = shade(&frame, &s, Vec3::ZERO, &light, false);
        assert!(with_map.x < without.x);
        assert!((without - Vec3::splat(AMBIENT + 1.0) - SPECULAR_COLOR).length() < 1e-5);
    }
}
