use glam::Vec3;

/// Paths of the three source images, relative to the working directory.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetPaths {
    pub diffuse: &'static str,
    pub overlay: &'static str,
    pub normal: &'static str,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            diffuse: "assets/diffuse.jpg",
            overlay: "assets/overlay.png",
            normal: "assets/normal.png",
        }
    }
}

/// A point light travelling an ellipse in the horizontal plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightOrbit {
    pub radius_x: f32,
    pub radius_z: f32,
    pub center_z: f32,
    pub height: f32,
    /// Radians per second.
    pub speed: f32,
}

impl LightOrbit {
    /// World-space light position at `time` seconds.
    pub fn position(&self, time: f32) -> Vec3 {
        let angle = time * self.speed;
        Vec3::new(
            self.radius_x * angle.cos(),
            self.height,
            self.center_z + self.radius_z * angle.sin(),
        )
    }
}

impl Default for LightOrbit {
    fn default() -> Self {
        Self {
            radius_x: 1.2,
            radius_z: 0.5,
            center_z: 1.5,
            height: 0.8,
            speed: 0.7,
        }
    }
}

/// Compile-time scene configuration. There is no runtime surface for any of
/// these; the interactive toggles live in [`crate::interaction`].
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub window_width: u32,
    pub window_height: u32,
    pub fov_y_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,
    /// Distance of the eye from the quad along +Z.
    pub camera_distance: f32,
    /// Weight applied to `overlay.alpha` when compositing onto the diffuse.
    pub mix_factor: f32,
    pub clear_color: [f64; 4],
    pub light: LightOrbit,
    pub assets: AssetPaths,
}

impl SceneConfig {
    /// Eye position used for the specular half-vector.
    pub fn view_position(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.camera_distance)
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            window_width: 1000,
            window_height: 700,
            fov_y_degrees: 60.0,
            z_near: 0.1,
            z_far: 10.0,
            camera_distance: 2.0,
            mix_factor: 0.85,
            clear_color: [0.08, 0.10, 0.12, 1.0],
            light: LightOrbit::default(),
            assets: AssetPaths::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_starts_on_positive_x() {
        let p = LightOrbit::default().position(0.0);
        assert!((p - Vec3::new(1.2, 0.8, 1.5)).length() < 1e-6, "got {p}");
    }

    #[test]
    fn light_keeps_fixed_height() {
        let orbit = LightOrbit::default();
        for i in 0..20 {
            let p = orbit.position(i as f32 * 0.37);
            assert!((p.y - 0.8).abs() < 1e-6);
        }
    }

    #[test]
    fn light_orbit_is_periodic() {
        let orbit = LightOrbit::default();
        let period = std::f32::consts::TAU / orbit.speed;
        let a = orbit.position(0.3);
        let b = orbit.position(0.3 + period);
        assert!((a - b).length() < 1e-4, "{a} vs {b}");
    }

    #[test]
    fn eye_sits_on_camera_axis() {
        let cfg = SceneConfig::default();
        assert_eq!(cfg.view_position(), Vec3::new(0.0, 0.0, 2.0));
    }
}
