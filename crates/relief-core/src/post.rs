//! Screen-space filters applied to the offscreen scene image.
//!
//! The functions here are the CPU model of `post.wgsl`: same constants, same
//! kernels, same finishing steps. The GPU pass never calls them; the renderer
//! only uses [`PostMode::index`] to feed the shader, while tests use the rest
//! to pin down the filter behaviour without a device.

use glam::Vec3;

/// Rec. 601 luma weights.
pub const LUMA: Vec3 = Vec3::new(0.299, 0.587, 0.114);
pub const GAMMA: f32 = 2.2;

/// Scanline flicker: `BASE + DEPTH * sin(v * FREQUENCY + t * SPEED)`.
pub const SCANLINE_BASE: f32 = 0.98;
pub const SCANLINE_DEPTH: f32 = 0.02;
pub const SCANLINE_FREQUENCY: f32 = 900.0;
pub const SCANLINE_SPEED: f32 = 8.0;

/// Selectable full-screen filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostMode {
    #[default]
    Passthrough,
    Grayscale,
    EdgeDetect,
    BoxBlur,
}

impl PostMode {
    pub const ALL: [PostMode; 4] = [
        PostMode::Passthrough,
        PostMode::Grayscale,
        PostMode::EdgeDetect,
        PostMode::BoxBlur,
    ];

    /// Value written to the shader's `mode` uniform.
    pub fn index(self) -> u32 {
        match self {
            PostMode::Passthrough => 0,
            PostMode::Grayscale => 1,
            PostMode::EdgeDetect => 2,
            PostMode::BoxBlur => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PostMode::Passthrough => "Passthrough",
            PostMode::Grayscale => "Grayscale",
            PostMode::EdgeDetect => "Edge Detect",
            PostMode::BoxBlur => "Box Blur",
        }
    }
}

// ---------------------------------------------------------------------------
// Source image with repeat addressing
// ---------------------------------------------------------------------------

/// Linear RGB image sampled at texel centers. Out-of-range coordinates wrap,
/// matching the repeat address mode the GPU sampler uses.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorImage {
    width: u32,
    height: u32,
    texels: Vec<Vec3>,
}

impl ColorImage {
    pub fn new(width: u32, height: u32, fill: Vec3) -> Self {
        assert!(width > 0 && height > 0, "image must not be empty");
        Self {
            width,
            height,
            texels: vec![fill; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn set(&mut self, x: u32, y: u32, color: Vec3) {
        let idx = (y * self.width + x) as usize;
        self.texels[idx] = color;
    }

    /// Texel at integer coordinates, wrapped into range.
    pub fn fetch(&self, x: i64, y: i64) -> Vec3 {
        let x = x.rem_euclid(self.width as i64) as u32;
        let y = y.rem_euclid(self.height as i64) as u32;
        self.texels[(y * self.width + x) as usize]
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

pub fn luma(color: Vec3) -> f32 {
    color.dot(LUMA)
}

/// Mode-specific filter for the texel at `(x, y)`, before finishing.
pub fn filter(mode: PostMode, src: &ColorImage, x: i64, y: i64) -> Vec3 {
    match mode {
        PostMode::Passthrough => src.fetch(x, y),
        PostMode::Grayscale => Vec3::splat(luma(src.fetch(x, y))),
        PostMode::EdgeDetect => Vec3::splat(sobel_magnitude(src, x, y)),
        PostMode::BoxBlur => box_blur(src, x, y),
    }
}

/// Sobel gradient magnitude of luma, clamped to `[0, 1]`.
pub fn sobel_magnitude(src: &ColorImage, x: i64, y: i64) -> f32 {
    let l = |dx: i64, dy: i64| luma(src.fetch(x + dx, y + dy));
    // Rows run top (dy = -1) to bottom (dy = +1).
    let (tl, tc, tr) = (l(-1, -1), l(0, -1), l(1, -1));
    let (ml, mr) = (l(-1, 0), l(1, 0));
    let (bl, bc, br) = (l(-1, 1), l(0, 1), l(1, 1));

    let gx = -tl - 2.0 * ml - bl + tr + 2.0 * mr + br;
    let gy = -bl - 2.0 * bc - br + tl + 2.0 * tc + tr;
    (gx * gx + gy * gy).sqrt().clamp(0.0, 1.0)
}

/// Mean of the 3×3 neighbourhood including the center.
pub fn box_blur(src: &ColorImage, x: i64, y: i64) -> Vec3 {
    let mut sum = Vec3::ZERO;
    for dy in -1..=1 {
        for dx in -1..=1 {
            sum += src.fetch(x + dx, y + dy);
        }
    }
    sum / 9.0
}

// ---------------------------------------------------------------------------
// Finishing
// ---------------------------------------------------------------------------

/// Multiplicative CRT scanline flicker for vertical position `v` in `[0, 1]`,
/// measured from the bottom of the screen.
pub fn scanline(v: f32, time: f32) -> f32 {
    SCANLINE_BASE + SCANLINE_DEPTH * (v * SCANLINE_FREQUENCY + time * SCANLINE_SPEED).sin()
}

pub fn gamma_encode(color: Vec3) -> Vec3 {
    color.max(Vec3::ZERO).powf(1.0 / GAMMA)
}

/// Steps applied after every filter, passthrough included.
pub fn finish(color: Vec3, v: f32, time: f32) -> Vec3 {
    gamma_encode(color * scanline(v, time))
}

/// Bottom-up vertical coordinate of the center of row `y`; rows of a
/// [`ColorImage`] run top to bottom.
pub fn row_v(y: u32, height: u32) -> f32 {
    1.0 - (y as f32 + 0.5) / height as f32
}

/// Full post pipeline for one output texel: filter, then finish.
pub fn process_texel(mode: PostMode, src: &ColorImage, x: u32, y: u32, time: f32) -> Vec3 {
    let v = row_v(y, src.height());
    finish(filter(mode, src, x as i64, y as i64), v, time)
}
