use std::path::Path;

use image::{imageops, DynamicImage, RgbaImage};
use wgpu::{Device, Queue, Sampler, Texture, TextureView};

use crate::error::{RenderError, RenderResult};

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Pixels as the decoder handed them over, rows already flipped so the first
/// row is the bottom of the picture (UV v = 0).
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// 1, 3 or 4.
    pub channels: u8,
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    pub fn open(path: impl AsRef<Path>) -> RenderResult<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| RenderError::ImageDecode {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_dynamic(img))
    }

    pub fn from_dynamic(img: DynamicImage) -> Self {
        let img = img.flipv();
        let (width, height) = (img.width(), img.height());
        let (channels, pixels) = match img {
            DynamicImage::ImageLuma8(buf) => (1, buf.into_raw()),
            DynamicImage::ImageRgb8(buf) => (3, buf.into_raw()),
            DynamicImage::ImageRgba8(buf) => (4, buf.into_raw()),
            other => (4, other.into_rgba8().into_raw()),
        };
        Self {
            width,
            height,
            channels,
            pixels,
        }
    }

    /// Expand to RGBA8 for upload. Single-channel data lands in red only.
    /// A channel count other than 1, 3 or 4, or a pixel buffer that does not
    /// match the dimensions, is a fatal error.
    pub fn to_rgba(&self) -> RenderResult<RgbaImage> {
        let expected = self.width as usize * self.height as usize * self.channels as usize;
        if self.pixels.len() != expected {
            return Err(RenderError::malformed(format!(
                "{}×{}×{} needs {expected} bytes, got {}",
                self.width,
                self.height,
                self.channels,
                self.pixels.len()
            )));
        }
        let rgba: Vec<u8> = match self.channels {
            1 => self.pixels.iter().flat_map(|&r| [r, 0, 0, 255]).collect(),
            3 => self
                .pixels
                .chunks_exact(3)
                .flat_map(|p| [p[0], p[1], p[2], 255])
                .collect(),
            4 => self.pixels.clone(),
            n => {
                return Err(RenderError::malformed(format!(
                    "unsupported channel count {n}"
                )))
            }
        };
        RgbaImage::from_raw(self.width, self.height, rgba).ok_or_else(|| {
            RenderError::malformed(format!("{}×{} RGBA buffer too small", self.width, self.height))
        })
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Minification mode of a texture resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filtering {
    /// Linear within and between mip levels.
    Trilinear,
    /// Linear on the base level only.
    Bilinear,
}

impl Filtering {
    pub fn from_mipmap(enabled: bool) -> Self {
        if enabled {
            Filtering::Trilinear
        } else {
            Filtering::Bilinear
        }
    }
}

/// Sampler settings for a filtering mode. Wrap is always repeat.
pub fn sampler_descriptor(label: &str, filtering: Filtering) -> wgpu::SamplerDescriptor<'_> {
    let base = wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    };
    match filtering {
        Filtering::Trilinear => wgpu::SamplerDescriptor {
            mipmap_filter: wgpu::FilterMode::Linear,
            ..base
        },
        Filtering::Bilinear => wgpu::SamplerDescriptor {
            mipmap_filter: wgpu::FilterMode::Nearest,
            lod_max_clamp: 0.0,
            ..base
        },
    }
}

// ---------------------------------------------------------------------------
// Mip chain
// ---------------------------------------------------------------------------

/// Number of levels down to 1×1.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Levels 1..n, each half the size of the previous (rounded down, min 1).
/// The base level is not included.
pub fn downsample_chain(base: &RgbaImage) -> Vec<RgbaImage> {
    let levels = mip_level_count(base.width(), base.height());
    let mut chain: Vec<RgbaImage> = Vec::with_capacity(levels.saturating_sub(1) as usize);
    for _ in 1..levels {
        let prev = chain.last().unwrap_or(base);
        let w = (prev.width() / 2).max(1);
        let h = (prev.height() / 2).max(1);
        let next = imageops::resize(prev, w, h, imageops::FilterType::Triangle);
        chain.push(next);
    }
    chain
}

// ---------------------------------------------------------------------------
// TextureResource
// ---------------------------------------------------------------------------

/// A sampled 2D texture whose filtering mode can be switched at runtime.
///
/// The decoded base level stays resident on the CPU so the mip chain can be
/// rebuilt whenever mipmapping is turned back on.
pub struct TextureResource {
    label: String,
    base: RgbaImage,
    pub texture: Texture,
    pub view: TextureView,
    sampler: Sampler,
    filtering: Filtering,
}

impl TextureResource {
    pub fn load(
        device: &Device,
        queue: &Queue,
        label: &str,
        path: impl AsRef<Path>,
        filtering: Filtering,
    ) -> RenderResult<Self> {
        let decoded = DecodedImage::open(path.as_ref())?;
        log::info!(
            "Loaded {label}: {}×{} ({} channels) from {}",
            decoded.width,
            decoded.height,
            decoded.channels,
            path.as_ref().display()
        );
        let base = decoded.to_rgba()?;
        Ok(Self::from_image(device, queue, label, base, filtering))
    }

    pub fn from_image(
        device: &Device,
        queue: &Queue,
        label: &str,
        base: RgbaImage,
        filtering: Filtering,
    ) -> Self {
        let (width, height) = base.dimensions();
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: mip_level_count(width, height),
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&Default::default());
        write_level(queue, &texture, 0, &base);

        let sampler = device.create_sampler(&sampler_descriptor(label, filtering));
        let mut resource = Self {
            label: label.to_string(),
            base,
            texture,
            view,
            sampler,
            filtering,
        };
        if filtering == Filtering::Trilinear {
            resource.regenerate_mipmaps(queue);
        }
        resource
    }

    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    pub fn filtering(&self) -> Filtering {
        self.filtering
    }

    /// Switch filtering mode. Going to trilinear rebuilds levels 1..n from the
    /// base image; going to bilinear only swaps the sampler. Level 0 is never
    /// rewritten here.
    pub fn set_filtering(&mut self, device: &Device, queue: &Queue, filtering: Filtering) {
        if filtering == Filtering::Trilinear {
            self.regenerate_mipmaps(queue);
        }
        self.sampler = device.create_sampler(&sampler_descriptor(&self.label, filtering));
        self.filtering = filtering;
        log::debug!("{}: filtering → {:?}", self.label, filtering);
    }

    fn regenerate_mipmaps(&mut self, queue: &Queue) {
        for (i, level) in downsample_chain(&self.base).iter().enumerate() {
            write_level(queue, &self.texture, i as u32 + 1, level);
        }
    }
}

fn write_level(queue: &Queue, texture: &Texture, mip_level: u32, img: &RgbaImage) {
    let (width, height) = img.dimensions();
    queue.write_texture(
        wgpu::ImageCopyTexture {
            texture,
            mip_level,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        img.as_raw(),
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage, Rgba};

    // --- Decoding -------------------------------------------------------------

    #[test]
    fn decode_flips_rows() {
        let mut img = RgbImage::new(1, 2);
        img.put_pixel(0, 0, Rgb([255, 0, 0])); // top
        img.put_pixel(0, 1, Rgb([0, 0, 255])); // bottom
        let d = DecodedImage::from_dynamic(DynamicImage::ImageRgb8(img));
        assert_eq!(d.channels, 3);
        assert_eq!(&d.pixels[0..3], &[0, 0, 255], "bottom row comes first");
        assert_eq!(&d.pixels[3..6], &[255, 0, 0]);
    }

    #[test]
    fn single_channel_expands_to_red() {
        let img = GrayImage::from_pixel(2, 1, Luma([200]));
        let d = DecodedImage::from_dynamic(DynamicImage::ImageLuma8(img));
        assert_eq!(d.channels, 1);
        let rgba = d.to_rgba().unwrap();
        assert_eq!(rgba.get_pixel(1, 0), &Rgba([200, 0, 0, 255]));
    }

    #[test]
    fn three_channels_become_opaque() {
        let img = RgbImage::from_pixel(2, 2, Rgb([10, 20, 30]));
        let rgba = DecodedImage::from_dynamic(DynamicImage::ImageRgb8(img))
            .to_rgba()
            .unwrap();
        assert!(rgba.pixels().all(|p| *p == Rgba([10, 20, 30, 255])));
    }

    #[test]
    fn four_channels_pass_through() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([1, 2, 3, 4]));
        let d = DecodedImage::from_dynamic(DynamicImage::ImageRgba8(img));
        assert_eq!(d.channels, 4);
        assert_eq!(d.to_rgba().unwrap().get_pixel(0, 0), &Rgba([1, 2, 3, 4]));
    }

    #[test]
    fn two_channel_data_is_rejected() {
        let d = DecodedImage {
            width: 2,
            height: 1,
            channels: 2,
            pixels: vec![0; 4],
        };
        let err = d.to_rgba().unwrap_err();
        assert!(matches!(err, RenderError::MalformedImage(_)), "{err}");
        assert!(err.to_string().contains("channel count 2"), "{err}");
    }

    #[test]
    fn short_pixel_buffer_is_rejected() {
        let d = DecodedImage {
            width: 4,
            height: 4,
            channels: 3,
            pixels: vec![0; 10],
        };
        let err = d.to_rgba().unwrap_err();
        assert!(err.to_string().contains("needs 48 bytes, got 10"), "{err}");
    }

    #[test]
    fn missing_file_is_a_decode_error() {
        let err = DecodedImage::open("does/not/exist.png").unwrap_err();
        assert!(matches!(err, RenderError::ImageDecode { .. }), "{err}");
    }

    // --- Filtering ------------------------------------------------------------

    #[test]
    fn trilinear_sampler_blends_mips() {
        let d = sampler_descriptor("t", Filtering::Trilinear);
        assert_eq!(d.min_filter, wgpu::FilterMode::Linear);
        assert_eq!(d.mipmap_filter, wgpu::FilterMode::Linear);
        assert!(d.lod_max_clamp > 0.0);
    }

    #[test]
    fn bilinear_sampler_pins_base_level() {
        let d = sampler_descriptor("t", Filtering::Bilinear);
        assert_eq!(d.min_filter, wgpu::FilterMode::Linear);
        assert_eq!(d.mag_filter, wgpu::FilterMode::Linear);
        assert_eq!(d.lod_max_clamp, 0.0);
    }

    #[test]
    fn samplers_always_repeat() {
        for f in [Filtering::Trilinear, Filtering::Bilinear] {
            let d = sampler_descriptor("t", f);
            assert_eq!(d.address_mode_u, wgpu::AddressMode::Repeat);
            assert_eq!(d.address_mode_v, wgpu::AddressMode::Repeat);
        }
    }

    #[test]
    fn mipmap_flag_maps_to_filtering() {
        assert_eq!(Filtering::from_mipmap(true), Filtering::Trilinear);
        assert_eq!(Filtering::from_mipmap(false), Filtering::Bilinear);
    }

    // --- Mip chain ------------------------------------------------------------

    #[test]
    fn level_count_reaches_one_by_one() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(256, 256), 9);
        assert_eq!(mip_level_count(1000, 700), 10);
        assert_eq!(mip_level_count(0, 0), 1);
    }

    #[test]
    fn chain_halves_down_to_single_texel() {
        let base = RgbaImage::from_pixel(16, 4, Rgba([50, 100, 150, 255]));
        let chain = downsample_chain(&base);
        let dims: Vec<_> = chain.iter().map(|l| l.dimensions()).collect();
        assert_eq!(dims, vec![(8, 2), (4, 1), (2, 1), (1, 1)]);
        assert_eq!(chain.len() as u32 + 1, mip_level_count(16, 4));
    }

    #[test]
    fn chain_preserves_flat_color_and_base() {
        let base = RgbaImage::from_pixel(8, 8, Rgba([40, 80, 120, 255]));
        let before = base.clone();
        let chain = downsample_chain(&base);
        assert_eq!(base, before, "base level must be untouched");
        for level in &chain {
            assert!(level.pixels().all(|p| *p == Rgba([40, 80, 120, 255])));
        }
    }
}
