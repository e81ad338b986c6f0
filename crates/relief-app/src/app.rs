use std::sync::Arc;
use std::time::Instant;

use relief_core::config::SceneConfig;
use relief_core::interaction::Interaction;
use relief_core::FrameParams;
use relief_gpu::context::GpuContext;
use relief_gpu::renderer::Renderer;
use relief_gpu::{RenderError, RenderResult};
use wgpu::TextureFormat;
use winit::window::Window;

use crate::input::{Key, KeyState};

// ---------------------------------------------------------------------------
// Simple FPS counter — logs to console once per second
// ---------------------------------------------------------------------------

struct FpsCounter {
    frames: u32,
    last_report: Instant,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            frames: 0,
            last_report: Instant::now(),
        }
    }

    /// Increment the frame count.  Returns the FPS value if a full second has
    /// elapsed since the last report (so the caller can log it).
    fn tick(&mut self) -> Option<f32> {
        self.frames += 1;
        let elapsed = self.last_report.elapsed().as_secs_f32();
        if elapsed >= 1.0 {
            let fps = self.frames as f32 / elapsed;
            self.frames = 0;
            self.last_report = Instant::now();
            Some(fps)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Surface format
// ---------------------------------------------------------------------------

/// Pick the surface format and the format frames are rendered through.
///
/// The post pass gamma-encodes itself, so the view must never be sRGB. When
/// the surface only offers sRGB formats, it is configured with one of them
/// and rendered through its linear twin.
fn choose_formats(formats: &[TextureFormat]) -> RenderResult<(TextureFormat, TextureFormat)> {
    if let Some(&linear) = formats.iter().find(|f| !f.is_srgb()) {
        return Ok((linear, linear));
    }
    let &surface = formats.first().ok_or(RenderError::NoSurfaceFormat)?;
    Ok((surface, surface.remove_srgb_suffix()))
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    gpu: GpuContext,
    surface_config: wgpu::SurfaceConfiguration,
    view_format: TextureFormat,

    renderer: Renderer,

    // Input
    keys: KeyState,
    interaction: Interaction,

    // Frame timing
    start: Instant,
    fps: FpsCounter,
}

impl App {
    /// Initialise wgpu for a given window and load every resource. The window
    /// is wrapped in `Arc` so that the surface can hold a `'static` reference.
    pub fn new(window: Arc<Window>, config: SceneConfig) -> RenderResult<Self> {
        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);

        // ---- Instance & surface ---------------------------------------------
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(Arc::clone(&window))?;

        // ---- Adapter, device & queue ----------------------------------------
        let gpu = pollster::block_on(GpuContext::new(&instance, Some(&surface)))?;

        // ---- Surface configuration ------------------------------------------
        let surface_caps = surface.get_capabilities(&gpu.adapter);

        let (format, view_format) = choose_formats(&surface_caps.formats)?;
        let view_formats = if view_format == format {
            vec![]
        } else {
            vec![view_format]
        };

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats,
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&gpu.device, &surface_config);
        log::info!(
            "Surface configured: {}×{} {:?} (view {:?}) Fifo",
            surface_config.width,
            surface_config.height,
            format,
            view_format
        );

        // ---- Renderer (textures, target, passes) -----------------------------
        let interaction = Interaction::default();
        let renderer = Renderer::new(
            &gpu.device,
            &gpu.queue,
            config,
            view_format,
            width,
            height,
            interaction.state().use_mipmap,
        )?;

        window.set_title(&interaction.state().title());

        Ok(Self {
            window,
            surface,
            gpu,
            surface_config,
            view_format,
            renderer,
            keys: KeyState::new(),
            interaction,
            start: Instant::now(),
            fps: FpsCounter::new(),
        })
    }

    // -------------------------------------------------------------------------
    // Resize
    // -------------------------------------------------------------------------

    /// Reconfigure the surface and rebuild size-dependent GPU resources.
    pub fn resize(&mut self, new_width: u32, new_height: u32) -> RenderResult<()> {
        if new_width == 0 || new_height == 0 {
            return Ok(());
        }
        self.surface_config.width = new_width;
        self.surface_config.height = new_height;
        self.surface.configure(&self.gpu.device, &self.surface_config);

        // The offscreen target and projection are tied to the resolution.
        self.renderer.resize(&self.gpu.device, new_width, new_height)?;

        log::debug!("Surface resized to {}×{}", new_width, new_height);
        Ok(())
    }

    pub fn current_size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    // -------------------------------------------------------------------------
    // Input — called by main.rs window_event handler
    // -------------------------------------------------------------------------

    pub fn on_key(&mut self, key: Key, held: bool) {
        self.keys.set(key, held);
    }

    pub fn on_focus_lost(&mut self) {
        self.keys.clear();
    }

    /// Sample input once and advance the toggle machine, running the side
    /// effects of whatever changed.
    fn update_toggles(&mut self) {
        let transition = self.interaction.update(&self.keys.snapshot());
        if !transition.any() {
            return;
        }
        let state = self.interaction.state();

        if transition.mipmap {
            self.renderer
                .set_mipmap(&self.gpu.device, &self.gpu.queue, state.use_mipmap);
        }

        let title = state.title();
        log::info!("{title}");
        self.window.set_title(&title);
    }

    // -------------------------------------------------------------------------
    // Render
    // -------------------------------------------------------------------------

    /// Run one full frame: toggles, scene pass, post pass, present.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.update_toggles();

        let frame = FrameParams::new(
            self.start.elapsed().as_secs_f32(),
            self.interaction.state(),
        );

        if let Some(fps) = self.fps.tick() {
            log::debug!(
                "FPS: {:.1}  post: {}  normal map: {}  mipmap: {}",
                fps,
                frame.toggles.post_mode.name(),
                frame.toggles.use_normal_map,
                frame.toggles.use_mipmap,
            );
        }

        let output = self.surface.get_current_texture()?;
        let surface_view = output.texture.create_view(&wgpu::TextureViewDescriptor {
            format: Some(self.view_format),
            ..Default::default()
        });

        self.renderer
            .render(&self.gpu.device, &self.gpu.queue, &surface_view, &frame);

        output.present();
        Ok(())
    }
}
