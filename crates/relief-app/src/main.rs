use std::sync::Arc;

use relief_core::config::SceneConfig;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

mod app;
mod input;

use app::App;
use input::Key;

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Digit1 => Some(Key::Digit1),
        KeyCode::Digit2 => Some(Key::Digit2),
        KeyCode::Digit3 => Some(Key::Digit3),
        KeyCode::Digit4 => Some(Key::Digit4),
        KeyCode::KeyN => Some(Key::N),
        KeyCode::KeyM => Some(Key::M),
        _ => None,
    }
}

/// Startup failures are not recoverable: report and stop the process.
fn fatal(err: impl std::fmt::Display) -> ! {
    log::error!("{err}");
    std::process::exit(1);
}

// ---------------------------------------------------------------------------
// Handler — winit ApplicationHandler
// ---------------------------------------------------------------------------

struct Handler {
    config: SceneConfig,
    window: Option<Arc<Window>>,
    app: Option<App>,
}

impl ApplicationHandler for Handler {
    /// Called once on desktop when the event loop starts.
    /// Creates the window then builds every GPU resource.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.app.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title("Texture Demo")
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => fatal(format!("failed to create window: {e}")),
        };

        log::info!(
            "Window created ({}×{})",
            self.config.window_width,
            self.config.window_height
        );

        let gpu_app =
            App::new(Arc::clone(&window), self.config.clone()).unwrap_or_else(|e| fatal(e));
        self.window = Some(window);
        self.app = Some(gpu_app);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(app) = &mut self.app else {
            return;
        };

        match event {
            // ----------------------------------------------------------------
            // Exit
            // ----------------------------------------------------------------
            WindowEvent::CloseRequested => {
                log::info!("Close requested — exiting");
                event_loop.exit();
            }

            // ----------------------------------------------------------------
            // Key levels — edges are derived once per frame by the app
            // ----------------------------------------------------------------
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if let Some(key) = map_key(code) {
                    app.on_key(key, state == ElementState::Pressed);
                }
            }

            WindowEvent::Focused(false) => app.on_focus_lost(),

            // ----------------------------------------------------------------
            // Resize — reconfigure the surface and rebuild the offscreen target
            // ----------------------------------------------------------------
            WindowEvent::Resized(new_size) => {
                if let Err(e) = app.resize(new_size.width, new_size.height) {
                    fatal(e);
                }
            }

            // ----------------------------------------------------------------
            // Redraw — one full frame
            // ----------------------------------------------------------------
            WindowEvent::RedrawRequested => match app.render() {
                Ok(()) => {}
                // Surface lost / outdated: reconfigure and try again next frame.
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    let (width, height) = app.current_size();
                    if let Err(e) = app.resize(width, height) {
                        fatal(e);
                    }
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("GPU out of memory — exiting");
                    event_loop.exit();
                }
                Err(e) => log::warn!("render error: {e:?}"),
            },

            _ => {}
        }
    }

    /// Drive continuous redraws (game-loop style).
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();

    let event_loop = EventLoop::new()
        .unwrap_or_else(|e| fatal(format!("failed to create event loop: {e}")));
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut handler = Handler {
        config: SceneConfig::default(),
        window: None,
        app: None,
    };
    if let Err(e) = event_loop.run_app(&mut handler) {
        fatal(format!("event loop error: {e}"));
    }
}
