pub mod camera;
pub mod config;
pub mod geometry;
pub mod interaction;
pub mod post;
pub mod shading;

use interaction::ToggleState;

// ---------------------------------------------------------------------------
// FrameParams — the immutable per-frame input to both render passes
// ---------------------------------------------------------------------------

/// Everything the scene and post passes read for one frame.
///
/// Built once per frame after input has been sampled, then handed by
/// reference to both passes. Nothing downstream mutates it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    /// Seconds since startup.
    pub time: f32,
    pub toggles: ToggleState,
}

impl FrameParams {
    pub fn new(time: f32, toggles: ToggleState) -> Self {
        Self { time, toggles }
    }
}
