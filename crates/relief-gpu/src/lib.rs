pub mod context;
pub mod error;
pub mod geometry;
pub mod post_pass;
pub mod renderer;
pub mod scene_pass;
pub mod shader;
pub mod target;
pub mod texture;

pub use error::{RenderError, RenderResult};
