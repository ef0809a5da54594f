//! Inkboard Render Library
//!
//! Draws an Inkboard canvas onto any 2D [`Surface`]: the full frame
//! pipeline, the per-shape painters and the incremental stroke fast path.

mod frame;
pub mod paint;
mod recording;
mod renderer;
mod surface;

pub use frame::{GRID_SIZE, SurfaceRenderer, grid_bounds};
pub use recording::{DrawCommand, RecordingSurface};
pub use renderer::{GridStyle, RenderContext, RenderResult, Renderer, RendererError};
pub use surface::{IMAGE_PLACEHOLDER_FILL, IMAGE_PLACEHOLDER_STROKE, Surface};
