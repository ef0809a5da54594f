//! Renderer trait abstraction.

use inkboard_core::canvas::Canvas;
use inkboard_core::interaction::Engine;
use inkboard_core::shapes::{Shape, ShapeId};
use kurbo::{Point, Size};
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RendererError {
    #[error("Shape {0} is not in the scene")]
    UnknownShape(ShapeId),
    #[error("Shape {0} is not a freehand stroke")]
    NotAStroke(ShapeId),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Grid display style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridStyle {
    /// No grid (plain background).
    None,
    /// A dot at every grid intersection.
    #[default]
    Dots,
    /// Full grid lines.
    Lines,
}

impl GridStyle {
    /// Cycle to the next grid style.
    pub fn next(self) -> Self {
        match self {
            GridStyle::None => GridStyle::Dots,
            GridStyle::Dots => GridStyle::Lines,
            GridStyle::Lines => GridStyle::None,
        }
    }

    /// Get display name for this grid style.
    pub fn name(self) -> &'static str {
        match self {
            GridStyle::None => "None",
            GridStyle::Dots => "Dots",
            GridStyle::Lines => "Lines",
        }
    }
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The canvas to render.
    pub canvas: &'a Canvas,
    /// Viewport size in screen pixels.
    pub viewport_size: Size,
    /// Background color.
    pub background_color: Color,
    /// Grid display style, used when the canvas has its grid switched on.
    pub grid_style: GridStyle,
    /// Selection box color.
    pub selection_color: Color,
    /// Shape being dragged out, not yet in the scene.
    pub preview: Option<&'a Shape>,
    /// Lasso polygon in progress, in world coordinates.
    pub lasso: Option<&'a [Point]>,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(canvas: &'a Canvas) -> Self {
        Self {
            canvas,
            viewport_size: canvas.viewport_size,
            background_color: Color::WHITE,
            grid_style: GridStyle::Dots,
            selection_color: Color::from_rgba8(0x42, 0x85, 0xf4, 0xff),
            preview: None,
            lasso: None,
        }
    }

    /// Context for everything the engine currently shows, including the
    /// gesture in progress.
    pub fn from_engine(engine: &'a Engine) -> Self {
        Self::new(&engine.canvas)
            .with_preview(engine.preview())
            .with_lasso(engine.lasso_points())
    }

    /// Override the viewport size.
    pub fn with_viewport_size(mut self, size: Size) -> Self {
        self.viewport_size = size;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the grid style.
    pub fn with_grid(mut self, style: GridStyle) -> Self {
        self.grid_style = style;
        self
    }

    pub fn with_selection_color(mut self, color: Color) -> Self {
        self.selection_color = color;
        self
    }

    pub fn with_preview(mut self, preview: Option<&'a Shape>) -> Self {
        self.preview = preview;
        self
    }

    pub fn with_lasso(mut self, lasso: Option<&'a [Point]>) -> Self {
        self.lasso = lasso;
        self
    }

    /// Grid style in effect, taking the canvas grid toggle into account.
    pub fn effective_grid(&self) -> GridStyle {
        if self.canvas.show_grid {
            self.grid_style
        } else {
            GridStyle::None
        }
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Paint a complete frame.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Paint only the part of stroke `id` from point index `from` on, over
    /// whatever the last frame left on the surface.
    fn render_stroke_tail(
        &mut self,
        ctx: &RenderContext,
        id: ShapeId,
        from: usize,
    ) -> RenderResult<()>;

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}
