//! The frame pipeline: paints a whole board onto a [`Surface`].

use crate::paint::{paint_shape, paint_stroke_tail};
use crate::renderer::{GridStyle, RenderContext, RenderResult, Renderer, RendererError};
use crate::surface::Surface;
use inkboard_core::scheduler::FrameRequest;
use inkboard_core::shapes::ShapeId;
use inkboard_core::tools::ToolKind;
use kurbo::{BezPath, Circle, Point, Rect, Shape as _, Stroke};
use peniko::Color;

/// Grid spacing in world units.
pub const GRID_SIZE: f64 = 20.0;

/// Screen-space radius of a grid dot.
const GRID_DOT_RADIUS: f64 = 1.0;

/// Width of the selection box outline, in world units.
const SELECTION_LINE_WIDTH: f64 = 2.0;

/// Dash pattern for the selection box and lasso.
const DASH: [f64; 2] = [5.0, 5.0];

fn grid_color() -> Color {
    Color::from_rgba8(0xe0, 0xe0, 0xe0, 0xff)
}

/// World-space grid range covering `visible`, snapped outward to whole
/// grid cells.
pub fn grid_bounds(visible: Rect, grid_size: f64) -> Rect {
    Rect::new(
        (visible.x0 / grid_size).floor() * grid_size,
        (visible.y0 / grid_size).floor() * grid_size,
        (visible.x1 / grid_size).ceil() * grid_size,
        (visible.y1 / grid_size).ceil() * grid_size,
    )
}

/// Paints frames onto an owned surface.
pub struct SurfaceRenderer<S> {
    surface: S,
}

impl<S: Surface> SurfaceRenderer<S> {
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Paint whatever the scheduler asked for.
    ///
    /// A stroke tail for a shape that is gone or is not a stroke falls back
    /// to a full frame.
    pub fn render(&mut self, ctx: &RenderContext, request: FrameRequest) {
        match request {
            FrameRequest::Full => self.build_scene(ctx),
            FrameRequest::StrokeTail { id, from } => {
                if let Err(e) = self.render_stroke_tail(ctx, id, from) {
                    log::debug!("Incremental draw unavailable ({}), repainting", e);
                    self.build_scene(ctx);
                }
            }
        }
    }

    fn render_grid(&mut self, ctx: &RenderContext, style: GridStyle) {
        let viewport = ctx.canvas.viewport;
        let bounds = grid_bounds(viewport.visible_world_rect(ctx.viewport_size), GRID_SIZE);
        let mut path = BezPath::new();

        match style {
            GridStyle::None => return,
            GridStyle::Dots => {
                // All dots go into one path so the grid costs a single fill.
                let radius = GRID_DOT_RADIUS / viewport.zoom;
                let mut x = bounds.x0;
                while x <= bounds.x1 {
                    let mut y = bounds.y0;
                    while y <= bounds.y1 {
                        path.extend(Circle::new(Point::new(x, y), radius).path_elements(0.1));
                        y += GRID_SIZE;
                    }
                    x += GRID_SIZE;
                }
                self.surface.fill(&path, grid_color());
            }
            GridStyle::Lines => {
                let mut x = bounds.x0;
                while x <= bounds.x1 {
                    path.move_to(Point::new(x, bounds.y0));
                    path.line_to(Point::new(x, bounds.y1));
                    x += GRID_SIZE;
                }
                let mut y = bounds.y0;
                while y <= bounds.y1 {
                    path.move_to(Point::new(bounds.x0, y));
                    path.line_to(Point::new(bounds.x1, y));
                    y += GRID_SIZE;
                }
                let stroke = Stroke::new(0.5 / viewport.zoom);
                self.surface.stroke(&path, &stroke, grid_color());
            }
        }
    }

    fn render_selection_box(&mut self, ctx: &RenderContext) {
        let Some(bounds) = ctx.canvas.selection.bounds(&ctx.canvas.scene) else {
            return;
        };
        let stroke = Stroke::new(SELECTION_LINE_WIDTH).with_dashes(0.0, DASH);
        self.surface
            .stroke(&bounds.to_path(0.1), &stroke, ctx.selection_color);
    }

    fn render_lasso(&mut self, ctx: &RenderContext, points: &[Point]) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        let zoom = ctx.canvas.viewport.zoom;
        let mut path = BezPath::new();
        path.move_to(*first);
        for point in rest {
            path.line_to(*point);
        }
        if points.len() >= 3 {
            path.close_path();
        }
        let stroke = Stroke::new(1.0 / zoom).with_dashes(0.0, DASH.map(|d| d / zoom));
        self.surface.stroke(&path, &stroke, ctx.selection_color);
    }
}

impl<S: Surface> Renderer for SurfaceRenderer<S> {
    fn build_scene(&mut self, ctx: &RenderContext) {
        let canvas = ctx.canvas;
        let zoom = canvas.viewport.zoom;
        let background = self.background_color(ctx);

        self.surface.clear(background);
        self.surface.save();
        self.surface.transform(canvas.viewport.transform());

        let grid = ctx.effective_grid();
        self.render_grid(ctx, grid);

        for shape in canvas.scene.iter() {
            paint_shape(&mut self.surface, shape, zoom);
        }

        if let Some(preview) = ctx.preview {
            paint_shape(&mut self.surface, preview, zoom);
        }

        if canvas.tool == ToolKind::Select {
            self.render_selection_box(ctx);
        }

        if canvas.tool == ToolKind::Lasso {
            if let Some(points) = ctx.lasso {
                self.render_lasso(ctx, points);
            }
        }

        self.surface.restore();
    }

    fn render_stroke_tail(
        &mut self,
        ctx: &RenderContext,
        id: ShapeId,
        from: usize,
    ) -> RenderResult<()> {
        let canvas = ctx.canvas;
        let shape = canvas.scene.get(id).ok_or(RendererError::UnknownShape(id))?;
        let stroke = shape.as_freehand().ok_or(RendererError::NotAStroke(id))?;

        self.surface.save();
        self.surface.transform(canvas.viewport.transform());
        paint_stroke_tail(&mut self.surface, stroke, from, canvas.viewport.zoom);
        self.surface.restore();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{DrawCommand, RecordingSurface};
    use inkboard_core::shapes::{BoxShape, Freehand, Shape};
    use inkboard_core::{Canvas, Engine, PointerEvent};
    use kurbo::{Affine, Size, Vec2};

    fn renderer() -> SurfaceRenderer<RecordingSurface> {
        SurfaceRenderer::new(RecordingSurface::new())
    }

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Shape {
        Shape::Rectangle(BoxShape::new(Point::new(x0, y0), Point::new(x1, y1)))
    }

    #[test]
    fn test_grid_bounds_snap_outward() {
        let bounds = grid_bounds(Rect::new(-5.0, 3.0, 41.0, 39.0), 20.0);
        assert_eq!(bounds, Rect::new(-20.0, 0.0, 60.0, 40.0));
    }

    #[test]
    fn test_frame_order() {
        let mut canvas = Canvas::new();
        canvas.commit_shape(rect(0.0, 0.0, 10.0, 10.0));
        canvas.viewport.zoom = 2.0;
        canvas.viewport.pan = Vec2::new(10.0, 20.0);

        let mut renderer = renderer();
        renderer.build_scene(&RenderContext::new(&canvas));
        let commands = renderer.surface().commands();

        assert_eq!(commands[0], DrawCommand::Clear(Color::WHITE));
        assert_eq!(commands[1], DrawCommand::Save);
        assert_eq!(
            commands[2],
            DrawCommand::Transform(Affine::translate((10.0, 20.0)) * Affine::scale(2.0))
        );
        // Grid, then the rectangle.
        assert!(matches!(commands[3], DrawCommand::Fill { color, .. } if color == grid_color()));
        assert!(matches!(commands[4], DrawCommand::Stroke { .. }));
        assert_eq!(commands.last(), Some(&DrawCommand::Restore));
        assert!(renderer.surface().is_balanced());
    }

    #[test]
    fn test_grid_dots_cover_visible_area() {
        let mut canvas = Canvas::new();
        canvas.set_viewport_size(40.0, 20.0);
        let mut renderer = renderer();
        renderer.build_scene(&RenderContext::new(&canvas));

        let (path, _) = renderer.surface().fills().next().unwrap();
        let dots = path
            .elements()
            .iter()
            .filter(|el| matches!(el, kurbo::PathEl::MoveTo(_)))
            .count();
        // x in {0, 20, 40}, y in {0, 20}.
        assert_eq!(dots, 6);
    }

    #[test]
    fn test_grid_dot_radius_shrinks_with_zoom() {
        let mut canvas = Canvas::new();
        canvas.set_viewport_size(20.0, 20.0);
        canvas.viewport.zoom = 4.0;
        let mut renderer = renderer();
        renderer.build_scene(&RenderContext::new(&canvas));

        let (path, _) = renderer.surface().fills().next().unwrap();
        // Dots at 0 and 20 on each axis, each a quarter unit across.
        let dots = path.bounding_box();
        assert!((dots.x0 + 0.25).abs() < 1e-3);
        assert!((dots.x1 - 20.25).abs() < 1e-3);
    }

    #[test]
    fn test_grid_hidden() {
        let mut canvas = Canvas::new();
        canvas.show_grid = false;
        let mut renderer = renderer();
        renderer.build_scene(&RenderContext::new(&canvas));
        assert_eq!(renderer.surface().fills().count(), 0);
        assert_eq!(renderer.surface().strokes().count(), 0);
    }

    #[test]
    fn test_selection_box_only_with_select_tool() {
        let mut canvas = Canvas::new();
        canvas.show_grid = false;
        canvas.commit_shape(rect(0.0, 0.0, 10.0, 10.0));
        canvas.select_all();

        let mut renderer = renderer();
        canvas.tool = ToolKind::Pen;
        renderer.build_scene(&RenderContext::new(&canvas));
        assert_eq!(renderer.surface().strokes().count(), 1);

        let mut renderer = self::renderer();
        canvas.tool = ToolKind::Select;
        renderer.build_scene(&RenderContext::new(&canvas));
        let strokes: Vec<_> = renderer.surface().strokes().collect();
        assert_eq!(strokes.len(), 2);
        let (path, stroke, color) = strokes[1];
        assert_eq!(path.bounding_box(), Rect::new(-5.0, -5.0, 15.0, 15.0));
        assert_eq!(stroke.width, SELECTION_LINE_WIDTH);
        assert_eq!(stroke.dash_pattern.as_slice(), &DASH);
        assert_eq!(color, Color::from_rgba8(0x42, 0x85, 0xf4, 0xff));
    }

    #[test]
    fn test_lasso_closes_with_three_points() {
        let mut canvas = Canvas::new();
        canvas.show_grid = false;
        canvas.tool = ToolKind::Lasso;
        let open = [Point::ZERO, Point::new(10.0, 0.0)];
        let closed = [Point::ZERO, Point::new(10.0, 0.0), Point::new(10.0, 10.0)];

        let mut renderer = renderer();
        renderer.build_scene(&RenderContext::new(&canvas).with_lasso(Some(&open)));
        let (path, stroke, _) = renderer.surface().strokes().next().unwrap();
        assert!(!path.elements().contains(&kurbo::PathEl::ClosePath));
        assert!(!stroke.dash_pattern.is_empty());

        let mut renderer = self::renderer();
        renderer.build_scene(&RenderContext::new(&canvas).with_lasso(Some(&closed)));
        let (path, _, _) = renderer.surface().strokes().next().unwrap();
        assert!(path.elements().contains(&kurbo::PathEl::ClosePath));
    }

    #[test]
    fn test_preview_painted_after_scene() {
        let mut engine = Engine::default();
        engine.canvas.show_grid = false;
        engine.canvas.commit_shape(rect(100.0, 100.0, 110.0, 110.0));
        engine.set_tool(ToolKind::Line);
        engine.pointer_down(PointerEvent::new(Point::new(0.0, 0.0)));
        engine.pointer_move(PointerEvent::new(Point::new(50.0, 0.0)));

        let mut renderer = renderer();
        renderer.build_scene(&RenderContext::from_engine(&engine));
        let strokes: Vec<_> = renderer.surface().strokes().collect();
        assert_eq!(strokes.len(), 2);
        assert_eq!(strokes[1].0.bounding_box(), Rect::new(0.0, 0.0, 50.0, 0.0));
    }

    #[test]
    fn test_stroke_tail_under_view_transform() {
        let mut canvas = Canvas::new();
        canvas.viewport.zoom = 2.0;
        let id = canvas.commit_shape(Shape::Freehand(Freehand::from_points(vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(8.0, 0.0),
        ])));

        let mut renderer = renderer();
        renderer
            .render_stroke_tail(&RenderContext::new(&canvas), id, 1)
            .unwrap();
        let commands = renderer.surface().commands();
        assert_eq!(commands.len(), 4);
        assert_eq!(commands[1], DrawCommand::Transform(Affine::scale(2.0)));
        let (path, _, _) = renderer.surface().strokes().next().unwrap();
        assert_eq!(path.bounding_box(), Rect::new(4.0, 0.0, 8.0, 0.0));
    }

    #[test]
    fn test_stroke_tail_errors_fall_back_to_full_frame() {
        let mut canvas = Canvas::new();
        let id = canvas.commit_shape(rect(0.0, 0.0, 1.0, 1.0));
        let mut renderer = renderer();
        let ctx = RenderContext::new(&canvas);

        assert_eq!(
            renderer.render_stroke_tail(&ctx, id, 0),
            Err(RendererError::NotAStroke(id))
        );
        let missing = unknown_id(&canvas);
        assert_eq!(
            renderer.render_stroke_tail(&ctx, missing, 0),
            Err(RendererError::UnknownShape(missing))
        );

        renderer.render(&ctx, FrameRequest::StrokeTail { id, from: 0 });
        assert!(matches!(renderer.surface().commands()[0], DrawCommand::Clear(_)));
    }

    fn unknown_id(canvas: &Canvas) -> ShapeId {
        let mut shape = rect(0.0, 0.0, 1.0, 1.0);
        shape.regenerate_id();
        assert!(!canvas.scene.contains(shape.id()));
        shape.id()
    }

    #[test]
    fn test_render_full_request() {
        let canvas = Canvas::new();
        let mut renderer = renderer();
        renderer.render(
            &RenderContext::new(&canvas).with_viewport_size(Size::new(10.0, 10.0)),
            FrameRequest::Full,
        );
        assert!(renderer.into_surface().is_balanced());
    }
}
