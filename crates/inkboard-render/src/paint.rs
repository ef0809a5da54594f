//! Painting individual shapes onto a [`Surface`].
//!
//! All geometry is world space; callers set up the view transform first.
//! Stroke widths are divided by the zoom so lines keep their on-screen
//! thickness at every zoom level.

use crate::surface::Surface;
use inkboard_core::shapes::{BoxShape, Freehand, LINE_HEIGHT_FACTOR, Shape, StickyNote, Text};
use kurbo::{BezPath, Cap, Circle, Ellipse, Join, Point, Shape as _, Stroke, Vec2};
use peniko::Color;
use std::f64::consts::FRAC_PI_6;

/// Tolerance used when flattening curves to paths.
const PATH_TOLERANCE: f64 = 0.1;

/// Minimum length of an arrow head stroke.
pub const ARROW_HEAD_MIN_LENGTH: f64 = 10.0;

/// Round-capped, round-joined stroke used for all shapes.
pub fn shape_stroke(width: f64) -> Stroke {
    Stroke::new(width).with_caps(Cap::Round).with_join(Join::Round)
}

/// Smoothed path through `points`.
///
/// Three or more points become quadratic segments that use each interior
/// point as the control and end halfway to the next point; two points
/// become a straight segment. Fewer than two points have no path.
pub fn freehand_path(points: &[Point]) -> Option<BezPath> {
    let (first, rest) = points.split_first()?;
    let last = rest.last()?;

    let mut path = BezPath::new();
    path.move_to(*first);
    if rest.len() > 1 {
        for pair in rest.windows(2) {
            path.quad_to(pair[0], pair[0].midpoint(pair[1]));
        }
    }
    path.line_to(*last);
    Some(path)
}

/// The two barbs of an arrow pointing from `start` to `end`.
pub fn arrow_head(start: Point, end: Point, line_width: f64) -> BezPath {
    let length = ARROW_HEAD_MIN_LENGTH.max(line_width * 3.0);
    let angle = (end - start).atan2();

    let mut path = BezPath::new();
    for side in [angle - FRAC_PI_6, angle + FRAC_PI_6] {
        path.move_to(end);
        path.line_to(end - Vec2::from_angle(side) * length);
    }
    path
}

/// The outline of a diamond inscribed in the shape's bounding box.
pub fn diamond_path(shape: &BoxShape) -> BezPath {
    let [top, right, bottom, left] = shape.diamond_vertices();
    let mut path = BezPath::new();
    path.move_to(top);
    path.line_to(right);
    path.line_to(bottom);
    path.line_to(left);
    path.close_path();
    path
}

/// Paint a single shape.
pub fn paint_shape<S: Surface + ?Sized>(surface: &mut S, shape: &Shape, zoom: f64) {
    let color = shape.style().stroke();
    let stroke = shape_stroke(shape.style().stroke_width / zoom);

    match shape {
        Shape::Freehand(freehand) => paint_freehand(surface, freehand, &stroke, color),
        Shape::Rectangle(rect) => {
            paint_outlined(surface, &rect.as_rect().to_path(PATH_TOLERANCE), rect, &stroke)
        }
        Shape::Ellipse(ellipse) => {
            let path = Ellipse::from_rect(ellipse.as_rect()).to_path(PATH_TOLERANCE);
            paint_outlined(surface, &path, ellipse, &stroke);
        }
        Shape::Diamond(diamond) => {
            paint_outlined(surface, &diamond_path(diamond), diamond, &stroke)
        }
        Shape::Line(line) => {
            let mut path = BezPath::new();
            path.move_to(line.start);
            path.line_to(line.end);
            surface.stroke(&path, &stroke, color);
        }
        Shape::Arrow(arrow) => {
            let mut path = BezPath::new();
            path.move_to(arrow.start);
            path.line_to(arrow.end);
            surface.stroke(&path, &stroke, color);
            surface.stroke(&arrow_head(arrow.start, arrow.end, stroke.width), &stroke, color);
        }
        Shape::Text(text) => paint_text(surface, text, color),
        Shape::StickyNote(note) => paint_sticky(surface, note, &stroke, color),
        Shape::Image(image) => surface.draw_image(image, image.as_rect(), stroke.width),
    }
}

/// Paint the part of `freehand` that starts at point index `from`, the
/// last point an earlier draw already reached. A tail made of a single
/// point is painted as a dot.
pub fn paint_stroke_tail<S: Surface + ?Sized>(
    surface: &mut S,
    freehand: &Freehand,
    from: usize,
    zoom: f64,
) {
    let points = &freehand.points;
    if from >= points.len() {
        return;
    }
    let color = freehand.style.stroke();
    let stroke = shape_stroke(freehand.style.stroke_width / zoom);

    let tail = &points[from..];
    match tail {
        [point] => paint_dot(surface, *point, stroke.width, color),
        [first, rest @ ..] => {
            let mut path = BezPath::new();
            path.move_to(*first);
            for point in rest {
                path.line_to(*point);
            }
            surface.stroke(&path, &stroke, color);
        }
        [] => {}
    }
}

fn paint_freehand<S: Surface + ?Sized>(
    surface: &mut S,
    freehand: &Freehand,
    stroke: &Stroke,
    color: Color,
) {
    match freehand.points.as_slice() {
        [] => {}
        [point] => paint_dot(surface, *point, stroke.width, color),
        points => {
            if let Some(path) = freehand_path(points) {
                surface.stroke(&path, stroke, color);
            }
        }
    }
}

fn paint_dot<S: Surface + ?Sized>(surface: &mut S, center: Point, width: f64, color: Color) {
    let dot = Circle::new(center, width / 2.0).to_path(PATH_TOLERANCE);
    surface.fill(&dot, color);
}

fn paint_outlined<S: Surface + ?Sized>(
    surface: &mut S,
    path: &BezPath,
    shape: &BoxShape,
    stroke: &Stroke,
) {
    if let Some(fill) = shape.fill_color {
        surface.fill(path, fill.into());
    }
    surface.stroke(path, stroke, shape.style.stroke());
}

fn paint_text<S: Surface + ?Sized>(surface: &mut S, text: &Text, color: Color) {
    let line_height = text.line_height();
    for (row, line) in text.lines().enumerate() {
        let origin = text.position + Vec2::new(0.0, row as f64 * line_height);
        surface.fill_text(line, origin, text.font_size, color);
    }
}

fn paint_sticky<S: Surface + ?Sized>(
    surface: &mut S,
    note: &StickyNote,
    stroke: &Stroke,
    color: Color,
) {
    let outline = note.as_rect().to_path(PATH_TOLERANCE);
    surface.fill(&outline, note.background.into());
    surface.stroke(&outline, stroke, color);

    if note.text.as_deref().is_none_or(str::is_empty) {
        return;
    }
    let area = note.text_rect();
    let line_height = note.font_size * LINE_HEIGHT_FACTOR;
    surface.push_clip(area);
    for (row, line) in note.lines().enumerate() {
        let origin = area.origin() + Vec2::new(0.0, row as f64 * line_height);
        surface.fill_text(line, origin, note.font_size, color);
    }
    surface.pop_clip();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{DrawCommand, RecordingSurface};
    use inkboard_core::shapes::{SerializableColor, ShapeStyle};
    use kurbo::{PathEl, Rect, Shape as _};

    fn approx_eq(a: Point, b: Point) -> bool {
        (a - b).hypot() < 1e-9
    }

    #[test]
    fn test_freehand_path_midpoint_quads() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(20.0, 10.0),
        ];
        let path = freehand_path(&points).unwrap();
        let elements = path.elements();
        assert_eq!(elements[0], PathEl::MoveTo(points[0]));
        assert_eq!(elements[1], PathEl::QuadTo(points[1], Point::new(15.0, 5.0)));
        assert_eq!(elements[2], PathEl::LineTo(points[2]));
    }

    #[test]
    fn test_freehand_path_short() {
        assert!(freehand_path(&[]).is_none());
        assert!(freehand_path(&[Point::ZERO]).is_none());

        let path = freehand_path(&[Point::ZERO, Point::new(5.0, 5.0)]).unwrap();
        assert_eq!(
            path.elements(),
            &[PathEl::MoveTo(Point::ZERO), PathEl::LineTo(Point::new(5.0, 5.0))]
        );
    }

    #[test]
    fn test_single_point_stroke_is_dot() {
        let mut surface = RecordingSurface::new();
        let shape = Shape::Freehand(Freehand::from_points(vec![Point::new(3.0, 3.0)]));
        paint_shape(&mut surface, &shape, 1.0);

        assert_eq!(surface.fills().count(), 1);
        assert_eq!(surface.strokes().count(), 0);
    }

    #[test]
    fn test_stroke_width_divided_by_zoom() {
        let mut surface = RecordingSurface::new();
        let mut shape = BoxShape::new(Point::ZERO, Point::new(10.0, 10.0));
        shape.style.stroke_width = 4.0;
        paint_shape(&mut surface, &Shape::Rectangle(shape), 2.0);

        let (_, stroke, _) = surface.strokes().next().unwrap();
        assert!((stroke.width - 2.0).abs() < f64::EPSILON);
        assert_eq!(stroke.start_cap, Cap::Round);
    }

    #[test]
    fn test_fill_painted_before_outline() {
        let mut surface = RecordingSurface::new();
        let shape = BoxShape::new(Point::ZERO, Point::new(10.0, 10.0))
            .with_fill(Some(SerializableColor::new(255, 0, 0, 255)));
        paint_shape(&mut surface, &Shape::Ellipse(shape), 1.0);

        let commands = surface.commands();
        let red = Color::from_rgba8(255, 0, 0, 255);
        assert!(matches!(commands[0], DrawCommand::Fill { color, .. } if color == red));
        assert!(matches!(commands[1], DrawCommand::Stroke { .. }));
    }

    #[test]
    fn test_arrow_head_geometry() {
        let head = arrow_head(Point::ZERO, Point::new(100.0, 0.0), 2.0);
        let ends: Vec<Point> = head
            .elements()
            .iter()
            .filter_map(|el| match el {
                PathEl::LineTo(p) => Some(*p),
                _ => None,
            })
            .collect();
        assert_eq!(ends.len(), 2);
        let dx = 10.0 * FRAC_PI_6.cos();
        let dy = 10.0 * FRAC_PI_6.sin();
        assert!(approx_eq(ends[0], Point::new(100.0 - dx, dy)));
        assert!(approx_eq(ends[1], Point::new(100.0 - dx, -dy)));

        // Thick lines grow the head.
        let head = arrow_head(Point::ZERO, Point::new(100.0, 0.0), 6.0);
        let PathEl::LineTo(tip) = head.elements()[1] else {
            panic!("expected a line");
        };
        assert!(((Point::new(100.0, 0.0) - tip).hypot() - 18.0).abs() < 1e-9);
    }

    #[test]
    fn test_diamond_path_uses_edge_midpoints() {
        let shape = BoxShape::new(Point::ZERO, Point::new(20.0, 10.0));
        let path = diamond_path(&shape);
        assert_eq!(path.elements()[0], PathEl::MoveTo(Point::new(10.0, 0.0)));
        assert_eq!(path.bounding_box(), Rect::new(0.0, 0.0, 20.0, 10.0));
    }

    #[test]
    fn test_text_one_call_per_line() {
        let mut surface = RecordingSurface::new();
        let text = Text::new(Point::new(5.0, 5.0), "one\ntwo".to_string()).with_font_size(10.0);
        paint_shape(&mut surface, &Shape::Text(text), 1.0);

        let origins: Vec<Point> = surface
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { origin, .. } => Some(*origin),
                _ => None,
            })
            .collect();
        assert_eq!(origins.len(), 2);
        assert!(approx_eq(origins[1], Point::new(5.0, 17.0)));
    }

    #[test]
    fn test_sticky_text_is_clipped() {
        let mut surface = RecordingSurface::new();
        let note = StickyNote::at(Point::ZERO, Some("hello".to_string()))
            .with_style(ShapeStyle::default());
        let area = note.text_rect();
        paint_shape(&mut surface, &Shape::StickyNote(note), 1.0);

        let commands = surface.commands();
        assert!(matches!(commands[0], DrawCommand::Fill { .. }));
        assert!(commands.contains(&DrawCommand::PushClip(area)));
        assert_eq!(surface.texts().collect::<Vec<_>>(), vec!["hello"]);
        assert!(surface.is_balanced());
    }

    #[test]
    fn test_empty_sticky_skips_text() {
        let mut surface = RecordingSurface::new();
        paint_shape(&mut surface, &Shape::StickyNote(StickyNote::at(Point::ZERO, None)), 1.0);
        assert_eq!(surface.texts().count(), 0);
        assert!(!surface.commands().iter().any(|c| matches!(c, DrawCommand::PushClip(_))));
    }

    #[test]
    fn test_stroke_tail_starts_at_index() {
        let mut surface = RecordingSurface::new();
        let stroke = Freehand::from_points(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(20.0, 0.0),
        ]);
        paint_stroke_tail(&mut surface, &stroke, 1, 1.0);

        let (path, _, _) = surface.strokes().next().unwrap();
        assert_eq!(
            path.elements(),
            &[
                PathEl::MoveTo(Point::new(10.0, 0.0)),
                PathEl::LineTo(Point::new(20.0, 0.0)),
            ]
        );
    }

    #[test]
    fn test_stroke_tail_first_point_is_dot() {
        let mut surface = RecordingSurface::new();
        let stroke = Freehand::from_points(vec![Point::new(1.0, 1.0)]);
        paint_stroke_tail(&mut surface, &stroke, 0, 1.0);
        assert_eq!(surface.fills().count(), 1);

        let mut surface = RecordingSurface::new();
        paint_stroke_tail(&mut surface, &stroke, 1, 1.0);
        assert!(surface.commands().is_empty());
    }
}
