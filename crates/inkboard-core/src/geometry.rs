//! Geometry kernel: distances, bounds and containment tests.
//!
//! Every function here is pure. Degenerate input never errors: an empty point
//! list yields an inverted rectangle (`+inf..-inf`) and polygons with fewer
//! than three vertices contain nothing. Callers check [`is_degenerate`] before
//! using such bounds.

use kurbo::{Point, Rect};

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// Midpoint of the segment `a -> b`.
pub fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Inclusive point-in-axis-aligned-box test.
pub fn point_in_box(point: Point, rect: Rect) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// The axis-aligned box spanned by two corners, in any order.
pub fn normalized_rect(start: Point, end: Point) -> Rect {
    Rect::new(
        start.x.min(end.x),
        start.y.min(end.y),
        start.x.max(end.x),
        start.y.max(end.y),
    )
}

/// The inverted rectangle returned for empty input.
pub const EMPTY_BOUNDS: Rect = Rect {
    x0: f64::INFINITY,
    y0: f64::INFINITY,
    x1: f64::NEG_INFINITY,
    y1: f64::NEG_INFINITY,
};

/// Bounding box of a point sequence.
///
/// Returns [`EMPTY_BOUNDS`] when `points` is empty.
pub fn bounds_of_points(points: &[Point]) -> Rect {
    points.iter().fold(EMPTY_BOUNDS, |acc, p| {
        Rect {
            x0: acc.x0.min(p.x),
            y0: acc.y0.min(p.y),
            x1: acc.x1.max(p.x),
            y1: acc.y1.max(p.y),
        }
    })
}

/// Union of two boxes that treats [`EMPTY_BOUNDS`] as the identity.
pub fn union_bounds(a: Rect, b: Rect) -> Rect {
    Rect {
        x0: a.x0.min(b.x0),
        y0: a.y0.min(b.y0),
        x1: a.x1.max(b.x1),
        y1: a.y1.max(b.y1),
    }
}

/// Whether a box is inverted or not finite (the empty-input convention).
pub fn is_degenerate(rect: Rect) -> bool {
    !(rect.x0.is_finite() && rect.y0.is_finite() && rect.x1.is_finite() && rect.y1.is_finite())
        || rect.x0 > rect.x1
        || rect.y0 > rect.y1
}

/// Even-odd ray casting: is `point` inside the (implicitly closed) polygon?
///
/// A horizontal ray is cast to +x and the number of crossed edges counted.
pub fn point_in_polygon(point: Point, polygon: &[Point]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (pi, pj) = (polygon[i], polygon[j]);
        if (pi.y > point.y) != (pj.y > point.y) {
            let cross_x = (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x;
            if point.x < cross_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ]
    }

    #[test]
    fn test_distance() {
        assert!((distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0)) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_point_in_box_is_inclusive() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(point_in_box(Point::new(10.0, 10.0), rect));
        assert!(point_in_box(Point::new(0.0, 5.0), rect));
        assert!(!point_in_box(Point::new(10.1, 5.0), rect));
    }

    #[test]
    fn test_normalized_rect() {
        let rect = normalized_rect(Point::new(20.0, 5.0), Point::new(10.0, 15.0));
        assert_eq!(rect, Rect::new(10.0, 5.0, 20.0, 15.0));
    }

    #[test]
    fn test_bounds_of_points() {
        let bounds = bounds_of_points(&[
            Point::new(5.0, -2.0),
            Point::new(-3.0, 8.0),
            Point::new(1.0, 1.0),
        ]);
        assert_eq!(bounds, Rect::new(-3.0, -2.0, 5.0, 8.0));
    }

    #[test]
    fn test_empty_bounds_are_degenerate() {
        let bounds = bounds_of_points(&[]);
        assert!(bounds.x0.is_infinite() && bounds.x0 > 0.0);
        assert!(bounds.x1.is_infinite() && bounds.x1 < 0.0);
        assert!(is_degenerate(bounds));
        assert!(!is_degenerate(Rect::new(0.0, 0.0, 0.0, 0.0)));
    }

    #[test]
    fn test_union_with_empty_is_identity() {
        let rect = Rect::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(union_bounds(EMPTY_BOUNDS, rect), rect);
    }

    #[test]
    fn test_point_in_polygon() {
        let poly = square();
        assert!(point_in_polygon(Point::new(50.0, 50.0), &poly));
        assert!(point_in_polygon(Point::new(1.0, 99.0), &poly));
        assert!(!point_in_polygon(Point::new(150.0, 50.0), &poly));
        assert!(!point_in_polygon(Point::new(-1.0, 50.0), &poly));
    }

    #[test]
    fn test_point_in_concave_polygon() {
        // U shape opening upwards.
        let poly = vec![
            Point::new(0.0, 0.0),
            Point::new(30.0, 0.0),
            Point::new(30.0, 30.0),
            Point::new(20.0, 30.0),
            Point::new(20.0, 10.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 30.0),
            Point::new(0.0, 30.0),
        ];
        assert!(point_in_polygon(Point::new(5.0, 20.0), &poly));
        assert!(!point_in_polygon(Point::new(15.0, 20.0), &poly));
    }

    #[test]
    fn test_polygon_needs_three_vertices() {
        let line = vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)];
        assert!(!point_in_polygon(Point::new(5.0, 5.0), &line));
        assert!(!point_in_polygon(Point::new(5.0, 5.0), &[]));
    }
}
