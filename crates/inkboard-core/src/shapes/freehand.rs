//! Freehand pen stroke.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use crate::geometry::{bounds_of_points, distance};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A freehand stroke: an ordered list of world points.
///
/// Points are only ever appended while the stroke is being drawn; once the
/// gesture ends the list is replaced wholesale by drags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Freehand {
    #[serde(default = "Uuid::new_v4")]
    pub(crate) id: ShapeId,
    /// Points in drawing order.
    #[serde(default)]
    pub points: Vec<Point>,
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Freehand {
    /// Create a stroke with a single starting point.
    pub fn new(start: Point, style: ShapeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            points: vec![start],
            style,
        }
    }

    /// Create from existing points.
    pub fn from_points(points: Vec<Point>) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            style: ShapeStyle::default(),
        }
    }

    /// Add a point to the path.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Append `point` unless it lies closer than `min_distance` to the last
    /// recorded point. Returns whether the point was kept.
    pub fn add_point_filtered(&mut self, point: Point, min_distance: f64) -> bool {
        if let Some(last) = self.points.last() {
            if distance(*last, point) < min_distance {
                return false;
            }
        }
        self.points.push(point);
        true
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl ShapeTrait for Freehand {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        bounds_of_points(&self.points)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.points.iter().any(|p| distance(*p, point) < tolerance)
    }

    fn control_points(&self) -> Vec<Point> {
        self.points.clone()
    }

    fn set_control_points(&mut self, points: &[Point]) {
        if points.len() == self.points.len() {
            self.points.copy_from_slice(points);
        }
    }

    fn lasso_anchors(&self) -> Vec<Point> {
        self.points.clone()
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}
