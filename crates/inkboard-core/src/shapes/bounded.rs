//! Parametric shapes defined by a drag from `start` to `end`.
//!
//! Rectangles, ellipses, lines, arrows and diamonds share this geometry; the
//! [`Shape`](super::Shape) variant decides how it is painted.

use super::{SerializableColor, ShapeId, ShapeStyle, ShapeTrait};
use crate::geometry::normalized_rect;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Start/end geometry with an optional fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxShape {
    #[serde(default = "Uuid::new_v4")]
    pub(crate) id: ShapeId,
    /// Pointer-down position of the drawing gesture.
    pub start: Point,
    /// Current or final pointer position.
    pub end: Point,
    /// Interior fill, `None` for outline only.
    #[serde(default, with = "super::fill")]
    pub fill_color: Option<SerializableColor>,
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl BoxShape {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            fill_color: None,
            style: ShapeStyle::default(),
        }
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_fill(mut self, fill: Option<SerializableColor>) -> Self {
        self.fill_color = fill;
        self
    }

    /// Normalized rectangle spanned by start and end.
    pub fn as_rect(&self) -> Rect {
        normalized_rect(self.start, self.end)
    }

    /// The four edge midpoints of the bounding box, clockwise from the top.
    pub fn diamond_vertices(&self) -> [Point; 4] {
        let rect = self.as_rect();
        let center = rect.center();
        [
            Point::new(center.x, rect.y0),
            Point::new(rect.x1, center.y),
            Point::new(center.x, rect.y1),
            Point::new(rect.x0, center.y),
        ]
    }
}

impl ShapeTrait for BoxShape {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.as_rect()
    }

    fn control_points(&self) -> Vec<Point> {
        vec![self.start, self.end]
    }

    fn set_control_points(&mut self, points: &[Point]) {
        if let [start, end] = points {
            self.start = *start;
            self.end = *end;
        }
    }

    fn lasso_anchors(&self) -> Vec<Point> {
        vec![self.as_rect().center(), self.start, self.end]
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}
