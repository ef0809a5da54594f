//! Tool system for the whiteboard.

use crate::shapes::{BoxShape, SerializableColor, Shape, ShapeStyle};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_4;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Pen,
    Rect,
    Circle,
    Line,
    Arrow,
    Diamond,
    Text,
    Sticky,
    Eraser,
    Select,
    Lasso,
    Hand,
}

impl ToolKind {
    /// Tools that draw a start/end shape by dragging.
    pub fn is_shape(self) -> bool {
        matches!(
            self,
            ToolKind::Rect | ToolKind::Circle | ToolKind::Line | ToolKind::Arrow | ToolKind::Diamond
        )
    }

    /// Tools that ask for text and commit on pointer-down.
    pub fn is_text_entry(self) -> bool {
        matches!(self, ToolKind::Text | ToolKind::Sticky)
    }

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Pen => "pen",
            ToolKind::Rect => "rect",
            ToolKind::Circle => "circle",
            ToolKind::Line => "line",
            ToolKind::Arrow => "arrow",
            ToolKind::Diamond => "diamond",
            ToolKind::Text => "text",
            ToolKind::Sticky => "sticky",
            ToolKind::Eraser => "eraser",
            ToolKind::Select => "select",
            ToolKind::Lasso => "lasso",
            ToolKind::Hand => "hand",
        }
    }
}

/// Style applied to newly created shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolSettings {
    pub style: ShapeStyle,
    #[serde(with = "crate::shapes::fill")]
    pub fill_color: Option<SerializableColor>,
    pub font_size: f64,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            style: ShapeStyle::default(),
            fill_color: None,
            font_size: crate::shapes::Text::DEFAULT_FONT_SIZE,
        }
    }
}

impl ToolSettings {
    /// Build the shape a drag from `start` to `end` produces with `tool`.
    ///
    /// Returns `None` for tools that do not draw start/end shapes.
    pub fn build_shape(&self, tool: ToolKind, start: Point, end: Point) -> Option<Shape> {
        let base = BoxShape::new(start, end).with_style(self.style.clone());
        let shape = match tool {
            ToolKind::Rect => Shape::Rectangle(base.with_fill(self.fill_color)),
            ToolKind::Circle => Shape::Ellipse(base.with_fill(self.fill_color)),
            ToolKind::Diamond => Shape::Diamond(base.with_fill(self.fill_color)),
            ToolKind::Line => Shape::Line(base),
            ToolKind::Arrow => Shape::Arrow(base),
            _ => return None,
        };
        Some(shape)
    }
}

/// Shift-constrained end point for a shape drag.
///
/// Boxy shapes become squares with equal, sign-preserving extents. Lines and
/// arrows snap their angle to the nearest 45 degrees, keeping their length.
pub fn constrain_end(tool: ToolKind, start: Point, end: Point) -> Point {
    let delta = end - start;
    match tool {
        ToolKind::Rect | ToolKind::Circle | ToolKind::Diamond => {
            let size = delta.x.abs().max(delta.y.abs());
            start + Vec2::new(size.copysign(delta.x), size.copysign(delta.y))
        }
        ToolKind::Line | ToolKind::Arrow => {
            let length = delta.hypot();
            let angle = (delta.atan2() / FRAC_PI_4).round() * FRAC_PI_4;
            start + Vec2::from_angle(angle) * length
        }
        _ => end,
    }
}
