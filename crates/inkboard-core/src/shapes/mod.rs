//! Shape definitions for the whiteboard.
//!
//! A [`Shape`] is the drawable unit of a scene. All geometry is stored in
//! world coordinates; pan and zoom are applied only at render time.

mod bounded;
mod freehand;
mod image;
mod sticky;
mod text;

pub use bounded::BoxShape;
pub use freehand::Freehand;
pub use image::{Image, ImageFormat, ImagePayload};
pub use sticky::{DEFAULT_STICKY_SIZE, STICKY_TEXT_PADDING, StickyNote};
pub use text::{CHAR_WIDTH_FACTOR, LINE_HEIGHT_FACTOR, Text};

use kurbo::{Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Serializable color representation (RGBA8), stored as a CSS hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse a CSS color string (`#rgb`, `#rrggbb`, `#rrggbbaa` or
    /// `transparent`).
    pub fn parse(color: &str) -> Option<Self> {
        let color = color.trim();
        if color.eq_ignore_ascii_case("transparent") {
            return Some(Self::transparent());
        }

        let hex = color.strip_prefix('#')?;
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let r = channel(&hex[0..1])? * 17;
                let g = channel(&hex[1..2])? * 17;
                let b = channel(&hex[2..3])? * 17;
                Some(Self::new(r, g, b, 255))
            }
            6 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                255,
            )),
            8 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            _ => None,
        }
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Whether the color is fully transparent.
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

impl Serialize for SerializableColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for SerializableColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        SerializableColor::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color: {raw}")))
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Serde helpers for optional fills.
///
/// Records written by older versions use the sentinel string `"transparent"`
/// for "no fill"; it deserializes to `None` like an absent or null field.
pub(crate) mod fill {
    use super::SerializableColor;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        fill: &Option<SerializableColor>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match fill {
            Some(color) => serializer.serialize_str(&color.to_hex()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<SerializableColor>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) => {
                let color = SerializableColor::parse(&s)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid fill: {s}")))?;
                Ok((!color.is_transparent()).then_some(color))
            }
        }
    }
}

/// Style properties shared by every shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    /// Stroke color.
    #[serde(default = "default_stroke_color", alias = "color")]
    pub stroke_color: SerializableColor,
    /// Stroke width in world units.
    #[serde(default = "default_stroke_width", alias = "width")]
    pub stroke_width: f64,
}

fn default_stroke_color() -> SerializableColor {
    SerializableColor::black()
}

fn default_stroke_width() -> f64 {
    3.0
}

impl ShapeStyle {
    pub fn new(stroke_color: SerializableColor, stroke_width: f64) -> Self {
        Self {
            stroke_color,
            stroke_width,
        }
    }

    /// Get the stroke color as a peniko Color.
    pub fn stroke(&self) -> Color {
        self.stroke_color.into()
    }

    /// Set the stroke color from a peniko Color.
    pub fn set_stroke(&mut self, color: Color) {
        self.stroke_color = color.into();
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke_color: default_stroke_color(),
            stroke_width: default_stroke_width(),
        }
    }
}

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Common trait for all shapes.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Get the bounding box in world coordinates.
    fn bounds(&self) -> Rect;

    /// Check if a world point lies within `tolerance` of this shape's hit
    /// region. Box-like shapes use their whole bounding box as hit region.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        crate::geometry::point_in_box(point, self.bounds().inflate(tolerance, tolerance))
    }

    /// The world points that define this shape's position. Dragging rewrites
    /// exactly these points.
    fn control_points(&self) -> Vec<Point>;

    /// Replace the control points (same count and order as
    /// [`ShapeTrait::control_points`]).
    fn set_control_points(&mut self, points: &[Point]);

    /// Points tested against a lasso polygon; any inside selects the shape.
    fn lasso_anchors(&self) -> Vec<Point> {
        let bounds = self.bounds();
        vec![
            bounds.center(),
            Point::new(bounds.x0, bounds.y0),
            Point::new(bounds.x1, bounds.y1),
        ]
    }

    /// Get the style.
    fn style(&self) -> &ShapeStyle;

    /// Get mutable style.
    fn style_mut(&mut self) -> &mut ShapeStyle;

    /// Move the shape by a world-space delta.
    fn translate(&mut self, delta: Vec2) {
        let moved: Vec<Point> = self.control_points().into_iter().map(|p| p + delta).collect();
        self.set_control_points(&moved);
    }
}

/// Closed set of drawable element kinds.
///
/// Serialized with an internal `type` tag using the names of the persisted
/// record format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Shape {
    #[serde(rename = "pen")]
    Freehand(Freehand),
    #[serde(rename = "rect")]
    Rectangle(BoxShape),
    #[serde(rename = "circle")]
    Ellipse(BoxShape),
    #[serde(rename = "line")]
    Line(BoxShape),
    #[serde(rename = "arrow")]
    Arrow(BoxShape),
    #[serde(rename = "diamond")]
    Diamond(BoxShape),
    #[serde(rename = "text")]
    Text(Text),
    #[serde(rename = "sticky")]
    StickyNote(StickyNote),
    #[serde(rename = "image")]
    Image(Image),
}

macro_rules! dispatch {
    ($self:expr, $s:ident => $body:expr) => {
        match $self {
            Shape::Freehand($s) => $body,
            Shape::Rectangle($s)
            | Shape::Ellipse($s)
            | Shape::Line($s)
            | Shape::Arrow($s)
            | Shape::Diamond($s) => $body,
            Shape::Text($s) => $body,
            Shape::StickyNote($s) => $body,
            Shape::Image($s) => $body,
        }
    };
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        dispatch!(self, s => s.id())
    }

    pub fn bounds(&self) -> Rect {
        dispatch!(self, s => s.bounds())
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        dispatch!(self, s => s.hit_test(point, tolerance))
    }

    pub fn control_points(&self) -> Vec<Point> {
        dispatch!(self, s => s.control_points())
    }

    pub fn set_control_points(&mut self, points: &[Point]) {
        dispatch!(self, s => s.set_control_points(points))
    }

    pub fn lasso_anchors(&self) -> Vec<Point> {
        dispatch!(self, s => s.lasso_anchors())
    }

    pub fn style(&self) -> &ShapeStyle {
        dispatch!(self, s => s.style())
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        dispatch!(self, s => s.style_mut())
    }

    pub fn translate(&mut self, delta: Vec2) {
        dispatch!(self, s => s.translate(delta))
    }

    /// The record tag of this shape kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            Shape::Freehand(_) => "pen",
            Shape::Rectangle(_) => "rect",
            Shape::Ellipse(_) => "circle",
            Shape::Line(_) => "line",
            Shape::Arrow(_) => "arrow",
            Shape::Diamond(_) => "diamond",
            Shape::Text(_) => "text",
            Shape::StickyNote(_) => "sticky",
            Shape::Image(_) => "image",
        }
    }

    /// Check if this shape is a freehand stroke.
    pub fn is_freehand(&self) -> bool {
        matches!(self, Shape::Freehand(_))
    }

    /// Get the freehand stroke if this shape is one.
    pub fn as_freehand(&self) -> Option<&Freehand> {
        match self {
            Shape::Freehand(f) => Some(f),
            _ => None,
        }
    }

    /// Get the mutable freehand stroke if this shape is one.
    pub fn as_freehand_mut(&mut self) -> Option<&mut Freehand> {
        match self {
            Shape::Freehand(f) => Some(f),
            _ => None,
        }
    }

    /// Get the start/end geometry for the five parametric box kinds.
    pub fn as_box(&self) -> Option<&BoxShape> {
        match self {
            Shape::Rectangle(b)
            | Shape::Ellipse(b)
            | Shape::Line(b)
            | Shape::Arrow(b)
            | Shape::Diamond(b) => Some(b),
            _ => None,
        }
    }

    /// Mutable access to the start/end geometry of a box kind.
    pub fn as_box_mut(&mut self) -> Option<&mut BoxShape> {
        match self {
            Shape::Rectangle(b)
            | Shape::Ellipse(b)
            | Shape::Line(b)
            | Shape::Arrow(b)
            | Shape::Diamond(b) => Some(b),
            _ => None,
        }
    }

    /// Regenerate the shape's ID with a new unique identifier.
    pub fn regenerate_id(&mut self) {
        let new_id = Uuid::new_v4();
        match self {
            Shape::Freehand(s) => s.id = new_id,
            Shape::Rectangle(s)
            | Shape::Ellipse(s)
            | Shape::Line(s)
            | Shape::Arrow(s)
            | Shape::Diamond(s) => s.id = new_id,
            Shape::Text(s) => s.id = new_id,
            Shape::StickyNote(s) => s.id = new_id,
            Shape::Image(s) => s.id = new_id,
        }
    }
}
