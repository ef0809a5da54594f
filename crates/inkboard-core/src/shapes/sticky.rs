//! Sticky note: a filled box with optional text clipped to it.

use super::{SerializableColor, ShapeId, ShapeStyle, ShapeTrait};
use crate::geometry::normalized_rect;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Inner padding between the note edge and its text, in world units.
pub const STICKY_TEXT_PADDING: f64 = 8.0;

/// Size of a note placed with a single click.
pub const DEFAULT_STICKY_SIZE: Size = Size::new(200.0, 150.0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickyNote {
    #[serde(default = "Uuid::new_v4")]
    pub(crate) id: ShapeId,
    pub start: Point,
    pub end: Point,
    #[serde(default = "default_background")]
    pub background: SerializableColor,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(flatten)]
    pub style: ShapeStyle,
}

fn default_background() -> SerializableColor {
    StickyNote::DEFAULT_BACKGROUND
}

fn default_font_size() -> f64 {
    StickyNote::DEFAULT_FONT_SIZE
}

impl StickyNote {
    pub const DEFAULT_BACKGROUND: SerializableColor =
        SerializableColor::new(0xff, 0xeb, 0x3b, 0xff);
    pub const DEFAULT_FONT_SIZE: f64 = 16.0;

    /// Create a note of [`DEFAULT_STICKY_SIZE`] with its top-left at `origin`.
    pub fn at(origin: Point, text: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            start: origin,
            end: Point::new(
                origin.x + DEFAULT_STICKY_SIZE.width,
                origin.y + DEFAULT_STICKY_SIZE.height,
            ),
            background: Self::DEFAULT_BACKGROUND,
            text,
            font_size: Self::DEFAULT_FONT_SIZE,
            style: ShapeStyle::default(),
        }
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn as_rect(&self) -> Rect {
        normalized_rect(self.start, self.end)
    }

    /// Region the text is laid out in and clipped to.
    pub fn text_rect(&self) -> Rect {
        let rect = self.as_rect();
        let inset = Rect::new(
            rect.x0 + STICKY_TEXT_PADDING,
            rect.y0 + STICKY_TEXT_PADDING,
            rect.x1 - STICKY_TEXT_PADDING,
            rect.y1 - STICKY_TEXT_PADDING,
        );
        if inset.width() < 0.0 || inset.height() < 0.0 {
            Rect::from_center_size(rect.center(), Size::ZERO)
        } else {
            inset
        }
    }

    /// Text rows; empty when the note has no text.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.as_deref().unwrap_or_default().lines()
    }
}

impl ShapeTrait for StickyNote {
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
