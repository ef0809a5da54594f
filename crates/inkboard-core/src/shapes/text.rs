//! Text shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// Average glyph advance as a multiple of the font size. Text is not shaped,
/// so bounds are estimated from character counts.
pub const CHAR_WIDTH_FACTOR: f64 = 0.6;

/// A literal multi-line text block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    #[serde(default = "Uuid::new_v4")]
    pub(crate) id: ShapeId,
    /// Top-left corner of the text block.
    pub position: Point,
    /// The text content; line breaks split it into rows.
    pub text: String,
    /// Font size in world units.
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(flatten)]
    pub style: ShapeStyle,
}

fn default_font_size() -> f64 {
    Text::DEFAULT_FONT_SIZE
}

impl Text {
    pub const DEFAULT_FONT_SIZE: f64 = 20.0;

    /// Create a new text shape.
    pub fn new(position: Point, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            text,
            font_size: Self::DEFAULT_FONT_SIZE,
            style: ShapeStyle::default(),
        }
    }

    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    /// Rows of the text block.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }

    pub fn line_height(&self) -> f64 {
        self.font_size * LINE_HEIGHT_FACTOR
    }
}

/// Estimated size of a block of lines at `font_size`.
pub(crate) fn estimate_block_size(text: &str, font_size: f64) -> (f64, f64) {
    let (rows, longest) = text.lines().fold((0usize, 0usize), |(rows, longest), line| {
        (rows + 1, longest.max(line.chars().count()))
    });
    let rows = rows.max(1);
    (
        longest as f64 * font_size * CHAR_WIDTH_FACTOR,
        rows as f64 * font_size * LINE_HEIGHT_FACTOR,
    )
}

impl ShapeTrait for Text {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let (width, height) = estimate_block_size(&self.text, self.font_size);
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + width,
            self.position.y + height,
        )
    }

    fn control_points(&self) -> Vec<Point> {
        vec![self.position]
    }

    fn set_control_points(&mut self, points: &[Point]) {
        if let [position] = points {
            self.position = *position;
        }
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_bounds_estimate() {
        let text = Text::new(Point::new(10.0, 20.0), "abcd\nab".to_string()).with_font_size(10.0);
        let bounds = text.bounds();
        assert!((bounds.width() - 24.0).abs() < 1e-9);
        assert!((bounds.height() - 24.0).abs() < 1e-9);
        assert_eq!(bounds.origin(), Point::new(10.0, 20.0));
    }

    #[test]
    fn test_lines_split_literally() {
        let text = Text::new(Point::ZERO, "one\ntwo\nthree".to_string());
        assert_eq!(text.lines().collect::<Vec<_>>(), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_empty_text_has_one_row() {
        let text = Text::new(Point::ZERO, String::new()).with_font_size(10.0);
        assert!((text.bounds().height() - 12.0).abs() < 1e-9);
        assert!(text.bounds().width().abs() < 1e-9);
    }

    #[test]
    fn test_missing_font_size_defaults() {
        let json = r#"{"position":{"x":0,"y":0},"text":"hi"}"#;
        let text: Text = serde_json::from_str(json).unwrap();
        assert!((text.font_size - Text::DEFAULT_FONT_SIZE).abs() < f64::EPSILON);
    }
}
