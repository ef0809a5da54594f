//! A surface that records draw calls instead of rasterizing them.
//!
//! Useful for tests and for hosts that replay the command list into their
//! own graphics API.

use crate::surface::Surface;
use kurbo::{Affine, BezPath, Point, Rect, Stroke};
use peniko::Color;

/// One recorded call on a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Save,
    Restore,
    Transform(Affine),
    Stroke {
        path: BezPath,
        style: Stroke,
        color: Color,
    },
    Fill {
        path: BezPath,
        color: Color,
    },
    Text {
        text: String,
        origin: Point,
        font_size: f64,
        color: Color,
    },
    PushClip(Rect),
    PopClip,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn strokes(&self) -> impl Iterator<Item = (&BezPath, &Stroke, Color)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Stroke { path, style, color } => Some((path, style, *color)),
            _ => None,
        })
    }

    pub fn fills(&self) -> impl Iterator<Item = (&BezPath, Color)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Fill { path, color } => Some((path, *color)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Whether every `Save` has a matching `Restore` and every clip is popped.
    pub fn is_balanced(&self) -> bool {
        let mut saves = 0i32;
        let mut clips = 0i32;
        for command in &self.commands {
            match command {
                DrawCommand::Save => saves += 1,
                DrawCommand::Restore => saves -= 1,
                DrawCommand::PushClip(_) => clips += 1,
                DrawCommand::PopClip => clips -= 1,
                _ => {}
            }
            if saves < 0 || clips < 0 {
                return false;
            }
        }
        saves == 0 && clips == 0
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn transform(&mut self, transform: Affine) {
        self.commands.push(DrawCommand::Transform(transform));
    }

    fn stroke(&mut self, path: &BezPath, style: &Stroke, color: Color) {
        self.commands.push(DrawCommand::Stroke {
            path: path.clone(),
            style: style.clone(),
            color,
        });
    }

    fn fill(&mut self, path: &BezPath, color: Color) {
        self.commands.push(DrawCommand::Fill {
            path: path.clone(),
            color,
        });
    }

    fn fill_text(&mut self, text: &str, origin: Point, font_size: f64, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            origin,
            font_size,
            color,
        });
    }

    fn push_clip(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::PushClip(rect));
    }

    fn pop_clip(&mut self) {
        self.commands.push(DrawCommand::PopClip);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkboard_core::shapes::{Image, ImagePayload};

    #[test]
    fn test_balance_tracking() {
        let mut surface = RecordingSurface::new();
        surface.save();
        surface.push_clip(Rect::new(0.0, 0.0, 1.0, 1.0));
        assert!(!surface.is_balanced());
        surface.pop_clip();
        surface.restore();
        assert!(surface.is_balanced());

        surface.restore();
        assert!(!surface.is_balanced());
    }

    #[test]
    fn test_default_image_placeholder() {
        let mut surface = RecordingSurface::new();
        let image = Image::new(
            Point::new(0.0, 0.0),
            40.0,
            20.0,
            ImagePayload::Reference {
                src: "missing.png".to_string(),
            },
        );
        surface.draw_image(&image, image.as_rect(), 1.0);

        assert_eq!(surface.fills().count(), 1);
        assert_eq!(surface.strokes().count(), 2);
        assert!(surface.fills().all(|(_, color)| color == crate::surface::IMAGE_PLACEHOLDER_FILL));
    }

    #[test]
    fn test_take_commands_empties() {
        let mut surface = RecordingSurface::new();
        surface.clear(Color::WHITE);
        assert_eq!(surface.take_commands(), vec![DrawCommand::Clear(Color::WHITE)]);
        assert!(surface.commands().is_empty());
    }
}
