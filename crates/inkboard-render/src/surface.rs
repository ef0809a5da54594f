//! Drawing surface abstraction.
//!
//! A [`Surface`] is the immediate-mode 2D target the frame pipeline paints
//! onto: an HTML canvas context, a GPU scene builder, or the
//! [`RecordingSurface`](crate::RecordingSurface) used in tests. Paths are
//! given in the current user space; [`Surface::transform`] composes onto
//! the current transform and [`Surface::save`]/[`Surface::restore`] bracket
//! it.

use inkboard_core::shapes::Image;
use kurbo::{Affine, BezPath, Point, Rect, Shape as _, Stroke};
use peniko::Color;

/// Fill color of the stand-in drawn for images a surface cannot show.
pub const IMAGE_PLACEHOLDER_FILL: Color = Color::from_rgba8(200, 200, 200, 255);
/// Cross and border color of the image stand-in.
pub const IMAGE_PLACEHOLDER_STROKE: Color = Color::from_rgba8(150, 150, 150, 255);

pub trait Surface {
    /// Reset every pixel to `color`, ignoring the current transform.
    fn clear(&mut self, color: Color);

    /// Push the current transform and clip state.
    fn save(&mut self);

    /// Pop back to the last saved state.
    fn restore(&mut self);

    /// Compose `transform` onto the current transform.
    fn transform(&mut self, transform: Affine);

    fn stroke(&mut self, path: &BezPath, style: &Stroke, color: Color);

    /// Fill `path` with the non-zero winding rule.
    fn fill(&mut self, path: &BezPath, color: Color);

    /// Draw one line of text with its top-left corner at `origin`.
    fn fill_text(&mut self, text: &str, origin: Point, font_size: f64, color: Color);

    /// Restrict drawing to `rect` until the matching [`Surface::pop_clip`].
    fn push_clip(&mut self, rect: Rect);

    fn pop_clip(&mut self);

    /// Draw `image` stretched over `rect`.
    ///
    /// The default draws a grey box with a cross through it, for surfaces
    /// without image decoding.
    fn draw_image(&mut self, _image: &Image, rect: Rect, line_width: f64) {
        let outline = rect.to_path(0.1);
        self.fill(&outline, IMAGE_PLACEHOLDER_FILL);

        let mut cross = BezPath::new();
        cross.move_to(Point::new(rect.x0, rect.y0));
        cross.line_to(Point::new(rect.x1, rect.y1));
        cross.move_to(Point::new(rect.x1, rect.y0));
        cross.line_to(Point::new(rect.x0, rect.y1));
        let stroke = Stroke::new(line_width);
        self.stroke(&cross, &stroke, IMAGE_PLACEHOLDER_STROKE);
        self.stroke(&outline, &stroke, IMAGE_PLACEHOLDER_STROKE);
    }
}
