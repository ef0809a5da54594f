//! Viewport module for pan/zoom transforms.

use crate::geometry::is_degenerate;
use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 5.0;

/// Step used by [`Viewport::zoom_in`] and [`Viewport::zoom_out`].
pub const ZOOM_STEP: f64 = 1.2;

/// Fit-to-content never magnifies past this.
pub const FIT_MAX_ZOOM: f64 = 2.0;

/// Screen padding left around content by fit-to-content.
pub const FIT_PADDING: f64 = 50.0;

/// The world-to-screen mapping `screen = world * zoom + pan`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Scale factor, always within `[MIN_ZOOM, MAX_ZOOM]`.
    pub zoom: f64,
    /// Screen-space translation.
    pub pan: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }
}

fn clamp_zoom(zoom: f64) -> f64 {
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the affine transform for rendering (world to screen).
    pub fn transform(&self) -> Affine {
        Affine::translate(self.pan) * Affine::scale(self.zoom)
    }

    /// Get the inverse transform for input handling (screen to world).
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.pan)
    }

    pub fn to_world(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.pan.x) / self.zoom,
            (screen.y - self.pan.y) / self.zoom,
        )
    }

    pub fn to_screen(&self, world: Point) -> Point {
        Point::new(
            world.x * self.zoom + self.pan.x,
            world.y * self.zoom + self.pan.y,
        )
    }

    /// Set the zoom, clamped to the allowed range.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = clamp_zoom(zoom);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / ZOOM_STEP);
    }

    /// Zoom by `factor`, keeping the world point under `anchor` (screen) fixed.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64) {
        let new_zoom = clamp_zoom(self.zoom * factor);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        let world = self.to_world(anchor);
        self.zoom = new_zoom;
        self.pan = Vec2::new(anchor.x - world.x * new_zoom, anchor.y - world.y * new_zoom);
    }

    /// Ctrl/meta + wheel zoom: out on positive `delta_y`, in otherwise.
    pub fn wheel_zoom(&mut self, anchor: Point, delta_y: f64) {
        let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
        self.zoom_at(anchor, factor);
    }

    /// Plain wheel scroll pans against the wheel delta.
    pub fn pan_by_wheel(&mut self, delta: Vec2) {
        self.pan -= delta;
    }

    /// Pan by a delta in screen coordinates.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Frame `bounds` (world) inside a viewport of `size` (screen), leaving
    /// `padding` on each side. Missing, degenerate or zero-size bounds reset
    /// the view.
    pub fn fit_to_content(&mut self, bounds: Option<Rect>, size: Size, padding: f64) {
        let framable = |b: &Rect| !is_degenerate(*b) && (b.width() > 0.0 || b.height() > 0.0);
        let Some(bounds) = bounds.filter(framable) else {
            self.reset();
            return;
        };

        let available = Size::new(
            (size.width - padding * 2.0).max(1.0),
            (size.height - padding * 2.0).max(1.0),
        );
        // A zero-extent axis places no constraint on the scale.
        let scale_x = if bounds.width() > 0.0 {
            available.width / bounds.width()
        } else {
            f64::INFINITY
        };
        let scale_y = if bounds.height() > 0.0 {
            available.height / bounds.height()
        } else {
            f64::INFINITY
        };
        self.zoom = clamp_zoom(scale_x.min(scale_y).min(FIT_MAX_ZOOM));

        let center = bounds.center();
        self.pan = Vec2::new(
            size.width / 2.0 - center.x * self.zoom,
            size.height / 2.0 - center.y * self.zoom,
        );
    }

    /// World rectangle currently visible in a viewport of `size`.
    pub fn visible_world_rect(&self, size: Size) -> Rect {
        let top_left = self.to_world(Point::ZERO);
        let bottom_right = self.to_world(Point::new(size.width, size.height));
        Rect::from_points(top_left, bottom_right)
    }
}
