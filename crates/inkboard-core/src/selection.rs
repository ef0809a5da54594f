//! Hit-testing, selection state and rigid multi-shape dragging.

use crate::geometry::{EMPTY_BOUNDS, is_degenerate, point_in_polygon, union_bounds};
use crate::scene::Scene;
use crate::shapes::{Shape, ShapeId};
use kurbo::{Point, Rect, Vec2};
use std::collections::HashMap;

/// World-space radius within which a freehand point counts as hit.
pub const HIT_RADIUS: f64 = 10.0;

/// World-space padding around the drawn selection box.
pub const SELECTION_PADDING: f64 = 5.0;

/// Whether `point` (world) hits `shape`.
///
/// Freehand strokes are hit within [`HIT_RADIUS`] of any of their points;
/// every other shape is hit anywhere inside its bounding box, even when it
/// is drawn unfilled.
pub fn point_hit(point: Point, shape: &Shape) -> bool {
    let tolerance = if shape.is_freehand() { HIT_RADIUS } else { 0.0 };
    shape.hit_test(point, tolerance)
}

/// First shape hit by `point`, scanning bottom to top.
///
/// Overlapping shapes resolve to the lowest one in z-order.
pub fn find_top_hit(point: Point, scene: &Scene) -> Option<ShapeId> {
    scene.iter().find(|s| point_hit(point, s)).map(Shape::id)
}

/// Whether a lasso polygon encloses `shape`.
///
/// Freehand strokes need any single point inside; other shapes need their
/// centre or one of their corners inside.
pub fn lasso_contains(shape: &Shape, polygon: &[Point]) -> bool {
    shape
        .lasso_anchors()
        .into_iter()
        .any(|p| point_in_polygon(p, polygon))
}

/// Ordered set of selected shape ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    ids: Vec<ShapeId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[ShapeId] {
        &self.ids
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns whether anything was selected before.
    pub fn clear(&mut self) -> bool {
        let had = !self.ids.is_empty();
        self.ids.clear();
        had
    }

    /// Replace the selection with `ids` (duplicates dropped).
    pub fn set(&mut self, ids: impl IntoIterator<Item = ShapeId>) {
        self.ids.clear();
        for id in ids {
            self.insert(id);
        }
    }

    pub fn insert(&mut self, id: ShapeId) -> bool {
        if self.contains(id) {
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    pub fn remove(&mut self, id: ShapeId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|&s| s != id);
        self.ids.len() != before
    }

    pub fn select_all(&mut self, scene: &Scene) {
        self.set(scene.ids());
    }

    /// Apply a click on `clicked` (or on empty space) with the given
    /// modifiers. Returns whether the selection changed.
    ///
    /// - ctrl/meta toggles the clicked shape
    /// - shift adds it, never removes
    /// - no modifier selects only the clicked shape, unless it is already
    ///   selected, in which case the selection is kept so it can be dragged
    /// - empty space clears the selection unless a modifier is held
    pub fn select_with_modifiers(
        &mut self,
        clicked: Option<ShapeId>,
        ctrl_or_meta: bool,
        shift: bool,
    ) -> bool {
        match clicked {
            Some(id) if ctrl_or_meta => {
                if !self.remove(id) {
                    self.ids.push(id);
                }
                true
            }
            Some(id) if shift => self.insert(id),
            Some(id) => {
                if self.contains(id) {
                    false
                } else {
                    self.ids.clear();
                    self.ids.push(id);
                    true
                }
            }
            None if ctrl_or_meta || shift => false,
            None => self.clear(),
        }
    }

    /// Drop ids that no longer exist in `scene`. Returns whether any were
    /// dropped.
    pub fn retain_existing(&mut self, scene: &Scene) -> bool {
        let before = self.ids.len();
        self.ids.retain(|&id| scene.contains(id));
        self.ids.len() != before
    }

    /// Padded union of the selected shapes' bounds, `None` when nothing
    /// (with finite extent) is selected.
    pub fn bounds(&self, scene: &Scene) -> Option<Rect> {
        let bounds = self
            .ids
            .iter()
            .filter_map(|&id| scene.get(id))
            .map(Shape::bounds)
            .fold(EMPTY_BOUNDS, union_bounds);
        if is_degenerate(bounds) {
            None
        } else {
            Some(bounds.inflate(SELECTION_PADDING, SELECTION_PADDING))
        }
    }

    /// Replace the selection with every shape the lasso encloses.
    pub fn lasso_select(&mut self, scene: &Scene, polygon: &[Point]) {
        self.set(
            scene
                .iter()
                .filter(|s| lasso_contains(s, polygon))
                .map(Shape::id),
        );
    }
}

/// Offsets recorded at drag start, one per control point of each dragged
/// shape, relative to the pointer.
#[derive(Debug, Clone, Default)]
pub struct DragState {
    offsets: HashMap<ShapeId, Vec<Vec2>>,
}

impl DragState {
    pub fn begin(selection: &Selection, scene: &Scene, point: Point) -> Self {
        let offsets = selection
            .ids()
            .iter()
            .filter_map(|&id| scene.get(id))
            .map(|shape| {
                let offsets = shape.control_points().into_iter().map(|p| p - point).collect();
                (shape.id(), offsets)
            })
            .collect();
        Self { offsets }
    }

    /// Move every dragged shape so its control points sit at
    /// `point + offset`.
    pub fn update(&self, scene: &mut Scene, point: Point) {
        for (id, offsets) in &self.offsets {
            if let Some(shape) = scene.get_mut(*id) {
                let moved: Vec<Point> = offsets.iter().map(|o| point + *o).collect();
                shape.set_control_points(&moved);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn shape_ids(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.offsets.keys().copied()
    }
}
