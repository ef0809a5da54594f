//! Board state and the commands that mutate it.
//!
//! [`Canvas`] owns the scene together with everything that must stay in
//! step with it: selection, history, viewport and tool settings. Every path
//! that removes shapes goes through here so the selection never refers to a
//! shape that is gone.

use crate::history::History;
use crate::scene::Scene;
use crate::selection::Selection;
use crate::shapes::{Shape, ShapeId};
use crate::storage::{SceneRecord, StorageResult};
use crate::tools::{ToolKind, ToolSettings};
use crate::viewport::{FIT_PADDING, Viewport};
use kurbo::{Point, Size};
use std::fmt;

/// World-space radius of the eraser.
pub const ERASER_RADIUS: f64 = 15.0;

/// Something the host should tell the user after loading a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadNotice {
    /// The document could not be read at all; the board was left empty.
    Unreadable(String),
    /// Some elements could not be read and were left out.
    SkippedElements(usize),
}

impl fmt::Display for LoadNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadNotice::Unreadable(reason) => {
                write!(f, "The board could not be loaded ({}); starting empty", reason)
            }
            LoadNotice::SkippedElements(count) => {
                write!(f, "{} unreadable element(s) were skipped", count)
            }
        }
    }
}

/// The whiteboard: scene plus the state bound to it.
#[derive(Debug, Clone)]
pub struct Canvas {
    pub scene: Scene,
    pub viewport: Viewport,
    pub selection: Selection,
    pub history: History,
    pub tool: ToolKind,
    pub settings: ToolSettings,
    /// Size of the drawing surface in screen pixels.
    pub viewport_size: Size,
    pub show_grid: bool,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            viewport: Viewport::new(),
            selection: Selection::new(),
            history: History::new(),
            tool: ToolKind::default(),
            settings: ToolSettings::default(),
            viewport_size: Size::new(800.0, 600.0),
            show_grid: true,
        }
    }

    pub fn with_scene(scene: Scene) -> Self {
        Self {
            scene,
            ..Self::new()
        }
    }

    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport_size = Size::new(width, height);
    }

    /// Append a finished shape as a new undoable action.
    pub fn commit_shape(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        log::debug!("Committed {} {}", shape.type_name(), id);
        self.scene.append(shape);
        self.history.commit();
        id
    }

    /// Remove every shape within [`ERASER_RADIUS`] of `point`.
    ///
    /// Strokes are hit by any point closer than the radius, other shapes by
    /// their bounds grown by the radius. Returns the removed ids.
    pub fn erase_at(&mut self, point: Point) -> Vec<ShapeId> {
        let removed: Vec<ShapeId> = self
            .scene
            .remove_where(|s| s.hit_test(point, ERASER_RADIUS))
            .iter()
            .map(Shape::id)
            .collect();
        if !removed.is_empty() {
            self.selection.retain_existing(&self.scene);
            log::debug!("Erased {} shape(s)", removed.len());
        }
        removed
    }

    pub fn undo(&mut self) -> Option<ShapeId> {
        let id = self.history.undo(&mut self.scene)?;
        self.selection.remove(id);
        Some(id)
    }

    pub fn redo(&mut self) -> Option<ShapeId> {
        self.history.redo(&mut self.scene)
    }

    /// Delete the selected shapes. Returns the removed ids.
    pub fn delete_selected(&mut self) -> Vec<ShapeId> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        let selection = &self.selection;
        let removed: Vec<ShapeId> = self
            .scene
            .remove_where(|s| selection.contains(s.id()))
            .iter()
            .map(Shape::id)
            .collect();
        self.selection.clear();
        self.history.commit();
        removed
    }

    /// Empty the board: scene, redo history and selection. Returns the
    /// removed ids.
    pub fn clear_all(&mut self) -> Vec<ShapeId> {
        let removed: Vec<ShapeId> = self.scene.ids().collect();
        self.scene.clear();
        self.history.clear();
        self.selection.clear();
        log::info!("Cleared board ({} shapes)", removed.len());
        removed
    }

    pub fn select_all(&mut self) {
        self.selection.select_all(&self.scene);
    }

    pub fn clear_selection(&mut self) -> bool {
        self.selection.clear()
    }

    /// Frame the whole scene with the default padding.
    pub fn fit_to_content(&mut self) {
        self.viewport
            .fit_to_content(self.scene.bounds(), self.viewport_size, FIT_PADDING);
    }

    pub fn to_record(&self) -> SceneRecord {
        SceneRecord::new(self.scene.shapes().to_vec())
    }

    pub fn to_record_json(&self) -> StorageResult<String> {
        self.to_record().to_json()
    }

    /// Replace the board with a stored record.
    pub fn load_scene_record(&mut self, record: SceneRecord) {
        self.scene.replace_all(record.strokes);
        self.history.clear();
        self.selection.clear();
        log::info!("Loaded board with {} shapes", self.scene.len());
    }

    /// Replace the board with the record in `json`.
    ///
    /// Never fails: an unreadable document leaves an empty board. The
    /// returned notice, if any, should be shown to the user.
    pub fn load_record(&mut self, json: &str) -> Option<LoadNotice> {
        match SceneRecord::parse(json) {
            Ok(parsed) => {
                self.load_scene_record(parsed.record);
                (parsed.skipped > 0).then_some(LoadNotice::SkippedElements(parsed.skipped))
            }
            Err(e) => {
                log::warn!("Failed to load board: {}", e);
                self.load_scene_record(SceneRecord::new(Vec::new()));
                Some(LoadNotice::Unreadable(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{BoxShape, Freehand};

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Shape {
        Shape::Rectangle(BoxShape::new(Point::new(x0, y0), Point::new(x1, y1)))
    }

    #[test]
    fn test_erase_removes_and_filters_selection() {
        let mut canvas = Canvas::new();
        let stroke = Shape::Freehand(Freehand::from_points(vec![Point::new(0.0, 0.0)]));
        let far = rect(100.0, 100.0, 120.0, 120.0);
        let (stroke_id, far_id) = (stroke.id(), far.id());
        canvas.commit_shape(stroke);
        canvas.commit_shape(far);
        canvas.selection.set([stroke_id, far_id]);

        let removed = canvas.erase_at(Point::new(14.0, 0.0));
        assert_eq!(removed, vec![stroke_id]);
        assert_eq!(canvas.selection.ids(), &[far_id]);
    }

    #[test]
    fn test_erase_uses_inflated_bounds() {
        let mut canvas = Canvas::new();
        canvas.commit_shape(rect(0.0, 0.0, 10.0, 10.0));
        assert!(canvas.erase_at(Point::new(26.0, 5.0)).is_empty());
        assert_eq!(canvas.erase_at(Point::new(25.0, 5.0)).len(), 1);
        assert!(canvas.scene.is_empty());
    }

    #[test]
    fn test_undo_drops_selection_of_undone() {
        let mut canvas = Canvas::new();
        let id = canvas.commit_shape(rect(0.0, 0.0, 1.0, 1.0));
        canvas.select_all();
        assert_eq!(canvas.undo(), Some(id));
        assert!(canvas.selection.is_empty());
        assert_eq!(canvas.redo(), Some(id));
    }

    #[test]
    fn test_delete_selected_clears_redo() {
        let mut canvas = Canvas::new();
        let a = canvas.commit_shape(rect(0.0, 0.0, 1.0, 1.0));
        canvas.commit_shape(rect(5.0, 5.0, 6.0, 6.0));
        canvas.undo();
        canvas.selection.set([a]);

        assert_eq!(canvas.delete_selected(), vec![a]);
        assert!(canvas.scene.is_empty());
        assert!(!canvas.history.can_redo());
        assert!(canvas.selection.is_empty());
    }

    #[test]
    fn test_clear_all() {
        let mut canvas = Canvas::new();
        canvas.commit_shape(rect(0.0, 0.0, 1.0, 1.0));
        canvas.commit_shape(rect(0.0, 0.0, 2.0, 2.0));
        canvas.undo();
        canvas.select_all();
        assert_eq!(canvas.clear_all().len(), 1);
        assert!(canvas.scene.is_empty());
        assert!(!canvas.history.can_redo());
        assert!(canvas.selection.is_empty());
    }

    #[test]
    fn test_fit_empty_scene_resets_view() {
        let mut canvas = Canvas::new();
        canvas.viewport.zoom = 3.0;
        canvas.fit_to_content();
        assert_eq!(canvas.viewport, Viewport::default());
    }

    #[test]
    fn test_load_record_roundtrip() {
        let mut canvas = Canvas::new();
        canvas.commit_shape(rect(0.0, 0.0, 10.0, 10.0));
        let json = canvas.to_record_json().unwrap();

        let mut other = Canvas::new();
        assert_eq!(other.load_record(&json), None);
        assert_eq!(other.scene, canvas.scene);
    }

    #[test]
    fn test_load_unreadable_falls_back_to_empty() {
        let mut canvas = Canvas::new();
        canvas.commit_shape(rect(0.0, 0.0, 10.0, 10.0));
        let notice = canvas.load_record("{ not json");
        assert!(matches!(notice, Some(LoadNotice::Unreadable(_))));
        assert!(canvas.scene.is_empty());
    }

    #[test]
    fn test_load_reports_skipped() {
        let mut canvas = Canvas::new();
        let notice = canvas.load_record(r#"[{"type":"blob"}]"#);
        assert_eq!(notice, Some(LoadNotice::SkippedElements(1)));
    }
}
