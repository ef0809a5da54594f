//! Undo/redo over the tail of the scene.
//!
//! The undo stack is the scene itself: undo always takes the most recently
//! appended shape. Only the redo stack is stored here. Moves and erasures of
//! older shapes are not recorded.

use crate::scene::Scene;
use crate::shapes::{Shape, ShapeId};

#[derive(Debug, Clone, Default)]
pub struct History {
    redo_stack: Vec<Shape>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a completed user action: anything undone before is gone.
    pub fn commit(&mut self) {
        if !self.redo_stack.is_empty() {
            log::debug!("Discarding {} redo entries", self.redo_stack.len());
        }
        self.redo_stack.clear();
    }

    /// Move the last shape of `scene` onto the redo stack.
    pub fn undo(&mut self, scene: &mut Scene) -> Option<ShapeId> {
        let shape = scene.pop()?;
        let id = shape.id();
        self.redo_stack.push(shape);
        Some(id)
    }

    /// Re-append the most recently undone shape.
    pub fn redo(&mut self, scene: &mut Scene) -> Option<ShapeId> {
        let shape = self.redo_stack.pop()?;
        let id = shape.id();
        scene.append(shape);
        Some(id)
    }

    pub fn can_undo(&self, scene: &Scene) -> bool {
        !scene.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.redo_stack.clear();
    }
}
