//! Ordered element collection.

use crate::geometry::{EMPTY_BOUNDS, is_degenerate, union_bounds};
use crate::shapes::{Shape, ShapeId};
use kurbo::Rect;
use serde::{Deserialize, Serialize};

/// All elements of a board, back to front.
///
/// Storage order is both paint order and hit-test iteration order. Elements
/// are addressed by [`ShapeId`]; nothing outside the scene holds references
/// into it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scene {
    shapes: Vec<Shape>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_shapes(shapes: Vec<Shape>) -> Self {
        Self { shapes }
    }

    /// Add a shape on top of the stack.
    pub fn append(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    /// Remove every shape matching `predicate`, returning the removed shapes
    /// in their former order.
    ///
    /// Selections are not touched; the caller filters them afterwards.
    pub fn remove_where<F>(&mut self, mut predicate: F) -> Vec<Shape>
    where
        F: FnMut(&Shape) -> bool,
    {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.shapes.len());
        for shape in self.shapes.drain(..) {
            if predicate(&shape) {
                removed.push(shape);
            } else {
                kept.push(shape);
            }
        }
        self.shapes = kept;
        removed
    }

    /// Iterate in z-order (bottom first).
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Shape> {
        self.shapes.iter()
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id() == id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.get(id).is_some()
    }

    /// The topmost shape.
    pub fn last(&self) -> Option<&Shape> {
        self.shapes.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut Shape> {
        self.shapes.last_mut()
    }

    /// Remove and return the topmost shape.
    pub fn pop(&mut self) -> Option<Shape> {
        self.shapes.pop()
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Union of all shape bounds, `None` when there is nothing with finite
    /// extent.
    pub fn bounds(&self) -> Option<Rect> {
        let bounds = self
            .shapes
            .iter()
            .map(Shape::bounds)
            .fold(EMPTY_BOUNDS, union_bounds);
        (!is_degenerate(bounds)).then_some(bounds)
    }

    /// Swap in a whole new element list.
    pub fn replace_all(&mut self, shapes: Vec<Shape>) {
        self.shapes = shapes;
    }

    pub fn ids(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.shapes.iter().map(Shape::id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{BoxShape, Freehand};
    use kurbo::Point;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Shape {
        Shape::Rectangle(BoxShape::new(Point::new(x0, y0), Point::new(x1, y1)))
    }

    #[test]
    fn test_append_keeps_order() {
        let mut scene = Scene::new();
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = rect(2.0, 2.0, 3.0, 3.0);
        let (ida, idb) = (a.id(), b.id());
        scene.append(a);
        scene.append(b);
        assert_eq!(scene.ids().collect::<Vec<_>>(), vec![ida, idb]);
        assert_eq!(scene.last().map(Shape::id), Some(idb));
    }

    #[test]
    fn test_remove_where_returns_removed_in_order() {
        let mut scene = Scene::new();
        let shapes = vec![
            rect(0.0, 0.0, 1.0, 1.0),
            rect(5.0, 5.0, 6.0, 6.0),
            rect(0.0, 0.0, 2.0, 2.0),
        ];
        let expected = vec![shapes[0].id(), shapes[2].id()];
        scene.replace_all(shapes);

        let removed = scene.remove_where(|s| s.bounds().x0 < 1.0);
        assert_eq!(removed.iter().map(Shape::id).collect::<Vec<_>>(), expected);
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_bounds() {
        let mut scene = Scene::new();
        assert_eq!(scene.bounds(), None);

        scene.append(rect(0.0, 0.0, 10.0, 10.0));
        scene.append(Shape::Freehand(Freehand::from_points(vec![Point::new(-5.0, 20.0)])));
        assert_eq!(scene.bounds(), Some(Rect::new(-5.0, 0.0, 10.0, 20.0)));
    }

    #[test]
    fn test_empty_stroke_has_no_bounds() {
        let mut scene = Scene::new();
        scene.append(Shape::Freehand(Freehand::from_points(Vec::new())));
        assert_eq!(scene.bounds(), None);
    }

    #[test]
    fn test_get_mut() {
        let mut scene = Scene::new();
        let shape = rect(0.0, 0.0, 1.0, 1.0);
        let id = shape.id();
        scene.append(shape);
        if let Some(Shape::Rectangle(b)) = scene.get_mut(id) {
            b.end = Point::new(4.0, 4.0);
        }
        assert_eq!(scene.get(id).map(Shape::bounds), Some(Rect::new(0.0, 0.0, 4.0, 4.0)));
    }
}
