//! Committed shape log with a separate redo buffer

use crate::domain::{Point, Shape};

/// Ordered shapes (z-order) plus the shapes most recently removed by undo
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShapeHistory {
    shapes: Vec<Shape>,
    redo: Vec<Shape>,
}

impl ShapeHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed shapes, bottom to top
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Shape> {
        self.shapes.get(index)
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Append a new shape on top; invalidates the redo chain
    pub fn commit(&mut self, shape: Shape) {
        log::debug!("commit {} (history {})", shape.kind(), self.shapes.len() + 1);
        self.shapes.push(shape);
        self.redo.clear();
    }

    /// Move the topmost shape to the redo buffer. Returns false when empty.
    pub fn undo(&mut self) -> bool {
        match self.shapes.pop() {
            Some(shape) => {
                self.redo.push(shape);
                true
            }
            None => false,
        }
    }

    /// Restore the most recently undone shape. Returns false when nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.redo.pop() {
            Some(shape) => {
                self.shapes.push(shape);
                true
            }
            None => false,
        }
    }

    /// Remove the shape at `index`. Not undoable; clears the redo buffer.
    pub fn delete_at(&mut self, index: usize) -> Option<Shape> {
        if index >= self.shapes.len() {
            return None;
        }
        let removed = self.shapes.remove(index);
        self.redo.clear();
        Some(removed)
    }

    /// Translate the shape at `index` in place. The caller clears redo when the
    /// move is finished.
    pub fn translate_at(&mut self, index: usize, delta: Point) -> bool {
        match self.shapes.get_mut(index) {
            Some(shape) => {
                shape.translate(delta);
                true
            }
            None => false,
        }
    }

    /// Drop every redoable shape
    pub fn clear_redo(&mut self) {
        self.redo.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ShapeColor, StrokeShape};

    fn rect(n: f32) -> Shape {
        Shape::Rectangle(StrokeShape::new(
            Point::new(n, n),
            Point::new(n + 10.0, n + 10.0),
            ShapeColor::RED,
            3.0,
        ))
    }

    #[test]
    fn test_commits_keep_order() {
        let mut history = ShapeHistory::new();
        for i in 0..5 {
            history.commit(rect(i as f32));
        }
        assert_eq!(history.len(), 5);
        let expected: Vec<Shape> = (0..5).map(|i| rect(i as f32)).collect();
        assert_eq!(history.shapes(), expected.as_slice());
    }

    #[test]
    fn test_undo_redo_is_identity() {
        let mut history = ShapeHistory::new();
        history.commit(rect(1.0));
        history.commit(rect(2.0));
        let before = history.shapes().to_vec();

        assert!(history.undo());
        assert_eq!(history.len(), 1);
        assert!(history.redo());
        assert_eq!(history.shapes(), before.as_slice());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_redo_order_is_most_recent_first() {
        let mut history = ShapeHistory::new();
        history.commit(rect(1.0));
        history.commit(rect(2.0));
        history.commit(rect(3.0));
        history.undo();
        history.undo();
        history.redo();
        assert_eq!(history.shapes(), &[rect(1.0), rect(2.0)]);
        history.redo();
        assert_eq!(history.shapes(), &[rect(1.0), rect(2.0), rect(3.0)]);
    }

    #[test]
    fn test_commit_after_undo_clears_redo() {
        let mut history = ShapeHistory::new();
        history.commit(rect(1.0));
        history.undo();
        assert!(history.can_redo());

        history.commit(rect(2.0));
        assert!(!history.can_redo());
        assert!(!history.redo());
        assert_eq!(history.shapes(), &[rect(2.0)]);
    }

    #[test]
    fn test_empty_undo_redo_are_noops() {
        let mut history = ShapeHistory::new();
        assert!(!history.undo());
        assert!(!history.redo());
        assert!(history.is_empty());
    }

    #[test]
    fn test_delete_keeps_relative_order() {
        let mut history = ShapeHistory::new();
        for i in 0..4 {
            history.commit(rect(i as f32));
        }
        let removed = history.delete_at(1);
        assert_eq!(removed, Some(rect(1.0)));
        assert_eq!(history.shapes(), &[rect(0.0), rect(2.0), rect(3.0)]);
        assert_eq!(history.delete_at(10), None);
    }

    #[test]
    fn test_delete_is_not_undoable() {
        // Deleting clears redo and cannot itself be undone: undo after a
        // delete pops the previous top shape, not the deleted one.
        let mut history = ShapeHistory::new();
        history.commit(rect(0.0));
        history.commit(rect(1.0));
        history.undo();
        history.delete_at(0);
        assert!(!history.can_redo());
        assert!(history.is_empty());
        assert!(!history.undo());
    }

    #[test]
    fn test_translate_at_out_of_range() {
        let mut history = ShapeHistory::new();
        history.commit(rect(0.0));
        assert!(history.translate_at(0, Point::new(5.0, 5.0)));
        assert!(!history.translate_at(3, Point::new(5.0, 5.0)));
        assert_eq!(history.get(0).map(Shape::anchor), Some(Point::new(5.0, 5.0)));
    }
}
