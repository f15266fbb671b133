//! Scene container: the single source of truth for shapes, selection and
//! text editing.

use crate::component::{ShapeComponent, TransformerView};
use crate::node::ShapeNode;
use crate::shapes::{Shape, ShapeId, ShapeKind};
use kurbo::Point;
use std::collections::HashSet;
use thiserror::Error;

/// Errors raised when an event cannot be applied to the scene.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("unknown shape {0}")]
    UnknownShape(ShapeId),
    #[error("shape {id} is a {expected}, replacement is a {found}")]
    KindMismatch {
        id: ShapeId,
        expected: ShapeKind,
        found: ShapeKind,
    },
    #[error("shape {0} is not a text shape")]
    NotEditable(ShapeId),
    #[error("duplicate shape id {0}")]
    DuplicateId(ShapeId),
}

/// The only ways the scene can change.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    /// Select one shape; an edit of another shape ends.
    Select(ShapeId),
    /// Select a text shape and start editing it.
    BeginEdit(ShapeId),
    /// Clear selection and edit state.
    Deselect,
    /// Replace the record with the same id.
    Change(Shape),
}

/// Ordered shape records (order is render order) plus selection and edit
/// pointers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    shapes: Vec<Shape>,
    selected: Option<ShapeId>,
    editing: Option<ShapeId>,
}

impl Scene {
    /// Create a scene from an initial record list. Ids must be unique.
    pub fn new(shapes: Vec<Shape>) -> Result<Self, SceneError> {
        let mut seen = HashSet::with_capacity(shapes.len());
        for shape in &shapes {
            if !seen.insert(shape.id()) {
                return Err(SceneError::DuplicateId(shape.id()));
            }
        }
        Ok(Self {
            shapes,
            selected: None,
            editing: None,
        })
    }

    /// Apply an event. On error the scene is left unchanged.
    pub fn dispatch(&mut self, event: SceneEvent) -> Result<(), SceneError> {
        match event {
            SceneEvent::Select(id) => {
                self.require(id)?;
                self.selected = Some(id);
                log::debug!("selected {id}");
            }
            SceneEvent::BeginEdit(id) => {
                if !self.require(id)?.is_text() {
                    return Err(SceneError::NotEditable(id));
                }
                self.selected = Some(id);
                self.editing = Some(id);
                log::debug!("editing {id}");
            }
            SceneEvent::Deselect => {
                self.selected = None;
                self.editing = None;
                log::debug!("selection cleared");
            }
            SceneEvent::Change(record) => {
                let id = record.id();
                let slot = self
                    .shapes
                    .iter_mut()
                    .find(|shape| shape.id() == id)
                    .ok_or(SceneError::UnknownShape(id))?;
                if slot.kind() != record.kind() {
                    return Err(SceneError::KindMismatch {
                        id,
                        expected: slot.kind(),
                        found: record.kind(),
                    });
                }
                *slot = record;
                log::debug!("replaced {id}");
            }
        }
        Ok(())
    }

    fn require(&self, id: ShapeId) -> Result<&Shape, SceneError> {
        self.get(id).ok_or(SceneError::UnknownShape(id))
    }

    /// All records in render order.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Get a record by id.
    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|shape| shape.id() == id)
    }

    pub fn selected_id(&self) -> Option<ShapeId> {
        self.selected
    }

    pub fn edit_id(&self) -> Option<ShapeId> {
        self.editing
    }

    /// The selected record.
    pub fn selected(&self) -> Option<&Shape> {
        self.selected.and_then(|id| self.get(id))
    }

    /// The record being text-edited.
    pub fn edited(&self) -> Option<&Shape> {
        self.editing.and_then(|id| self.get(id))
    }

    /// Topmost record under `point`.
    pub fn shape_at(&self, point: Point, tolerance: f64) -> Option<&Shape> {
        self.shapes
            .iter()
            .rev()
            .find(|shape| shape.hit_test(point, tolerance))
    }

    /// One component per record, in render order.
    pub fn components(&self) -> impl Iterator<Item = ShapeComponent<'_>> {
        self.shapes.iter().map(|shape| {
            let id = shape.id();
            ShapeComponent::new(shape, self.selected == Some(id), self.editing == Some(id))
        })
    }

    /// Component for a single record.
    pub fn component(&self, id: ShapeId) -> Option<ShapeComponent<'_>> {
        self.components().find(|component| component.id() == id)
    }

    /// The transform handle, derived from the selection and the records.
    pub fn active_transformer(&self) -> Option<TransformerView> {
        self.selected().map(|shape| TransformerView {
            shape_id: shape.id(),
            bound_box: ShapeNode::from_shape(shape).bound_box(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Arrow, Image, Rectangle, Text};

    fn fixture() -> (Scene, [ShapeId; 4]) {
        let a = Shape::Rectangle(Rectangle::new(Point::new(10.0, 10.0), 100.0, 100.0));
        let b = Shape::Rectangle(Rectangle::new(Point::new(150.0, 150.0), 100.0, 100.0));
        let t = Shape::Text(Text::new(Point::new(200.0, 250.0), "test"));
        let i = Shape::Image(Image::new(Point::new(300.0, 300.0), 100.0, 100.0, "yoda.jpg"));
        let ids = [a.id(), b.id(), t.id(), i.id()];
        (Scene::new(vec![a, b, t, i]).unwrap(), ids)
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let rect = Shape::Rectangle(Rectangle::new(Point::ZERO, 10.0, 10.0));
        let err = Scene::new(vec![rect.clone(), rect.clone()]).unwrap_err();
        assert_eq!(err, SceneError::DuplicateId(rect.id()));
    }

    #[test]
    fn test_select_then_select_other() {
        let (mut scene, [a, b, ..]) = fixture();
        scene.dispatch(SceneEvent::Select(a)).unwrap();
        scene.dispatch(SceneEvent::Select(b)).unwrap();
        assert_eq!(scene.selected_id(), Some(b));
        assert_eq!(scene.components().filter(|c| c.is_selected()).count(), 1);
    }

    #[test]
    fn test_select_unknown_is_rejected() {
        let (mut scene, _) = fixture();
        let before = scene.clone();
        let ghost = uuid::Uuid::new_v4();
        assert_eq!(
            scene.dispatch(SceneEvent::Select(ghost)),
            Err(SceneError::UnknownShape(ghost))
        );
        assert_eq!(scene, before);
    }

    #[test]
    fn test_begin_edit_selects_text() {
        let (mut scene, [_, _, t, _]) = fixture();
        scene.dispatch(SceneEvent::BeginEdit(t)).unwrap();
        assert_eq!(scene.selected_id(), Some(t));
        assert_eq!(scene.edit_id(), Some(t));
        assert_eq!(scene.edited().and_then(Shape::text), Some("test"));
    }

    #[test]
    fn test_begin_edit_rejects_non_text() {
        let (mut scene, [a, ..]) = fixture();
        assert_eq!(
            scene.dispatch(SceneEvent::BeginEdit(a)),
            Err(SceneError::NotEditable(a))
        );
        assert_eq!(scene.edit_id(), None);
        assert_eq!(scene.selected_id(), None);
    }

    #[test]
    fn test_selecting_another_shape_keeps_edit() {
        let (mut scene, [a, _, t, _]) = fixture();
        scene.dispatch(SceneEvent::BeginEdit(t)).unwrap();
        scene.dispatch(SceneEvent::Select(t)).unwrap();
        assert_eq!(scene.edit_id(), Some(t));
        scene.dispatch(SceneEvent::Select(a)).unwrap();
        assert_eq!(scene.edit_id(), Some(t));
        assert_eq!(scene.selected_id(), Some(a));
        assert_eq!(scene.edited().map(|s| s.id()), Some(t));
    }

    #[test]
    fn test_deselect_clears_both() {
        let (mut scene, [_, _, t, _]) = fixture();
        scene.dispatch(SceneEvent::BeginEdit(t)).unwrap();
        scene.dispatch(SceneEvent::Deselect).unwrap();
        assert_eq!(scene.selected_id(), None);
        assert_eq!(scene.edit_id(), None);
        assert!(scene.active_transformer().is_none());
    }

    #[test]
    fn test_change_replaces_by_id() {
        let (mut scene, [_, b, ..]) = fixture();
        let Some(Shape::Rectangle(rect)) = scene.get(b).cloned() else {
            panic!("Expected Rectangle shape");
        };
        let mut moved = rect.clone();
        moved.position = Point::new(0.0, 0.0);
        let others: Vec<Shape> = scene.shapes().iter().filter(|s| s.id() != b).cloned().collect();

        scene.dispatch(SceneEvent::Change(Shape::Rectangle(moved.clone()))).unwrap();

        // Position in the list is preserved; only the matching record changes.
        assert_eq!(scene.shapes()[1], Shape::Rectangle(moved));
        let after: Vec<Shape> = scene.shapes().iter().filter(|s| s.id() != b).cloned().collect();
        assert_eq!(after, others);
    }

    #[test]
    fn test_change_is_independent_of_list_position() {
        let (scene, [a, b, t, i]) = fixture();
        let mut reversed: Vec<Shape> = scene.shapes().to_vec();
        reversed.reverse();
        let mut scene = Scene::new(reversed).unwrap();

        let updated = scene.get(t).unwrap().with_text("hello").unwrap();
        scene.dispatch(SceneEvent::Change(updated)).unwrap();
        assert_eq!(scene.get(t).and_then(Shape::text), Some("hello"));
        for id in [a, b, i] {
            assert!(scene.get(id).unwrap().text().is_none());
        }
    }

    #[test]
    fn test_change_rejects_kind_mismatch() {
        let (mut scene, [a, ..]) = fixture();
        let mut text = Text::new(Point::ZERO, "x");
        text.id = a;
        let err = scene.dispatch(SceneEvent::Change(Shape::Text(text))).unwrap_err();
        assert_eq!(
            err,
            SceneError::KindMismatch {
                id: a,
                expected: ShapeKind::Rect,
                found: ShapeKind::Text
            }
        );
    }

    #[test]
    fn test_change_unknown_shape() {
        let (mut scene, _) = fixture();
        let stranger = Shape::Arrow(Arrow::new(Point::ZERO, Point::new(1.0, 1.0)));
        assert_eq!(
            scene.dispatch(SceneEvent::Change(stranger.clone())),
            Err(SceneError::UnknownShape(stranger.id()))
        );
    }

    #[test]
    fn test_shape_at_picks_topmost() {
        let a = Shape::Rectangle(Rectangle::new(Point::new(0.0, 0.0), 100.0, 100.0));
        let b = Shape::Rectangle(Rectangle::new(Point::new(50.0, 50.0), 100.0, 100.0));
        let top = b.id();
        let scene = Scene::new(vec![a, b]).unwrap();
        assert_eq!(scene.shape_at(Point::new(75.0, 75.0), 0.0).map(Shape::id), Some(top));
        assert!(scene.shape_at(Point::new(500.0, 500.0), 0.0).is_none());
    }

    #[test]
    fn test_active_transformer_follows_selection() {
        let (mut scene, [a, ..]) = fixture();
        assert!(scene.active_transformer().is_none());
        scene.dispatch(SceneEvent::Select(a)).unwrap();
        let transformer = scene.active_transformer().unwrap();
        assert_eq!(transformer.shape_id, a);
        assert_eq!(transformer.bound_box.x, 10.0);
        assert_eq!(transformer.bound_box.width, 100.0);
    }
}
