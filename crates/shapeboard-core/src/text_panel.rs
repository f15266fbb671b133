//! Side-panel model for editing the content of the edited text shape.

use crate::scene::{Scene, SceneEvent};
use crate::shapes::ShapeId;

/// Text-edit panel bound to the scene's `edit_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextEditPanel {
    bound: Option<ShapeId>,
    buffer: String,
}

impl TextEditPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebind to the currently edited shape. When the binding changes the
    /// buffer is reset to that shape's text (or emptied when nothing is edited).
    pub fn sync(&mut self, scene: &Scene) {
        let edit_id = scene.edit_id();
        if edit_id == self.bound {
            return;
        }
        self.bound = edit_id;
        self.buffer = scene
            .edited()
            .and_then(|shape| shape.text())
            .unwrap_or_default()
            .to_owned();
        log::debug!("text panel bound to {:?}", self.bound);
    }

    /// Input is disabled while no shape is being edited.
    pub fn is_enabled(&self) -> bool {
        self.bound.is_some()
    }

    /// Current buffer contents.
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Mutable buffer for widgets that edit in place.
    pub fn buffer_mut(&mut self) -> &mut String {
        &mut self.buffer
    }

    /// A keystroke changed the text. Returns a `Change` carrying the current
    /// edited record with only its text replaced.
    pub fn input(&mut self, text: impl Into<String>, scene: &Scene) -> Option<SceneEvent> {
        let id = self.bound?;
        self.buffer = text.into();
        let updated = scene.get(id)?.with_text(self.buffer.as_str())?;
        Some(SceneEvent::Change(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Rectangle, Shape, Text};
    use kurbo::Point;

    fn scene() -> (Scene, ShapeId, ShapeId, ShapeId) {
        let rect = Shape::Rectangle(Rectangle::new(Point::ZERO, 10.0, 10.0));
        let first = Shape::Text(Text::new(Point::new(0.0, 50.0), "first"));
        let second = Shape::Text(Text::new(Point::new(0.0, 200.0), "second"));
        let ids = (rect.id(), first.id(), second.id());
        (Scene::new(vec![rect, first, second]).unwrap(), ids.0, ids.1, ids.2)
    }

    #[test]
    fn test_disabled_without_edit() {
        let (scene, ..) = scene();
        let mut panel = TextEditPanel::new();
        panel.sync(&scene);
        assert!(!panel.is_enabled());
        assert_eq!(panel.text(), "");
        assert_eq!(panel.input("typed", &scene), None);
    }

    #[test]
    fn test_binding_resets_buffer() {
        let (mut scene, _, first, second) = scene();
        let mut panel = TextEditPanel::new();

        scene.dispatch(SceneEvent::BeginEdit(first)).unwrap();
        panel.sync(&scene);
        assert!(panel.is_enabled());
        assert_eq!(panel.text(), "first");

        panel.buffer_mut().push('!');
        // Same binding keeps local edits.
        panel.sync(&scene);
        assert_eq!(panel.text(), "first!");

        scene.dispatch(SceneEvent::BeginEdit(second)).unwrap();
        panel.sync(&scene);
        assert_eq!(panel.text(), "second");

        scene.dispatch(SceneEvent::Deselect).unwrap();
        panel.sync(&scene);
        assert!(!panel.is_enabled());
        assert_eq!(panel.text(), "");
    }

    #[test]
    fn test_input_updates_only_edited_shape() {
        let (mut scene, rect, first, second) = scene();
        let mut panel = TextEditPanel::new();
        scene.dispatch(SceneEvent::BeginEdit(first)).unwrap();
        panel.sync(&scene);

        let before_rect = scene.get(rect).cloned();
        let before_second = scene.get(second).cloned();
        let event = panel.input("hello", &scene).unwrap();
        scene.dispatch(event).unwrap();

        assert_eq!(scene.get(first).and_then(Shape::text), Some("hello"));
        assert_eq!(scene.get(rect).cloned(), before_rect);
        assert_eq!(scene.get(second).cloned(), before_second);
    }

    #[test]
    fn test_input_uses_current_record() {
        let (mut scene, _, first, _) = scene();
        let mut panel = TextEditPanel::new();
        scene.dispatch(SceneEvent::BeginEdit(first)).unwrap();
        panel.sync(&scene);

        // Move the shape after editing began; the text change must keep the move.
        let Some(Shape::Text(mut moved)) = scene.get(first).cloned() else {
            panic!("Expected Text shape");
        };
        moved.position = Point::new(77.0, 88.0);
        scene.dispatch(SceneEvent::Change(Shape::Text(moved))).unwrap();

        let event = panel.input("typed", &scene).unwrap();
        scene.dispatch(event).unwrap();
        let Some(Shape::Text(text)) = scene.get(first) else {
            panic!("Expected Text shape");
        };
        assert_eq!(text.content, "typed");
        assert_eq!(text.position, Point::new(77.0, 88.0));
    }
}
