//! Pointer routing from the window to the scene.

use kurbo::Point;
use shapeboard_core::input::InputState;
use shapeboard_core::selection::{HANDLE_HIT_TOLERANCE, ManipulationState, hit_test_handles};
use shapeboard_core::{Scene, SceneEvent, ShapeNode};

/// Hit tolerance for shape outlines, in world units.
const SHAPE_HIT_TOLERANCE: f64 = 4.0;

/// Turns raw press/move/release signals into scene events.
#[derive(Debug, Default)]
pub struct EventHandler {
    manipulation: Option<ManipulationState>,
}

impl EventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a drag or handle gesture is in progress.
    pub fn is_manipulating(&self) -> bool {
        self.manipulation.is_some()
    }

    /// The node being manipulated, drawn in place of its record until release.
    pub fn live_node(&self) -> Option<&ShapeNode> {
        self.manipulation.as_ref().map(|m| &m.node)
    }

    /// Abandon the current gesture without writing anything back.
    pub fn cancel(&mut self) {
        self.manipulation = None;
    }

    /// Handle a primary-button press at `point`.
    ///
    /// Transformer handles of the selected shape win over shapes underneath
    /// them. Pressing empty canvas clears the selection.
    pub fn handle_press(&mut self, scene: &mut Scene, point: Point, input: &InputState) {
        self.manipulation = None;

        if let Some(view) = scene.active_transformer() {
            if let Some(kind) = hit_test_handles(&view.bound_box, point, HANDLE_HIT_TOLERANCE) {
                if let Some(component) = scene.component(view.shape_id) {
                    log::debug!("grabbed {kind:?} handle of {}", view.shape_id);
                    self.manipulation =
                        Some(ManipulationState::new(component.node(), Some(kind), point));
                }
                return;
            }
        }

        let Some(id) = scene.shape_at(point, SHAPE_HIT_TOLERANCE).map(|s| s.id()) else {
            apply(scene, SceneEvent::Deselect);
            return;
        };

        let Some(component) = scene.component(id) else {
            return;
        };
        let node = component.node();
        let select = component.pointer_down();
        let edit = input.is_double_click().then(|| component.double_click()).flatten();

        apply(scene, select);
        if let Some(edit) = edit {
            apply(scene, edit);
        }
        self.manipulation = Some(ManipulationState::new(node, None, point));
    }

    /// Advance the current gesture, if any.
    pub fn handle_drag(&mut self, point: Point, shift: bool) {
        if let Some(manipulation) = self.manipulation.as_mut() {
            manipulation.update(point, shift);
        }
    }

    /// Finish the current gesture and write the resulting record back.
    pub fn handle_release(&mut self, scene: &mut Scene) {
        let Some(mut manipulation) = self.manipulation.take() else {
            return;
        };
        if manipulation.current_point == manipulation.start_point {
            return;
        }

        let event = scene.component(manipulation.shape_id).map(|component| {
            if manipulation.is_drag() {
                component.drag_end(&mut manipulation.node)
            } else {
                component.transform_end(&mut manipulation.node)
            }
        });
        if let Some(event) = event {
            apply(scene, event);
        }
    }
}

fn apply(scene: &mut Scene, event: SceneEvent) {
    if let Err(err) = scene.dispatch(event) {
        log::warn!("scene event rejected: {err}");
    }
}
