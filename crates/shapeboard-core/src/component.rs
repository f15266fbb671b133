//! Per-shape component: maps pointer signals on one record to scene events.

use crate::node::ShapeNode;
use crate::scene::SceneEvent;
use crate::selection::{BoundBox, Handle, get_handles};
use crate::shapes::{Shape, ShapeId};

/// Transform handle attached to the selected shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformerView {
    pub shape_id: ShapeId,
    pub bound_box: BoundBox,
}

impl TransformerView {
    pub fn handles(&self) -> Vec<Handle> {
        get_handles(&self.bound_box)
    }
}

/// One record together with its selected and edited flags.
#[derive(Debug, Clone, Copy)]
pub struct ShapeComponent<'a> {
    shape: &'a Shape,
    selected: bool,
    edited: bool,
}

impl<'a> ShapeComponent<'a> {
    pub fn new(shape: &'a Shape, selected: bool, edited: bool) -> Self {
        Self {
            shape,
            selected,
            edited,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.shape.id()
    }

    pub fn shape(&self) -> &'a Shape {
        self.shape
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_edited(&self) -> bool {
        self.edited
    }

    /// Fresh live node for this record.
    pub fn node(&self) -> ShapeNode {
        ShapeNode::from_shape(self.shape)
    }

    /// Pointer down or tap on the shape.
    pub fn pointer_down(&self) -> SceneEvent {
        SceneEvent::Select(self.id())
    }

    /// Double-click or double-tap. Only text shapes enter edit mode.
    pub fn double_click(&self) -> Option<SceneEvent> {
        self.shape.is_text().then(|| SceneEvent::BeginEdit(self.id()))
    }

    /// End of a transform-handle gesture: fold the node into a new record.
    pub fn transform_end(&self, node: &mut ShapeNode) -> SceneEvent {
        SceneEvent::Change(node.finish_transform())
    }

    /// End of a drag: the node's position becomes the record's position.
    pub fn drag_end(&self, node: &mut ShapeNode) -> SceneEvent {
        SceneEvent::Change(node.finish_transform())
    }

    /// The transform handle, only while selected.
    pub fn transformer(&self) -> Option<TransformerView> {
        self.selected.then(|| TransformerView {
            shape_id: self.id(),
            bound_box: self.node().bound_box(),
        })
    }
}
