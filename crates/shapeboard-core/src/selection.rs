//! Transform handle: oriented bound box, anchors and gesture math.

use crate::node::ShapeNode;
use crate::shapes::ShapeId;
use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

/// Handle size in screen pixels.
pub const HANDLE_SIZE: f64 = 10.0;
/// Handle hit tolerance in screen pixels.
pub const HANDLE_HIT_TOLERANCE: f64 = 8.0;
/// Distance from the top edge to the rotation handle (in world units).
pub const ROTATE_HANDLE_OFFSET: f64 = 25.0;
/// Smallest width or height a resize may produce.
pub const MIN_SIZE: f64 = 5.0;
/// Rotation snap step used while Shift is held (15°).
pub const ROTATION_SNAP: f64 = PI / 12.0;

/// Type of transform handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    /// Corner anchor (resizes two edges).
    Corner(Corner),
    /// Edge midpoint anchor (resizes one edge).
    Edge(Edge),
    /// Rotation handle above the top edge.
    Rotate,
}

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Edge positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// A transform handle with its position and type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// Position in world coordinates.
    pub position: Point,
    /// Handle type.
    pub kind: HandleKind,
}

impl Handle {
    /// Create a new handle.
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a point (in world coordinates) hits this handle.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        (point - self.position).hypot2() <= tolerance * tolerance
    }
}

/// Oriented box wrapped by the transform handle. `(x, y)` is the box's
/// top-left corner; the box is rotated by `rotation` radians around it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
}

impl BoundBox {
    /// Transform from the box's local frame to world coordinates.
    pub fn affine(&self) -> Affine {
        Affine::translate((self.x, self.y)) * Affine::rotate(self.rotation)
    }

    /// Map a local point to world coordinates.
    pub fn to_world(&self, local: Point) -> Point {
        self.affine() * local
    }

    /// Map a world point into the box's local frame.
    pub fn to_local(&self, world: Point) -> Point {
        self.affine().inverse() * world
    }

    pub fn center(&self) -> Point {
        self.to_world(Point::new(self.width / 2.0, self.height / 2.0))
    }

    /// Local-frame position of a handle.
    fn local_anchor(&self, kind: HandleKind) -> Point {
        let (w, h) = (self.width, self.height);
        match kind {
            HandleKind::Corner(Corner::TopLeft) => Point::new(0.0, 0.0),
            HandleKind::Corner(Corner::TopRight) => Point::new(w, 0.0),
            HandleKind::Corner(Corner::BottomLeft) => Point::new(0.0, h),
            HandleKind::Corner(Corner::BottomRight) => Point::new(w, h),
            HandleKind::Edge(Edge::Top) => Point::new(w / 2.0, 0.0),
            HandleKind::Edge(Edge::Right) => Point::new(w, h / 2.0),
            HandleKind::Edge(Edge::Bottom) => Point::new(w / 2.0, h),
            HandleKind::Edge(Edge::Left) => Point::new(0.0, h / 2.0),
            HandleKind::Rotate => Point::new(w / 2.0, -ROTATE_HANDLE_OFFSET),
        }
    }

    /// World position of a handle.
    pub fn anchor(&self, kind: HandleKind) -> Point {
        self.to_world(self.local_anchor(kind))
    }
}

/// Reject a proposed box whose width or height is below [`MIN_SIZE`] by
/// returning the previous box.
pub fn limit_bound_box(old: BoundBox, new: BoundBox) -> BoundBox {
    if new.width < MIN_SIZE || new.height < MIN_SIZE {
        old
    } else {
        new
    }
}

const HANDLE_ORDER: [HandleKind; 9] = [
    HandleKind::Rotate,
    HandleKind::Corner(Corner::TopLeft),
    HandleKind::Corner(Corner::TopRight),
    HandleKind::Corner(Corner::BottomLeft),
    HandleKind::Corner(Corner::BottomRight),
    HandleKind::Edge(Edge::Top),
    HandleKind::Edge(Edge::Right),
    HandleKind::Edge(Edge::Bottom),
    HandleKind::Edge(Edge::Left),
];

/// Get the handles for a box: rotation first, then four corners and four edges.
pub fn get_handles(bound_box: &BoundBox) -> Vec<Handle> {
    HANDLE_ORDER
        .iter()
        .map(|&kind| Handle::new(bound_box.anchor(kind), kind))
        .collect()
}

/// Find which handle (if any) is hit at the given point.
pub fn hit_test_handles(bound_box: &BoundBox, point: Point, tolerance: f64) -> Option<HandleKind> {
    get_handles(bound_box)
        .into_iter()
        .find(|handle| handle.hit_test(point, tolerance))
        .map(|handle| handle.kind)
}

/// Proposed box after dragging a resize anchor to `pointer`.
///
/// Works in the box's local frame so rotated boxes resize along their own
/// axes. With `keep_aspect_ratio`, corner drags scale both sides uniformly
/// around the opposite corner. The result is not limited; pass it through
/// [`limit_bound_box`].
pub fn resize_bound_box(
    bound_box: &BoundBox,
    handle: HandleKind,
    pointer: Point,
    keep_aspect_ratio: bool,
) -> BoundBox {
    let local = bound_box.to_local(pointer);
    let (mut left, mut top) = (0.0, 0.0);
    let (mut right, mut bottom) = (bound_box.width, bound_box.height);

    match handle {
        HandleKind::Corner(Corner::TopLeft) => (left, top) = (local.x, local.y),
        HandleKind::Corner(Corner::TopRight) => (right, top) = (local.x, local.y),
        HandleKind::Corner(Corner::BottomLeft) => (left, bottom) = (local.x, local.y),
        HandleKind::Corner(Corner::BottomRight) => (right, bottom) = (local.x, local.y),
        HandleKind::Edge(Edge::Top) => top = local.y,
        HandleKind::Edge(Edge::Right) => right = local.x,
        HandleKind::Edge(Edge::Bottom) => bottom = local.y,
        HandleKind::Edge(Edge::Left) => left = local.x,
        HandleKind::Rotate => return *bound_box,
    }

    if let (true, HandleKind::Corner(corner)) = (keep_aspect_ratio, handle) {
        let scale = ((right - left) / bound_box.width.max(f64::EPSILON))
            .max((bottom - top) / bound_box.height.max(f64::EPSILON));
        let width = bound_box.width * scale;
        let height = bound_box.height * scale;
        match corner {
            Corner::TopLeft => (left, top) = (right - width, bottom - height),
            Corner::TopRight => (right, top) = (left + width, bottom - height),
            Corner::BottomLeft => (left, bottom) = (right - width, top + height),
            Corner::BottomRight => (right, bottom) = (left + width, top + height),
        }
    }

    let origin = bound_box.to_world(Point::new(left, top));
    BoundBox {
        x: origin.x,
        y: origin.y,
        width: right - left,
        height: bottom - top,
        rotation: bound_box.rotation,
    }
}

/// Rotate the box around its centre so the rotation handle points at `pointer`.
/// `snap` rounds the angle to 15° increments.
pub fn rotate_bound_box(bound_box: &BoundBox, pointer: Point, snap: bool) -> BoundBox {
    let center = bound_box.center();
    let delta = pointer - center;
    // Offset so 0° is up
    let mut angle = delta.y.atan2(delta.x) + FRAC_PI_2;
    if snap {
        angle = (angle / ROTATION_SNAP).round() * ROTATION_SNAP;
    }

    let half = Affine::rotate(angle) * Point::new(bound_box.width / 2.0, bound_box.height / 2.0);
    BoundBox {
        x: center.x - half.x,
        y: center.y - half.y,
        rotation: angle,
        ..*bound_box
    }
}

/// State of an active manipulation over one node.
#[derive(Debug, Clone)]
pub struct ManipulationState {
    /// The shape being manipulated.
    pub shape_id: ShapeId,
    /// The handle being dragged (None = moving the whole shape).
    pub handle: Option<HandleKind>,
    /// Starting point of the drag.
    pub start_point: Point,
    /// Current point of the drag.
    pub current_point: Point,
    /// Node state when the gesture began.
    pub original: ShapeNode,
    /// Live node updated on every pointer move.
    pub node: ShapeNode,
}

impl ManipulationState {
    /// Create a new manipulation state.
    pub fn new(node: ShapeNode, handle: Option<HandleKind>, start_point: Point) -> Self {
        Self {
            shape_id: node.id(),
            handle,
            start_point,
            current_point: start_point,
            original: node.clone(),
            node,
        }
    }

    /// Get the drag delta.
    pub fn delta(&self) -> Vec2 {
        self.current_point - self.start_point
    }

    /// Whether this gesture is a plain drag rather than a handle manipulation.
    pub fn is_drag(&self) -> bool {
        self.handle.is_none()
    }

    /// Advance the gesture to `point`. `shift` keeps the aspect ratio while
    /// resizing and snaps the angle while rotating.
    pub fn update(&mut self, point: Point, shift: bool) {
        self.current_point = point;
        match self.handle {
            None => {
                self.node.position = self.original.position + self.delta();
            }
            Some(HandleKind::Rotate) => {
                let rotated = rotate_bound_box(&self.original.bound_box(), point, shift);
                self.node.set_bound_box(rotated);
            }
            Some(kind) => {
                let start_box = self.original.bound_box();
                // Follow the handle, not the raw pointer, so grabbing a handle
                // slightly off-centre does not make the edge jump.
                let target = start_box.anchor(kind) + self.delta();
                let proposed = resize_bound_box(&start_box, kind, target, shift);
                let limited = limit_bound_box(self.node.bound_box(), proposed);
                self.node.set_bound_box(limited);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Rectangle, Shape};

    fn square() -> BoundBox {
        BoundBox {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
            rotation: 0.0,
        }
    }

    #[test]
    fn test_handles_layout() {
        let handles = get_handles(&square());
        assert_eq!(handles.len(), 9);
        assert_eq!(handles[0].kind, HandleKind::Rotate);
        assert_eq!(handles[0].position, Point::new(50.0, -ROTATE_HANDLE_OFFSET));
        assert!(handles.iter().any(|h| h.kind == HandleKind::Corner(Corner::BottomRight)
            && h.position == Point::new(100.0, 100.0)));
    }

    #[test]
    fn test_handle_hit_test() {
        let handle = Handle::new(Point::new(50.0, 50.0), HandleKind::Rotate);

        assert!(handle.hit_test(Point::new(50.0, 50.0), 10.0));
        assert!(handle.hit_test(Point::new(55.0, 55.0), 10.0));
        assert!(!handle.hit_test(Point::new(70.0, 70.0), 10.0));
    }

    #[test]
    fn test_hit_test_handles() {
        let bound_box = square();
        assert_eq!(
            hit_test_handles(&bound_box, Point::new(101.0, 49.0), 4.0),
            Some(HandleKind::Edge(Edge::Right))
        );
        assert_eq!(hit_test_handles(&bound_box, Point::new(50.0, 50.0), 4.0), None);
    }

    #[test]
    fn test_limit_rejects_small_boxes() {
        let old = square();
        let small = BoundBox { width: 4.9, ..old };
        assert_eq!(limit_bound_box(old, small), old);
        let flat = BoundBox { height: 1.0, ..old };
        assert_eq!(limit_bound_box(old, flat), old);
        let ok = BoundBox { width: 5.0, height: 5.0, ..old };
        assert_eq!(limit_bound_box(old, ok), ok);
    }

    #[test]
    fn test_corner_resize() {
        let resized = resize_bound_box(
            &square(),
            HandleKind::Corner(Corner::BottomRight),
            Point::new(150.0, 120.0),
            false,
        );
        assert!((resized.width - 150.0).abs() < 1e-9);
        assert!((resized.height - 120.0).abs() < 1e-9);
        assert_eq!((resized.x, resized.y), (0.0, 0.0));
    }

    #[test]
    fn test_top_left_resize_moves_origin() {
        let resized = resize_bound_box(
            &square(),
            HandleKind::Corner(Corner::TopLeft),
            Point::new(20.0, 30.0),
            false,
        );
        assert!((resized.x - 20.0).abs() < 1e-9);
        assert!((resized.y - 30.0).abs() < 1e-9);
        assert!((resized.width - 80.0).abs() < 1e-9);
        assert!((resized.height - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_edge_resize_only_changes_one_axis() {
        let resized = resize_bound_box(
            &square(),
            HandleKind::Edge(Edge::Bottom),
            Point::new(500.0, 140.0),
            false,
        );
        assert!((resized.width - 100.0).abs() < 1e-9);
        assert!((resized.height - 140.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotated_resize_uses_local_axes() {
        let bound_box = BoundBox {
            rotation: FRAC_PI_2,
            ..square()
        };
        // Rotated a quarter turn, the local +x axis points down the screen.
        let right = bound_box.anchor(HandleKind::Edge(Edge::Right));
        let resized = resize_bound_box(
            &bound_box,
            HandleKind::Edge(Edge::Right),
            right + Vec2::new(0.0, 20.0),
            false,
        );
        assert!((resized.width - 120.0).abs() < 1e-9);
        assert!((resized.height - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_aspect_ratio_resize() {
        let bound_box = BoundBox {
            width: 100.0,
            height: 50.0,
            ..square()
        };
        let resized = resize_bound_box(
            &bound_box,
            HandleKind::Corner(Corner::BottomRight),
            Point::new(200.0, 60.0),
            true,
        );
        let aspect = resized.width / resized.height;
        assert!((aspect - 2.0).abs() < 1e-9);
        assert!((resized.width - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_keeps_center() {
        let bound_box = square();
        let rotated = rotate_bound_box(&bound_box, Point::new(200.0, 50.0), false);
        assert!((rotated.rotation - FRAC_PI_2).abs() < 1e-9);
        let center = rotated.center();
        assert!((center.x - 50.0).abs() < 1e-9);
        assert!((center.y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_snap() {
        let rotated = rotate_bound_box(&square(), Point::new(100.0, -3.0), true);
        let steps = rotated.rotation / ROTATION_SNAP;
        assert!((steps - steps.round()).abs() < 1e-9);
    }

    #[test]
    fn test_manipulation_resize_stops_at_minimum() {
        let shape = Shape::Rectangle(Rectangle::new(Point::new(0.0, 0.0), 100.0, 100.0));
        let node = ShapeNode::from_shape(&shape);
        let start = Point::new(100.0, 100.0);
        let mut state = ManipulationState::new(node, Some(HandleKind::Corner(Corner::BottomRight)), start);

        state.update(Point::new(50.0, 50.0), false);
        let half = state.node.bound_box();
        assert!((half.width - 50.0).abs() < 1e-9);

        // Dragging past the minimum keeps the last valid box.
        state.update(Point::new(2.0, 2.0), false);
        assert_eq!(state.node.bound_box(), half);

        let Shape::Rectangle(r) = state.node.finish_transform() else {
            panic!("Expected Rectangle shape");
        };
        assert!(r.width >= MIN_SIZE && r.height >= MIN_SIZE);
    }

    #[test]
    fn test_manipulation_drag() {
        let shape = Shape::Rectangle(Rectangle::new(Point::new(10.0, 10.0), 100.0, 100.0));
        let mut state = ManipulationState::new(ShapeNode::from_shape(&shape), None, Point::new(50.0, 50.0));
        assert!(state.is_drag());
        state.update(Point::new(60.0, 80.0), false);
        assert_eq!(state.delta(), Vec2::new(10.0, 30.0));
        assert_eq!(state.node.position, Point::new(20.0, 40.0));
    }
}
