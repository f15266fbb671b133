//! Live visual state of a rendered shape.
//!
//! A node carries position, rotation and scale on top of the record's base
//! geometry. Pointer drags and transform-handle gestures only touch the node;
//! [`ShapeNode::finish_transform`] folds the result back into a record.

use crate::selection::{BoundBox, MIN_SIZE};
use crate::shapes::{Arrow, Shape, ShapeId, ShapeTrait};
use kurbo::{Affine, Point, Rect, Vec2};

/// Interactive node for one shape record.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeNode {
    shape: Shape,
    /// Node origin in world coordinates. Arrows start at the world origin
    /// because their geometry is stored as absolute points.
    pub position: Point,
    /// Rotation in radians around `position`.
    pub rotation: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl ShapeNode {
    /// Node at scale 1 reproducing the record.
    pub fn from_shape(shape: &Shape) -> Self {
        let (position, rotation) = match shape {
            Shape::Rectangle(r) => (r.position, r.rotation),
            Shape::Image(i) => (i.position, i.rotation),
            Shape::Text(t) => (t.position, t.rotation),
            Shape::Arrow(_) => (Point::ZERO, 0.0),
        };
        Self {
            shape: shape.clone(),
            position,
            rotation,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.shape.id()
    }

    /// The record this node was built from (or last folded into).
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Node transform: translate · rotate · scale.
    pub fn affine(&self) -> Affine {
        Affine::translate(self.position.to_vec2())
            * Affine::rotate(self.rotation)
            * Affine::scale_non_uniform(self.scale_x, self.scale_y)
    }

    /// Geometry box in the node's local (unscaled) frame.
    pub fn local_box(&self) -> Rect {
        match &self.shape {
            Shape::Rectangle(r) => r.local_rect(),
            Shape::Image(i) => i.local_rect(),
            Shape::Text(t) => t.local_rect(),
            Shape::Arrow(a) => a.bounds(),
        }
    }

    /// Move the node so its origin sits at `position`.
    pub fn drag_to(&mut self, position: Point) {
        self.position = position;
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Oriented box the transform handle wraps around this node.
    pub fn bound_box(&self) -> BoundBox {
        let local = self.local_box();
        let top_left = self.affine() * Point::new(local.x0, local.y0);
        BoundBox {
            x: top_left.x,
            y: top_left.y,
            width: local.width() * self.scale_x,
            height: local.height() * self.scale_y,
            rotation: self.rotation,
        }
    }

    /// Fit the node into `bound_box` by changing scale, rotation and position.
    /// Size changes are expressed as scale; base geometry is untouched.
    pub fn set_bound_box(&mut self, bound_box: BoundBox) {
        let local = self.local_box();
        self.scale_x = bound_box.width / local.width().max(f64::EPSILON);
        self.scale_y = bound_box.height / local.height().max(f64::EPSILON);
        self.rotation = bound_box.rotation;
        let offset = Affine::rotate(self.rotation)
            * Point::new(local.x0 * self.scale_x, local.y0 * self.scale_y);
        self.position = Point::new(bound_box.x, bound_box.y) - offset.to_vec2();
    }

    /// Fold the node's position and scale into a new record.
    ///
    /// Width and height are clamped to [`MIN_SIZE`] and the scale is reset to
    /// 1, so the node keeps rendering the returned record unchanged.
    pub fn finish_transform(&mut self) -> Shape {
        if let Shape::Arrow(_) = self.shape {
            self.clamp_bound_box();
        }
        let scale_x = self.scale_x.abs();
        let scale_y = self.scale_y.abs();
        let shape = match &self.shape {
            Shape::Rectangle(r) => {
                let mut r = r.clone();
                r.position = self.position;
                r.rotation = self.rotation;
                r.width = (r.width * scale_x).max(MIN_SIZE);
                r.height = (r.height * scale_y).max(MIN_SIZE);
                Shape::Rectangle(r)
            }
            Shape::Image(i) => {
                let mut i = i.clone();
                i.position = self.position;
                i.rotation = self.rotation;
                i.width = (i.width * scale_x).max(MIN_SIZE);
                i.height = (i.height * scale_y).max(MIN_SIZE);
                Shape::Image(i)
            }
            Shape::Text(t) => {
                let mut t = t.clone();
                t.position = self.position;
                t.rotation = self.rotation;
                t.width = (t.width * scale_x).max(MIN_SIZE);
                t.height = (t.height * scale_y).max(MIN_SIZE);
                Shape::Text(t)
            }
            Shape::Arrow(a) => Shape::Arrow(self.fold_arrow(a)),
        };

        log::debug!("finished transform of {} {}", shape.kind(), shape.id());
        self.shape = shape.clone();
        self.scale_x = 1.0;
        self.scale_y = 1.0;
        if let Shape::Arrow(_) = self.shape {
            self.position = Point::ZERO;
            self.rotation = 0.0;
        }
        shape
    }

    /// Grow the handle box to at least [`MIN_SIZE`] on each axis, keeping
    /// its top-left corner in place.
    fn clamp_bound_box(&mut self) {
        let mut bound_box = self.bound_box();
        if bound_box.width >= MIN_SIZE && bound_box.height >= MIN_SIZE {
            return;
        }
        bound_box.width = bound_box.width.max(MIN_SIZE);
        bound_box.height = bound_box.height.max(MIN_SIZE);
        self.set_bound_box(bound_box);
    }

    /// Map arrow endpoints through the node transform.
    fn fold_arrow(&self, arrow: &Arrow) -> Arrow {
        let affine = self.affine();
        let mut arrow = arrow.clone();
        arrow.start = affine * arrow.start;
        arrow.end = affine * arrow.end;
        arrow
    }
}
