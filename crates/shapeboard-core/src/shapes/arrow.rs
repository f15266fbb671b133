//! Arrow shape.

use super::{ShapeId, ShapeKind, ShapeStyle, ShapeTrait, SerializableColor, point_to_segment_dist};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A straight arrow from `start` to `end` with a filled head at `end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    pub(crate) id: ShapeId,
    /// Start point.
    pub start: Point,
    /// End point (where the arrowhead points).
    pub end: Point,
    /// Length of the arrowhead along the shaft.
    pub pointer_length: f64,
    /// Width of the arrowhead across the shaft.
    pub pointer_width: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Arrow {
    pub const DEFAULT_POINTER_LENGTH: f64 = 10.0;
    pub const DEFAULT_POINTER_WIDTH: f64 = 10.0;

    /// Create a new black arrow.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            pointer_length: Self::DEFAULT_POINTER_LENGTH,
            pointer_width: Self::DEFAULT_POINTER_WIDTH,
            style: ShapeStyle::filled(SerializableColor::black())
                .with_stroke(SerializableColor::black()),
        }
    }

    /// Get the direction vector (normalized).
    pub fn direction(&self) -> Vec2 {
        let delta = self.end - self.start;
        let len = delta.hypot();
        if len < f64::EPSILON {
            Vec2::new(1.0, 0.0)
        } else {
            delta / len
        }
    }

    /// Get the length of the arrow shaft.
    pub fn length(&self) -> f64 {
        (self.end - self.start).hypot()
    }

    /// Tip, left and right corners of the arrowhead triangle.
    pub fn head_points(&self) -> [Point; 3] {
        let dir = self.direction();
        let perp = Vec2::new(-dir.y, dir.x);
        let back = self.end - dir * self.pointer_length;
        let half = self.pointer_width / 2.0;
        [self.end, back + perp * half, back - perp * half]
    }
}

impl ShapeTrait for Arrow {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Arrow
    }

    fn bounds(&self) -> Rect {
        // Include the arrowhead in bounds
        let [_, left, right] = self.head_points();
        Rect::from_points(self.start, self.end)
            .union_pt(left)
            .union_pt(right)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dist = point_to_segment_dist(point, self.start, self.end);
        if dist <= tolerance + self.style.stroke_width / 2.0 {
            return true;
        }

        // Point in triangle test
        fn sign(p1: Point, p2: Point, p3: Point) -> f64 {
            (p1.x - p3.x) * (p2.y - p3.y) - (p2.x - p3.x) * (p1.y - p3.y)
        }

        let [tip, left, right] = self.head_points();
        let d1 = sign(point, tip, left);
        let d2 = sign(point, left, right);
        let d3 = sign(point, right, tip);

        let has_neg = (d1 < 0.0) || (d2 < 0.0) || (d3 < 0.0);
        let has_pos = (d1 > 0.0) || (d2 > 0.0) || (d3 > 0.0);

        !(has_neg && has_pos)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}
