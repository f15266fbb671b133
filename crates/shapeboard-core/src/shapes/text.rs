//! Text shape.

use super::{ShapeId, ShapeKind, ShapeStyle, ShapeTrait, SerializableColor, rotated_box_bounds, rotated_box_contains};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A block of text laid out inside a `width`×`height` box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ShapeId,
    /// Top-left corner of the layout box.
    pub position: Point,
    /// Wrap width.
    pub width: f64,
    /// Box height (hit testing and the transform handle use it).
    pub height: f64,
    /// Rotation angle in radians (around `position`).
    #[serde(default)]
    pub rotation: f64,
    /// Text content.
    pub content: String,
    /// Font size in points.
    pub font_size: f64,
    /// Style properties. `fill` is the glyph color.
    pub style: ShapeStyle,
}

impl Text {
    pub const DEFAULT_FONT_SIZE: f64 = 20.0;
    pub const DEFAULT_SIZE: f64 = 100.0;

    /// Create a new text shape with a default-sized box.
    pub fn new(position: Point, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width: Self::DEFAULT_SIZE,
            height: Self::DEFAULT_SIZE,
            rotation: 0.0,
            content: content.into(),
            font_size: Self::DEFAULT_FONT_SIZE,
            style: ShapeStyle::filled(SerializableColor::black()),
        }
    }

    /// Builder-style box size override.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Builder-style font size override.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn local_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

impl ShapeTrait for Text {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Text
    }

    fn bounds(&self) -> Rect {
        rotated_box_bounds(self.position, self.width, self.height, self.rotation)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        rotated_box_contains(
            self.position,
            self.width,
            self.height,
            self.rotation,
            point,
            tolerance,
        )
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}
