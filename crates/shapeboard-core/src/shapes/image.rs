//! Image shape referencing a raster source.

use super::{ShapeId, ShapeKind, ShapeStyle, ShapeTrait, rotated_box_bounds, rotated_box_contains};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An image shape that displays a raster image loaded from `source`.
///
/// The bitmap itself is not part of the record: the renderer resolves
/// `source` asynchronously and draws a placeholder until it arrives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub(crate) id: ShapeId,
    /// Top-left corner position.
    pub position: Point,
    /// Display width.
    pub width: f64,
    /// Display height.
    pub height: f64,
    /// Rotation angle in radians (around `position`).
    #[serde(default)]
    pub rotation: f64,
    /// URL (`http://`, `https://`) or filesystem path of the bitmap.
    pub source: String,
    /// Style properties (only the shadow applies).
    pub style: ShapeStyle,
}

impl Image {
    /// Create a new image shape.
    pub fn new(position: Point, width: f64, height: f64, source: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
            rotation: 0.0,
            source: source.into(),
            style: ShapeStyle::default(),
        }
    }

    /// Whether the source has to be fetched over the network.
    pub fn is_remote(&self) -> bool {
        self.source.starts_with("http://") || self.source.starts_with("https://")
    }

    /// The image in its own unrotated frame.
    pub fn local_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

impl ShapeTrait for Image {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Image
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
