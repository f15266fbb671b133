//! Shape records for the canvas.

mod arrow;
mod image;
mod rectangle;
mod text;

pub use arrow::Arrow;
pub use image::Image;
pub use rectangle::Rectangle;
pub use text::Text;

use kurbo::{Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Parse a CSS color: a handful of named colors or `#rrggbb` / `#rrggbbaa`.
    pub fn parse(css: &str) -> Option<Self> {
        let css = css.trim();
        if let Some(hex) = css.strip_prefix('#') {
            let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
            return match hex.len() {
                6 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, 255)),
                8 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
                _ => None,
            };
        }
        let color = match css.to_ascii_lowercase().as_str() {
            "black" => Self::black(),
            "white" => Self::white(),
            "red" => Self::new(255, 0, 0, 255),
            "green" => Self::new(0, 128, 0, 255),
            "blue" => Self::new(0, 0, 255, 255),
            "yellow" => Self::new(255, 255, 0, 255),
            "orange" => Self::new(255, 165, 0, 255),
            "purple" => Self::new(128, 0, 128, 255),
            "gray" | "grey" => Self::new(128, 128, 128, 255),
            "transparent" => Self::new(0, 0, 0, 0),
            _ => return None,
        };
        Some(color)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Style properties for shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Fill color (None = no fill). Text uses it as the glyph color.
    pub fill: Option<SerializableColor>,
    /// Stroke color (None = no outline).
    pub stroke: Option<SerializableColor>,
    /// Stroke width.
    pub stroke_width: f64,
    /// Drop shadow blur radius (0 = no shadow).
    #[serde(default)]
    pub shadow_blur: f64,
}

impl ShapeStyle {
    /// Default drop shadow blur applied to every seed shape.
    pub const DEFAULT_SHADOW_BLUR: f64 = 5.0;

    /// A filled style without outline.
    pub fn filled(color: SerializableColor) -> Self {
        Self {
            fill: Some(color),
            ..Self::default()
        }
    }

    /// Set the stroke color, keeping the current width.
    pub fn with_stroke(mut self, color: SerializableColor) -> Self {
        self.stroke = Some(color);
        self
    }

    /// Get the fill color as a peniko Color.
    pub fn fill_color(&self) -> Option<Color> {
        self.fill.map(Into::into)
    }

    /// Get the stroke color as a peniko Color.
    pub fn stroke_color(&self) -> Option<Color> {
        self.stroke.map(Into::into)
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: None,
            stroke_width: 2.0,
            shadow_blur: Self::DEFAULT_SHADOW_BLUR,
        }
    }
}

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Type tag of a shape record. Immutable once the record exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rect,
    Image,
    Text,
    Arrow,
}

impl ShapeKind {
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Rect => "rect",
            ShapeKind::Image => "image",
            ShapeKind::Text => "text",
            ShapeKind::Arrow => "arrow",
        }
    }
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    (point - (a + seg * t)).hypot()
}

/// Common trait for all shapes.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Get the type tag.
    fn kind(&self) -> ShapeKind;

    /// Get the axis-aligned bounding box in world coordinates.
    fn bounds(&self) -> Rect;

    /// Check if a point (in world coordinates) hits this shape.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Get the style.
    fn style(&self) -> &ShapeStyle;

    /// Get mutable style.
    fn style_mut(&mut self) -> &mut ShapeStyle;
}

/// A shape record. Each variant carries only its own attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    #[serde(rename = "rect")]
    Rectangle(Rectangle),
    Image(Image),
    Text(Text),
    Arrow(Arrow),
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        match self {
            Shape::Rectangle(s) => s.id(),
            Shape::Image(s) => s.id(),
            Shape::Text(s) => s.id(),
            Shape::Arrow(s) => s.id(),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rectangle(s) => s.kind(),
            Shape::Image(s) => s.kind(),
            Shape::Text(s) => s.kind(),
            Shape::Arrow(s) => s.kind(),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Rectangle(s) => s.bounds(),
            Shape::Image(s) => s.bounds(),
            Shape::Text(s) => s.bounds(),
            Shape::Arrow(s) => s.bounds(),
        }
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self {
            Shape::Rectangle(s) => s.hit_test(point, tolerance),
            Shape::Image(s) => s.hit_test(point, tolerance),
            Shape::Text(s) => s.hit_test(point, tolerance),
            Shape::Arrow(s) => s.hit_test(point, tolerance),
        }
    }

    pub fn style(&self) -> &ShapeStyle {
        match self {
            Shape::Rectangle(s) => s.style(),
            Shape::Image(s) => s.style(),
            Shape::Text(s) => s.style(),
            Shape::Arrow(s) => s.style(),
        }
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        match self {
            Shape::Rectangle(s) => s.style_mut(),
            Shape::Image(s) => s.style_mut(),
            Shape::Text(s) => s.style_mut(),
            Shape::Arrow(s) => s.style_mut(),
        }
    }

    /// Check if this shape can be text-edited.
    pub fn is_text(&self) -> bool {
        matches!(self, Shape::Text(_))
    }

    /// Get the text if this shape is a text shape.
    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Shape::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Text content, for text shapes.
    pub fn text(&self) -> Option<&str> {
        self.as_text().map(|t| t.content.as_str())
    }

    /// Copy of this record with the text replaced. `None` for non-text shapes.
    pub fn with_text(&self, content: impl Into<String>) -> Option<Shape> {
        let mut text = self.as_text()?.clone();
        text.content = content.into();
        Some(Shape::Text(text))
    }
}

/// Axis-aligned bounds of a box of `width`×`height` at `position`, rotated by
/// `rotation` radians around `position`.
pub(crate) fn rotated_box_bounds(position: Point, width: f64, height: f64, rotation: f64) -> Rect {
    if rotation == 0.0 {
        return Rect::new(position.x, position.y, position.x + width, position.y + height);
    }
    let affine = kurbo::Affine::translate(position.to_vec2()) * kurbo::Affine::rotate(rotation);
    let corners = [
        Point::new(0.0, 0.0),
        Point::new(width, 0.0),
        Point::new(width, height),
        Point::new(0.0, height),
    ];
    let mut iter = corners.into_iter().map(|p| affine * p);
    let first = iter.next().unwrap_or(position);
    iter.fold(Rect::from_points(first, first), |r, p| r.union_pt(p))
}

/// Hit test against a box rotated around its top-left `position`.
pub(crate) fn rotated_box_contains(
    position: Point,
    width: f64,
    height: f64,
    rotation: f64,
    point: Point,
    tolerance: f64,
) -> bool {
    let local = (kurbo::Affine::rotate(-rotation) * (point - position).to_point()).to_vec2();
    local.x >= -tolerance
        && local.y >= -tolerance
        && local.x <= width + tolerance
        && local.y <= height + tolerance
}
