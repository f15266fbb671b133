//! Demo scene loaded at start-up.

use crate::shapes::{Arrow, Image, Rectangle, SerializableColor, Shape, ShapeStyle, Text};
use kurbo::Point;

/// Sample bitmap shown by the seed image shape.
pub const SEED_IMAGE_SOURCE: &str = "https://konvajs.org/assets/yoda.jpg";

fn named(color: &str) -> SerializableColor {
    SerializableColor::parse(color).unwrap_or_else(SerializableColor::black)
}

/// Two rectangles, an image, a text block and an arrow, in render order.
pub fn initial_shapes() -> Vec<Shape> {
    vec![
        Shape::Rectangle(
            Rectangle::new(Point::new(10.0, 10.0), 100.0, 100.0)
                .with_style(ShapeStyle::filled(named("red"))),
        ),
        Shape::Rectangle(
            Rectangle::new(Point::new(150.0, 150.0), 100.0, 100.0)
                .with_style(ShapeStyle::filled(named("green"))),
        ),
        Shape::Image(Image::new(
            Point::new(300.0, 300.0),
            100.0,
            100.0,
            SEED_IMAGE_SOURCE,
        )),
        Shape::Text(
            Text::new(Point::new(200.0, 250.0), "test")
                .with_size(100.0, 100.0)
                .with_font_size(20.0),
        ),
        Shape::Arrow(Arrow::new(Point::new(400.0, 150.0), Point::new(500.0, 250.0))),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Scene;
    use crate::shapes::ShapeKind;

    #[test]
    fn test_seed_scene_is_valid() {
        let scene = Scene::new(initial_shapes()).unwrap();
        let kinds: Vec<ShapeKind> = scene.shapes().iter().map(Shape::kind).collect();
        assert_eq!(
            kinds,
            [
                ShapeKind::Rect,
                ShapeKind::Rect,
                ShapeKind::Image,
                ShapeKind::Text,
                ShapeKind::Arrow
            ]
        );
        assert!(scene.selected_id().is_none());
        assert!(scene.edit_id().is_none());
    }

    #[test]
    fn test_seed_styles() {
        let shapes = initial_shapes();
        assert_eq!(shapes[0].style().fill, Some(SerializableColor::new(255, 0, 0, 255)));
        assert_eq!(shapes[1].style().fill, Some(SerializableColor::new(0, 128, 0, 255)));
        assert_eq!(shapes[3].text(), Some("test"));
        assert!(shapes.iter().all(|s| s.style().shadow_blur == ShapeStyle::DEFAULT_SHADOW_BLUR));
    }

    #[test]
    fn test_seed_ids_are_fresh() {
        let a = initial_shapes();
        let b = initial_shapes();
        assert_ne!(a[0].id(), b[0].id());
    }
}
