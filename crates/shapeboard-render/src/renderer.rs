//! Renderer trait abstraction.

use kurbo::Size;
use peniko::Color;
use shapeboard_core::component::TransformerView;
use shapeboard_core::node::ShapeNode;
use shapeboard_core::scene::Scene;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The scene to render.
    pub scene: &'a Scene,
    /// Viewport size in physical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Background color.
    pub background_color: Color,
    /// Transform handle color.
    pub selection_color: Color,
    /// Node of an in-progress gesture; drawn instead of its record.
    pub live_node: Option<&'a ShapeNode>,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(scene: &'a Scene, viewport_size: Size) -> Self {
        Self {
            scene,
            viewport_size,
            scale_factor: 1.0,
            background_color: Color::from_rgba8(250, 250, 250, 255),
            selection_color: Color::from_rgba8(59, 130, 246, 255), // Blue
            live_node: None,
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the transform handle color.
    pub fn with_selection_color(mut self, color: Color) -> Self {
        self.selection_color = color;
        self
    }

    /// Set the node of the gesture in progress.
    pub fn with_live_node(mut self, node: Option<&'a ShapeNode>) -> Self {
        self.live_node = node;
        self
    }

    /// Node to draw for a record: the live node when it belongs to `shape`,
    /// otherwise a fresh node at rest.
    pub fn node_for(&self, shape: &shapeboard_core::Shape) -> ShapeNode {
        match self.live_node {
            Some(node) if node.id() == shape.id() => node.clone(),
            _ => ShapeNode::from_shape(shape),
        }
    }

    /// The transform handle to draw. Follows the live node while the
    /// selected shape is being manipulated.
    pub fn transformer(&self) -> Option<TransformerView> {
        let view = self.scene.active_transformer()?;
        match self.live_node {
            Some(node) if node.id() == view.shape_id => Some(TransformerView {
                bound_box: node.bound_box(),
                ..view
            }),
            _ => Some(view),
        }
    }
}

/// Trait for rendering backends.
///
/// Implementations can use Vello, wgpu directly, or other rendering engines.
pub trait Renderer {
    /// Build the scene/command buffer for a frame.
    ///
    /// This method is called once per frame and should prepare all drawing commands.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Vec2};
    use shapeboard_core::scene::SceneEvent;
    use shapeboard_core::shapes::{Rectangle, Shape};

    fn scene_with_rect() -> (Scene, Shape) {
        let rect = Shape::Rectangle(Rectangle::new(Point::new(10.0, 10.0), 100.0, 100.0));
        (Scene::new(vec![rect.clone()]).unwrap(), rect)
    }

    #[test]
    fn test_no_transformer_without_selection() {
        let (scene, _) = scene_with_rect();
        let ctx = RenderContext::new(&scene, Size::new(800.0, 600.0));
        assert!(ctx.transformer().is_none());
    }

    #[test]
    fn test_transformer_follows_live_node() {
        let (mut scene, rect) = scene_with_rect();
        scene.dispatch(SceneEvent::Select(rect.id())).unwrap();

        let mut node = ShapeNode::from_shape(&rect);
        node.translate(Vec2::new(5.0, 0.0));
        let ctx = RenderContext::new(&scene, Size::new(800.0, 600.0)).with_live_node(Some(&node));

        let view = ctx.transformer().unwrap();
        assert_eq!(view.bound_box.x, 15.0);
        assert_eq!(ctx.node_for(&rect).position, Point::new(15.0, 10.0));
    }

    #[test]
    fn test_builder_options() {
        let (scene, _) = scene_with_rect();
        let ctx = RenderContext::new(&scene, Size::new(800.0, 600.0))
            .with_scale_factor(2.0)
            .with_background(Color::WHITE)
            .with_selection_color(Color::BLACK);
        assert_eq!(ctx.scale_factor, 2.0);
        assert_eq!(ctx.background_color.to_rgba8(), Color::WHITE.to_rgba8());
        assert_eq!(ctx.selection_color.to_rgba8(), Color::BLACK.to_rgba8());
    }
}
