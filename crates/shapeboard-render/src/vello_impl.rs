//! Vello-based renderer implementation.

use crate::image_loader::{ImageLoader, ImageStatus};
use crate::renderer::{RenderContext, Renderer};
use kurbo::{Affine, BezPath, Cap, Circle, Join, Line, Point, Rect, Shape as KurboShape, Stroke};
use parley::layout::PositionedLayoutItem;
use parley::{FontContext, FontFamily, FontStack, GenericFamily, LayoutContext, StyleProperty};
use peniko::{Brush, Color, Fill};
use shapeboard_core::component::TransformerView;
use shapeboard_core::node::ShapeNode;
use shapeboard_core::selection::{HANDLE_SIZE, Handle, HandleKind};
use shapeboard_core::shapes::{Arrow, Image, Rectangle, Shape, ShapeStyle, Text};
use vello::Scene;

/// Halo widths for path shadows, as fractions of the blur radius.
const HALO_PASSES: [f64; 3] = [1.0, 2.0 / 3.0, 1.0 / 3.0];

fn halo_color() -> Color {
    Color::from_rgba8(0, 0, 0, 30)
}

fn halo_stroke(base_width: f64, blur: f64, pass: f64) -> Stroke {
    Stroke::new(base_width + blur * pass)
        .with_join(Join::Round)
        .with_caps(Cap::Round)
}

/// Vello-based renderer for GPU-accelerated 2D graphics.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    /// Transform handle color.
    selection_color: Color,
    /// Font context for text rendering (system fonts, collected once).
    font_cx: FontContext,
    /// Layout context for text rendering.
    layout_cx: LayoutContext<Brush>,
    /// Bitmaps for image shapes, keyed by source.
    images: ImageLoader,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    /// Create a new Vello renderer.
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            selection_color: Color::from_rgba8(59, 130, 246, 255),
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
            images: ImageLoader::new(),
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Image cache shared by all image shapes.
    pub fn images(&self) -> &ImageLoader {
        &self.images
    }

    /// Render one node. The match is exhaustive: every shape kind has a renderer.
    fn render_node(&mut self, node: &ShapeNode, view: Affine) {
        let transform = view * node.affine();
        match node.shape() {
            Shape::Rectangle(rect) => self.render_rectangle(rect, transform),
            Shape::Image(image) => self.render_image(image, transform),
            Shape::Text(text) => self.render_text(text, transform),
            Shape::Arrow(arrow) => self.render_arrow(arrow, transform),
        }
    }

    fn render_shadow(&mut self, rect: Rect, style: &ShapeStyle, transform: Affine) {
        if style.shadow_blur <= 0.0 {
            return;
        }
        self.scene.draw_blurred_rounded_rect(
            transform,
            rect,
            Color::from_rgba8(0, 0, 0, 90),
            0.0,
            style.shadow_blur / 2.0,
        );
    }

    /// Soft shadow for open or thin paths: translucent strokes layered from
    /// wide to narrow, darkest next to the path.
    fn render_halo(&mut self, path: &BezPath, base_width: f64, blur: f64, transform: Affine) {
        if blur <= 0.0 {
            return;
        }
        for pass in HALO_PASSES {
            let stroke = halo_stroke(base_width, blur, pass);
            self.scene.stroke(&stroke, transform, halo_color(), None, path);
        }
    }

    /// Fill and stroke a path with the shape's style.
    fn render_path(&mut self, path: &BezPath, style: &ShapeStyle, transform: Affine) {
        if let Some(fill_color) = style.fill_color() {
            self.scene.fill(Fill::NonZero, transform, fill_color, None, path);
        }
        if let Some(stroke_color) = style.stroke_color() {
            let stroke = Stroke::new(style.stroke_width);
            self.scene.stroke(&stroke, transform, stroke_color, None, path);
        }
    }

    fn render_rectangle(&mut self, rect: &Rectangle, transform: Affine) {
        let local = rect.local_rect();
        self.render_shadow(local, &rect.style, transform);
        self.render_path(&local.to_path(0.1), &rect.style, transform);
    }

    /// Render an image shape from the loader cache, requesting it on first use.
    fn render_image(&mut self, image: &Image, transform: Affine) {
        self.images.request(&image.source);
        let local = image.local_rect();

        match self.images.status(&image.source) {
            Some(ImageStatus::Ready(image_data)) => {
                let image_data = image_data.clone();
                self.render_shadow(local, &image.style, transform);
                let scale_x = local.width() / f64::from(image_data.width.max(1));
                let scale_y = local.height() / f64::from(image_data.height.max(1));
                let image_transform = transform * Affine::scale_non_uniform(scale_x, scale_y);
                self.scene.draw_image(&peniko::ImageBrush::from(image_data), image_transform);
            }
            Some(ImageStatus::Pending) => self.render_image_placeholder(local, transform),
            // Failed loads draw nothing; the shape stays selectable.
            Some(ImageStatus::Failed) | None => {}
        }
    }

    /// Render a placeholder while an image is loading.
    fn render_image_placeholder(&mut self, local: Rect, transform: Affine) {
        let rect_path = local.to_path(0.1);
        self.scene.fill(
            Fill::NonZero,
            transform,
            Color::from_rgba8(225, 225, 225, 255),
            None,
            &rect_path,
        );
        let stroke = Stroke::new(1.0).with_dashes(0.0, &[4.0, 4.0]);
        self.scene.stroke(
            &stroke,
            transform,
            Color::from_rgba8(160, 160, 160, 255),
            None,
            &rect_path,
        );
    }

    /// Render a text shape using Parley, wrapping at the shape's width.
    fn render_text(&mut self, text: &Text, transform: Affine) {
        if text.content.is_empty() {
            return;
        }

        let color = text.style.fill_color().unwrap_or(Color::BLACK);
        let brush = Brush::Solid(color);
        let max_width = text.width as f32;

        let mut builder = self
            .layout_cx
            .ranged_builder(&mut self.font_cx, &text.content, 1.0, false);
        builder.push_default(StyleProperty::FontSize(text.font_size as f32));
        builder.push_default(StyleProperty::Brush(brush.clone()));
        builder.push_default(StyleProperty::FontStack(FontStack::Single(
            FontFamily::Generic(GenericFamily::SansSerif),
        )));
        let mut layout = builder.build(&text.content);
        layout.break_all_lines(Some(max_width));
        layout.align(
            Some(max_width),
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );

        // Adapted from Parley's vello example
        for line in layout.lines() {
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = glyph_run.offset();
                let y = glyph_run.baseline();
                let run = glyph_run.run();
                let font = run.font();
                let font_size = run.font_size();
                let glyph_xform = run
                    .synthesis()
                    .skew()
                    .map(|angle| Affine::skew(f64::from(angle.to_radians().tan()), 0.0));

                let glyphs: Vec<vello::Glyph> = glyph_run
                    .glyphs()
                    .map(|glyph| {
                        let gx = x + glyph.x;
                        let gy = y - glyph.y;
                        x += glyph.advance;
                        vello::Glyph {
                            id: glyph.id,
                            x: gx,
                            y: gy,
                        }
                    })
                    .collect();

                if glyphs.is_empty() {
                    continue;
                }
                let blur = text.style.shadow_blur;
                if blur > 0.0 {
                    let halo_brush = Brush::Solid(halo_color());
                    for pass in HALO_PASSES {
                        self.scene
                            .draw_glyphs(font)
                            .brush(&halo_brush)
                            .transform(transform)
                            .glyph_transform(glyph_xform)
                            .font_size(font_size)
                            .normalized_coords(run.normalized_coords())
                            .draw(&halo_stroke(0.0, blur, pass), glyphs.iter().copied());
                    }
                }
                self.scene
                    .draw_glyphs(font)
                    .brush(&brush)
                    .hint(true)
                    .transform(transform)
                    .glyph_transform(glyph_xform)
                    .font_size(font_size)
                    .normalized_coords(run.normalized_coords())
                    .draw(Fill::NonZero, glyphs.into_iter());
            }
        }
    }

    fn render_arrow(&mut self, arrow: &Arrow, transform: Affine) {
        let shaft = Line::new(arrow.start, arrow.end).to_path(0.1);
        let [tip, left, right] = arrow.head_points();
        let mut head = BezPath::new();
        head.move_to(tip);
        head.line_to(left);
        head.line_to(right);
        head.close_path();

        let blur = arrow.style.shadow_blur;
        self.render_halo(&shaft, arrow.style.stroke_width, blur, transform);
        self.render_halo(&head, arrow.style.stroke_width, blur, transform);

        if let Some(stroke_color) = arrow.style.stroke_color() {
            let stroke = Stroke::new(arrow.style.stroke_width);
            self.scene.stroke(&stroke, transform, stroke_color, None, &shaft);
        }
        self.render_path(&head, &arrow.style, transform);
    }

    /// Marks the shape bound to the text panel, selected or not.
    fn render_edit_outline(&mut self, node: &ShapeNode, view: Affine) {
        let stroke = Stroke::new(1.0).with_dashes(0.0, &[2.0, 3.0]);
        self.scene.stroke(
            &stroke,
            view * node.affine(),
            self.selection_color,
            None,
            &node.local_box().inflate(3.0, 3.0).to_path(0.1),
        );
    }

    /// Render the transform handle: dashed outline, resize anchors, rotater.
    fn render_transformer(&mut self, transformer: &TransformerView, view: Affine) {
        let bound_box = transformer.bound_box;
        let box_transform = view * bound_box.affine();
        let outline = Rect::new(0.0, 0.0, bound_box.width, bound_box.height);
        let stroke = Stroke::new(1.0).with_dashes(0.0, &[4.0, 4.0]);
        self.scene.stroke(
            &stroke,
            box_transform,
            self.selection_color,
            None,
            &outline.to_path(0.1),
        );

        for handle in transformer.handles() {
            self.render_handle(&handle, bound_box.rotation, view);
        }
    }

    /// Render a single handle, oriented with the box.
    fn render_handle(&mut self, handle: &Handle, rotation: f64, view: Affine) {
        let transform = view * Affine::translate(handle.position.to_vec2()) * Affine::rotate(rotation);
        let half = HANDLE_SIZE / 2.0;
        let path = match handle.kind {
            HandleKind::Rotate => Circle::new(Point::ZERO, half).to_path(0.1),
            HandleKind::Corner(_) | HandleKind::Edge(_) => {
                Rect::new(-half, -half, half, half).to_path(0.1)
            }
        };

        // White fill
        self.scene.fill(Fill::NonZero, transform, Color::WHITE, None, &path);

        // Blue border
        self.scene.stroke(
            &Stroke::new(1.5),
            transform,
            self.selection_color,
            None,
            &path,
        );
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        // Clear the scene
        self.scene.reset();
        self.selection_color = ctx.selection_color;

        if self.images.poll() > 0 {
            log::debug!("image cache updated");
        }

        // World units are logical pixels.
        let view = Affine::scale(ctx.scale_factor);

        for component in ctx.scene.components() {
            let node = ctx.node_for(component.shape());
            self.render_node(&node, view);
            if component.is_edited() {
                self.render_edit_outline(&node, view);
            }
        }

        if let Some(transformer) = ctx.transformer() {
            self.render_transformer(&transformer, view);
        }
    }
}
