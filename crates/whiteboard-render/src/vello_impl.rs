//! Vello-based renderer implementation.

use crate::renderer::{RenderContext, Renderer};
use kurbo::{Affine, BezPath, Cap, Join, Point, Rect, Shape as KurboShape, Stroke};
use parley::layout::PositionedLayoutItem;
use parley::{FontContext, LayoutContext, StyleProperty};
use peniko::{Brush, Color, Fill};
use std::collections::HashMap;
use std::sync::Arc;
use vello::Scene;
use whiteboard_core::shapes::{Freehand, Image, Shape, ShapeId, ShapeStyle, ShapeTrait, Text};
use whiteboard_core::surface::CanvasSurface;

/// Gap between an object and its selection outline.
const SELECTION_PADDING: f64 = 4.0;

/// Vello-based renderer for GPU-accelerated 2D graphics.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    /// Selection highlight color.
    selection_color: Color,
    /// Font context for text rendering (system fonts, loaded once).
    font_cx: FontContext,
    /// Layout context for text rendering.
    layout_cx: LayoutContext<Brush>,
    /// Decoded images by shape, so data URLs are decoded once.
    image_cache: HashMap<ShapeId, peniko::ImageData>,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            selection_color: Color::from_rgba8(59, 130, 246, 255),
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
            image_cache: HashMap::new(),
        }
    }

    /// Get the built scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take the built scene, leaving an empty one.
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    fn render_shape(&mut self, shape: &Shape, transform: Affine, editing: bool) {
        match shape {
            Shape::Rectangle(_) | Shape::Ellipse(_) => {
                self.render_path(&shape.to_path(), shape.style(), transform);
            }
            Shape::Freehand(stroke) => self.render_freehand(stroke, transform),
            Shape::Text(text) => self.render_text(text, transform, editing),
            Shape::Image(image) => self.render_image(image, transform),
        }
    }

    /// Render a shape path with the given style.
    fn render_path(&mut self, path: &BezPath, style: &ShapeStyle, transform: Affine) {
        if let Some(fill_color) = style.fill_with_opacity() {
            self.scene
                .fill(Fill::NonZero, transform, fill_color, None, path);
        }
        if style.has_stroke() {
            let stroke = Stroke::new(style.stroke_width);
            self.scene
                .stroke(&stroke, transform, style.stroke_with_opacity(), None, path);
        }
    }

    fn render_freehand(&mut self, freehand: &Freehand, transform: Affine) {
        let style = &freehand.style;
        if !style.has_stroke() || freehand.is_empty() {
            return;
        }
        let stroke = Stroke::new(style.stroke_width)
            .with_caps(Cap::Round)
            .with_join(Join::Round);
        // A single point still leaves a dot
        let path = if freehand.len() == 1 {
            let p = freehand.points[0];
            kurbo::Line::new(p, p).to_path(0.1)
        } else {
            freehand.to_path()
        };
        self.scene
            .stroke(&stroke, transform, style.stroke_with_opacity(), None, &path);
    }

    /// Render a text shape using Parley for layout.
    fn render_text(&mut self, text: &Text, transform: Affine, editing: bool) {
        let color = text
            .style
            .fill_with_opacity()
            .unwrap_or_else(|| text.style.stroke_with_opacity());
        let brush = Brush::Solid(color);
        let font_stack = format!("{}, sans-serif", text.font_family);

        let mut builder = self
            .layout_cx
            .ranged_builder(&mut self.font_cx, &text.content, 1.0, false);
        builder.push_default(StyleProperty::FontSize(text.font_size as f32));
        builder.push_default(StyleProperty::Brush(brush.clone()));
        builder.push_default(StyleProperty::FontStack(parley::FontStack::from(
            font_stack.as_str(),
        )));
        let mut layout = builder.build(&text.content);
        layout.break_all_lines(None);
        layout.align(None, parley::Alignment::Start, parley::AlignmentOptions::default());

        if !text.content.is_empty() {
            text.set_cached_size(layout.width() as f64, layout.height() as f64);
        }

        // Position is the top-left of the layout box
        let text_transform = transform * Affine::translate(text.position.to_vec2());
        let mut caret = Point::new(0.0, 0.0);

        for line in layout.lines() {
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = glyph_run.offset();
                let y = glyph_run.baseline();
                let run = glyph_run.run();
                let glyph_xform = run
                    .synthesis()
                    .skew()
                    .map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0));

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
                caret = Point::new(x as f64, y as f64);

                if !glyphs.is_empty() {
                    self.scene
                        .draw_glyphs(run.font())
                        .brush(&brush)
                        .hint(true)
                        .transform(text_transform)
                        .glyph_transform(glyph_xform)
                        .font_size(run.font_size())
                        .normalized_coords(run.normalized_coords())
                        .draw(Fill::NonZero, glyphs.into_iter());
                }
            }
        }

        if editing {
            if caret == Point::ZERO {
                caret.y = text.font_size * 0.8;
            }
            let caret_line = kurbo::Line::new(
                Point::new(caret.x + 1.0, caret.y - text.font_size * 0.8),
                Point::new(caret.x + 1.0, caret.y + text.font_size * 0.2),
            );
            self.scene.stroke(
                &Stroke::new(1.5),
                text_transform,
                color,
                None,
                &caret_line,
            );
        }
    }

    /// Render an image shape.
    fn render_image(&mut self, image: &Image, transform: Affine) {
        let image_data = match self.image_cache.get(&image.id()) {
            Some(cached) => cached.clone(),
            None => {
                let Some(decoded) = image
                    .data()
                    .and_then(|raw| ::image::load_from_memory(&raw).ok())
                else {
                    log::warn!("Could not decode image {}", image.id());
                    self.render_image_placeholder(image, transform);
                    return;
                };
                let rgba = decoded.to_rgba8();
                let (width, height) = rgba.dimensions();
                let image_data = peniko::ImageData {
                    data: peniko::Blob::new(Arc::new(rgba.into_vec())),
                    format: peniko::ImageFormat::Rgba8,
                    width,
                    height,
                    alpha_type: peniko::ImageAlphaType::Alpha,
                };
                self.image_cache.insert(image.id(), image_data.clone());
                image_data
            }
        };

        let bounds = image.as_rect();
        let scale_x = bounds.width() / image_data.width as f64;
        let scale_y = bounds.height() / image_data.height as f64;
        let image_transform = transform
            * Affine::translate((bounds.x0, bounds.y0))
            * Affine::scale_non_uniform(scale_x, scale_y);

        self.scene.draw_image(&image_data.into(), image_transform);
    }

    /// Gray box with a cross for images that could not be decoded.
    fn render_image_placeholder(&mut self, image: &Image, transform: Affine) {
        let bounds = image.as_rect();
        let rect_path = bounds.to_path(0.1);
        self.scene.fill(
            Fill::NonZero,
            transform,
            Color::from_rgba8(200, 200, 200, 255),
            None,
            &rect_path,
        );

        let stroke = Stroke::new(2.0);
        let mut cross = BezPath::new();
        cross.move_to(Point::new(bounds.x0, bounds.y0));
        cross.line_to(Point::new(bounds.x1, bounds.y1));
        cross.move_to(Point::new(bounds.x1, bounds.y0));
        cross.line_to(Point::new(bounds.x0, bounds.y1));
        self.scene.stroke(
            &stroke,
            transform,
            Color::from_rgba8(150, 150, 150, 255),
            None,
            &cross,
        );
    }

    /// Dashed outline around the active object.
    fn render_selection(&mut self, bounds: Rect, transform: Affine) {
        let rect = bounds.inflate(SELECTION_PADDING, SELECTION_PADDING);
        let stroke = Stroke::new(1.0).with_dashes(0.0, [4.0, 4.0]);
        self.scene
            .stroke(&stroke, transform, self.selection_color, None, &rect);
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.scene.reset();
        self.selection_color = ctx.selection_color;
        let canvas = ctx.canvas;
        let transform = Affine::scale(ctx.scale_factor);

        let size = canvas.size();
        let area = Rect::new(0.0, 0.0, size.width, size.height);
        if let Some(background) = canvas.background().to_color() {
            self.scene
                .fill(Fill::NonZero, transform, background, None, &area);
        }

        for shape in canvas.shapes_ordered() {
            let editing = canvas.editing_text() == Some(shape.id());
            self.render_shape(shape, transform, editing);
        }

        if let Some(stroke) = canvas.current_stroke() {
            self.render_freehand(stroke, transform);
        }

        if let Some(preview) = &ctx.preview {
            self.render_shape(preview, transform, false);
        }

        if let Some(active) = canvas.active_shape() {
            self.render_selection(active.bounds(), transform);
        }

        // Drop decoded images whose objects are gone
        self.image_cache
            .retain(|id, _| canvas.get(*id).is_some());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;
    use whiteboard_core::canvas::Canvas;
    use whiteboard_core::color::CssColor;
    use whiteboard_core::shapes::{Ellipse, Rectangle};

    fn canvas() -> Canvas {
        Canvas::new(Size::new(400.0, 300.0))
    }

    #[test]
    fn test_renderer_creation() {
        let renderer = VelloRenderer::new();
        assert!(renderer.scene().encoding().is_empty());
    }

    #[test]
    fn test_build_scene_paints_background() {
        let mut renderer = VelloRenderer::new();
        let canvas = canvas();
        renderer.build_scene(&RenderContext::new(&canvas, Size::new(400.0, 300.0)));
        assert!(!renderer.scene().encoding().is_empty());
    }

    #[test]
    fn test_transparent_empty_canvas_draws_nothing() {
        let mut renderer = VelloRenderer::new();
        let mut canvas = canvas();
        canvas.clear();
        renderer.build_scene(&RenderContext::new(&canvas, Size::new(400.0, 300.0)));
        assert!(renderer.scene().encoding().is_empty());
    }

    #[test]
    fn test_build_scene_with_shapes() {
        let mut renderer = VelloRenderer::new();
        let mut canvas = canvas();
        canvas.add(Shape::Rectangle(Rectangle::new(Point::new(10.0, 10.0), 50.0, 40.0)));
        let id = canvas.add(Shape::Ellipse(Ellipse::circle(Point::new(100.0, 100.0), 20.0)));
        canvas.add(Shape::Text(Text::new(Point::new(5.0, 200.0), "hi", CssColor::black())));
        canvas.set_active_object(id);

        let ctx = RenderContext::new(&canvas, Size::new(400.0, 300.0))
            .with_preview(Some(Shape::Rectangle(Rectangle::new(Point::ZERO, 5.0, 5.0))));
        renderer.build_scene(&ctx);
        assert!(!renderer.scene().encoding().is_empty());
    }

    #[test]
    fn test_image_cache_follows_canvas() {
        let mut renderer = VelloRenderer::new();
        let mut canvas = canvas();
        let pixels = ::image::RgbaImage::from_pixel(4, 4, ::image::Rgba([255, 0, 0, 255]));
        let mut png = Vec::new();
        pixels
            .write_to(&mut std::io::Cursor::new(&mut png), ::image::ImageFormat::Png)
            .unwrap();
        let id = canvas.add(Shape::Image(Image::new(
            Point::ZERO,
            &png,
            4,
            4,
            whiteboard_core::shapes::ImageFormat::Png,
        )));

        renderer.build_scene(&RenderContext::new(&canvas, Size::new(400.0, 300.0)));
        assert!(renderer.image_cache.contains_key(&id));

        canvas.remove(id);
        renderer.build_scene(&RenderContext::new(&canvas, Size::new(400.0, 300.0)));
        assert!(renderer.image_cache.is_empty());
    }

    #[test]
    fn test_undecodable_image_uses_placeholder() {
        let mut renderer = VelloRenderer::new();
        let mut canvas = canvas();
        canvas.add(Shape::Image(Image::new(
            Point::ZERO,
            b"garbage",
            10,
            10,
            whiteboard_core::shapes::ImageFormat::Png,
        )));
        renderer.build_scene(&RenderContext::new(&canvas, Size::new(400.0, 300.0)));
        assert!(renderer.image_cache.is_empty());
    }
}
