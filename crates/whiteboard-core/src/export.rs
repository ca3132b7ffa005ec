//! Raster export of a [`Canvas`].
//!
//! The canvas is written out as SVG, rasterized with resvg, then encoded as
//! PNG or JPEG and wrapped in a `data:` URL.

use crate::canvas::Canvas;
use crate::color::CssColor;
use crate::data_url::DataUrl;
use crate::shapes::{Image, ImageFormat, Shape, ShapeStyle, Text};
use crate::surface::{CanvasSurface, ExportFormat, ExportOptions, SurfaceError, SurfaceResult};
use std::fmt::Write as _;
use std::sync::{Arc, OnceLock};

/// Baseline offset of the first text line, as a fraction of the font size.
const TEXT_ASCENT: f64 = 0.9;

/// Serialize the canvas to a standalone SVG document.
pub fn to_svg(canvas: &Canvas) -> String {
    let size = canvas.size();
    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = size.width,
        h = size.height,
    );

    if !canvas.background().is_empty() {
        let (color, opacity) = paint(canvas.background());
        let _ = write!(
            svg,
            r#"<rect x="0" y="0" width="100%" height="100%" fill="{color}" fill-opacity="{opacity}"/>"#
        );
    }

    for shape in canvas.shapes_ordered() {
        write_shape(&mut svg, shape);
    }

    svg.push_str("</svg>");
    svg
}

/// Rasterize and encode the canvas.
pub fn to_data_url(canvas: &Canvas, options: &ExportOptions) -> SurfaceResult<String> {
    let size = canvas.size();
    let width = size.width.round().max(0.0) as u32;
    let height = size.height.round().max(0.0) as u32;
    let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or(SurfaceError::EmptySurface)?;

    let svg = to_svg(canvas);
    let opt = usvg::Options {
        fontdb: font_database(),
        ..usvg::Options::default()
    };
    let tree =
        usvg::Tree::from_str(&svg, &opt).map_err(|e| SurfaceError::Rasterize(e.to_string()))?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    let bytes = match options.format {
        ExportFormat::Png => encode_png(&pixmap)?,
        ExportFormat::Jpeg => encode_jpeg(&pixmap, options.quality)?,
    };
    log::debug!(
        "Exported {}x{} canvas as {} ({} bytes)",
        width,
        height,
        options.format.mime_type(),
        bytes.len()
    );
    Ok(DataUrl::new(options.format.mime_type(), bytes).to_string())
}

/// System fonts, loaded once per process.
fn font_database() -> Arc<usvg::fontdb::Database> {
    static FONTS: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            log::debug!("Loaded {} font faces for export", db.len());
            Arc::new(db)
        })
        .clone()
}

fn encode_png(pixmap: &tiny_skia::Pixmap) -> SurfaceResult<Vec<u8>> {
    let encode_err = |e: png::EncodingError| SurfaceError::Encode {
        format: ExportFormat::Png,
        message: e.to_string(),
    };

    let rgba: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();

    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, pixmap.width(), pixmap.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().map_err(encode_err)?;
        writer.write_image_data(&rgba).map_err(encode_err)?;
        writer.finish().map_err(encode_err)?;
    }
    Ok(out)
}

/// Transparent pixels come out black, as in browsers.
fn encode_jpeg(pixmap: &tiny_skia::Pixmap, quality: f32) -> SurfaceResult<Vec<u8>> {
    use image::ImageEncoder;
    use image::codecs::jpeg::JpegEncoder;

    let rgb: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| [p.red(), p.green(), p.blue()])
        .collect();

    let quality = (quality.clamp(0.0, 1.0) * 100.0).round().max(1.0) as u8;
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality)
        .write_image(
            &rgb,
            pixmap.width(),
            pixmap.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| SurfaceError::Encode {
            format: ExportFormat::Jpeg,
            message: e.to_string(),
        })?;
    Ok(out)
}

/// Resolve a color to SVG paint, black when unparseable.
fn paint(color: &CssColor) -> (String, f64) {
    let [r, g, b, a] = color.to_rgba8().unwrap_or([0, 0, 0, 255]);
    (format!("#{r:02x}{g:02x}{b:02x}"), a as f64 / 255.0)
}

fn stroke_attrs(style: &ShapeStyle) -> String {
    if !style.has_stroke() {
        return r#"stroke="none""#.to_string();
    }
    let (color, alpha) = paint(&style.stroke_color);
    format!(
        r#"stroke="{color}" stroke-opacity="{}" stroke-width="{}""#,
        alpha * style.opacity,
        style.stroke_width
    )
}

fn fill_attrs(style: &ShapeStyle) -> String {
    match &style.fill_color {
        Some(fill) => {
            let (color, alpha) = paint(fill);
            format!(r#"fill="{color}" fill-opacity="{}""#, alpha * style.opacity)
        }
        None => r#"fill="none""#.to_string(),
    }
}

fn write_shape(svg: &mut String, shape: &Shape) {
    match shape {
        Shape::Rectangle(rect) => {
            let _ = write!(
                svg,
                r#"<rect x="{}" y="{}" width="{}" height="{}" {} {}/>"#,
                rect.position.x,
                rect.position.y,
                rect.width,
                rect.height,
                fill_attrs(&rect.style),
                stroke_attrs(&rect.style),
            );
        }
        Shape::Ellipse(ellipse) => {
            let _ = write!(
                svg,
                r#"<ellipse cx="{}" cy="{}" rx="{}" ry="{}" {} {}/>"#,
                ellipse.center.x,
                ellipse.center.y,
                ellipse.radius_x,
                ellipse.radius_y,
                fill_attrs(&ellipse.style),
                stroke_attrs(&ellipse.style),
            );
        }
        Shape::Freehand(stroke) => {
            if stroke.points.len() < 2 || !stroke.style.has_stroke() {
                return;
            }
            let points = stroke
                .points
                .iter()
                .map(|p| format!("{},{}", p.x, p.y))
                .collect::<Vec<_>>()
                .join(" ");
            let _ = write!(
                svg,
                r#"<polyline points="{points}" fill="none" stroke-linecap="round" stroke-linejoin="round" {}/>"#,
                stroke_attrs(&stroke.style),
            );
        }
        Shape::Text(text) => write_text(svg, text),
        Shape::Image(image) => {
            let _ = write!(
                svg,
                r#"<image x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="none" opacity="{}" xlink:href="{}"/>"#,
                image.position.x,
                image.position.y,
                image.width,
                image.height,
                image.style.opacity,
                svg_href(image),
            );
        }
    }
}

/// resvg reads PNG, JPEG and GIF. Other formats are embedded as PNG.
fn svg_href(shape: &Image) -> String {
    match shape.format {
        ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Gif => shape.data_url(),
        ImageFormat::WebP | ImageFormat::Bmp => {
            let mut png = Vec::new();
            let transcoded = shape
                .data()
                .and_then(|raw| image::load_from_memory(&raw).ok())
                .and_then(|decoded| {
                    decoded
                        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
                        .ok()
                });
            match transcoded {
                Some(()) => DataUrl::new("image/png", png).to_string(),
                None => {
                    log::warn!(
                        "Could not transcode {} image for export",
                        shape.format.mime_type()
                    );
                    shape.data_url()
                }
            }
        }
    }
}

fn write_text(svg: &mut String, text: &Text) {
    let (color, alpha) = paint(&text.color());
    let _ = write!(
        svg,
        r#"<text font-family="{}" font-size="{}" fill="{color}" fill-opacity="{}" xml:space="preserve">"#,
        escape_xml(&text.font_family),
        text.font_size,
        alpha * text.style.opacity,
    );
    let baseline = text.position.y + text.font_size * TEXT_ASCENT;
    for (i, line) in text.content.split('\n').enumerate() {
        let _ = write!(
            svg,
            r#"<tspan x="{}" y="{}">{}</tspan>"#,
            text.position.x,
            baseline + i as f64 * text.line_height(),
            escape_xml(line),
        );
    }
    svg.push_str("</text>");
}

fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Ellipse, Rectangle};
    use crate::test_support::{GIF_1X1, bmp_bytes, png_data_url};
    use kurbo::{Point, Size};

    fn decode(url: &str) -> image::RgbaImage {
        let parsed = DataUrl::parse(url).unwrap();
        image::load_from_memory(&parsed.data).unwrap().to_rgba8()
    }

    #[test]
    fn test_svg_contains_every_object() {
        let mut canvas = Canvas::new(Size::new(200.0, 100.0));
        canvas.add(Shape::Rectangle(Rectangle::new(Point::new(1.0, 2.0), 3.0, 4.0)));
        canvas.add(Shape::Ellipse(Ellipse::circle(Point::new(50.0, 50.0), 10.0)));
        canvas.add(Shape::Text(Text::new(
            Point::new(100.0, 100.0),
            "a < b & \"c\"",
            CssColor::new("#ff0000"),
        )));
        canvas.add(Shape::Image(Image::from_data_url(&png_data_url(2, 2)).unwrap()));

        let svg = to_svg(&canvas);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"width="200" height="100""#));
        assert!(svg.contains(r##"fill="#ffffff""##));
        assert!(svg.contains("<rect x=\"1\" y=\"2\""));
        assert!(svg.contains("<ellipse"));
        assert!(svg.contains("a &lt; b &amp; &quot;c&quot;"));
        assert!(svg.contains(r#"font-family="Arial""#));
        assert!(svg.contains("xlink:href=\"data:image/png;base64,"));
    }

    #[test]
    fn test_bmp_is_embedded_as_png() {
        let bmp = DataUrl::new("image/bmp", bmp_bytes(2, 2)).to_string();
        let gif = DataUrl::new("image/gif", GIF_1X1.to_vec()).to_string();
        let mut canvas = Canvas::new(Size::new(10.0, 10.0));
        canvas.add(Shape::Image(Image::from_data_url(&bmp).unwrap()));
        canvas.add(Shape::Image(Image::from_data_url(&gif).unwrap()));

        let svg = to_svg(&canvas);
        assert!(!svg.contains("data:image/bmp"));
        assert_eq!(svg.matches("xlink:href=\"data:image/png;base64,").count(), 1);
        assert!(svg.contains("xlink:href=\"data:image/gif;base64,"));
    }

    #[test]
    fn test_cleared_canvas_has_no_background() {
        let mut canvas = Canvas::default();
        canvas.clear();
        assert!(!to_svg(&canvas).contains("100%"));
    }

    #[test]
    fn test_png_export_dimensions_and_background() {
        let canvas = Canvas::new(Size::new(32.0, 16.0));
        let url = canvas.to_data_url(&ExportOptions::default()).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));

        let img = decode(&url);
        assert_eq!(img.dimensions(), (32, 16));
        assert_eq!(img.get_pixel(5, 5).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_png_export_draws_shapes() {
        let mut canvas = Canvas::new(Size::new(40.0, 40.0));
        let mut rect = Rectangle::new(Point::new(0.0, 0.0), 40.0, 40.0);
        rect.style.fill_color = Some(CssColor::new("#ff0000"));
        rect.style.stroke_width = 0.0;
        canvas.add(Shape::Rectangle(rect));

        let img = decode(&canvas.to_data_url(&ExportOptions::default()).unwrap());
        assert_eq!(img.get_pixel(20, 20).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_jpeg_export() {
        let canvas = Canvas::new(Size::new(8.0, 8.0));
        let url = canvas
            .to_data_url(&ExportOptions {
                format: ExportFormat::Jpeg,
                quality: 0.8,
            })
            .unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));
        assert_eq!(decode(&url).dimensions(), (8, 8));
    }

    #[test]
    fn test_zero_size_is_an_error() {
        let canvas = Canvas::new(Size::ZERO);
        assert!(matches!(
            canvas.to_data_url(&ExportOptions::default()),
            Err(SurfaceError::EmptySurface)
        ));
    }
}
