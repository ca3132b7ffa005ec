//! Image shape for embedding raster images.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use crate::data_url::{DataUrl, DataUrlError};
use base64::{Engine, engine::general_purpose::STANDARD};
use kurbo::{Affine, BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use thiserror::Error;
use uuid::Uuid;

/// Errors building an image object.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error(transparent)]
    DataUrl(#[from] DataUrlError),

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("image has zero size")]
    Empty,
}

/// Image format for stored image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
    Gif,
    Bmp,
}

impl ImageFormat {
    /// Get MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Bmp => "image/bmp",
        }
    }

    /// Detect format from a MIME type.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.to_ascii_lowercase().as_str() {
            "image/png" => Some(ImageFormat::Png),
            "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
            "image/webp" => Some(ImageFormat::WebP),
            "image/gif" => Some(ImageFormat::Gif),
            "image/bmp" | "image/x-ms-bmp" => Some(ImageFormat::Bmp),
            _ => None,
        }
    }

    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "webp" => Some(ImageFormat::WebP),
            "gif" => Some(ImageFormat::Gif),
            "bmp" => Some(ImageFormat::Bmp),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 2 {
            return None;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }

        // GIF87a / GIF89a
        if data.starts_with(b"GIF8") {
            return Some(ImageFormat::Gif);
        }

        if data.starts_with(b"BM") {
            return Some(ImageFormat::Bmp);
        }

        None
    }
}

/// An image shape that displays a raster image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub(crate) id: ShapeId,
    /// Top-left corner position.
    pub position: Point,
    /// Display width.
    pub width: f64,
    /// Display height.
    pub height: f64,
    /// Original image width in pixels.
    pub source_width: u32,
    /// Original image height in pixels.
    pub source_height: u32,
    /// Image format.
    pub format: ImageFormat,
    /// Encoded image bytes as base64.
    pub data_base64: String,
    /// Style properties (unused for drawing, kept for uniform handling).
    pub style: ShapeStyle,
}

impl Image {
    /// Create a new image shape from encoded image bytes, shown at source size.
    pub fn new(
        position: Point,
        data: &[u8],
        source_width: u32,
        source_height: u32,
        format: ImageFormat,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width: source_width as f64,
            height: source_height as f64,
            source_width,
            source_height,
            format,
            data_base64: STANDARD.encode(data),
            style: ShapeStyle::default(),
        }
    }

    /// Build an image at the origin from a `data:` URL.
    ///
    /// The payload header is read for its pixel size, which also rejects
    /// files that are not decodable images.
    pub fn from_data_url(url: &str) -> Result<Self, ImageError> {
        let parsed = DataUrl::parse(url)?;
        let format = ImageFormat::from_magic_bytes(&parsed.data)
            .or_else(|| ImageFormat::from_mime(&parsed.mime))
            .ok_or_else(|| ImageError::UnsupportedFormat(parsed.mime.clone()))?;

        let (width, height) = image::ImageReader::new(Cursor::new(&parsed.data))
            .with_guessed_format()
            .map_err(|e| ImageError::Decode(e.to_string()))?
            .into_dimensions()
            .map_err(|e| ImageError::Decode(e.to_string()))?;
        if width == 0 || height == 0 {
            return Err(ImageError::Empty);
        }

        Ok(Self::new(Point::ZERO, &parsed.data, width, height, format))
    }

    /// Scale uniformly so the display width equals `target_width`.
    pub fn scale_to_width(&mut self, target_width: f64) {
        if self.source_width == 0 {
            return;
        }
        let scale = target_width / self.source_width as f64;
        self.width = target_width;
        self.height = self.source_height as f64 * scale;
    }

    /// Get the raw image data (decoded from base64).
    pub fn data(&self) -> Option<Vec<u8>> {
        STANDARD.decode(&self.data_base64).ok()
    }

    /// The image re-expressed as a `data:` URL.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.format.mime_type(), self.data_base64)
    }

    /// Get the bounding rectangle.
    pub fn as_rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }
}

impl ShapeTrait for Image {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.as_rect()
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let rect = self.as_rect().inflate(tolerance, tolerance);
        rect.contains(point)
    }

    fn to_path(&self) -> BezPath {
        self.as_rect().to_path(0.1)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn transform(&mut self, affine: Affine) {
        self.position = affine * self.position;
        let scale = affine.as_coeffs();
        self.width *= scale[0].abs();
        self.height *= scale[3].abs();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{GIF_1X1, bmp_bytes, png_bytes, png_data_url};

    #[test]
    fn test_format_detection() {
        assert_eq!(ImageFormat::from_magic_bytes(&png_bytes(1, 1)), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_magic_bytes(&GIF_1X1), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::from_magic_bytes(b"BM"), Some(ImageFormat::Bmp));
        assert_eq!(ImageFormat::from_magic_bytes(b"B"), None);
        assert_eq!(ImageFormat::from_extension("JPG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("svg"), None);
        assert_eq!(ImageFormat::from_mime("image/webp"), Some(ImageFormat::WebP));
        assert_eq!(ImageFormat::Gif.mime_type(), "image/gif");
    }

    #[test]
    fn test_from_data_url_reads_dimensions() {
        let image = Image::from_data_url(&png_data_url(40, 20)).unwrap();
        assert_eq!((image.source_width, image.source_height), (40, 20));
        assert_eq!(image.format, ImageFormat::Png);
        assert_eq!(image.position, Point::ZERO);
        assert!((image.width - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_gif_and_bmp_read_dimensions() {
        let gif = Image::from_data_url(&DataUrl::new("image/gif", GIF_1X1.to_vec()).to_string())
            .unwrap();
        assert_eq!(gif.format, ImageFormat::Gif);
        assert_eq!((gif.source_width, gif.source_height), (1, 1));

        let bmp = Image::from_data_url(&DataUrl::new("image/bmp", bmp_bytes(3, 2)).to_string())
            .unwrap();
        assert_eq!(bmp.format, ImageFormat::Bmp);
        assert_eq!((bmp.source_width, bmp.source_height), (3, 2));
        assert!(bmp.data_url().starts_with("data:image/bmp;base64,"));
    }

    #[test]
    fn test_scale_to_width_keeps_aspect() {
        let mut image = Image::from_data_url(&png_data_url(400, 100)).unwrap();
        image.scale_to_width(200.0);
        assert!((image.width - 200.0).abs() < f64::EPSILON);
        assert!((image.height - 50.0).abs() < f64::EPSILON);

        let mut small = Image::from_data_url(&png_data_url(50, 100)).unwrap();
        small.scale_to_width(200.0);
        assert!((small.height - 400.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_data_url_round_trip() {
        let source = png_data_url(3, 3);
        let image = Image::from_data_url(&source).unwrap();
        assert_eq!(image.data_url(), source);
    }

    #[test]
    fn test_rejects_garbage() {
        let text = DataUrl::new("text/plain", b"hello".to_vec()).to_string();
        assert!(matches!(
            Image::from_data_url(&text),
            Err(ImageError::UnsupportedFormat(_))
        ));

        let fake_png = DataUrl::new("image/png", b"not really a png".to_vec()).to_string();
        assert!(matches!(Image::from_data_url(&fake_png), Err(ImageError::Decode(_))));

        assert!(matches!(
            Image::from_data_url("garbage"),
            Err(ImageError::DataUrl(DataUrlError::MissingScheme))
        ));
    }
}
