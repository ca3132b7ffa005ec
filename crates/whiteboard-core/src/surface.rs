//! The drawing surface the toolbar drives.
//!
//! The store and toolbar only ever talk to a surface through [`CanvasSurface`].
//! [`crate::Canvas`] is the in-memory implementation the application renders;
//! tests may substitute their own.

use crate::color::CssColor;
use crate::data_url::DataUrlError;
use crate::shapes::{Image, ImageError, Shape, ShapeId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported by a surface.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("surface has no area to export")]
    EmptySurface,

    #[error("failed to rasterize surface: {0}")]
    Rasterize(String),

    #[error("failed to encode {format:?}: {message}")]
    Encode { format: ExportFormat, message: String },

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    DataUrl(#[from] DataUrlError),
}

/// Result type for surface operations.
pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// The surface's freehand brush.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brush {
    pub color: CssColor,
    /// Passed through unchecked; non-positive widths draw nothing.
    pub width: f64,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color: CssColor::black(),
            width: 1.0,
        }
    }
}

/// Raster format for [`CanvasSurface::to_data_url`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
}

impl ExportFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
        }
    }
}

/// Export parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// 0.0 to 1.0. Only lossy formats use it.
    pub quality: f32,
}

impl Default for ExportOptions {
    /// Full-quality PNG.
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            quality: 1.0,
        }
    }
}

/// Capabilities the toolbar needs from a drawing surface.
pub trait CanvasSurface {
    /// Whether pointer input draws freehand strokes.
    fn is_drawing_mode(&self) -> bool;

    fn set_drawing_mode(&mut self, enabled: bool);

    /// The live freehand brush.
    fn brush(&self) -> &Brush;

    fn brush_mut(&mut self) -> &mut Brush;

    /// Add an object on top of everything else.
    fn add(&mut self, object: Shape) -> ShapeId;

    /// Remove every object and reset the background to transparent.
    fn clear(&mut self);

    /// Make `id` the active object. Returns false if no such object exists.
    fn set_active_object(&mut self, id: ShapeId) -> bool;

    fn active_object(&self) -> Option<ShapeId>;

    fn object_count(&self) -> usize;

    /// Request a full redraw.
    fn render_all(&mut self);

    fn background(&self) -> &CssColor;

    fn set_background(&mut self, color: CssColor);

    /// Rasterize the surface into a `data:` URL.
    fn to_data_url(&self, options: &ExportOptions) -> SurfaceResult<String>;

    /// Build an image object from a `data:` URL. The caller adds it.
    fn image_from_data_url(&self, data_url: &str) -> SurfaceResult<Image> {
        Ok(Image::from_data_url(data_url)?)
    }
}
