//! Renderer trait abstraction.

use kurbo::Size;
use peniko::Color;
use thiserror::Error;
use whiteboard_core::canvas::Canvas;
use whiteboard_core::shapes::Shape;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The canvas to render.
    pub canvas: &'a Canvas,
    /// Shape being dragged out, drawn on top.
    pub preview: Option<Shape>,
    /// Viewport size in logical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Color around the canvas area and behind a transparent background.
    pub backdrop_color: Color,
    /// Selection highlight color.
    pub selection_color: Color,
}

impl<'a> RenderContext<'a> {
    pub fn new(canvas: &'a Canvas, viewport_size: Size) -> Self {
        Self {
            canvas,
            preview: None,
            viewport_size,
            scale_factor: 1.0,
            backdrop_color: Color::from_rgba8(243, 244, 246, 255),
            selection_color: Color::from_rgba8(59, 130, 246, 255), // Blue
        }
    }

    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    pub fn with_preview(mut self, preview: Option<Shape>) -> Self {
        self.preview = preview;
        self
    }

    pub fn with_backdrop(mut self, color: Color) -> Self {
        self.backdrop_color = color;
        self
    }
}

/// Trait for rendering backends.
pub trait Renderer: Send + Sync {
    /// Build the scene for a frame.
    ///
    /// Called once per frame; prepares all drawing commands.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Color to clear the frame with.
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.backdrop_color
    }
}
