//! Editable text object.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use crate::color::CssColor;
use kurbo::{Affine, BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use uuid::Uuid;

/// A text shape whose content can be edited in place.
///
/// The text color is the style's fill color.
#[derive(Debug, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ShapeId,
    /// Position (top-left corner of text bounding box).
    pub position: Point,
    /// The text content.
    pub content: String,
    /// CSS font family list, e.g. `Arial`.
    pub font_family: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// Style properties.
    pub style: ShapeStyle,
    /// Layout size (width, height) measured by the renderer.
    /// If None, approximate bounds are used.
    #[serde(skip)]
    cached_size: RwLock<Option<(f64, f64)>>,
}

impl Clone for Text {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            position: self.position,
            content: self.content.clone(),
            font_family: self.font_family.clone(),
            font_size: self.font_size,
            style: self.style.clone(),
            cached_size: RwLock::new(self.cached_size.read().ok().and_then(|guard| *guard)),
        }
    }
}

impl Text {
    pub const DEFAULT_FONT_SIZE: f64 = 20.0;
    pub const DEFAULT_FONT_FAMILY: &'static str = "Arial";

    /// Create a new text shape filled with `color`.
    pub fn new(position: Point, content: impl Into<String>, color: CssColor) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            content: content.into(),
            font_family: Self::DEFAULT_FONT_FAMILY.to_string(),
            font_size: Self::DEFAULT_FONT_SIZE,
            style: ShapeStyle::filled(color),
            cached_size: RwLock::new(None),
        }
    }

    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    /// The text color, falling back to black when unset.
    pub fn color(&self) -> CssColor {
        self.style.fill_color.clone().unwrap_or_else(CssColor::black)
    }

    /// Set the measured layout size. Callable during rendering.
    pub fn set_cached_size(&self, width: f64, height: f64) {
        if let Ok(mut cache) = self.cached_size.write() {
            *cache = Some((width, height));
        }
    }

    fn invalidate_cache(&self) {
        if let Ok(mut cache) = self.cached_size.write() {
            *cache = None;
        }
    }

    /// Set the text content.
    pub fn set_content(&mut self, content: String) {
        self.content = content;
        self.invalidate_cache();
    }

    /// Append typed text at the end of the content.
    pub fn insert_str(&mut self, text: &str) {
        self.content.push_str(text);
        self.invalidate_cache();
    }

    /// Remove the last character. Returns false when already empty.
    pub fn backspace(&mut self) -> bool {
        let removed = self.content.pop().is_some();
        if removed {
            self.invalidate_cache();
        }
        removed
    }

    /// Get the text content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Line height used for layout and bounds.
    pub fn line_height(&self) -> f64 {
        self.font_size * 1.16
    }

    fn approximate_width(&self) -> f64 {
        let max_line_len = self
            .content
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);

        max_line_len as f64 * self.font_size * 0.55
    }

    fn approximate_height(&self) -> f64 {
        let mut line_count = self.content.lines().count().max(1);
        // lines() drops a trailing empty line
        if self.content.ends_with('\n') {
            line_count += 1;
        }
        line_count as f64 * self.line_height()
    }
}

impl ShapeTrait for Text {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let (width, height) = self
            .cached_size
            .read()
            .ok()
            .and_then(|guard| *guard)
            .unwrap_or_else(|| (self.approximate_width(), self.approximate_height()));
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + width.max(self.font_size),
            self.position.y + height,
        )
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }

    fn to_path(&self) -> BezPath {
        // Bounding box stands in for glyph outlines
        self.bounds().to_path(0.1)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn transform(&mut self, affine: Affine) {
        self.position = affine * self.position;
        let coeffs = affine.as_coeffs();
        let scale = (coeffs[0].abs() + coeffs[3].abs()) / 2.0;
        if (scale - 1.0).abs() > 0.01 {
            self.font_size *= scale;
            self.invalidate_cache();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_defaults() {
        let text = Text::new(Point::new(100.0, 100.0), "Hello", CssColor::new("#ff0000"));
        assert_eq!(text.content(), "Hello");
        assert_eq!(text.font_family, "Arial");
        assert!((text.font_size - Text::DEFAULT_FONT_SIZE).abs() < f64::EPSILON);
        assert_eq!(text.color().as_str(), "#ff0000");
    }

    #[test]
    fn test_editing() {
        let mut text = Text::new(Point::ZERO, "ab", CssColor::black());
        text.insert_str("cé");
        assert_eq!(text.content(), "abcé");
        assert!(text.backspace());
        assert_eq!(text.content(), "abc");
        text.set_content(String::new());
        assert!(!text.backspace());
    }

    #[test]
    fn test_cached_size_wins() {
        let text = Text::new(Point::new(10.0, 10.0), "Hi", CssColor::black());
        text.set_cached_size(200.0, 30.0);
        let bounds = text.bounds();
        assert!((bounds.width() - 200.0).abs() < f64::EPSILON);
        assert!((bounds.height() - 30.0).abs() < f64::EPSILON);

        let mut edited = text.clone();
        edited.insert_str("!");
        assert!(edited.bounds().width() < 200.0);
    }

    #[test]
    fn test_hit_test() {
        let text = Text::new(Point::new(100.0, 100.0), "Hello World", CssColor::black());
        let center = text.bounds().center();
        assert!(text.hit_test(center, 0.0));
        assert!(!text.hit_test(Point::new(0.0, 0.0), 0.0));
    }

    #[test]
    fn test_multiline_height() {
        let one = Text::new(Point::ZERO, "a", CssColor::black());
        let two = Text::new(Point::ZERO, "a\nb", CssColor::black());
        assert!((two.bounds().height() - 2.0 * one.bounds().height()).abs() < 1e-9);
    }
}
