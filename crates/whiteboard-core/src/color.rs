//! CSS color strings as the store and canvas keep them.

use peniko::Color;
use peniko::color::{Srgb, parse_color};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A color exactly as the user supplied it.
///
/// No validation happens on construction. Parsing into a renderable color is
/// deferred to [`CssColor::to_color`], which returns `None` for strings that are
/// not valid CSS colors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CssColor(String);

impl CssColor {
    /// Pure black.
    pub const BLACK: &'static str = "#000000";
    /// Pure white, the whiteboard background.
    pub const WHITE: &'static str = "#ffffff";

    /// Wrap any string as a color.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn black() -> Self {
        Self::new(Self::BLACK)
    }

    pub fn white() -> Self {
        Self::new(Self::WHITE)
    }

    /// The empty color, treated as transparent.
    pub fn transparent() -> Self {
        Self(String::new())
    }

    /// The raw string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the empty (transparent) color.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Parse into a peniko color. Empty strings parse as fully transparent.
    pub fn to_color(&self) -> Option<Color> {
        if self.is_empty() {
            return Some(Color::TRANSPARENT);
        }
        parse_color(self.0.trim())
            .ok()
            .map(|c| c.to_alpha_color::<Srgb>())
    }

    /// Parse into RGBA8 components.
    pub fn to_rgba8(&self) -> Option<[u8; 4]> {
        self.to_color().map(|c| {
            let rgba = c.to_rgba8();
            [rgba.r, rgba.g, rgba.b, rgba.a]
        })
    }

    /// Compare by parsed value, so `#FFF` matches `#ffffff`.
    pub fn same_color(&self, other: &CssColor) -> bool {
        match (self.to_rgba8(), other.to_rgba8()) {
            (Some(a), Some(b)) => a == b,
            _ => self.0 == other.0,
        }
    }
}

impl fmt::Display for CssColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CssColor {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CssColor {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<Color> for CssColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        if rgba.a == 255 {
            Self(format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b))
        } else {
            Self(format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                rgba.r, rgba.g, rgba.b, rgba.a
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(CssColor::new("#ff8000").to_rgba8(), Some([255, 128, 0, 255]));
        assert_eq!(CssColor::new("#fff").to_rgba8(), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_named_and_functional() {
        assert_eq!(CssColor::new("red").to_rgba8(), Some([255, 0, 0, 255]));
        assert_eq!(
            CssColor::new("rgb(0, 128, 255)").to_rgba8(),
            Some([0, 128, 255, 255])
        );
    }

    #[test]
    fn test_invalid_is_kept_verbatim() {
        let color = CssColor::new("not-a-color");
        assert_eq!(color.as_str(), "not-a-color");
        assert!(color.to_color().is_none());
    }

    #[test]
    fn test_empty_is_transparent() {
        assert_eq!(CssColor::transparent().to_rgba8(), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_same_color() {
        assert!(CssColor::new("#FFF").same_color(&CssColor::white()));
        assert!(!CssColor::black().same_color(&CssColor::white()));
    }

    #[test]
    fn test_from_peniko() {
        let color: CssColor = Color::from_rgba8(0, 128, 255, 255).into();
        assert_eq!(color.as_str(), "#0080ff");
    }
}
