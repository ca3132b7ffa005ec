//! Defaults for the store and the toolbar.

use crate::color::CssColor;
use crate::surface::ExportOptions;
use crate::tools::{Tool, ToolKind};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The palette offered by the color picker.
pub const COLORS: [&str; 15] = [
    "#000000", "#ffffff", "#808080", "#ff0000", "#ff8000", "#ffff00", "#80ff00", "#00ff00",
    "#00ff80", "#00ffff", "#0080ff", "#0000ff", "#8000ff", "#ff00ff", "#ff0080",
];

/// Brush widths offered by the size picker.
pub const BRUSH_SIZES: [f64; 9] = [2.0, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0, 16.0, 20.0];

/// Initial store values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreDefaults {
    pub tool: Tool,
    pub color: CssColor,
    pub brush_size: f64,
}

impl Default for StoreDefaults {
    fn default() -> Self {
        Self {
            tool: Tool::Known(ToolKind::Pen),
            color: CssColor::black(),
            brush_size: 2.0,
        }
    }
}

/// What "Add Text" inserts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextDefaults {
    pub content: String,
    pub position: Point,
    pub font_family: String,
    pub font_size: f64,
}

impl Default for TextDefaults {
    fn default() -> Self {
        Self {
            content: "Double click to edit".to_string(),
            position: Point::new(100.0, 100.0),
            font_family: "Arial".to_string(),
            font_size: 20.0,
        }
    }
}

/// Toolbar behavior and palettes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolbarConfig {
    pub colors: Vec<CssColor>,
    pub brush_sizes: Vec<f64>,
    pub text: TextDefaults,
    /// Inserted images are scaled to this width.
    pub image_width: f64,
    /// MIME filter for the image picker.
    pub image_accept: String,
    pub export_filename: String,
    pub export_options: ExportOptions,
    /// Paint color of the eraser; matches the cleared background.
    pub eraser_color: CssColor,
    /// Eraser width relative to the brush size.
    pub eraser_scale: f64,
}

impl Default for ToolbarConfig {
    fn default() -> Self {
        Self {
            colors: COLORS.iter().map(|&c| CssColor::new(c)).collect(),
            brush_sizes: BRUSH_SIZES.to_vec(),
            text: TextDefaults::default(),
            image_width: 200.0,
            image_accept: "image/*".to_string(),
            export_filename: "whiteboard.png".to_string(),
            export_options: ExportOptions::default(),
            eraser_color: CssColor::white(),
            eraser_scale: 2.0,
        }
    }
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// All whiteboard configuration.
///
/// Every field is optional in JSON; missing ones take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhiteboardConfig {
    pub store: StoreDefaults,
    pub toolbar: ToolbarConfig,
}

impl WhiteboardConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a JSON config file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
