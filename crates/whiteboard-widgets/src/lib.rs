//! Reusable egui widget components for the whiteboard toolbar.
//!
//! - **Buttons**: icon buttons for tools and actions, brush size buttons
//! - **Colors**: color swatches and the palette grid
//! - **Panel**: floating panel frames and separators

pub mod buttons;
pub mod colors;
pub mod panel;

pub use buttons::{BrushSizeButton, IconButton, IconButtonStyle};
pub use colors::{ColorSwatch, ColorSwatchStyle, colors_match, palette_grid};
pub use panel::{panel_frame, toolbar_frame, vertical_separator};

/// Standard sizing constants used across widgets.
pub mod sizing {
    /// Small button size (icons, color swatches)
    pub const SMALL: f32 = 20.0;
    /// Medium button size (toolbar buttons)
    pub const MEDIUM: f32 = 28.0;
    /// Standard corner radius
    pub const CORNER_RADIUS: u8 = 4;
    /// Panel corner radius
    pub const PANEL_RADIUS: u8 = 8;
}

/// Standard colors used across widgets.
pub mod theme {
    use egui::Color32;

    /// Text color (dark gray)
    pub const TEXT: Color32 = Color32::from_rgb(60, 60, 60);
    /// Border color
    pub const BORDER: Color32 = Color32::from_rgb(220, 220, 220);
    /// Selection/active color (blue)
    pub const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);
    /// Hover background
    pub const HOVER_BG: Color32 = Color32::from_rgb(245, 245, 245);
    /// Selected background
    pub const SELECTED_BG: Color32 = Color32::from_rgb(224, 231, 255);
    /// Panel background
    pub const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(250, 250, 252, 250);
}
