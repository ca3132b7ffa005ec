//! Color swatches and the palette grid.

use egui::{Color32, CursorIcon, Rect, Sense, Stroke, Ui, Vec2, vec2};

use crate::{sizing, theme};

/// Style for color swatches.
#[derive(Clone)]
pub struct ColorSwatchStyle {
    pub size: Vec2,
    /// Draw a thin border so light colors stay visible on the panel.
    pub outline: bool,
}

impl Default for ColorSwatchStyle {
    fn default() -> Self {
        Self {
            size: vec2(sizing::SMALL, sizing::SMALL),
            outline: true,
        }
    }
}

impl ColorSwatchStyle {
    pub fn large() -> Self {
        Self {
            size: vec2(24.0, 24.0),
            ..Self::default()
        }
    }
}

/// A clickable circular color swatch.
pub struct ColorSwatch<'a> {
    color: Color32,
    tooltip: &'a str,
    selected: bool,
    style: ColorSwatchStyle,
}

impl<'a> ColorSwatch<'a> {
    pub fn new(color: Color32, tooltip: &'a str) -> Self {
        Self {
            color,
            tooltip,
            selected: false,
            style: ColorSwatchStyle::default(),
        }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn style(mut self, style: ColorSwatchStyle) -> Self {
        self.style = style;
        self
    }

    /// Show the swatch and return (clicked, rect).
    pub fn show(self, ui: &mut Ui) -> (bool, Rect) {
        let (rect, response) = ui.allocate_exact_size(self.style.size, Sense::click());

        if ui.is_rect_visible(rect) {
            let center = rect.center();
            let radius = rect.width().min(rect.height()) / 2.0;
            ui.painter().circle_filled(center, radius, self.color);

            if self.style.outline {
                ui.painter()
                    .circle_stroke(center, radius, Stroke::new(1.0, theme::BORDER));
            }
            if self.selected {
                // Inner offset ring, inverted on dark colors
                let ring = if luminance(self.color) < 0.5 {
                    Color32::WHITE
                } else {
                    Color32::from_gray(30)
                };
                ui.painter()
                    .circle_stroke(center, radius - 3.0, Stroke::new(2.0, ring));
            }
        }

        let clicked = response.clicked();
        response
            .on_hover_text(self.tooltip)
            .on_hover_cursor(CursorIcon::PointingHand);
        (clicked, rect)
    }
}

/// Lay out swatches in rows of `columns`. Returns the index clicked.
///
/// Each entry is a color with its tooltip. The entry matching `current`
/// is drawn selected.
pub fn palette_grid(
    ui: &mut Ui,
    colors: &[(Color32, String)],
    current: Option<Color32>,
    columns: usize,
) -> Option<usize> {
    let mut clicked = None;
    let columns = columns.max(1);
    ui.spacing_mut().item_spacing = vec2(6.0, 6.0);
    for (row, chunk) in colors.chunks(columns).enumerate() {
        ui.horizontal(|ui| {
            for (col, (color, label)) in chunk.iter().enumerate() {
                let selected = current.is_some_and(|c| colors_match(c, *color));
                let (hit, _) = ColorSwatch::new(*color, label)
                    .selected(selected)
                    .style(ColorSwatchStyle::large())
                    .show(ui);
                if hit {
                    clicked = Some(row * columns + col);
                }
            }
        });
    }
    clicked
}

/// Check if two colors match, ignoring alpha.
pub fn colors_match(a: Color32, b: Color32) -> bool {
    a.r() == b.r() && a.g() == b.g() && a.b() == b.b()
}

/// Relative brightness in 0.0..=1.0.
fn luminance(color: Color32) -> f32 {
    (0.299 * color.r() as f32 + 0.587 * color.g() as f32 + 0.114 * color.b() as f32) / 255.0
}
