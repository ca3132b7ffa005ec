//! Button components: icon buttons and brush size buttons.

use egui::{
    Align2, Color32, CornerRadius, CursorIcon, FontId, Image, ImageSource, Pos2, Rect, Sense, Ui,
    Vec2, vec2,
};

use crate::{sizing, theme};

/// Style configuration for icon buttons.
#[derive(Clone)]
pub struct IconButtonStyle {
    pub size: Vec2,
    /// Should be smaller than `size`.
    pub icon_size: Vec2,
    pub corner_radius: u8,
    pub bg_color: Color32,
    pub hover_color: Color32,
    /// Background while selected.
    pub selected_color: Color32,
    /// Icon tint when not selected (None = no tint)
    pub icon_tint: Option<Color32>,
    pub selected_icon_tint: Option<Color32>,
}

impl Default for IconButtonStyle {
    fn default() -> Self {
        Self {
            size: vec2(sizing::MEDIUM, sizing::MEDIUM),
            icon_size: vec2(18.0, 18.0),
            corner_radius: sizing::CORNER_RADIUS,
            bg_color: Color32::TRANSPARENT,
            hover_color: theme::HOVER_BG,
            selected_color: theme::ACCENT,
            icon_tint: Some(Color32::from_gray(80)),
            selected_icon_tint: Some(Color32::WHITE),
        }
    }
}

impl IconButtonStyle {
    /// Tool button style (32x32, solid blue when selected)
    pub fn tool() -> Self {
        Self {
            size: vec2(32.0, 32.0),
            corner_radius: 6,
            hover_color: Color32::from_gray(235),
            ..Self::default()
        }
    }
}

/// An icon button that displays an image/SVG.
pub struct IconButton<'a> {
    icon: ImageSource<'a>,
    tooltip: &'a str,
    shortcut: Option<&'a str>,
    selected: bool,
    style: IconButtonStyle,
}

impl<'a> IconButton<'a> {
    pub fn new(icon: ImageSource<'a>, tooltip: &'a str) -> Self {
        Self {
            icon,
            tooltip,
            shortcut: None,
            selected: false,
            style: IconButtonStyle::default(),
        }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn style(mut self, style: IconButtonStyle) -> Self {
        self.style = style;
        self
    }

    /// Use tool style.
    pub fn tool(mut self) -> Self {
        self.style = IconButtonStyle::tool();
        self
    }

    /// Set keyboard shortcut (shown in hover tooltip).
    pub fn shortcut(mut self, shortcut: &'a str) -> Self {
        self.shortcut = Some(shortcut);
        self
    }

    /// Show the button and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let (rect, response) = ui.allocate_exact_size(self.style.size, Sense::click());

        if ui.is_rect_visible(rect) {
            let bg_color = if self.selected {
                self.style.selected_color
            } else if response.hovered() {
                self.style.hover_color
            } else {
                self.style.bg_color
            };
            ui.painter().rect_filled(
                rect,
                CornerRadius::same(self.style.corner_radius),
                bg_color,
            );

            let icon_tint = if self.selected {
                self.style.selected_icon_tint
            } else if response.hovered() {
                Some(Color32::from_gray(40))
            } else {
                self.style.icon_tint
            };

            let icon_rect = Rect::from_center_size(rect.center(), self.style.icon_size);
            let mut image = Image::new(self.icon).fit_to_exact_size(self.style.icon_size);
            if let Some(tint) = icon_tint {
                image = image.tint(tint);
            }
            image.paint_at(ui, icon_rect);
        }

        let clicked = response.clicked();
        let tooltip = match self.shortcut {
            Some(shortcut) => format!("{} ({})", self.tooltip, shortcut),
            None => self.tooltip.to_string(),
        };
        response
            .on_hover_text(tooltip)
            .on_hover_cursor(CursorIcon::PointingHand);
        clicked
    }
}

/// A brush size entry: a dot of that diameter and a "{size}px" label.
pub struct BrushSizeButton {
    size: f32,
    color: Color32,
    selected: bool,
}

impl BrushSizeButton {
    /// Dots are capped so large sizes still fit the row.
    const MAX_DOT: f32 = 16.0;

    pub fn new(size: f32, color: Color32, selected: bool) -> Self {
        Self {
            size,
            color,
            selected,
        }
    }

    /// Show the entry and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let width = ui.available_width().max(80.0);
        let (rect, response) = ui.allocate_exact_size(vec2(width, 24.0), Sense::click());

        if ui.is_rect_visible(rect) {
            let bg_color = if self.selected {
                theme::SELECTED_BG
            } else if response.hovered() {
                theme::HOVER_BG
            } else {
                Color32::TRANSPARENT
            };
            ui.painter()
                .rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), bg_color);

            let dot_center = Pos2::new(rect.left() + 14.0, rect.center().y);
            let diameter = self.size.clamp(1.0, Self::MAX_DOT);
            ui.painter()
                .circle_filled(dot_center, diameter / 2.0, self.color);

            ui.painter().text(
                Pos2::new(rect.left() + 30.0, rect.center().y),
                Align2::LEFT_CENTER,
                format!("{}px", self.size),
                FontId::proportional(13.0),
                theme::TEXT,
            );
        }

        let clicked = response.clicked();
        response.on_hover_cursor(CursorIcon::PointingHand);
        clicked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_style_is_larger() {
        let tool = IconButtonStyle::tool();
        assert!(tool.size.x > IconButtonStyle::default().size.x);
        assert_eq!(tool.selected_color, theme::ACCENT);
    }

    #[test]
    fn test_brush_sizes_render_without_clicks() {
        let ctx = egui::Context::default();
        let mut clicked = vec![true; 3];
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                for (i, size) in [2.0, 8.0, 40.0].into_iter().enumerate() {
                    clicked[i] = BrushSizeButton::new(size, Color32::BLACK, i == 1).show(ui);
                }
            });
        });
        assert_eq!(clicked, vec![false; 3]);
    }
}
