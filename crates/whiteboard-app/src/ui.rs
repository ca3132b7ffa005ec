//! Toolbar UI using egui.

use egui::{Align2, Color32, Context, ImageSource, RichText, Ui, Vec2, include_image};
use whiteboard_core::color::CssColor;
use whiteboard_core::store::WhiteboardStore;
use whiteboard_core::toolbar::WhiteboardToolbar;
use whiteboard_core::tools::ToolKind;
use whiteboard_widgets::{
    BrushSizeButton, ColorSwatch, ColorSwatchStyle, IconButton, palette_grid, panel_frame,
    theme, toolbar_frame, vertical_separator,
};

use crate::shortcuts::ShortcutRegistry;

/// Columns in the color palette.
const PALETTE_COLUMNS: usize = 5;

/// Actions that can be triggered by UI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    SelectTool(ToolKind),
    SetColor(CssColor),
    SetBrushSize(f64),
    ToggleColorPicker,
    ToggleBrushSizes,
    AddText,
    AddImage,
    Save,
    Clear,
}

fn tool_icon(kind: ToolKind) -> ImageSource<'static> {
    match kind {
        ToolKind::Select => include_image!("../assets/select.svg"),
        ToolKind::Pen => include_image!("../assets/pen.svg"),
        ToolKind::Rectangle => include_image!("../assets/rectangle.svg"),
        ToolKind::Circle => include_image!("../assets/circle.svg"),
        ToolKind::Eraser => include_image!("../assets/eraser.svg"),
    }
}

/// Convert a store color for display. Unparseable colors show as gray.
pub fn to_color32(color: &CssColor) -> Color32 {
    match color.to_rgba8() {
        Some([r, g, b, a]) => Color32::from_rgba_unmultiplied(r, g, b, a),
        None => Color32::GRAY,
    }
}

/// Render the toolbar panel and return any triggered action.
pub fn render_ui<S>(
    ctx: &Context,
    toolbar: &WhiteboardToolbar,
    store: &WhiteboardStore<S>,
) -> Option<UiAction> {
    egui_extras::install_image_loaders(ctx);

    let mut action = None;
    egui::Area::new(egui::Id::new("toolbar"))
        .anchor(Align2::LEFT_TOP, Vec2::new(12.0, 12.0))
        .show(ctx, |ui| {
            toolbar_frame().show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.spacing_mut().item_spacing = Vec2::new(4.0, 8.0);
                    action = render_tool_row(ui, store)
                        .or(render_color_section(ui, toolbar, store))
                        .or(render_brush_section(ui, toolbar, store))
                        .or(render_action_row(ui));
                });
            });
        });
    action
}

fn render_tool_row<S>(ui: &mut Ui, store: &WhiteboardStore<S>) -> Option<UiAction> {
    let mut action = None;
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing = Vec2::new(2.0, 0.0);

        for kind in ToolKind::ALL {
            let select = UiAction::SelectTool(kind);
            let shortcut = ShortcutRegistry::label_for(&select).unwrap_or_default();
            if IconButton::new(tool_icon(kind), kind.label())
                .shortcut(&shortcut)
                .selected(store.current_tool().is(kind))
                .tool()
                .show(ui)
            {
                action = Some(select);
            }
        }

        vertical_separator(ui);

        let inserts = [
            (include_image!("../assets/text.svg"), "Add Text", UiAction::AddText),
            (include_image!("../assets/image.svg"), "Add Image", UiAction::AddImage),
        ];
        for (icon, label, insert) in inserts {
            let shortcut = ShortcutRegistry::label_for(&insert).unwrap_or_default();
            if IconButton::new(icon, label).shortcut(&shortcut).tool().show(ui) {
                action = Some(insert);
            }
        }
    });
    action
}

fn render_color_section<S>(
    ui: &mut Ui,
    toolbar: &WhiteboardToolbar,
    store: &WhiteboardStore<S>,
) -> Option<UiAction> {
    let mut action = None;
    let current = to_color32(store.current_color());

    ui.horizontal(|ui| {
        let (clicked, _) = ColorSwatch::new(current, "Color")
            .selected(toolbar.show_color_picker())
            .style(ColorSwatchStyle::large())
            .show(ui);
        if clicked {
            action = Some(UiAction::ToggleColorPicker);
        }
        ui.label(RichText::new(store.current_color().as_str()).color(theme::TEXT));
    });

    if toolbar.show_color_picker() {
        let palette: Vec<(Color32, String)> = toolbar
            .config()
            .colors
            .iter()
            .map(|color| (to_color32(color), color.to_string()))
            .collect();
        panel_frame().show(ui, |ui| {
            if let Some(index) = palette_grid(ui, &palette, Some(current), PALETTE_COLUMNS) {
                action = toolbar
                    .config()
                    .colors
                    .get(index)
                    .map(|color| UiAction::SetColor(color.clone()));
            }
        });
    }
    action
}

fn render_brush_section<S>(
    ui: &mut Ui,
    toolbar: &WhiteboardToolbar,
    store: &WhiteboardStore<S>,
) -> Option<UiAction> {
    let mut action = None;
    let size = store.brush_size();

    let toggle = ui
        .add(egui::Button::new(format!("{}px", size)).selected(toolbar.show_brush_sizes()))
        .on_hover_text("Brush Size");
    if toggle.clicked() {
        action = Some(UiAction::ToggleBrushSizes);
    }

    if toolbar.show_brush_sizes() {
        let color = to_color32(store.current_color());
        panel_frame().show(ui, |ui| {
            ui.vertical(|ui| {
                ui.spacing_mut().item_spacing = Vec2::new(0.0, 2.0);
                for &option in &toolbar.config().brush_sizes {
                    let selected = (option - size).abs() < f64::EPSILON;
                    if BrushSizeButton::new(option as f32, color, selected).show(ui) {
                        action = Some(UiAction::SetBrushSize(option));
                    }
                }
            });
        });
    }
    action
}

fn render_action_row(ui: &mut Ui) -> Option<UiAction> {
    let mut action = None;
    let save_shortcut = ShortcutRegistry::label_for(&UiAction::Save).unwrap_or_default();
    ui.horizontal(|ui| {
        if IconButton::new(include_image!("../assets/download.svg"), "Save")
            .shortcut(&save_shortcut)
            .show(ui)
        {
            action = Some(UiAction::Save);
        }
        if IconButton::new(include_image!("../assets/trash.svg"), "Clear").show(ui) {
            action = Some(UiAction::Clear);
        }
    });
    action
}
