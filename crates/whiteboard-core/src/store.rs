//! Session state shared by the toolbar and the canvas.

use crate::color::CssColor;
use crate::config::StoreDefaults;
use crate::surface::CanvasSurface;
use crate::tools::Tool;

/// The active tool, color, brush size and the registered surface.
///
/// Created once per session and handed to every consumer by reference.
/// Setters store what they are given without validation.
#[derive(Debug, Clone)]
pub struct WhiteboardStore<S> {
    canvas: Option<S>,
    current_tool: Tool,
    current_color: CssColor,
    brush_size: f64,
}

impl<S> Default for WhiteboardStore<S> {
    fn default() -> Self {
        Self::new(&StoreDefaults::default())
    }
}

impl<S> WhiteboardStore<S> {
    /// A store without a surface.
    pub fn new(defaults: &StoreDefaults) -> Self {
        Self {
            canvas: None,
            current_tool: defaults.tool.clone(),
            current_color: defaults.color.clone(),
            brush_size: defaults.brush_size,
        }
    }

    /// Register the surface. Replaces any previous one.
    pub fn set_canvas(&mut self, canvas: S) {
        if self.canvas.is_some() {
            log::debug!("Replacing registered canvas surface");
        }
        self.canvas = Some(canvas);
    }

    pub fn set_current_tool(&mut self, tool: impl Into<Tool>) {
        self.current_tool = tool.into();
        log::trace!("Tool set to {}", self.current_tool);
    }

    pub fn set_current_color(&mut self, color: impl Into<CssColor>) {
        self.current_color = color.into();
        log::trace!("Color set to {}", self.current_color);
    }

    pub fn set_brush_size(&mut self, size: f64) {
        self.brush_size = size;
        log::trace!("Brush size set to {}", size);
    }

    pub fn canvas(&self) -> Option<&S> {
        self.canvas.as_ref()
    }

    pub fn canvas_mut(&mut self) -> Option<&mut S> {
        self.canvas.as_mut()
    }

    pub fn has_canvas(&self) -> bool {
        self.canvas.is_some()
    }

    pub fn current_tool(&self) -> &Tool {
        &self.current_tool
    }

    pub fn current_color(&self) -> &CssColor {
        &self.current_color
    }

    pub fn brush_size(&self) -> f64 {
        self.brush_size
    }
}

impl<S: CanvasSurface> WhiteboardStore<S> {
    /// The surface together with the values handlers read from the store.
    pub(crate) fn canvas_with_values(&mut self) -> Option<(&mut S, &Tool, &CssColor, f64)> {
        let canvas = self.canvas.as_mut()?;
        Some((
            canvas,
            &self.current_tool,
            &self.current_color,
            self.brush_size,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::tools::ToolKind;

    #[test]
    fn test_initial_state() {
        let store = WhiteboardStore::<Canvas>::default();
        assert_eq!(store.current_tool(), &Tool::Known(ToolKind::Pen));
        assert_eq!(store.current_color().as_str(), "#000000");
        assert!((store.brush_size() - 2.0).abs() < f64::EPSILON);
        assert!(!store.has_canvas());
    }

    #[test]
    fn test_setters_accept_anything() {
        let mut store = WhiteboardStore::<Canvas>::default();

        store.set_current_tool("teleport");
        assert_eq!(store.current_tool().name(), "teleport");

        store.set_current_color("definitely not a color");
        assert_eq!(store.current_color().as_str(), "definitely not a color");

        store.set_brush_size(-4.0);
        assert!((store.brush_size() + 4.0).abs() < f64::EPSILON);
        store.set_brush_size(0.0);
        assert_eq!(store.brush_size(), 0.0);
    }

    #[test]
    fn test_every_tool_is_recorded() {
        let mut store = WhiteboardStore::<Canvas>::default();
        for kind in ToolKind::ALL {
            store.set_current_tool(kind);
            assert_eq!(store.current_tool().kind(), Some(kind));
        }
    }

    #[test]
    fn test_set_canvas_last_write_wins() {
        let mut store = WhiteboardStore::default();
        store.set_canvas(Canvas::new(kurbo::Size::new(10.0, 10.0)));
        store.set_canvas(Canvas::new(kurbo::Size::new(20.0, 20.0)));
        assert_eq!(store.canvas().map(|c| c.size().width), Some(20.0));
        assert!(store.has_canvas());
    }

    #[test]
    fn test_custom_defaults() {
        let defaults = StoreDefaults {
            tool: Tool::from("select"),
            color: CssColor::new("#0000ff"),
            brush_size: 8.0,
        };
        let store = WhiteboardStore::<Canvas>::new(&defaults);
        assert!(store.current_tool().is(ToolKind::Select));
        assert_eq!(store.current_color().as_str(), "#0000ff");
    }
}
