//! Keyboard shortcut registry.

use crate::ui::UiAction;
use whiteboard_core::tools::ToolKind;

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    /// Ctrl on Linux and Windows, Cmd on macOS.
    pub command: bool,
    pub description: &'static str,
    pub action: UiAction,
}

impl Shortcut {
    pub fn new(
        key: &'static str,
        command: bool,
        description: &'static str,
        action: UiAction,
    ) -> Self {
        Self {
            key,
            command,
            description,
            action,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+S").
    pub fn format(&self) -> String {
        if self.command {
            format!("Ctrl+{}", self.key)
        } else {
            self.key.to_string()
        }
    }

    /// Letter keys match regardless of case.
    pub fn matches(&self, key: &str, command: bool) -> bool {
        self.command == command && self.key.eq_ignore_ascii_case(key)
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("V", false, "Select", UiAction::SelectTool(ToolKind::Select)),
            Shortcut::new("P", false, "Pen Tool", UiAction::SelectTool(ToolKind::Pen)),
            Shortcut::new("R", false, "Rectangle", UiAction::SelectTool(ToolKind::Rectangle)),
            Shortcut::new("C", false, "Circle", UiAction::SelectTool(ToolKind::Circle)),
            Shortcut::new("E", false, "Eraser", UiAction::SelectTool(ToolKind::Eraser)),
            Shortcut::new("T", false, "Add Text", UiAction::AddText),
            Shortcut::new("I", false, "Add Image", UiAction::AddImage),
            Shortcut::new("S", true, "Save", UiAction::Save),
        ]
    }

    /// Action bound to a key press, if any.
    pub fn lookup(key: &str, command: bool) -> Option<UiAction> {
        Self::all()
            .into_iter()
            .find(|shortcut| shortcut.matches(key, command))
            .map(|shortcut| shortcut.action)
    }

    /// Display label of the shortcut that triggers `action`.
    pub fn label_for(action: &UiAction) -> Option<String> {
        Self::all()
            .iter()
            .find(|shortcut| &shortcut.action == action)
            .map(Shortcut::format)
    }

    /// Log all shortcuts.
    pub fn log_all() {
        let summary = Self::all()
            .iter()
            .map(|shortcut| format!("{}={}", shortcut.format(), shortcut.description))
            .collect::<Vec<_>>()
            .join(", ");
        log::info!("Keyboard shortcuts: {}", summary);
    }
}
