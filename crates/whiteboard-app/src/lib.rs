//! Whiteboard Application
//!
//! The application shell: windowing, rendering, the egui toolbar and
//! platform file handling around the whiteboard core.

mod app;
#[cfg(all(feature = "native", not(target_arch = "wasm32")))]
mod file_ops;
mod shortcuts;
mod ui;

pub use app::{App, AppConfig};
#[cfg(all(feature = "native", not(target_arch = "wasm32")))]
pub use file_ops::{DialogImagePicker, extensions_for};
pub use shortcuts::{Shortcut, ShortcutRegistry};
pub use ui::{UiAction, render_ui, to_color32};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{AnchorDownloader, BrowserImagePicker, run_wasm};
