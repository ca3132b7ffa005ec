//! Whiteboard Core Library
//!
//! Platform-agnostic state and logic for the whiteboard: the session store,
//! the toolbar controller, the drawing-surface boundary and an in-memory
//! surface that can be rendered and exported.

pub mod canvas;
pub mod color;
pub mod config;
pub mod data_url;
pub mod export;
pub mod input;
pub mod interaction;
pub mod platform;
pub mod shapes;
pub mod store;
pub mod surface;
pub mod toolbar;
pub mod tools;

#[cfg(test)]
mod test_support;

pub use canvas::Canvas;
pub use color::CssColor;
pub use config::{ConfigError, StoreDefaults, ToolbarConfig, WhiteboardConfig};
pub use data_url::{DataUrl, DataUrlError};
pub use input::{InputState, MouseButton, PointerEvent};
pub use interaction::CanvasInteraction;
pub use platform::{BoxFuture, DownloadError, Downloader, ImagePicker, PickedFile};
pub use store::WhiteboardStore;
pub use surface::{Brush, CanvasSurface, ExportFormat, ExportOptions, SurfaceError};
pub use toolbar::{Outcome, ToolbarError, ToolbarResult, WhiteboardToolbar};
pub use tools::{Tool, ToolKind};

#[cfg(not(target_arch = "wasm32"))]
pub use platform::FileDownloader;
