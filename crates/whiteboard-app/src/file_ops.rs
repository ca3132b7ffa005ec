//! Native image picking with a file dialog.

use std::path::Path;

use whiteboard_core::platform::{BoxFuture, ImagePicker, PickedFile, mime_from_file_name};

/// Extensions offered for `image/*`.
const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Turn an HTML `accept` filter into dialog extensions.
///
/// Understands `image/*`, concrete `image/<subtype>` types and `.ext`
/// entries, separated by commas.
pub fn extensions_for(accept: &str) -> Vec<String> {
    let mut extensions = Vec::new();
    for entry in accept.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let found: Vec<String> = if entry == "image/*" {
            IMAGE_EXTENSIONS.iter().map(|e| e.to_string()).collect()
        } else if let Some(ext) = entry.strip_prefix('.') {
            vec![ext.to_ascii_lowercase()]
        } else if let Some(subtype) = entry.strip_prefix("image/") {
            match subtype {
                "jpeg" => vec!["jpg".to_string(), "jpeg".to_string()],
                "svg+xml" => vec!["svg".to_string()],
                other => vec![other.to_string()],
            }
        } else {
            Vec::new()
        };
        for ext in found {
            if !extensions.contains(&ext) {
                extensions.push(ext);
            }
        }
    }
    extensions
}

/// Read a chosen file, guessing its MIME type from the name.
fn read_image(path: &Path) -> Option<PickedFile> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match std::fs::read(path) {
        Ok(bytes) => {
            log::info!("Picked image: {:?}", path);
            Some(PickedFile {
                mime: mime_from_file_name(&name).to_string(),
                name,
                bytes,
            })
        }
        Err(e) => {
            log::error!("Failed to read file: {}", e);
            None
        }
    }
}

/// Picks images with the native file dialog.
///
/// The dialog is modal and runs on the calling thread, so the returned
/// future is already resolved.
#[derive(Debug, Default, Clone, Copy)]
pub struct DialogImagePicker;

impl ImagePicker for DialogImagePicker {
    fn pick_image(&self, accept: &str) -> BoxFuture<'static, Option<PickedFile>> {
        let extensions = extensions_for(accept);
        let mut dialog = rfd::FileDialog::new().set_title("Add Image");
        if !extensions.is_empty() {
            dialog = dialog.add_filter("Images", extensions.as_slice());
        }
        let picked = dialog.pick_file().and_then(|path| read_image(&path));
        Box::pin(std::future::ready(picked))
    }
}
