//! File-picking and download boundaries.
//!
//! The toolbar never touches the file system or the browser directly. The
//! application supplies an [`ImagePicker`] and a [`Downloader`] for its
//! platform.

#[cfg(not(target_arch = "wasm32"))]
mod file;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileDownloader;

use crate::data_url::{DataUrl, DataUrlError};
use crate::shapes::ImageFormat;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Download errors.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("No download location available")]
    NoDestination,
    #[error(transparent)]
    DataUrl(#[from] DataUrlError),
    #[error("Platform error: {0}")]
    Platform(String),
}

/// A file chosen by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedFile {
    pub name: String,
    /// MIME type as reported by the platform, possibly guessed from the name.
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl PickedFile {
    /// Read the file as a `data:` URL.
    pub fn to_data_url(&self) -> String {
        DataUrl::new(self.mime.clone(), self.bytes.clone()).to_string()
    }
}

/// Guess an image MIME type from a file name.
///
/// Only formats that can be inserted are recognized.
pub fn mime_from_file_name(name: &str) -> &'static str {
    name.rsplit_once('.')
        .and_then(|(_, ext)| ImageFormat::from_extension(ext))
        .map_or("application/octet-stream", |format| format.mime_type())
}

/// Prompts the user for an image file.
pub trait ImagePicker {
    /// Resolves to `None` when the user cancels.
    ///
    /// `accept` is a MIME filter such as `image/*`.
    fn pick_image(&self, accept: &str) -> BoxFuture<'static, Option<PickedFile>>;
}

/// Saves generated content on the user's side.
pub trait Downloader {
    fn download(&self, filename: &str, data_url: &str) -> Result<(), DownloadError>;
}
