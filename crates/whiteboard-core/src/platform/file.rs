//! Download target for native platforms.

use super::{DownloadError, Downloader};
use crate::data_url::DataUrl;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes downloads into a directory, like a browser's download folder.
///
/// Existing files are never overwritten; a numeric suffix is added instead.
#[derive(Debug, Clone)]
pub struct FileDownloader {
    dir: PathBuf,
}

impl FileDownloader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The user's download directory, else the working directory.
    pub fn default_location() -> Result<Self, DownloadError> {
        let dir = dirs::download_dir()
            .or_else(|| std::env::current_dir().ok())
            .ok_or(DownloadError::NoDestination)?;
        Ok(Self::new(dir))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// First free path for `filename`: `name.ext`, `name (1).ext`, ...
    fn unique_path(&self, filename: &str) -> PathBuf {
        let candidate = self.dir.join(filename);
        if !candidate.exists() {
            return candidate;
        }
        let (stem, ext) = match filename.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
            _ => (filename, None),
        };
        (1..)
            .map(|n| match ext {
                Some(ext) => self.dir.join(format!("{stem} ({n}).{ext}")),
                None => self.dir.join(format!("{stem} ({n})")),
            })
            .find(|path| !path.exists())
            .unwrap_or(candidate)
    }

    /// Write and return the path actually used.
    pub fn save(&self, filename: &str, data_url: &str) -> Result<PathBuf, DownloadError> {
        let parsed = DataUrl::parse(data_url)?;
        fs::create_dir_all(&self.dir).map_err(|e| {
            DownloadError::Io(format!("Failed to create {}: {}", self.dir.display(), e))
        })?;
        // Only the final path component is honored
        let filename = Path::new(filename)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("download");
        let path = self.unique_path(filename);
        fs::write(&path, &parsed.data)
            .map_err(|e| DownloadError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
        log::info!("Saved {} ({} bytes)", path.display(), parsed.data.len());
        Ok(path)
    }
}

impl Downloader for FileDownloader {
    fn download(&self, filename: &str, data_url: &str) -> Result<(), DownloadError> {
        self.save(filename, data_url).map(|_| ())
    }
}
