use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// A prebuilt report served verbatim. No generation happens here; the file
/// is opaque bytes on disk.
#[derive(Debug, Clone)]
pub struct StaticReport {
    path: PathBuf,
}

impl StaticReport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        Ok(std::fs::read(&self.path)?)
    }

    /// Copy the report to `destination`, returning the number of bytes written
    pub fn copy_to(&self, destination: &Path) -> Result<u64> {
        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let bytes = std::fs::copy(&self.path, destination)?;
        info!(
            source = %self.path.display(),
            destination = %destination.display(),
            bytes,
            "Copied static report"
        );
        Ok(bytes)
    }
}
