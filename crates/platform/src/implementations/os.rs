//! Operating-system filesystem implementation
//!
//! Wraps `tokio::fs` with the platform error model and records each operation
//! with its duration through `tracing`.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::fs;
use tracing::{debug, warn};
use verifier_errors::PlatformError;

use crate::filesystem::FileSystem;

/// Filesystem backed by the host operating system
#[derive(Debug, Clone, Copy)]
pub struct OsFileSystem;

impl OsFileSystem {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for OsFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

fn record<T>(
    operation: &str,
    path: &Path,
    start: Instant,
    result: Result<T, std::io::Error>,
) -> Result<T, PlatformError> {
    let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    match result {
        Ok(value) => {
            debug!(operation, path = %path.display(), duration_ms, "Filesystem operation completed");
            Ok(value)
        }
        Err(e) => {
            let err = PlatformError::from_io(operation, path, &e);
            warn!(operation, path = %path.display(), duration_ms, error = %err, "Filesystem operation failed");
            Err(err)
        }
    }
}

/// Temporary sibling used for atomic writes
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

#[async_trait]
impl FileSystem for OsFileSystem {
    async fn read_to_string(&self, path: &Path) -> Result<String, PlatformError> {
        let start = Instant::now();
        record("read_to_string", path, start, fs::read_to_string(path).await)
    }

    async fn write(&self, path: &Path, contents: &[u8]) -> Result<(), PlatformError> {
        let start = Instant::now();
        let staging = staging_path(path);

        // Readers of the target never observe a partially written file
        let mut result = fs::write(&staging, contents).await;
        if result.is_ok() {
            result = fs::rename(&staging, path).await;
        }
        if result.is_err() {
            let _ = fs::remove_file(&staging).await;
        }

        record("write", path, start, result)
    }

    async fn exists(&self, path: &Path) -> bool {
        fs::try_exists(path).await.unwrap_or(false)
    }

    async fn is_dir(&self, path: &Path) -> bool {
        fs::metadata(path)
            .await
            .map(|metadata| metadata.is_dir())
            .unwrap_or(false)
    }

    async fn create_dir_all(&self, path: &Path) -> Result<(), PlatformError> {
        let start = Instant::now();
        record("create_dir_all", path, start, fs::create_dir_all(path).await)
    }

    async fn remove_file(&self, path: &Path) -> Result<(), PlatformError> {
        let start = Instant::now();
        record("remove_file", path, start, fs::remove_file(path).await)
    }

    fn full_path(&self, path: &Path) -> Result<PathBuf, PlatformError> {
        std::path::absolute(path).map_err(|e| PlatformError::from_io("full_path", path, &e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staging_path_is_a_sibling() {
        assert_eq!(
            staging_path(Path::new("/var/app/mail_drop/message.eml")),
            PathBuf::from("/var/app/mail_drop/message.eml.partial")
        );
    }

    #[test]
    fn full_path_of_absolute_path_is_unchanged() {
        let fs = OsFileSystem::new();
        assert_eq!(
            fs.full_path(Path::new("/var/app/mail_drop")).unwrap(),
            PathBuf::from("/var/app/mail_drop")
        );
    }

    #[test]
    fn full_path_resolves_against_working_directory() {
        let fs = OsFileSystem::new();
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(
            fs.full_path(Path::new("mail_drop")).unwrap(),
            cwd.join("mail_drop")
        );
    }
}
