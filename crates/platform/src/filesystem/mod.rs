//! Filesystem operations used by the verifier

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use verifier_errors::PlatformError;

/// Trait for filesystem access
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Read a whole file as UTF-8 text
    async fn read_to_string(&self, path: &Path) -> Result<String, PlatformError>;

    /// Write a file atomically, replacing any existing content
    async fn write(&self, path: &Path, contents: &[u8]) -> Result<(), PlatformError>;

    /// Check if a path exists
    async fn exists(&self, path: &Path) -> bool;

    /// Check if a path points to a directory.
    async fn is_dir(&self, path: &Path) -> bool;

    /// Create directory and all parent directories
    async fn create_dir_all(&self, path: &Path) -> Result<(), PlatformError>;

    /// Remove a single file
    async fn remove_file(&self, path: &Path) -> Result<(), PlatformError>;

    /// Resolve `path` against the process working directory
    fn full_path(&self, path: &Path) -> Result<PathBuf, PlatformError>;
}
