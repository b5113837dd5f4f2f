//! Integration tests for the OS filesystem adapter

use std::sync::Arc;
use tempfile::TempDir;
use verifier_errors::PlatformError;
use verifier_platform::{FileSystem, OsFileSystem};

#[tokio::test]
async fn test_write_then_read() {
    let temp = TempDir::new().unwrap();
    let fs: Arc<dyn FileSystem> = Arc::new(OsFileSystem::new());
    let path = temp.path().join("note.txt");

    fs.write(&path, b"verified").await.unwrap();

    assert!(fs.exists(&path).await);
    assert!(!fs.is_dir(&path).await);
    assert_eq!(fs.read_to_string(&path).await.unwrap(), "verified");
    assert!(!temp.path().join("note.txt.partial").exists());
}

#[tokio::test]
async fn test_write_replaces_existing_content() {
    let temp = TempDir::new().unwrap();
    let fs = OsFileSystem::new();
    let path = temp.path().join("note.txt");

    fs.write(&path, b"first").await.unwrap();
    fs.write(&path, b"second").await.unwrap();

    assert_eq!(fs.read_to_string(&path).await.unwrap(), "second");
}

#[tokio::test]
async fn test_create_dir_all() {
    let temp = TempDir::new().unwrap();
    let fs = OsFileSystem::new();
    let nested = temp.path().join("a").join("b");

    fs.create_dir_all(&nested).await.unwrap();
    assert!(fs.is_dir(&nested).await);

    fs.write(&nested.join("one"), b"12345").await.unwrap();
    assert_eq!(fs.read_to_string(&nested.join("one")).await.unwrap(), "12345");
}

#[tokio::test]
async fn test_failed_write_leaves_no_staging_file() {
    let temp = TempDir::new().unwrap();
    let fs = OsFileSystem::new();

    // A directory at the target makes the final rename fail
    let target = temp.path().join("message.eml");
    std::fs::create_dir(&target).unwrap();
    std::fs::write(target.join("occupied"), b"x").unwrap();

    assert!(fs.write(&target, b"body").await.is_err());
    assert!(!temp.path().join("message.eml.partial").exists());

    // A missing parent directory fails before anything is staged
    let orphan = temp.path().join("missing").join("message.eml");
    assert!(fs.write(&orphan, b"body").await.is_err());
    assert!(!temp.path().join("missing").exists());
}

#[tokio::test]
async fn test_remove_missing_file_is_not_found() {
    let temp = TempDir::new().unwrap();
    let fs = OsFileSystem::new();

    let err = fs
        .remove_file(&temp.path().join("missing"))
        .await
        .unwrap_err();
    assert!(matches!(err, PlatformError::PathNotFound { .. }));
}
