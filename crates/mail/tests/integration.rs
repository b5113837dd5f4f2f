//! Integration tests for pickup directory handling

use async_trait::async_trait;
use proptest::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use verifier_config::{DeliveryMethod, MailConfig, StaticRequestContext};
use verifier_errors::{Error, MailError, PlatformError};
use verifier_mail::{MailMessage, PickupDirectoryConverter, PickupDirectoryMailer};
use verifier_platform::{FileSystem, OsFileSystem};

fn pickup_config(location: impl Into<PathBuf>) -> MailConfig {
    MailConfig {
        delivery_method: DeliveryMethod::SpecifiedPickupDirectory,
        pickup_directory_location: Some(location.into()),
        from: Some("verifier@example.org".to_string()),
    }
}

fn converter() -> PickupDirectoryConverter {
    PickupDirectoryConverter::new(Arc::new(OsFileSystem::new()))
}

fn message() -> MailMessage {
    MailMessage::new("Package verified", "All checks passed.").recipient("maintainer@example.org")
}

#[test]
fn test_request_root_resolves_relative_pickup_directory() {
    let converter = converter();
    let request = StaticRequestContext::new("/var/app");
    let mut mail = pickup_config("mail_drop");

    converter
        .convert_relative_to_absolute_pickup_directory_location(&mut mail, Some(&request))
        .unwrap();

    assert_eq!(
        mail.pickup_directory_location.as_deref(),
        Some(Path::new("/var/app/mail_drop"))
    );
}

#[test]
fn test_network_delivery_performs_no_mutation() {
    let converter = converter();
    let request = StaticRequestContext::new("/var/app");
    let mut mail = MailConfig {
        delivery_method: DeliveryMethod::Network,
        pickup_directory_location: Some(PathBuf::from("mail_drop")),
        from: None,
    };
    let before = mail.clone();

    converter
        .convert_relative_to_absolute_pickup_directory_location(&mut mail, Some(&request))
        .unwrap();

    assert_eq!(mail.pickup_directory_location, before.pickup_directory_location);
    assert_eq!(mail.delivery_method, before.delivery_method);
}

#[tokio::test]
async fn test_mailer_writes_eml_file() {
    let temp = TempDir::new().unwrap();
    let fs: Arc<dyn FileSystem> = Arc::new(OsFileSystem::new());
    let mail = pickup_config(temp.path().join("drop"));

    PickupDirectoryConverter::new(Arc::clone(&fs))
        .ensure_pickup_directory(&mail)
        .await
        .unwrap();
    assert!(temp.path().join("drop").is_dir());

    let mailer = PickupDirectoryMailer::from_config(Arc::clone(&fs), &mail).unwrap();
    let path = mailer.send(&message()).await.unwrap();

    assert_eq!(path.parent(), Some(temp.path().join("drop").as_path()));
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("eml"));

    let contents = fs.read_to_string(&path).await.unwrap();
    assert!(contents.contains("From: verifier@example.org\r\n"));
    assert!(contents.contains("To: maintainer@example.org\r\n"));
    assert!(contents.contains("Subject: Package verified\r\n"));
    assert!(contents.ends_with("All checks passed.\r\n"));
}

#[tokio::test]
async fn test_each_message_gets_its_own_file() {
    let temp = TempDir::new().unwrap();
    let fs: Arc<dyn FileSystem> = Arc::new(OsFileSystem::new());
    let mail = pickup_config(temp.path());
    let mailer = PickupDirectoryMailer::from_config(fs, &mail).unwrap();

    let first = mailer.send(&message()).await.unwrap();
    let second = mailer.send(&message()).await.unwrap();

    assert_ne!(first, second);
}

#[test]
fn test_mailer_requires_resolved_pickup_delivery() {
    let fs: Arc<dyn FileSystem> = Arc::new(OsFileSystem::new());

    let network = MailConfig::default();
    assert!(matches!(
        PickupDirectoryMailer::from_config(Arc::clone(&fs), &network),
        Err(Error::Mail(MailError::PickupDeliveryDisabled))
    ));

    let relative = pickup_config("mail_drop");
    assert!(matches!(
        PickupDirectoryMailer::from_config(fs, &relative),
        Err(Error::Mail(MailError::PathResolution { .. }))
    ));
}

#[tokio::test]
async fn test_ensure_pickup_directory_skips_network_delivery() {
    let temp = TempDir::new().unwrap();
    let mail = MailConfig {
        pickup_directory_location: Some(temp.path().join("never")),
        ..MailConfig::default()
    };

    converter().ensure_pickup_directory(&mail).await.unwrap();
    assert!(!temp.path().join("never").exists());
}

/// Filesystem whose writes always fail
struct ReadOnlyFileSystem;

#[async_trait]
impl FileSystem for ReadOnlyFileSystem {
    async fn read_to_string(&self, path: &Path) -> Result<String, PlatformError> {
        Err(PlatformError::PathNotFound {
            operation: "read".to_string(),
            path: path.display().to_string(),
        })
    }

    async fn write(&self, _path: &Path, _contents: &[u8]) -> Result<(), PlatformError> {
        Err(PlatformError::PermissionDenied {
            operation: "write".to_string(),
            message: "read-only".to_string(),
        })
    }

    async fn exists(&self, _path: &Path) -> bool {
        true
    }

    async fn is_dir(&self, _path: &Path) -> bool {
        true
    }

    async fn create_dir_all(&self, _path: &Path) -> Result<(), PlatformError> {
        Ok(())
    }

    async fn remove_file(&self, _path: &Path) -> Result<(), PlatformError> {
        Ok(())
    }

    fn full_path(&self, path: &Path) -> Result<PathBuf, PlatformError> {
        Ok(path.to_path_buf())
    }
}

#[tokio::test]
async fn test_write_failure_is_a_delivery_error() {
    let mail = pickup_config("/var/app/mail_drop");
    let mailer = PickupDirectoryMailer::from_config(Arc::new(ReadOnlyFileSystem), &mail).unwrap();

    let err = mailer.send(&message()).await.unwrap_err();
    assert!(matches!(err, Error::Mail(MailError::DeliveryFailed { .. })));
}

proptest! {
    #[test]
    fn conversion_is_idempotent(
        segments in prop::collection::vec("[a-z]{1,8}", 1..4),
        root in prop_oneof![Just("/srv/verifier"), Just("site"), Just("apps/site")],
    ) {
        let request = StaticRequestContext::new(root);
        let mut mail = pickup_config(segments.join("/"));

        converter()
            .convert_relative_to_absolute_pickup_directory_location(&mut mail, Some(&request))
            .unwrap();
        let once = mail.pickup_directory_location.clone();

        converter()
            .convert_relative_to_absolute_pickup_directory_location(&mut mail, Some(&request))
            .unwrap();

        prop_assert!(once.as_deref().is_some_and(Path::is_absolute));
        prop_assert_eq!(mail.pickup_directory_location, once);
    }
}

#[test]
fn test_relative_content_root_yields_absolute_pickup_directory() {
    let request = StaticRequestContext::new("site");
    let mut mail = pickup_config("mail_drop");
    let converter = converter();

    converter
        .convert_relative_to_absolute_pickup_directory_location(&mut mail, Some(&request))
        .unwrap();
    let expected = std::env::current_dir().unwrap().join("site").join("mail_drop");
    assert_eq!(mail.pickup_directory_location.as_deref(), Some(expected.as_path()));

    converter
        .convert_relative_to_absolute_pickup_directory_location(&mut mail, Some(&request))
        .unwrap();
    assert_eq!(mail.pickup_directory_location.as_deref(), Some(expected.as_path()));

    let fs: Arc<dyn FileSystem> = Arc::new(OsFileSystem::new());
    let mailer = PickupDirectoryMailer::from_config(fs, &mail).unwrap();
    assert_eq!(mailer.directory(), expected.as_path());
}
