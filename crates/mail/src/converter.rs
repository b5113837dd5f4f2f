//! Pickup directory path normalization

use std::path::Path;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};
use verifier_config::{DeliveryMethod, MailConfig, RequestContext};
use verifier_errors::{Error, MailError};
use verifier_platform::FileSystem;

/// Rewrites a relative pickup directory into an absolute one
///
/// Whether pickup delivery is in use is decided the first time the converter
/// looks at a [`MailConfig`] and is not re-evaluated afterwards.
pub struct PickupDirectoryConverter {
    fs: Arc<dyn FileSystem>,
    is_using_pickup_directory: OnceLock<bool>,
}

impl std::fmt::Debug for PickupDirectoryConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PickupDirectoryConverter")
            .field("is_using_pickup_directory", &self.is_using_pickup_directory)
            .finish_non_exhaustive()
    }
}

impl PickupDirectoryConverter {
    #[must_use]
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            is_using_pickup_directory: OnceLock::new(),
        }
    }

    /// Whether mail is delivered to a pickup directory (memoized)
    pub fn is_using_pickup_directory(&self, mail: &MailConfig) -> bool {
        *self
            .is_using_pickup_directory
            .get_or_init(|| mail.delivery_method == DeliveryMethod::SpecifiedPickupDirectory)
    }

    /// Make the configured pickup directory absolute
    ///
    /// Relative locations are mapped through the active request when one
    /// exists, otherwise against the process working directory. Absolute
    /// locations and network delivery leave `mail` untouched.
    ///
    /// # Errors
    ///
    /// Returns `MailError::PickupDirectoryNotConfigured` if pickup delivery is
    /// enabled without a location, or `MailError::PathResolution` if the
    /// location cannot be resolved.
    pub fn convert_relative_to_absolute_pickup_directory_location(
        &self,
        mail: &mut MailConfig,
        request: Option<&dyn RequestContext>,
    ) -> Result<(), Error> {
        if !self.is_using_pickup_directory(mail) {
            debug!("Network delivery, pickup directory left as configured");
            return Ok(());
        }

        let location = configured_location(mail)?;
        if location.is_absolute() {
            debug!(path = %location.display(), "Pickup directory already absolute");
            return Ok(());
        }

        let mapped = match request {
            Some(request) => request.map_path(location).map_err(|e| resolution(location, &e))?,
            None => location.to_path_buf(),
        };
        // A request rooted at a relative directory still maps to a relative path
        let absolute = if mapped.is_absolute() {
            mapped
        } else {
            self.fs
                .full_path(&mapped)
                .map_err(|e| resolution(location, &e))?
        };

        info!(
            from = %location.display(),
            to = %absolute.display(),
            "Resolved pickup directory"
        );
        mail.pickup_directory_location = Some(absolute);
        Ok(())
    }

    /// Create the pickup directory if pickup delivery is in use
    ///
    /// # Errors
    ///
    /// Returns an error if no location is configured or the directory cannot
    /// be created.
    pub async fn ensure_pickup_directory(&self, mail: &MailConfig) -> Result<(), Error> {
        if !self.is_using_pickup_directory(mail) {
            return Ok(());
        }
        let directory = configured_location(mail)?;
        if !self.fs.is_dir(directory).await {
            self.fs.create_dir_all(directory).await?;
            info!(path = %directory.display(), "Created pickup directory");
        }
        Ok(())
    }
}

fn configured_location(mail: &MailConfig) -> Result<&Path, Error> {
    match mail.pickup_directory_location.as_deref() {
        Some(location) if !location.as_os_str().is_empty() => Ok(location),
        _ => Err(MailError::PickupDirectoryNotConfigured.into()),
    }
}

fn resolution(location: &Path, error: &dyn std::fmt::Display) -> MailError {
    MailError::PathResolution {
        path: location.display().to_string(),
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use verifier_config::StaticRequestContext;
    use verifier_platform::OsFileSystem;

    fn converter() -> PickupDirectoryConverter {
        PickupDirectoryConverter::new(Arc::new(OsFileSystem::new()))
    }

    fn pickup(location: Option<&str>) -> MailConfig {
        MailConfig {
            delivery_method: DeliveryMethod::SpecifiedPickupDirectory,
            pickup_directory_location: location.map(PathBuf::from),
            ..MailConfig::default()
        }
    }

    #[test]
    fn relative_location_is_mapped_through_request() {
        let converter = converter();
        let request = StaticRequestContext::new("/var/app");
        let mut mail = pickup(Some("mail_drop"));

        converter
            .convert_relative_to_absolute_pickup_directory_location(&mut mail, Some(&request))
            .unwrap();

        assert_eq!(
            mail.pickup_directory_location,
            Some(PathBuf::from("/var/app/mail_drop"))
        );
    }

    #[test]
    fn network_delivery_is_not_touched() {
        let converter = converter();
        let mut mail = MailConfig {
            pickup_directory_location: Some(PathBuf::from("mail_drop")),
            ..MailConfig::default()
        };

        converter
            .convert_relative_to_absolute_pickup_directory_location(&mut mail, None)
            .unwrap();

        assert_eq!(
            mail.pickup_directory_location,
            Some(PathBuf::from("mail_drop"))
        );
    }

    #[test]
    fn missing_location_is_fatal() {
        let converter = converter();
        for mut mail in [pickup(None), pickup(Some(""))] {
            let err = converter
                .convert_relative_to_absolute_pickup_directory_location(&mut mail, None)
                .unwrap_err();
            assert!(matches!(
                err,
                Error::Mail(MailError::PickupDirectoryNotConfigured)
            ));
        }
    }

    #[test]
    fn without_request_resolves_against_working_directory() {
        let converter = converter();
        let mut mail = pickup(Some("mail_drop"));

        converter
            .convert_relative_to_absolute_pickup_directory_location(&mut mail, None)
            .unwrap();

        let expected = std::env::current_dir().unwrap().join("mail_drop");
        assert_eq!(mail.pickup_directory_location, Some(expected));
    }

    #[test]
    fn delivery_mode_is_decided_once() {
        let converter = converter();
        let mut mail = MailConfig::default();
        assert!(!converter.is_using_pickup_directory(&mail));

        mail.delivery_method = DeliveryMethod::SpecifiedPickupDirectory;
        mail.pickup_directory_location = Some(PathBuf::from("mail_drop"));
        assert!(!converter.is_using_pickup_directory(&mail));

        converter
            .convert_relative_to_absolute_pickup_directory_location(&mut mail, None)
            .unwrap();
        assert_eq!(
            mail.pickup_directory_location,
            Some(PathBuf::from("mail_drop"))
        );
    }

    #[test]
    fn escaping_request_path_is_a_resolution_error() {
        let converter = converter();
        let request = StaticRequestContext::new("/var/app");
        let mut mail = pickup(Some("../outside"));

        let err = converter
            .convert_relative_to_absolute_pickup_directory_location(&mut mail, Some(&request))
            .unwrap_err();
        assert!(matches!(err, Error::Mail(MailError::PathResolution { .. })));
    }

    /// Maps every path below a relative directory
    struct RelativeRequest;

    impl RequestContext for RelativeRequest {
        fn user_name(&self) -> Result<Option<String>, Error> {
            Ok(None)
        }

        fn map_path(&self, path: &Path) -> Result<PathBuf, Error> {
            Ok(Path::new("site").join(path))
        }
    }

    #[test]
    fn relative_mapping_is_made_absolute_once() {
        let converter = converter();
        let mut mail = pickup(Some("mail_drop"));

        let request: &dyn RequestContext = &RelativeRequest;
        converter
            .convert_relative_to_absolute_pickup_directory_location(&mut mail, Some(request))
            .unwrap();
        let expected = std::env::current_dir().unwrap().join("site").join("mail_drop");
        assert_eq!(mail.pickup_directory_location.as_deref(), Some(expected.as_path()));

        converter
            .convert_relative_to_absolute_pickup_directory_location(&mut mail, Some(request))
            .unwrap();
        assert_eq!(mail.pickup_directory_location, Some(expected));
    }

    #[tokio::test]
    async fn ensure_follows_memoized_delivery_mode() {
        let temp = tempfile::TempDir::new().unwrap();
        let converter = converter();
        let mut mail = MailConfig::default();
        assert!(!converter.is_using_pickup_directory(&mail));

        let directory = temp.path().join("mail_drop");
        mail.delivery_method = DeliveryMethod::SpecifiedPickupDirectory;
        mail.pickup_directory_location = Some(directory.clone());
        converter.ensure_pickup_directory(&mail).await.unwrap();

        assert!(!directory.exists());
    }
}
