//! Delivery into a pickup directory

use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;
use verifier_config::{DeliveryMethod, MailConfig};
use verifier_errors::{Error, MailError};
use verifier_platform::FileSystem;

use crate::message::MailMessage;

/// Writes each message as a `<uuid>.eml` file into the pickup directory
///
/// A relay or mail server watching the directory picks the files up.
#[derive(Clone)]
pub struct PickupDirectoryMailer {
    fs: Arc<dyn FileSystem>,
    directory: PathBuf,
    default_from: Option<String>,
}

impl PickupDirectoryMailer {
    /// Create a mailer from resolved mail configuration
    ///
    /// # Errors
    ///
    /// Returns `MailError::PickupDeliveryDisabled` for network delivery,
    /// `MailError::PickupDirectoryNotConfigured` without a location, and
    /// `MailError::PathResolution` if the location was not made absolute.
    pub fn from_config(fs: Arc<dyn FileSystem>, mail: &MailConfig) -> Result<Self, Error> {
        if mail.delivery_method != DeliveryMethod::SpecifiedPickupDirectory {
            return Err(MailError::PickupDeliveryDisabled.into());
        }
        let directory = mail
            .pickup_directory_location
            .clone()
            .ok_or(MailError::PickupDirectoryNotConfigured)?;
        if !directory.is_absolute() {
            return Err(MailError::PathResolution {
                path: directory.display().to_string(),
                message: "pickup directory has not been resolved to an absolute path".to_string(),
            }
            .into());
        }
        Ok(Self {
            fs,
            directory,
            default_from: mail.from.clone(),
        })
    }

    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Deliver `message` and return the written file
    ///
    /// # Errors
    ///
    /// Returns `MailError::InvalidMessage` if the message fails validation and
    /// `MailError::DeliveryFailed` if the file cannot be written.
    pub async fn send(&self, message: &MailMessage) -> Result<PathBuf, Error> {
        let from = message.validate(self.default_from.as_deref())?;
        let id = Uuid::new_v4();
        let path = self.directory.join(format!("{id}.eml"));
        let contents = message.render(from, Utc::now(), id);

        debug!(path = %path.display(), bytes = contents.len(), "Writing message");
        self.fs
            .write(&path, contents.as_bytes())
            .await
            .map_err(|e| MailError::DeliveryFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        info!(
            id = %id,
            recipients = message.to.len(),
            subject = %message.subject,
            "Message dropped into pickup directory"
        );
        Ok(path)
    }
}

impl std::fmt::Debug for PickupDirectoryMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PickupDirectoryMailer")
            .field("directory", &self.directory)
            .field("default_from", &self.default_from)
            .finish_non_exhaustive()
    }
}
