//! Mail delivery error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum MailError {
    #[error("pickup directory delivery is enabled but no pickup directory is configured")]
    PickupDirectoryNotConfigured,

    #[error("failed to resolve pickup directory {path}: {message}")]
    PathResolution { path: String, message: String },

    #[error("mail delivery is not configured for the pickup directory")]
    PickupDeliveryDisabled,

    #[error("invalid message: {message}")]
    InvalidMessage { message: String },

    #[error("failed to deliver message to {path}: {message}")]
    DeliveryFailed { path: String, message: String },
}

impl UserFacingError for MailError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::PickupDirectoryNotConfigured => {
                Some("Set [mail] pickup_directory_location or switch delivery_method to network.")
            }
            Self::PathResolution { .. } => Some("Check that the pickup directory path is valid."),
            Self::DeliveryFailed { .. } => {
                Some("Ensure the pickup directory exists and is writable.")
            }
            _ => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::PickupDirectoryNotConfigured => "mail.pickup_directory_not_configured",
            Self::PathResolution { .. } => "mail.path_resolution",
            Self::PickupDeliveryDisabled => "mail.pickup_delivery_disabled",
            Self::InvalidMessage { .. } => "mail.invalid_message",
            Self::DeliveryFailed { .. } => "mail.delivery_failed",
        };
        Some(code)
    }
}
