//! Regular expression error types

use thiserror::Error;

use crate::UserFacingError;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PatternError {
    #[error("invalid pattern {pattern}: {message}")]
    InvalidPattern { pattern: String, message: String },
}

impl UserFacingError for PatternError {
    fn user_message(&self) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Owned(self.to_string())
    }

    fn user_code(&self) -> Option<&'static str> {
        Some("pattern.invalid")
    }
}
