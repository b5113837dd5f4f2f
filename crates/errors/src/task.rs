//! Background task error types

use thiserror::Error;

use crate::UserFacingError;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TaskError {
    #[error("task {task} failed to initialize: {message}")]
    InitializationFailed { task: String, message: String },

    #[error("task {task} failed to shut down: {message}")]
    ShutdownFailed { task: String, message: String },

    #[error("task {task} is not initialized")]
    NotInitialized { task: String },
}

impl UserFacingError for TaskError {
    fn user_message(&self) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Owned(self.to_string())
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::InitializationFailed { .. } => "task.initialization_failed",
            Self::ShutdownFailed { .. } => "task.shutdown_failed",
            Self::NotInitialized { .. } => "task.not_initialized",
        };
        Some(code)
    }
}
