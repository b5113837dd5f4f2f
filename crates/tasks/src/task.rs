//! The task capability

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use verifier_errors::TaskError;

/// A unit of work bound to the host lifecycle
#[async_trait]
pub trait Task: Send + Sync {
    /// Stable name used in logs and errors
    fn name(&self) -> &'static str;

    /// Start the task. Called once, in list order, during startup.
    async fn initialize(&self) -> Result<(), TaskError>;

    /// Stop the task. Only valid after a successful `initialize`.
    async fn shutdown(&self) -> Result<(), TaskError>;
}

/// Initialized flag shared by the built-in tasks
#[derive(Debug, Default)]
pub struct TaskState {
    initialized: AtomicBool,
}

impl TaskState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Mark the task started; `false` if it already was
    pub fn start(&self) -> bool {
        !self.initialized.swap(true, Ordering::AcqRel)
    }

    /// Mark the task stopped
    ///
    /// # Errors
    ///
    /// Returns `TaskError::NotInitialized` if the task was never started.
    pub fn stop(&self, task: &str) -> Result<(), TaskError> {
        if self.initialized.swap(false, Ordering::AcqRel) {
            Ok(())
        } else {
            Err(TaskError::NotInitialized {
                task: task.to_string(),
            })
        }
    }
}
