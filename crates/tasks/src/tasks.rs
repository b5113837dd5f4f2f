//! Built-in tasks wired by the host

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Mutex;
use tracing::info;
use verifier_errors::TaskError;

use crate::signal::ShutdownSignal;
use crate::task::{Task, TaskState};

fn already_initialized(task: &str) -> TaskError {
    TaskError::InitializationFailed {
        task: task.to_string(),
        message: "already initialized".to_string(),
    }
}

/// Announces that the verifier has started
#[derive(Debug, Default)]
pub struct StartupTask {
    state: TaskState,
    started_at: Mutex<Option<DateTime<Utc>>>,
}

impl StartupTask {
    pub const NAME: &'static str = "startup";

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// When `initialize` last ran
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
            .lock()
            .map(|started| *started)
            .unwrap_or_default()
    }
}

#[async_trait]
impl Task for StartupTask {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn initialize(&self) -> Result<(), TaskError> {
        if !self.state.start() {
            return Err(already_initialized(Self::NAME));
        }
        let now = Utc::now();
        if let Ok(mut started) = self.started_at.lock() {
            *started = Some(now);
        }
        info!(task = Self::NAME, started_at = %now.to_rfc3339(), "Verifier started");
        Ok(())
    }

    async fn shutdown(&self) -> Result<(), TaskError> {
        self.state.stop(Self::NAME)?;
        if let Some(started) = self.started_at() {
            let uptime = Utc::now() - started;
            info!(task = Self::NAME, uptime_secs = uptime.num_seconds(), "Verifier stopping");
        }
        Ok(())
    }
}

/// Requests process shutdown once the pending work reports completion
#[derive(Debug)]
pub struct ShutdownAfterWorkCompletedTask {
    state: TaskState,
    signal: ShutdownSignal,
}

impl ShutdownAfterWorkCompletedTask {
    pub const NAME: &'static str = "shutdown_after_work_completed";

    #[must_use]
    pub fn new(signal: ShutdownSignal) -> Self {
        Self {
            state: TaskState::new(),
            signal,
        }
    }

    /// Report that all pending work is done
    ///
    /// # Errors
    ///
    /// Returns `TaskError::NotInitialized` if the task is not running.
    pub fn work_completed(&self) -> Result<(), TaskError> {
        if !self.state.is_initialized() {
            return Err(TaskError::NotInitialized {
                task: Self::NAME.to_string(),
            });
        }
        info!(task = Self::NAME, "Work completed, requesting shutdown");
        self.signal.request();
        Ok(())
    }
}

#[async_trait]
impl Task for ShutdownAfterWorkCompletedTask {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn initialize(&self) -> Result<(), TaskError> {
        if !self.state.start() {
            return Err(already_initialized(Self::NAME));
        }
        info!(task = Self::NAME, "Waiting for work to complete");
        Ok(())
    }

    async fn shutdown(&self) -> Result<(), TaskError> {
        self.state.stop(Self::NAME)
    }
}

/// Publishes verification results as gists on the code-hosting service
///
/// Only the lifecycle lives here; publishing is done by the notification
/// collaborators once the task is running.
#[derive(Debug, Default)]
pub struct CreateGistTask {
    state: TaskState,
}

impl CreateGistTask {
    pub const NAME: &'static str = "create_gist";

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_accepting(&self) -> bool {
        self.state.is_initialized()
    }
}

#[async_trait]
impl Task for CreateGistTask {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn initialize(&self) -> Result<(), TaskError> {
        if !self.state.start() {
            return Err(already_initialized(Self::NAME));
        }
        info!(task = Self::NAME, "Accepting gist requests");
        Ok(())
    }

    async fn shutdown(&self) -> Result<(), TaskError> {
        self.state.stop(Self::NAME)
    }
}
