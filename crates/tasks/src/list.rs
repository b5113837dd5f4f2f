//! Ordered, read-only collection of tasks

use std::sync::Arc;
use tracing::{debug, error, info};
use verifier_errors::TaskError;

use crate::task::Task;

/// Tasks resolved from the container, in registration order
///
/// The list is fixed at construction. Clones share the same storage, so every
/// consumer that resolves the list sees the same tasks in the same order.
#[derive(Clone)]
pub struct TaskList {
    tasks: Arc<[Arc<dyn Task>]>,
}

impl TaskList {
    #[must_use]
    pub fn new(tasks: Vec<Arc<dyn Task>>) -> Self {
        Self {
            tasks: tasks.into(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Task>> {
        self.tasks.iter()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Arc<dyn Task>> {
        self.tasks.get(index)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Arc<dyn Task>] {
        &self.tasks
    }

    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.tasks.iter().map(|task| task.name()).collect()
    }

    /// Whether both lists are views of the same underlying storage
    #[must_use]
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.tasks, &other.tasks)
    }

    /// Initialize every task in list order
    ///
    /// If a task fails, the tasks that were already started are shut down in
    /// reverse order before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns the first initialization failure.
    pub async fn initialize_all(&self) -> Result<(), TaskError> {
        for (index, task) in self.tasks.iter().enumerate() {
            debug!(task = task.name(), "Initializing task");
            if let Err(e) = task.initialize().await {
                error!(task = task.name(), error = %e, "Task failed to initialize");
                for started in self.tasks[..index].iter().rev() {
                    if let Err(rollback) = started.shutdown().await {
                        error!(task = started.name(), error = %rollback, "Rollback shutdown failed");
                    }
                }
                return Err(e);
            }
        }
        info!(count = self.tasks.len(), "All tasks initialized");
        Ok(())
    }

    /// Shut down every task in list order
    ///
    /// All tasks are attempted even if one fails.
    ///
    /// # Errors
    ///
    /// Returns the first shutdown failure.
    pub async fn shutdown_all(&self) -> Result<(), TaskError> {
        let mut first_error = None;
        for task in self.tasks.iter() {
            debug!(task = task.name(), "Shutting down task");
            if let Err(e) = task.shutdown().await {
                error!(task = task.name(), error = %e, "Task failed to shut down");
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => {
                info!(count = self.tasks.len(), "All tasks shut down");
                Ok(())
            }
        }
    }
}

impl std::fmt::Debug for TaskList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskList")
            .field("tasks", &self.names())
            .finish()
    }
}

impl<'a> IntoIterator for &'a TaskList {
    type Item = &'a Arc<dyn Task>;
    type IntoIter = std::slice::Iter<'a, Arc<dyn Task>>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}
