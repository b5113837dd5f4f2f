//! The verifier's service graph

use std::sync::Arc;
use tracing::debug;
use verifier_errors::Error;
use verifier_platform::{FileSystem, OsFileSystem};
use verifier_tasks::{
    CreateGistTask, ShutdownAfterWorkCompletedTask, ShutdownSignal, StartupTask, Task, TaskList,
};

use crate::constructor::Implementation;
use crate::container::{Container, ContainerBuilder};
use crate::lifetime::Lifetime;
use crate::resolution::LongestConstructorResolution;
use crate::resolver::ResolverExt;

/// Registers the application's components
///
/// Every service is a singleton: it is created once while the container is
/// built and shared afterwards.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainerBinding;

impl ContainerBinding {
    /// Add the application's registrations to `builder`, in order
    #[must_use]
    pub fn register_components(builder: ContainerBuilder) -> ContainerBuilder {
        builder
            .register_type(
                Implementation::<Arc<dyn FileSystem>>::of::<OsFileSystem>()
                    .provides::<Arc<dyn FileSystem>>()
                    .constructor("new", Vec::new(), |_| {
                        Ok(Arc::new(OsFileSystem::new()) as Arc<dyn FileSystem>)
                    }),
                Lifetime::Singleton,
            )
            .instance(ShutdownSignal::new())
            .singleton(|resolver| {
                let signal = resolver.resolve::<ShutdownSignal>()?;
                Ok(Arc::new(ShutdownAfterWorkCompletedTask::new(signal)))
            })
            .singleton(|resolver| {
                let shutdown = resolver.resolve::<Arc<ShutdownAfterWorkCompletedTask>>()?;
                let tasks: Vec<Arc<dyn Task>> = vec![
                    Arc::new(StartupTask::new()),
                    shutdown as Arc<dyn Task>,
                    Arc::new(CreateGistTask::new()),
                ];
                debug!(count = tasks.len(), "Task list created");
                Ok(TaskList::new(tasks))
            })
    }

    /// Build the application container
    ///
    /// Constructor selection prefers the longest constructor and falls back
    /// to the default single-constructor rule.
    ///
    /// # Errors
    ///
    /// Returns an error if any registration is invalid or any singleton fails
    /// to construct.
    pub fn build_container() -> Result<Container, Error> {
        Self::register_components(ContainerBuilder::new())
            .decorate_constructor_resolution(LongestConstructorResolution::new)
            .build()
    }
}
