//! System setup and initialization

use crate::error::CliError;
use std::sync::Arc;
use tracing::{debug, info};
use verifier_config::{ApplicationParameters, Config, RequestContext, StaticRequestContext};
use verifier_container::{Container, ContainerBinding};
use verifier_mail::{PickupDirectoryConverter, PickupDirectoryMailer};
use verifier_platform::FileSystem;
use verifier_tasks::{ShutdownAfterWorkCompletedTask, ShutdownSignal, TaskList};

/// Components wired at startup
pub struct SystemSetup {
    config: Arc<Config>,
    parameters: Arc<ApplicationParameters>,
    container: Container,
    tasks: TaskList,
    signal: ShutdownSignal,
    shutdown: Arc<ShutdownAfterWorkCompletedTask>,
}

impl SystemSetup {
    /// Resolve configuration and build the service container
    ///
    /// Runs once per process, before any task starts.
    pub async fn initialize(
        mut config: Config,
        request: Option<Arc<dyn RequestContext>>,
    ) -> Result<Self, CliError> {
        info!("Initializing package verifier");

        let container = ContainerBinding::build_container()?;
        let fs: Arc<dyn FileSystem> = container.resolve()?;

        let converter = PickupDirectoryConverter::new(fs);
        converter.convert_relative_to_absolute_pickup_directory_location(
            &mut config.mail,
            request.as_deref(),
        )?;
        converter.ensure_pickup_directory(&config.mail).await?;

        let config = Arc::new(config);
        let settings: Arc<Config> = Arc::clone(&config);
        let mut parameters = ApplicationParameters::new(settings);
        if let Some(request) = request {
            parameters = parameters.with_request_context(request);
        }

        let tasks: TaskList = container.resolve()?;
        let signal: ShutdownSignal = container.resolve()?;
        let shutdown: Arc<ShutdownAfterWorkCompletedTask> = container.resolve()?;
        debug!(tasks = ?tasks.names(), "Task list resolved");

        info!("System initialization completed");
        Ok(Self {
            config,
            parameters: Arc::new(parameters),
            container,
            tasks,
            signal,
            shutdown,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn parameters(&self) -> &ApplicationParameters {
        &self.parameters
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn signal(&self) -> &ShutdownSignal {
        &self.signal
    }

    /// The listed task that requests shutdown once work is done
    pub fn shutdown_task(&self) -> &ShutdownAfterWorkCompletedTask {
        &self.shutdown
    }

    /// Mailer for the resolved pickup directory
    ///
    /// Messages without a sender use `[mail] from`, then the system email
    /// address setting.
    pub fn mailer(&self) -> Result<PickupDirectoryMailer, CliError> {
        let fs: Arc<dyn FileSystem> = self.container.resolve()?;
        let mut mail = self.config.mail.clone();
        if mail.from.is_none() {
            mail.from = self.parameters.system_email_address().ok();
        }
        Ok(PickupDirectoryMailer::from_config(fs, &mail)?)
    }
}

/// Request context for a process hosted below `content_root`
pub fn request_context(
    content_root: Option<&std::path::Path>,
    user: Option<&str>,
) -> Option<Arc<dyn RequestContext>> {
    let root = content_root?;
    let mut request = StaticRequestContext::new(root);
    if let Some(user) = user {
        request = request.with_user(user);
    }
    Some(Arc::new(request))
}
