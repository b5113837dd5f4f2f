//! Command line interface definition

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// package-verifier - Verifies submitted packages and notifies maintainers
#[derive(Parser)]
#[command(name = "package-verifier")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Verifies submitted packages and notifies maintainers")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging to the log directory
    #[arg(long, global = true)]
    pub debug: bool,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Content root of the hosting site; relative paths resolve below it
    #[arg(long, global = true, value_name = "PATH", env = "VERIFIER_CONTENT_ROOT")]
    pub content_root: Option<PathBuf>,

    /// Authenticated caller to report when a content root is set
    #[arg(long, global = true, value_name = "NAME", requires = "content_root")]
    pub user: Option<String>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the background tasks and wait for shutdown
    Run {
        /// Shut down as soon as all tasks are initialized
        #[arg(long)]
        once: bool,
    },

    /// Print the resolved application parameters
    #[command(alias = "config")]
    ShowConfig,

    /// Drop a test message into the mail pickup directory
    SendTestMail {
        /// Recipient address
        #[arg(long)]
        to: String,
    },
}
