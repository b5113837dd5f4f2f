//! package-verifier - Package verifier service host
//!
//! Loads configuration, wires the service container and runs the background
//! tasks until shutdown is requested.

mod cli;
mod display;
mod error;
mod setup;

use crate::cli::{Cli, Commands};
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::setup::SystemSetup;
use clap::Parser;
use std::path::Path;
use std::process;
use tokio::select;
use tracing::{error, info};
use verifier_config::{Config, LoggingConfig};
use verifier_mail::MailMessage;

#[tokio::main]
async fn main() {
    // Parse command line arguments first to check for JSON mode
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    // Logging settings come from the merged config; load failures are
    // reported once tracing is up
    let config = load_config(cli.global.config.as_deref()).await;
    let logging = config
        .as_ref()
        .map(|config| config.logging.clone())
        .unwrap_or_default();
    init_tracing(json_mode, cli.global.debug, &logging);

    // Run the application and handle errors
    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        error!("Application error: {}", e);
        if json_mode {
            println!("{}", e.to_json());
        } else {
            eprintln!("Error: {e}");
        }
        process::exit(1);
    }
}

/// File config (or defaults) with environment overrides applied
async fn load_config(path: Option<&Path>) -> Result<Config, CliError> {
    let mut config = Config::load_or_default(path).await?;
    config.merge_env()?;
    Ok(config)
}

/// Main application logic
async fn run(cli: Cli, config: Config) -> Result<(), CliError> {
    info!("Starting package-verifier v{}", env!("CARGO_PKG_VERSION"));

    let request = setup::request_context(
        cli.global.content_root.as_deref(),
        cli.global.user.as_deref(),
    );
    let setup = SystemSetup::initialize(config, request).await?;
    let renderer = OutputRenderer::new(cli.global.json);

    match cli.command {
        Commands::Run { once } => run_tasks(&setup, &renderer, once).await?,
        Commands::ShowConfig => {
            renderer.render_parameters(setup.parameters(), &setup.config().mail)?;
        }
        Commands::SendTestMail { to } => {
            let mailer = setup.mailer()?;
            let message = MailMessage::new(
                "package-verifier test message",
                format!(
                    "This message was sent by package-verifier v{} running as {}.",
                    setup.parameters().file_version(),
                    setup.parameters().current_user_name()
                ),
            )
            .recipient(to);
            let path = mailer.send(&message).await?;
            renderer.render_delivery(&path)?;
        }
    }

    info!("Command completed successfully");
    Ok(())
}

/// Start every task, wait for ctrl-c or a shutdown request, then stop them
async fn run_tasks(
    setup: &SystemSetup,
    renderer: &OutputRenderer,
    once: bool,
) -> Result<(), CliError> {
    let tasks = setup.tasks();
    let signal = setup.signal();

    tasks.initialize_all().await?;
    info!(tasks = ?tasks.names(), "Verifier running");

    if once {
        setup.shutdown_task().work_completed()?;
    }

    let reason = select! {
        interrupted = tokio::signal::ctrl_c() => {
            interrupted?;
            "interrupted"
        }
        () = signal.requested() => "work completed",
    };
    info!(reason, "Shutting down");

    tasks.shutdown_all().await?;
    renderer.render_stopped(reason)
}

/// Initialize tracing/logging
fn init_tracing(json_mode: bool, debug_enabled_flag: bool, logging: &LoggingConfig) {
    // Check if debug logging is enabled
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;
    let log_dir = logging.log_dir();

    if json_mode {
        // JSON mode: suppress all console output to avoid contaminating JSON
        if debug_enabled {
            if let Some(file) = create_log_file(&log_dir) {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(file)
                    .with_env_filter(debug_filter())
                    .init();
                return;
            }
        }
        // Fallback: disable all logging in JSON mode
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
    } else if debug_enabled {
        // Debug mode: structured JSON logs to file
        if let Some(file) = create_log_file(&log_dir) {
            tracing_subscriber::fmt()
                .json()
                .with_writer(file)
                .with_env_filter(debug_filter())
                .init();
            eprintln!("Debug logging enabled: {}", log_dir.display());
        } else {
            eprintln!("Warning: Failed to create log file in {}", log_dir.display());
            // Fallback to stderr
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(debug_filter())
                .init();
        }
    } else {
        // Normal mode: minimal logging to stderr
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_new(&logging.filter)
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .init();
    }
}

fn debug_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new("info,package_verifier=debug,verifier_container=debug")
    })
}

fn create_log_file(log_dir: &Path) -> Option<std::fs::File> {
    std::fs::create_dir_all(log_dir).ok()?;
    let log_file = log_dir.join(format!(
        "package-verifier-{}.log",
        chrono::Utc::now().format("%Y%m%d-%H%M%S")
    ));
    std::fs::File::create(log_file).ok()
}
