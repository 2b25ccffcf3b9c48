use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use autoreserve_server::config::{AppConfig, CliConfig, FileConfig};
use autoreserve_server::job::JobController;
use autoreserve_server::server::{run_server, RequestsLoggingLevel};
use autoreserve_server::NoopSessionProvider;

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to a TOML config file. Values in the file override CLI arguments.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3000)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };
    let cli_config = CliConfig {
        port: cli_args.port,
        logging_level: cli_args.logging_level,
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    info!("autoreserve-server {}", env!("GIT_HASH"));

    // No real browser driver ships with the server binary; runs fail fast
    // until a driver-backed provider is wired in here.
    let controller = Arc::new(JobController::new(
        Arc::new(NoopSessionProvider),
        config.automation.clone(),
    ));

    info!("Ready to serve at port {}!", config.port);
    tokio::select! {
        result = run_server(controller, config.logging_level, config.port) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down.");
            Ok(())
        }
    }
}
