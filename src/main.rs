use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use myflix_client::cli::{self, Cli};
use myflix_client::config::Config;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging
    let log_level = cli
        .log_level
        .as_ref()
        .unwrap_or(&config.logging.level)
        .clone();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Starting myflix v{}", env!("CARGO_PKG_VERSION"));

    match cli::run_command(&cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // View failures were already shown to the user as a notification.
            let shown = matches!(
                e.downcast_ref::<myflix_client::Error>(),
                Some(myflix_client::Error::Api(_) | myflix_client::Error::InvalidInput(_))
            );
            if shown {
                tracing::debug!(error = %e, "Command failed");
            } else {
                eprintln!("Error: {:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}
