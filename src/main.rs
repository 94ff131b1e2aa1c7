//! UserHub Server: user management and session authentication
//!
//! Main entry point that loads configuration, installs logging, and starts the server.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use userhub_core::config::AppConfig;
use userhub_core::error::AppError;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "userhub-server", version, about = "UserHub HTTP server")]
struct Cli {
    /// Directory holding `default.toml` and per-environment overlays.
    #[arg(long, env = "USERHUB_CONFIG_DIR", default_value = "config")]
    config_dir: String,

    /// Environment overlay to apply (`{config_dir}/{env}.toml`).
    #[arg(long, env = "USERHUB_ENV", default_value = "development")]
    env: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_configuration(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from the config directory and environment
fn load_configuration(cli: &Cli) -> Result<AppConfig, AppError> {
    AppConfig::load(&cli.config_dir, &cli.env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting UserHub v{}", env!("CARGO_PKG_VERSION"));

    if config.auth.uses_default_secret() {
        tracing::warn!("auth.jwt_secret is the built-in default; set USERHUB_AUTH__JWT_SECRET");
    }

    tracing::info!(
        token_ttl_minutes = config.auth.token_ttl_minutes,
        idle_timeout_minutes = config.session.idle_timeout_minutes,
        absolute_timeout_hours = config.session.absolute_timeout_hours,
        "Session policy loaded"
    );

    userhub_api::run_server(config).await
}
