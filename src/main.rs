//! CDI Dashboard Server
//!
//! Run with: cargo run --bin cdi-dashboard
//!
//! # Configuration
//!
//! Settings come from a TOML file (`--config`, or the default locations) with
//! environment overrides:
//! - `CDI_SOURCE_URL`: Dataset URL or path
//! - `CDI_SOURCE_TIMEOUT_SECS`: Download timeout (default: 120)
//! - `CDI_API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `CDI_API_PORT`: Port to listen on (default: 8050)
//! - `CDI_LOG_LEVEL` / `CDI_LOG_FORMAT`: Logging (default: info / pretty)
//! - `RUST_LOG`: Overrides the log filter entirely

use anyhow::Context;
use cdi_dashboard::api::{serve, AppState};
use cdi_dashboard::config::{generate_default_config, Config, LoggingConfig};
use cdi_dashboard::dataset::load_and_reshape_with;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// U.S. Chronic Disease Indicators dashboard
#[derive(Parser)]
#[command(name = "cdi-dashboard")]
#[command(about = "Serve the U.S. Chronic Disease Indicators dashboard", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dataset URL or local CSV path
    #[arg(short, long)]
    source: Option<String>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Print the default config file and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", generate_default_config());
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => Config::load_default(),
    };

    if let Some(source) = cli.source {
        config.source.url = source;
    }
    if let Some(host) = cli.host {
        config.api.host = host;
    }
    if let Some(port) = cli.port {
        config.api.port = port;
    }

    init_logging(&config.logging);

    tracing::info!("Starting CDI dashboard v{}", env!("CARGO_PKG_VERSION"));

    // The dashboard cannot run without data: load failures end the process
    let source = config.source.data_source();
    let table = load_and_reshape_with(&source, &config.source.load_options())
        .await
        .with_context(|| format!("Failed to load dataset from {}", source))?;

    tracing::info!(
        rows = table.len(),
        indicators = table.indicators().len(),
        "Dataset ready"
    );

    let state = AppState::new(table, source.to_string(), config.api.clone());

    tracing::info!("Starting server on {}", config.api.addr());
    serve(state, &config.api).await?;

    tracing::info!("CDI dashboard stopped");
    Ok(())
}

/// Initialize tracing from the logging config; `RUST_LOG` takes precedence
fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("cdi_dashboard={level},tower_http={level}", level = logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);

    if logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
