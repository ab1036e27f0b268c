//! Climate Service - HTTP entry point
//!
//! Serves the read-only climate API:
//! 1. Loads climate.toml (optional) and DATABASE_URL
//! 2. Connects to PostgreSQL and verifies the climate schema
//! 3. Serves JSON routes until the process is stopped
//!
//! Usage:
//!   cargo run --release                          # Listen on 127.0.0.1:5000
//!   cargo run --release -- --port 8080           # Override the port
//!   cargo run --release -- --config prod.toml -v # Alternate config, debug logging
//!
//! Environment:
//!   DATABASE_URL - PostgreSQL connection string

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;

use climate_service::config::{self, DEFAULT_CONFIG_PATH, ServiceConfig};
use climate_service::db;
use climate_service::endpoint;
use climate_service::error::Result;
use climate_service::model::REQUIRED_TABLES;
use climate_service::store::{ClimateStore, PgClimateStore};

#[derive(Parser)]
#[command(name = "climate_service")]
#[command(about = "Read-only JSON API over station precipitation and temperature observations")]
#[command(version)]
struct Cli {
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, help = "Configuration file")]
    config: PathBuf,

    #[arg(long, help = "Listen address (overrides [server].host)")]
    host: Option<String>,

    #[arg(short, long, help = "Listen port (overrides [server].port)")]
    port: Option<u16>,

    #[arg(short, long, help = "Enable verbose logging")]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Climate service failed:\n{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = ServiceConfig::load(&cli.config)?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let schema = config.database.schema.as_str();
    let database_url = config::database_url_from_env();
    let client = db::connect_and_verify(database_url.as_deref(), schema, REQUIRED_TABLES)?;
    tracing::info!("Connected to database, schema '{}' verified", schema);

    let mut store = PgClimateStore::new(client, schema);

    let summary = store.summary()?;
    tracing::info!(
        "Dataset: {} stations, {} measurements ({} .. {})",
        summary.station_count,
        summary.measurement_count,
        summary.first_date.as_deref().unwrap_or("-"),
        summary.last_date.as_deref().unwrap_or("-"),
    );

    endpoint::start_endpoint_server(&config.server, store)
}
