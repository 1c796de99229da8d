//! cep-weather
//!
//! Runs either half of the postal code → temperature pipeline.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────┐          ┌──────────────────────────┐
//!  POST /cep      │         GATEWAY          │  GET /   │      WEATHER SERVICE     │
//! ───────────────▶│ validate → geocode ──────┼─────────▶│ extract → validate       │
//!                 │            │  traceparent│  ?cep=   │   → geocode → weather    │
//!                 │            ▼             │          │   → convert              │
//!  {city, temp_*} │  merge city + temps ◀────┼──────────│ {temp_C, temp_F, temp_K} │
//! ◀───────────────│                          │          │                          │
//!                 └────────────┬─────────────┘          └────────────┬─────────────┘
//!                              │        spans (one trace)            │
//!                              └──────────────▶ OTLP ◀───────────────┘
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use cep_weather::config::{loader, ServiceKind};
use cep_weather::lifecycle::run_service;
use cep_weather::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "cep-weather")]
#[command(about = "Postal code to temperature services", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Listen address, overrides the config file.
    #[arg(short, long, global = true)]
    bind: Option<String>,

    #[command(subcommand)]
    service: Service,
}

#[derive(Subcommand)]
enum Service {
    /// Public gateway (POST /cep)
    Gateway,
    /// Internal weather service (GET /?cep=)
    Weather,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let kind = match cli.service {
        Service::Gateway => ServiceKind::Gateway,
        Service::Weather => ServiceKind::Weather,
    };

    let dotenv = loader::load_dotenv();
    let mut config = loader::load_config(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = Some(bind);
    }

    init_logging(&config.observability)?;

    tracing::info!(
        service = kind.label(),
        version = env!("CARGO_PKG_VERSION"),
        "cep-weather starting"
    );
    if let Some(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded .env");
    }
    tracing::info!(
        bind_address = %config.bind_address(kind),
        geocode_url = %config.providers.geocode_url,
        telemetry_enabled = config.telemetry.enabled,
        "Configuration loaded"
    );

    run_service(kind, config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
