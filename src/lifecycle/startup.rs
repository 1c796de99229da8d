//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the telemetry handle and optional metrics endpoint
//! - Bind the listener and serve until a shutdown signal
//! - Flush spans on the way out
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Telemetry shutdown problems are logged, never fatal

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{ServiceConfig, ServiceKind};
use crate::http::{HttpServer, ServerError};
use crate::lifecycle::Shutdown;
use crate::observability::{metrics, Telemetry, TelemetryError};

/// Fatal errors while bringing a service up or running it.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Run one service until SIGINT/SIGTERM.
pub async fn run_service(kind: ServiceKind, config: ServiceConfig) -> Result<(), StartupError> {
    let service_name = config.service_name(kind);
    let telemetry = Arc::new(Telemetry::init(&config.telemetry, &service_name)?);

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let server = HttpServer::new(kind, &config, telemetry.clone())?;

    let address = config.bind_address(kind);
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let signals = shutdown.trigger_on_signal();

    let result = server.run(listener, server_shutdown).await;
    signals.abort();

    flush_telemetry(
        telemetry,
        Duration::from_secs(config.shutdown.grace_period_secs),
    )
    .await;

    result.map_err(StartupError::from)
}

/// Shut the provider down off the async workers, bounded by `grace`.
async fn flush_telemetry(telemetry: Arc<Telemetry>, grace: Duration) {
    let task = tokio::task::spawn_blocking(move || telemetry.shutdown());
    match tokio::time::timeout(grace, task).await {
        Ok(Ok(Ok(()))) => tracing::info!("Tracer provider shut down"),
        Ok(Ok(Err(e))) => tracing::warn!(error = %e, "Tracer provider shutdown failed"),
        Ok(Err(e)) => tracing::warn!(error = %e, "Tracer provider shutdown task panicked"),
        Err(_) => tracing::warn!(grace_secs = grace.as_secs(), "Tracer provider shutdown timed out"),
    }
}
