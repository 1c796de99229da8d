//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router for the gateway or the weather service
//! - Build outbound clients from configuration
//! - Wire up middleware (access logs, request ID)
//! - Serve on a listener until shutdown is signalled

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::{ServiceConfig, ServiceKind};
use crate::http::downstream::DownstreamClient;
use crate::http::gateway::{cep_handler, GatewayState};
use crate::http::weather::{weather_handler, WeatherState};
use crate::lookup::{GeocodeClient, WeatherClient};
use crate::observability::Telemetry;

/// Errors raised while assembling a server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// HTTP server for one of the two services.
pub struct HttpServer {
    kind: ServiceKind,
    router: Router,
}

impl HttpServer {
    /// Create a server for `kind` with the given configuration.
    pub fn new(
        kind: ServiceKind,
        config: &ServiceConfig,
        telemetry: Arc<Telemetry>,
    ) -> Result<Self, ServerError> {
        // Single attempt, transport default deadlines only.
        let http = reqwest::Client::builder().build()?;
        let geocoder = GeocodeClient::new(http.clone(), &config.providers.geocode_url)?;

        let routes = match kind {
            ServiceKind::Gateway => {
                let state = GatewayState {
                    geocoder,
                    downstream: DownstreamClient::new(
                        http,
                        &config.gateway.downstream_url,
                        telemetry.clone(),
                        config.gateway.strict_decoding,
                    )?,
                    telemetry,
                    strict_decoding: config.gateway.strict_decoding,
                };
                Router::new()
                    .route("/cep", post(cep_handler))
                    .with_state(state)
            }
            ServiceKind::Weather => {
                if config.providers.weather_api_key.is_empty() {
                    tracing::warn!("WEATHER_API_KEY is not set; weather lookups will be rejected");
                }
                let state = WeatherState {
                    geocoder,
                    weather: WeatherClient::new(
                        http,
                        &config.providers.weather_url,
                        config.providers.weather_api_key.clone(),
                    )?,
                    telemetry,
                };
                Router::new()
                    .route("/", get(weather_handler))
                    .with_state(state)
            }
        };

        Ok(Self {
            kind,
            router: Self::build_router(routes),
        })
    }

    /// Wrap routes with the middleware stack.
    fn build_router(routes: Router) -> Router {
        routes
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until a
    /// shutdown signal arrives. In-flight requests are drained.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            service = self.kind.label(),
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!(service = self.kind.label(), "HTTP server stopped");
        Ok(())
    }
}
