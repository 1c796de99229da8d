//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure shared by the
//! gateway and the weather service. All types derive Serde traits for
//! deserialization from config files.

use serde::{Deserialize, Serialize};

/// Which of the two services a process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    /// Public entry point: `POST /cep`.
    Gateway,
    /// Internal service: `GET /?cep=`.
    Weather,
}

impl ServiceKind {
    /// Listen address used when the config does not set one.
    pub fn default_bind_address(self) -> &'static str {
        match self {
            ServiceKind::Gateway => "0.0.0.0:3333",
            ServiceKind::Weather => "0.0.0.0:4444",
        }
    }

    /// Resource name reported to the trace collector.
    pub fn default_service_name(self) -> &'static str {
        match self {
            ServiceKind::Gateway => "cep-gateway",
            ServiceKind::Weather => "cep-weather",
        }
    }

    /// Short label used in logs and metrics.
    pub fn label(self) -> &'static str {
        match self {
            ServiceKind::Gateway => "gateway",
            ServiceKind::Weather => "weather",
        }
    }
}

/// Root configuration for both services.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// External lookup providers.
    pub providers: ProviderConfig,

    /// Gateway-only settings.
    pub gateway: GatewayConfig,

    /// Trace export settings.
    pub telemetry: TelemetryConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,

    /// Graceful shutdown settings.
    pub shutdown: ShutdownConfig,
}

impl ServiceConfig {
    /// Effective listen address for the given service.
    pub fn bind_address(&self, kind: ServiceKind) -> String {
        self.listener
            .bind_address
            .clone()
            .unwrap_or_else(|| kind.default_bind_address().to_string())
    }

    /// Effective trace resource name for the given service.
    pub fn service_name(&self, kind: ServiceKind) -> String {
        self.telemetry
            .service_name
            .clone()
            .unwrap_or_else(|| kind.default_service_name().to_string())
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3333"). Unset means the service default.
    pub bind_address: Option<String>,
}

/// External provider endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL of the postal code provider (`/ws/{cep}/json/` is appended).
    pub geocode_url: String,

    /// Base URL of the weather provider (`/v1/current.json` is appended).
    pub weather_url: String,

    /// Weather provider API key. Usually supplied through `WEATHER_API_KEY`.
    pub weather_api_key: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            geocode_url: "http://viacep.com.br".to_string(),
            weather_url: "http://api.weatherapi.com".to_string(),
            weather_api_key: String::new(),
        }
    }
}

/// Gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Weather service endpoint the gateway delegates to.
    pub downstream_url: String,

    /// Reject malformed request bodies and undecodable weather service
    /// answers instead of continuing with empty values.
    pub strict_decoding: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            downstream_url: "http://service_b:4444/".to_string(),
            strict_decoding: false,
        }
    }
}

/// Trace export configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Export spans to a collector. Spans are still created when disabled.
    pub enabled: bool,

    /// Overrides the per-service resource name.
    pub service_name: Option<String>,

    /// Exporter protocol: "otlp_grpc" or "otlp_http".
    pub exporter: String,

    /// Collector endpoint.
    pub endpoint: String,

    /// Sampling strategy: "always_on", "always_off", "parentbased_always_on",
    /// "parentbased_ratio".
    pub sampler: String,

    /// Ratio for "parentbased_ratio".
    pub sampler_ratio: f64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            service_name: None,
            exporter: "otlp_grpc".to_string(),
            endpoint: "http://otel-collector:4317".to_string(),
            sampler: "always_on".to_string(),
            sampler_ratio: 1.0,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format: "pretty" or "json".
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Graceful shutdown configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// Upper bound for draining connections and flushing spans.
    pub grace_period_secs: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            grace_period_secs: 10,
        }
    }
}
