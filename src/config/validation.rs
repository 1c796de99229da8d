//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check provider and downstream URLs are absolute http(s) URLs
//! - Validate enumerated settings and value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - A missing weather API key is not an error; the provider rejects the call

use std::fmt;
use std::net::SocketAddr;

use url::Url;

use crate::config::schema::ServiceConfig;

const EXPORTERS: &[&str] = &["otlp_grpc", "otlp_http"];
const SAMPLERS: &[&str] = &[
    "always_on",
    "always_off",
    "parentbased_always_on",
    "parentbased_ratio",
];
const LOG_FORMATS: &[&str] = &["pretty", "json"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validate a loaded configuration.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(addr) = &config.listener.bind_address {
        if addr.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::new(
                "listener.bind_address",
                format!("'{}' is not a socket address", addr),
            ));
        }
    }

    check_http_url(&mut errors, "providers.geocode_url", &config.providers.geocode_url);
    check_http_url(&mut errors, "providers.weather_url", &config.providers.weather_url);
    check_http_url(&mut errors, "gateway.downstream_url", &config.gateway.downstream_url);

    check_one_of(&mut errors, "telemetry.exporter", &config.telemetry.exporter, EXPORTERS);
    check_one_of(&mut errors, "telemetry.sampler", &config.telemetry.sampler, SAMPLERS);
    if config.telemetry.enabled {
        check_http_url(&mut errors, "telemetry.endpoint", &config.telemetry.endpoint);
    }
    if !(0.0..=1.0).contains(&config.telemetry.sampler_ratio) {
        errors.push(ValidationError::new(
            "telemetry.sampler_ratio",
            "must be between 0 and 1",
        ));
    }

    check_one_of(
        &mut errors,
        "observability.log_format",
        &config.observability.log_format,
        LOG_FORMATS,
    );
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "'{}' is not a socket address",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_http_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {}
        Ok(url) => errors.push(ValidationError::new(
            field,
            format!("unsupported URL '{}' (scheme {})", value, url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(field, format!("'{}': {}", value, e))),
    }
}

fn check_one_of(
    errors: &mut Vec<ValidationError>,
    field: &'static str,
    value: &str,
    allowed: &[&str],
) {
    if !allowed.contains(&value) {
        errors.push(ValidationError::new(
            field,
            format!("'{}' is not one of {}", value, allowed.join(", ")),
        ));
    }
}
