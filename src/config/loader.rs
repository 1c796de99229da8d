//! Configuration loading from disk and environment.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[source] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load `.env` from the working directory into the process environment.
///
/// Returns the path that was loaded, if any. A missing file is not an error.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Load configuration from an optional TOML file, apply environment
/// overrides, and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => ServiceConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment variables on top of file settings.
///
/// Empty values are ignored so an exported-but-blank variable does not wipe
/// a configured value.
pub fn apply_env_overrides<F>(config: &mut ServiceConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

    if let Some(key) = var("WEATHER_API_KEY") {
        config.providers.weather_api_key = key;
    }
    if let Some(url) = var("GEOCODE_URL") {
        config.providers.geocode_url = url;
    }
    if let Some(url) = var("WEATHER_URL") {
        config.providers.weather_url = url;
    }
    if let Some(url) = var("DOWNSTREAM_URL") {
        config.gateway.downstream_url = url;
    }
    if let Some(endpoint) = var("OTEL_EXPORTER_OTLP_ENDPOINT") {
        config.telemetry.endpoint = endpoint;
    }
    if let Some(name) = var("OTEL_SERVICE_NAME") {
        config.telemetry.service_name = Some(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = ServiceConfig::default();
        let vars = env(&[
            ("WEATHER_API_KEY", "secret"),
            ("DOWNSTREAM_URL", "http://127.0.0.1:4444/"),
            ("OTEL_SERVICE_NAME", "edge"),
        ]);

        apply_env_overrides(&mut config, |k| vars.get(k).cloned());

        assert_eq!(config.providers.weather_api_key, "secret");
        assert_eq!(config.gateway.downstream_url, "http://127.0.0.1:4444/");
        assert_eq!(config.telemetry.service_name.as_deref(), Some("edge"));
        assert_eq!(config.providers.geocode_url, "http://viacep.com.br");
    }

    #[test]
    fn test_blank_env_values_are_ignored() {
        let mut config = ServiceConfig::default();
        config.providers.weather_api_key = "from-file".into();
        let vars = env(&[("WEATHER_API_KEY", "")]);

        apply_env_overrides(&mut config, |k| vars.get(k).cloned());

        assert_eq!(config.providers.weather_api_key, "from-file");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Some(Path::new("/nonexistent/cep-weather.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
        assert!(err.to_string().starts_with("IO error: "));
    }

    #[test]
    fn test_parse_error_keeps_source() {
        let path = std::env::temp_dir().join(format!("cep-weather-bad-{}.toml", std::process::id()));
        fs::write(&path, "listener = [").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        let _ = fs::remove_file(&path);

        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("Parse error: "));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_validation_errors_are_joined() {
        let err = ConfigError::Validation(vec![
            ValidationError {
                field: "telemetry.exporter",
                message: "bad".into(),
            },
            ValidationError {
                field: "telemetry.sampler",
                message: "worse".into(),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: telemetry.exporter: bad, telemetry.sampler: worse"
        );
    }
}
