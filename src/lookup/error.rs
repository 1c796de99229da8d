//! Lookup error definitions.

use std::fmt;

use thiserror::Error;

/// What a provider was asked to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// Postal code → city.
    Zipcode,
    /// City → current temperature.
    WeatherData,
}

impl Resource {
    /// Provider label for logs and metrics.
    pub fn provider(self) -> &'static str {
        match self {
            Resource::Zipcode => "geocode",
            Resource::WeatherData => "weather",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Zipcode => f.write_str("zipcode"),
            Resource::WeatherData => f.write_str("weather data"),
        }
    }
}

/// Errors that can occur during a single provider lookup.
///
/// Handlers surface the `Display` text to the client, so the messages are
/// part of the HTTP contract.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The outbound call could not be completed.
    #[error(transparent)]
    Transport(reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("can not find {resource}")]
    UpstreamStatus {
        resource: Resource,
        status: reqwest::StatusCode,
    },

    /// The provider answered but the body was not the expected JSON.
    #[error(transparent)]
    Decode(reqwest::Error),

    /// The provider answered successfully without data for the key.
    #[error("can not find {0}")]
    NotFound(Resource),
}

impl LookupError {
    /// Stable outcome label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            LookupError::Transport(_) => "transport",
            LookupError::UpstreamStatus { .. } => "upstream_status",
            LookupError::Decode(_) => "decode",
            LookupError::NotFound(_) => "not_found",
        }
    }
}

/// Result type for provider lookups.
pub type LookupResult<T> = Result<T, LookupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LookupError::NotFound(Resource::Zipcode);
        assert_eq!(err.to_string(), "can not find zipcode");

        let err = LookupError::UpstreamStatus {
            resource: Resource::WeatherData,
            status: reqwest::StatusCode::BAD_REQUEST,
        };
        assert_eq!(err.to_string(), "can not find weather data");
        assert_eq!(err.kind(), "upstream_status");
    }

    #[test]
    fn test_provider_labels() {
        assert_eq!(Resource::Zipcode.provider(), "geocode");
        assert_eq!(Resource::WeatherData.provider(), "weather");
    }
}
