//! External lookup clients.
//!
//! # Data Flow
//! ```text
//! cep  → geocode.rs → GET {geocode_url}/ws/{cep}/json/          → city
//! city → weather.rs → GET {weather_url}/v1/current.json?key&q   → temp °C
//! ```
//!
//! # Design Decisions
//! - Exactly one attempt per call; no retries, no client-side deadline
//! - Every failure folds into `LookupError`, whose message is shown to clients
//! - Clients are cheap to clone (shared `reqwest::Client` pool)

pub mod error;
pub mod geocode;
pub mod weather;

pub use error::{LookupError, LookupResult, Resource};
pub use geocode::GeocodeClient;
pub use weather::WeatherClient;

use std::time::Instant;

use url::Url;

use crate::observability::metrics;

/// Append path segments to a provider base URL.
///
/// Segments are percent-encoded, so a postal code can never escape its slot.
/// A trailing empty segment yields a trailing slash.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Record duration and outcome of one lookup.
pub(crate) fn observe<T>(resource: Resource, started: Instant, result: &LookupResult<T>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    };
    metrics::record_lookup(resource.provider(), outcome, started);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_appends_segments() {
        let base = Url::parse("http://viacep.com.br").unwrap();
        let url = endpoint(&base, &["ws", "01001000", "json", ""]);
        assert_eq!(url.as_str(), "http://viacep.com.br/ws/01001000/json/");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let base = Url::parse("http://127.0.0.1:9000/mock/").unwrap();
        let url = endpoint(&base, &["v1", "current.json"]);
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/mock/v1/current.json");
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let base = Url::parse("http://viacep.com.br").unwrap();
        let url = endpoint(&base, &["ws", "01/01 00", "json", ""]);
        assert_eq!(url.as_str(), "http://viacep.com.br/ws/01%2F01%2000/json/");
    }
}
