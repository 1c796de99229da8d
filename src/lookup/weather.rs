//! City → current temperature lookup.

use std::time::Instant;

use serde::Deserialize;
use url::Url;

use crate::lookup::{endpoint, observe, LookupError, LookupResult, Resource};

#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    current: Option<CurrentConditions>,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    temp_c: Option<f64>,
}

impl CurrentWeatherResponse {
    fn celsius(&self) -> Option<f64> {
        self.current.as_ref().and_then(|c| c.temp_c)
    }
}

/// Client for the weather provider.
#[derive(Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl std::fmt::Debug for WeatherClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl WeatherClient {
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        api_key: impl Into<String>,
    ) -> Result<Self, url::ParseError> {
        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
            api_key: api_key.into(),
        })
    }

    /// Fetch the current temperature in Celsius for a city.
    ///
    /// A reading of exactly 0 is returned as-is; only a missing field counts
    /// as not found.
    pub async fn celsius_by_city(&self, city: &str) -> LookupResult<f64> {
        let started = Instant::now();
        let result = self.fetch(city).await;
        observe(Resource::WeatherData, started, &result);
        result
    }

    async fn fetch(&self, city: &str) -> LookupResult<f64> {
        let url = endpoint(&self.base_url, &["v1", "current.json"]);
        let response = self
            .http
            .get(url)
            .query(&[("key", self.api_key.as_str()), ("q", city)])
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.without_url()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            tracing::debug!(city = %city, status = %status, "Weather provider rejected lookup");
            return Err(LookupError::UpstreamStatus {
                resource: Resource::WeatherData,
                status,
            });
        }

        let weather: CurrentWeatherResponse = response
            .json()
            .await
            .map_err(|e| LookupError::Decode(e.without_url()))?;

        weather
            .celsius()
            .ok_or(LookupError::NotFound(Resource::WeatherData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_nested_temperature() {
        let body = r#"{"location": {"name": "Sao Paulo"}, "current": {"temp_c": 25.0, "temp_f": 77.0}}"#;
        let weather: CurrentWeatherResponse = serde_json::from_str(body).unwrap();
        assert_eq!(weather.celsius(), Some(25.0));
    }

    #[test]
    fn test_zero_reading_is_kept() {
        let weather: CurrentWeatherResponse =
            serde_json::from_str(r#"{"current": {"temp_c": 0}}"#).unwrap();
        assert_eq!(weather.celsius(), Some(0.0));
    }

    #[test]
    fn test_missing_field_is_none() {
        let weather: CurrentWeatherResponse =
            serde_json::from_str(r#"{"error": {"code": 1006}}"#).unwrap();
        assert_eq!(weather.celsius(), None);
    }

    #[test]
    fn test_debug_hides_api_key() {
        let client =
            WeatherClient::new(reqwest::Client::new(), "http://api.weatherapi.com", "s3cret")
                .unwrap();
        assert!(!format!("{:?}", client).contains("s3cret"));
    }
}
