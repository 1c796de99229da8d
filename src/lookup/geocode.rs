//! Postal code → city lookup.

use std::time::Instant;

use serde::Deserialize;
use url::Url;

use crate::lookup::{endpoint, observe, LookupError, LookupResult, Resource};

/// Subset of the provider's answer the services care about.
///
/// Unknown codes come back as `{"erro": true}` with status 200, which
/// decodes to no locality. An explicit `null` does too.
#[derive(Debug, Deserialize)]
struct AddressResponse {
    #[serde(default)]
    localidade: Option<String>,
}

impl AddressResponse {
    fn city(self) -> Option<String> {
        self.localidade.filter(|city| !city.is_empty())
    }
}

/// Client for the postal code provider.
#[derive(Debug, Clone)]
pub struct GeocodeClient {
    http: reqwest::Client,
    base_url: Url,
}

impl GeocodeClient {
    pub fn new(http: reqwest::Client, base_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
        })
    }

    /// Provider URL for a postal code.
    pub fn lookup_url(&self, cep: &str) -> Url {
        endpoint(&self.base_url, &["ws", cep, "json", ""])
    }

    /// Resolve a postal code to its city name.
    ///
    /// The returned city is never empty.
    pub async fn city_by_cep(&self, cep: &str) -> LookupResult<String> {
        let started = Instant::now();
        let result = self.fetch(cep).await;
        observe(Resource::Zipcode, started, &result);
        result
    }

    async fn fetch(&self, cep: &str) -> LookupResult<String> {
        let response = self
            .http
            .get(self.lookup_url(cep))
            .send()
            .await
            .map_err(LookupError::Transport)?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            tracing::debug!(cep = %cep, status = %status, "Geocode provider rejected lookup");
            return Err(LookupError::UpstreamStatus {
                resource: Resource::Zipcode,
                status,
            });
        }

        let address: AddressResponse = response.json().await.map_err(LookupError::Decode)?;
        address
            .city()
            .ok_or(LookupError::NotFound(Resource::Zipcode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_url() {
        let client = GeocodeClient::new(reqwest::Client::new(), "http://viacep.com.br").unwrap();
        assert_eq!(
            client.lookup_url("01001000").as_str(),
            "http://viacep.com.br/ws/01001000/json/"
        );
    }

    #[test]
    fn test_unknown_code_decodes_to_empty_city() {
        let address: AddressResponse = serde_json::from_str(r#"{"erro": true}"#).unwrap();
        assert_eq!(address.city(), None);
    }

    #[test]
    fn test_null_or_blank_locality_has_no_city() {
        for body in [r#"{"localidade": null}"#, r#"{"localidade": ""}"#] {
            let address: AddressResponse = serde_json::from_str(body).unwrap();
            assert_eq!(address.city(), None, "{body}");
        }
        let address: AddressResponse =
            serde_json::from_str(r#"{"localidade": "Campinas", "uf": "SP"}"#).unwrap();
        assert_eq!(address.city().as_deref(), Some("Campinas"));
    }

    #[test]
    fn test_rejects_relative_base() {
        assert!(GeocodeClient::new(reqwest::Client::new(), "viacep.com.br").is_err());
    }
}
