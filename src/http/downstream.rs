//! Gateway → weather service call.
//!
//! # Responsibilities
//! - Build `GET {downstream_url}?cep=...`
//! - Inject the caller's trace context and forward the request ID
//! - Decode the temperature fields of the answer
//!
//! # Design Decisions
//! - One attempt, no deadline beyond the transport's
//! - Lenient mode keeps the historical behavior: whatever the status, an
//!   undecodable body reads as zero temperatures

use std::sync::Arc;

use axum::http::{HeaderMap, HeaderValue};
use opentelemetry::Context;
use url::Url;

use crate::http::request::X_REQUEST_ID;
use crate::http::response::ApiError;
use crate::observability::Telemetry;
use crate::temperature::Temperatures;

/// Client for the weather service.
#[derive(Clone)]
pub struct DownstreamClient {
    http: reqwest::Client,
    url: Url,
    telemetry: Arc<Telemetry>,
    strict: bool,
}

impl DownstreamClient {
    pub fn new(
        http: reqwest::Client,
        url: &str,
        telemetry: Arc<Telemetry>,
        strict: bool,
    ) -> Result<Self, url::ParseError> {
        Ok(Self {
            http,
            url: Url::parse(url)?,
            telemetry,
            strict,
        })
    }

    /// Ask the weather service for the temperatures at `cep`.
    ///
    /// `cx` is the span the call runs under; it becomes the parent of the
    /// weather service's spans.
    pub async fn temperatures(
        &self,
        cep: &str,
        cx: &Context,
        request_id: Option<&HeaderValue>,
    ) -> Result<Temperatures, ApiError> {
        let mut headers = HeaderMap::new();
        self.telemetry.inject(cx, &mut headers);
        if let Some(id) = request_id {
            headers.insert(X_REQUEST_ID, id.clone());
        }

        let response = self
            .http
            .get(self.url.clone())
            .query(&[("cep", cep)])
            .headers(headers)
            .send()
            .await
            .map_err(|e| ApiError::NotFound(e.to_string()))?;

        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) if self.strict => return Err(ApiError::NotFound(e.to_string())),
            Err(e) => {
                tracing::debug!(error = %e, "Failed to read weather service body");
                Default::default()
            }
        };

        if self.strict && !status.is_success() {
            let message = String::from_utf8_lossy(&body).trim().to_string();
            return Err(ApiError::NotFound(message));
        }

        match serde_json::from_slice::<Temperatures>(&body) {
            Ok(temperatures) => Ok(temperatures),
            Err(e) if self.strict => Err(ApiError::NotFound(format!(
                "invalid weather service response: {}",
                e
            ))),
            Err(e) => {
                tracing::debug!(
                    status = %status,
                    error = %e,
                    "Undecodable weather service response, reporting zero temperatures"
                );
                Ok(Temperatures::default())
            }
        }
    }
}
