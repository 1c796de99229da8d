//! Request parsing and validation.
//!
//! # Responsibilities
//! - Decode the postal code from a JSON body (gateway) or query string (weather)
//! - Enforce the 8-character length rule before any outbound call
//! - Expose the request ID header the server layers maintain
//!
//! # Design Decisions
//! - Length is counted in bytes; no charset check
//! - Query values are percent-decoded to raw bytes, so invalid UTF-8 escapes
//!   count one byte each
//! - Lenient decoding yields an empty postal code, which then fails validation

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};

use crate::http::response::ApiError;

/// Required postal code length.
pub const CEP_LEN: usize = 8;

/// Request ID header, set on every request by the server layers.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Gateway request body.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CepRequest {
    #[serde(default)]
    pub cep: String,
}

impl CepRequest {
    pub fn new(cep: impl Into<String>) -> Self {
        Self { cep: cep.into() }
    }

    /// Decode a gateway body.
    ///
    /// In lenient mode a malformed body becomes an empty request; in strict
    /// mode it is rejected with 400.
    pub fn decode(body: &[u8], strict: bool) -> Result<Self, ApiError> {
        match serde_json::from_slice(body) {
            Ok(request) => Ok(request),
            Err(e) if strict => {
                tracing::debug!(error = %e, "Rejecting malformed request body");
                Err(ApiError::InvalidBody)
            }
            Err(e) => {
                tracing::debug!(error = %e, "Malformed request body, continuing with empty cep");
                Ok(Self::default())
            }
        }
    }
}

/// First `cep` value of a query string as raw bytes, or empty.
pub fn cep_from_query(query: Option<&str>) -> Vec<u8> {
    query
        .and_then(|q| {
            q.split('&').find_map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(key) == b"cep").then(|| decode_component(value))
            })
        })
        .unwrap_or_default()
}

fn decode_component(component: &str) -> Vec<u8> {
    let component = component.replace('+', " ");
    percent_decode_str(&component).collect()
}

/// Check the postal code length.
pub fn validate_cep(cep: &str) -> Result<&str, ApiError> {
    if cep.len() == CEP_LEN {
        Ok(cep)
    } else {
        Err(ApiError::InvalidZipcode)
    }
}

/// Check the length of a query-string postal code and turn it into text.
///
/// Invalid UTF-8 is replaced only after the length check.
pub fn validate_query_cep(raw: &[u8]) -> Result<String, ApiError> {
    if raw.len() == CEP_LEN {
        Ok(String::from_utf8_lossy(raw).into_owned())
    } else {
        Err(ApiError::InvalidZipcode)
    }
}

/// Request ID of an inbound request, if any.
pub fn request_id(headers: &HeaderMap) -> Option<&HeaderValue> {
    headers.get(X_REQUEST_ID)
}
