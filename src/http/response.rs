//! Response bodies and error-to-status mapping.
//!
//! # Responsibilities
//! - Define the JSON payloads both services return
//! - Map pipeline failures to HTTP status codes
//!
//! # Design Decisions
//! - Error bodies are the plain message (`text/plain; charset=utf-8`)
//! - Every provider failure maps to 404; transport and "no match" are not
//!   distinguished for the client

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::lookup::LookupError;
use crate::temperature::Temperatures;

/// Final gateway payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub city: String,
    #[serde(flatten)]
    pub temperatures: Temperatures,
}

/// Client-visible failure of a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Postal code is not exactly 8 characters.
    #[error("invalid zipcode")]
    InvalidZipcode,

    /// Gateway body is not valid JSON (strict decoding only).
    #[error("invalid request body")]
    InvalidBody,

    /// A lookup or the delegated call failed.
    #[error("{0}")]
    NotFound(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidZipcode => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidBody => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        ApiError::NotFound(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::Resource;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::InvalidZipcode.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ApiError::InvalidBody.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(LookupError::NotFound(Resource::Zipcode)),
            ApiError::NotFound("can not find zipcode".into())
        );
    }

    #[tokio::test]
    async fn test_error_body_is_plain_message() {
        let response = ApiError::InvalidZipcode.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            response.headers()["content-type"],
            "text/plain; charset=utf-8"
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"invalid zipcode");
    }

    #[test]
    fn test_report_field_order() {
        let report = WeatherReport {
            city: "São Paulo".into(),
            temperatures: Temperatures::from_celsius(25.0),
        };
        assert_eq!(
            serde_json::to_string(&report).unwrap(),
            r#"{"city":"São Paulo","temp_C":25.0,"temp_F":77.0,"temp_K":298.0}"#
        );
    }
}
