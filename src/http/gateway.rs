//! Gateway handler: `POST /cep`.
//!
//! ```text
//! body → decode → validate → geocode (own lookup) → weather service → merge
//!                     │             │                      │
//!                    422           404                    404
//! ```

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use opentelemetry::{trace::SpanKind, Context};

use crate::http::downstream::DownstreamClient;
use crate::http::request::{request_id, validate_cep, CepRequest};
use crate::http::response::{ApiError, WeatherReport};
use crate::lookup::GeocodeClient;
use crate::observability::{metrics, SpanScope, Telemetry};

/// Application state injected into the gateway handler.
#[derive(Clone)]
pub struct GatewayState {
    pub geocoder: GeocodeClient,
    pub downstream: DownstreamClient,
    pub telemetry: Arc<Telemetry>,
    pub strict_decoding: bool,
}

pub async fn cep_handler(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let span = state
        .telemetry
        .start_span("resolve zipcode", SpanKind::Server, &Context::new());

    let response = match report(&state, &span, &headers, &body).await {
        Ok(report) => Json(report).into_response(),
        Err(err) => {
            span.record_error(err.to_string());
            err.into_response()
        }
    };

    metrics::record_request("gateway", response.status().as_u16());
    response
}

async fn report(
    state: &GatewayState,
    span: &SpanScope,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<WeatherReport, ApiError> {
    let trace_id = span.trace_id();
    let request = CepRequest::decode(body, state.strict_decoding)?;
    let cep = validate_cep(&request.cep).inspect_err(|_| {
        tracing::debug!(trace_id = %trace_id, cep = %request.cep, "Invalid zipcode");
    })?;
    span.set_attribute("cep", cep);

    let city = state.geocoder.city_by_cep(cep).await.map_err(|e| {
        tracing::warn!(trace_id = %trace_id, cep = %cep, error = %e, "Zipcode lookup failed");
        ApiError::from(e)
    })?;
    span.set_attribute("city", city.as_str());

    let call = state
        .telemetry
        .start_span("call weather service", SpanKind::Client, span.context());
    let temperatures = state
        .downstream
        .temperatures(cep, call.context(), request_id(headers))
        .await
        .map_err(|e| {
            tracing::warn!(trace_id = %trace_id, cep = %cep, error = %e, "Weather service call failed");
            call.record_error(e.to_string());
            e
        })?;

    tracing::debug!(trace_id = %trace_id, cep = %cep, city = %city, "Zipcode resolved");
    Ok(WeatherReport { city, temperatures })
}
