//! Weather service handler: `GET /?cep=`.
//!
//! ```text
//! traceparent → extract → validate → geocode → weather provider → convert
//!                             │          │             │
//!                            422        404           404
//! ```

use std::sync::Arc;

use axum::{
    extract::{RawQuery, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use opentelemetry::trace::SpanKind;

use crate::http::request::{cep_from_query, validate_query_cep};
use crate::http::response::ApiError;
use crate::lookup::{GeocodeClient, WeatherClient};
use crate::observability::{metrics, SpanScope, Telemetry};
use crate::temperature::Temperatures;

/// Application state injected into the weather handler.
#[derive(Clone)]
pub struct WeatherState {
    pub geocoder: GeocodeClient,
    pub weather: WeatherClient,
    pub telemetry: Arc<Telemetry>,
}

pub async fn weather_handler(
    State(state): State<WeatherState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    let parent = state.telemetry.extract(&headers);
    let span = state
        .telemetry
        .start_span("resolve zipcode", SpanKind::Server, &parent);

    let cep = cep_from_query(query.as_deref());
    let response = match temperatures(&state, &span, &cep).await {
        Ok(temperatures) => Json(temperatures).into_response(),
        Err(err) => {
            span.record_error(err.to_string());
            err.into_response()
        }
    };

    metrics::record_request("weather", response.status().as_u16());
    response
}

async fn temperatures(
    state: &WeatherState,
    span: &SpanScope,
    raw_cep: &[u8],
) -> Result<Temperatures, ApiError> {
    let trace_id = span.trace_id();
    let cep = validate_query_cep(raw_cep).inspect_err(|_| {
        let cep = String::from_utf8_lossy(raw_cep);
        tracing::debug!(trace_id = %trace_id, cep = %cep, "Invalid zipcode");
    })?;
    span.set_attribute("cep", cep.as_str());

    let city = state.geocoder.city_by_cep(&cep).await.map_err(|e| {
        tracing::warn!(trace_id = %trace_id, cep = %cep, error = %e, "Zipcode lookup failed");
        ApiError::from(e)
    })?;

    let fetch = state
        .telemetry
        .start_span("fetch temperature", SpanKind::Internal, span.context());
    fetch.set_attribute("city", city.as_str());

    let celsius = state.weather.celsius_by_city(&city).await.map_err(|e| {
        tracing::warn!(trace_id = %trace_id, city = %city, error = %e, "Weather lookup failed");
        fetch.record_error(e.to_string());
        ApiError::from(e)
    })?;

    tracing::debug!(trace_id = %trace_id, city = %city, celsius, "Temperature resolved");
    Ok(Temperatures::from_celsius(celsius))
}
