//! Shared utilities for integration tests: mock providers and service launchers.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::{header, HeaderMap, StatusCode},
    routing::get,
    Router,
};
use cep_weather::config::{ServiceConfig, ServiceKind};
use cep_weather::{HttpServer, Shutdown, Telemetry};
use opentelemetry_sdk::trace::{InMemorySpanExporter, SdkTracerProvider};
use tokio::net::TcpListener;

/// A mock HTTP provider and the number of requests it served.
pub struct MockProvider {
    pub addr: SocketAddr,
    hits: Arc<AtomicU32>,
}

impl MockProvider {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn hits(&self) -> u32 {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Serve a router on an ephemeral local port.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

fn json_reply(status: u16, body: String) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    (
        StatusCode::from_u16(status).unwrap(),
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
}

/// Start a programmable postal code provider (`/ws/{cep}/json/`).
pub async fn start_geocode_provider<F>(f: F) -> MockProvider
where
    F: Fn(&str) -> (u16, String) + Send + Sync + 'static,
{
    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();
    let f = Arc::new(f);

    let router = Router::new().route(
        "/ws/{cep}/json/",
        get(move |Path(cep): Path<String>| {
            let counter = counter.clone();
            let f = f.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                let (status, body) = f(&cep);
                json_reply(status, body)
            }
        }),
    );

    MockProvider {
        addr: serve(router).await,
        hits,
    }
}

/// Start a programmable weather provider (`/v1/current.json?key&q`).
///
/// The closure receives the city and the API key.
pub async fn start_weather_provider<F>(f: F) -> MockProvider
where
    F: Fn(&str, &str) -> (u16, String) + Send + Sync + 'static,
{
    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();
    let f = Arc::new(f);

    let router = Router::new().route(
        "/v1/current.json",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let counter = counter.clone();
            let f = f.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                let city = params.get("q").map(String::as_str).unwrap_or_default();
                let key = params.get("key").map(String::as_str).unwrap_or_default();
                let (status, body) = f(city, key);
                json_reply(status, body)
            }
        }),
    );

    MockProvider {
        addr: serve(router).await,
        hits,
    }
}

/// Headers seen by a recording downstream, one entry per request.
pub type SeenHeaders = Arc<std::sync::Mutex<Vec<HeaderMap>>>;

/// Start a stand-in weather service that records request headers and answers
/// with a fixed status and body.
pub async fn start_recording_downstream(status: u16, body: &'static str) -> (SocketAddr, SeenHeaders) {
    let seen: SeenHeaders = Arc::new(std::sync::Mutex::new(Vec::new()));
    let store = seen.clone();

    let router = Router::new().route(
        "/",
        get(move |headers: HeaderMap| {
            let store = store.clone();
            async move {
                store.lock().unwrap().push(headers);
                (StatusCode::from_u16(status).unwrap(), body)
            }
        }),
    );

    (serve(router).await, seen)
}

/// Provider body for a resolved postal code.
pub fn address(city: &str) -> String {
    serde_json::json!({ "cep": "01001-000", "localidade": city, "uf": "SP" }).to_string()
}

/// Provider body for a current temperature.
pub fn current(temp_c: f64) -> String {
    serde_json::json!({ "location": { "name": "x" }, "current": { "temp_c": temp_c } }).to_string()
}

/// Telemetry whose finished spans can be inspected.
pub fn recording_telemetry() -> (Arc<Telemetry>, InMemorySpanExporter) {
    let exporter = InMemorySpanExporter::default();
    let provider = SdkTracerProvider::builder()
        .with_simple_exporter(exporter.clone())
        .build();
    (Arc::new(Telemetry::with_provider(provider)), exporter)
}

/// Config pointing at the given providers.
pub fn config(geocode: &MockProvider, weather_url: &str, downstream_url: &str) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.providers.geocode_url = geocode.url();
    config.providers.weather_url = weather_url.to_string();
    config.providers.weather_api_key = "test-key".to_string();
    config.gateway.downstream_url = downstream_url.to_string();
    config.telemetry.enabled = false;
    config
}

/// A running service; shuts down when dropped.
pub struct RunningService {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl RunningService {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for RunningService {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a gateway or weather service on an ephemeral port.
pub async fn start_service(
    kind: ServiceKind,
    config: &ServiceConfig,
    telemetry: Arc<Telemetry>,
) -> RunningService {
    let server = HttpServer::new(kind, config, telemetry).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    RunningService { addr, shutdown }
}

/// Start a weather service and a gateway delegating to it.
pub async fn start_pipeline(
    geocode: &MockProvider,
    weather: &MockProvider,
    strict: bool,
) -> (RunningService, RunningService) {
    let (telemetry, _) = recording_telemetry();

    let weather_config = config(geocode, &weather.url(), "http://127.0.0.1:1/");
    let weather_service = start_service(ServiceKind::Weather, &weather_config, telemetry.clone()).await;

    let mut gateway_config = config(geocode, &weather.url(), &format!("{}/", weather_service.url()));
    gateway_config.gateway.strict_decoding = strict;
    let gateway = start_service(ServiceKind::Gateway, &gateway_config, telemetry).await;

    (gateway, weather_service)
}

/// Client that never pools or proxies.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
