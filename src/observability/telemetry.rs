//! Distributed tracing support.
//!
//! # Responsibilities
//! - Own the tracer provider for the lifetime of the process
//! - Extract trace context from incoming requests
//! - Propagate trace context to outbound requests
//! - Create spans for pipeline stages
//!
//! # Design Decisions
//! - No process-global provider or propagator: handlers receive a
//!   `Telemetry` handle and pass `Context` values explicitly
//! - Supports W3C Trace Context headers
//! - OTLP export (gRPC or HTTP) through a batch processor; when export is
//!   disabled spans are still created so propagation keeps working

use axum::http::HeaderMap;
use opentelemetry::{
    propagation::TextMapPropagator,
    trace::{SpanKind, Status, TraceContextExt, Tracer as _, TracerProvider as _},
    Context, KeyValue,
};
use opentelemetry_otlp::{Protocol, WithExportConfig};
use opentelemetry_sdk::{
    propagation::TraceContextPropagator,
    trace::{Sampler, SdkTracer, SdkTracerProvider},
    Resource,
};
use thiserror::Error;

use crate::config::TelemetryConfig;
use crate::observability::propagation::{HeaderExtractor, HeaderInjector};

/// Errors raised while setting up or tearing down tracing.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to build span exporter: {0}")]
    Exporter(String),

    #[error("failed to shut down tracer provider: {0}")]
    Shutdown(String),
}

/// Tracing handle shared by a service's handlers.
pub struct Telemetry {
    provider: SdkTracerProvider,
    tracer: SdkTracer,
    propagator: TraceContextPropagator,
}

impl Telemetry {
    /// Build the tracer provider described by `config`.
    ///
    /// The gRPC exporter must be built inside a Tokio runtime.
    pub fn init(config: &TelemetryConfig, service_name: &str) -> Result<Self, TelemetryError> {
        let mut builder = SdkTracerProvider::builder()
            .with_sampler(build_sampler(config))
            .with_resource(build_resource(service_name));

        if config.enabled {
            builder = builder.with_batch_exporter(build_exporter(config)?);
            tracing::info!(
                exporter = %config.exporter,
                endpoint = %config.endpoint,
                service = %service_name,
                "Span export enabled"
            );
        } else {
            tracing::info!(service = %service_name, "Span export disabled");
        }

        Ok(Self::with_provider(builder.build()))
    }

    /// Wrap an already configured provider.
    pub fn with_provider(provider: SdkTracerProvider) -> Self {
        let tracer = provider.tracer(env!("CARGO_PKG_NAME"));
        Self {
            provider,
            tracer,
            propagator: TraceContextPropagator::new(),
        }
    }

    /// Read the caller's trace context from inbound headers.
    ///
    /// Missing or malformed headers yield an empty context, so the next span
    /// starts a new trace.
    pub fn extract(&self, headers: &HeaderMap) -> Context {
        self.propagator
            .extract_with_context(&Context::new(), &HeaderExtractor(headers))
    }

    /// Write `cx` onto outbound headers.
    pub fn inject(&self, cx: &Context, headers: &mut HeaderMap) {
        self.propagator
            .inject_context(cx, &mut HeaderInjector(headers));
    }

    /// Start a span as a child of `parent`.
    pub fn start_span(&self, name: &'static str, kind: SpanKind, parent: &Context) -> SpanScope {
        let span = self
            .tracer
            .span_builder(name)
            .with_kind(kind)
            .start_with_context(&self.tracer, parent);
        SpanScope {
            cx: parent.with_span(span),
        }
    }

    /// Flush pending spans and stop the provider. Blocks the calling thread.
    pub fn shutdown(&self) -> Result<(), TelemetryError> {
        self.provider
            .shutdown()
            .map_err(|e| TelemetryError::Shutdown(e.to_string()))
    }
}

/// A started span; ends when dropped.
pub struct SpanScope {
    cx: Context,
}

impl SpanScope {
    /// Context carrying this span, for children and propagation.
    pub fn context(&self) -> &Context {
        &self.cx
    }

    /// Hex trace id, for log correlation.
    pub fn trace_id(&self) -> String {
        self.cx.span().span_context().trace_id().to_string()
    }

    pub fn set_attribute(&self, key: &'static str, value: impl Into<String>) {
        self.cx.span().set_attribute(KeyValue::new(key, value.into()));
    }

    /// Mark the span failed.
    pub fn record_error(&self, message: impl Into<String>) {
        self.cx.span().set_status(Status::error(message.into()));
    }
}

impl Drop for SpanScope {
    fn drop(&mut self) {
        self.cx.span().end();
    }
}

fn build_resource(service_name: &str) -> Resource {
    Resource::builder_empty()
        .with_attributes([KeyValue::new("service.name", service_name.to_string())])
        .build()
}

fn build_sampler(config: &TelemetryConfig) -> Sampler {
    match config.sampler.as_str() {
        "always_off" => Sampler::AlwaysOff,
        "parentbased_always_on" => Sampler::ParentBased(Box::new(Sampler::AlwaysOn)),
        "parentbased_ratio" => Sampler::ParentBased(Box::new(Sampler::TraceIdRatioBased(
            config.sampler_ratio,
        ))),
        _ => Sampler::AlwaysOn,
    }
}

/// For `otlp_http` the endpoint is the full traces URL (`.../v1/traces`).
fn build_exporter(
    config: &TelemetryConfig,
) -> Result<opentelemetry_otlp::SpanExporter, TelemetryError> {
    let exporter = if config.exporter == "otlp_http" {
        opentelemetry_otlp::SpanExporter::builder()
            .with_http()
            .with_protocol(Protocol::HttpBinary)
            .with_endpoint(config.endpoint.clone())
            .build()
    } else {
        opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(config.endpoint.clone())
            .build()
    };
    exporter.map_err(|e| TelemetryError::Exporter(e.to_string()))
}
