//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!     → telemetry.rs (spans, trace context in/out via propagation.rs)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape, optional)
//!     → OTLP collector (gateway and weather spans joined into one trace)
//! ```

pub mod logging;
pub mod metrics;
pub mod propagation;
pub mod telemetry;

pub use telemetry::{SpanScope, Telemetry, TelemetryError};
