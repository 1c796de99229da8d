//! Postal code → weather pipeline: a public gateway and an internal weather
//! service joined into one distributed trace.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod lookup;
pub mod observability;
pub mod temperature;

pub use config::{ServiceConfig, ServiceKind};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use observability::Telemetry;
pub use temperature::Temperatures;
