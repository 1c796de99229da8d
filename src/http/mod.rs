//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! client
//!   → gateway (POST /cep)            gateway.rs
//!       → geocode provider           lookup::geocode
//!       → weather service (GET /?cep=, traceparent injected)   downstream.rs
//!           → weather.rs (extract traceparent)
//!               → geocode provider   lookup::geocode
//!               → weather provider   lookup::weather
//!               → temperature conversion
//!       ← {temp_C, temp_F, temp_K}
//!   ← {city, temp_C, temp_F, temp_K}
//! ```

pub mod downstream;
pub mod gateway;
pub mod request;
pub mod response;
pub mod server;
pub mod weather;

pub use request::{CepRequest, X_REQUEST_ID};
pub use response::{ApiError, WeatherReport};
pub use server::{HttpServer, ServerError};
