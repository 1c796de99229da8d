//! Temperature scale conversion.

use serde::{Deserialize, Serialize};

/// Offset added to Celsius to get Kelvin. Integral 273, not 273.15.
pub const KELVIN_OFFSET: f64 = 273.0;

/// One reading expressed in the three scales the services report.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Temperatures {
    #[serde(rename = "temp_C")]
    pub celsius: f64,
    #[serde(rename = "temp_F")]
    pub fahrenheit: f64,
    #[serde(rename = "temp_K")]
    pub kelvin: f64,
}

impl Temperatures {
    /// Convert a Celsius reading. Total over `f64`, never fails.
    pub fn from_celsius(celsius: f64) -> Self {
        Self {
            celsius,
            fahrenheit: celsius * 1.8 + 32.0,
            kelvin: celsius + KELVIN_OFFSET,
        }
    }
}
