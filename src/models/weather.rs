//! Current weather conditions model

use serde::{Deserialize, Serialize};

/// Best-effort snapshot of current conditions at the destination.
/// Absence of a snapshot is a valid planning outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Short human-readable description ("haze", "light rain", ...)
    pub description: String,
    /// Temperature in degrees Celsius when the provider reports one
    pub temperature_celsius: Option<f64>,
}
