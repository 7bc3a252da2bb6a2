//! Route request and result models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Coordinate;

/// Travel mode supported by the routing provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Car,
    Bicycle,
    Pedestrian,
}

impl TravelMode {
    /// Provider wire name for this mode
    #[must_use]
    pub fn as_wire(&self) -> &'static str {
        match self {
            TravelMode::Car => "car",
            TravelMode::Bicycle => "bicycle",
            TravelMode::Pedestrian => "pedestrian",
        }
    }
}

/// One routing attempt between two resolved endpoints.
/// Constructed once per planning attempt and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub mode: TravelMode,
    pub use_traffic: bool,
}

/// The selected route as reported by the provider.
///
/// Missing distance/time stay absent rather than defaulting to zero, so a
/// provider omission never reads as a zero-length trip. A missing traffic
/// delay, however, is reported as 0 seconds: the provider does not
/// distinguish "no delay" from "no delay data", and we keep that behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    /// Every leg's points concatenated in provider order, shared leg
    /// endpoints included twice.
    pub polyline: Vec<Coordinate>,
    pub distance_meters: Option<f64>,
    pub travel_time_seconds: Option<f64>,
    pub traffic_delay_seconds: f64,
    pub departure_time: Option<DateTime<Utc>>,
    pub arrival_time: Option<DateTime<Utc>>,
}

impl RouteResult {
    /// Middle point of the polyline, used by presentation to center the map
    #[must_use]
    pub fn midpoint(&self) -> Option<&Coordinate> {
        self.polyline.get(self.polyline.len() / 2)
    }
}
