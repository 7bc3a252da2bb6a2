//! Routewise - traffic-aware trip planning with weather context and
//! natural-language travel advisories
//!
//! This library geocodes two place queries, computes a traffic-aware
//! route between them, fetches destination weather, and composes a short
//! travel advisory, returning a single `TripPlanResult` per request.

pub mod advisory;
pub mod api;
pub mod config;
pub mod error;
pub mod geocoding;
pub mod models;
pub mod planner;
pub mod routing;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use advisory::{AdvisoryClient, AdvisoryGenerator, compose_prompt, format_distance, format_eta};
pub use config::AppConfig;
pub use error::RoutewiseError;
pub use geocoding::{Geocoder, GeocodingClient};
pub use models::{
    Coordinate, ErrorEvent, ErrorKind, GeocodedPlace, PlanPhase, PlanRequest, PlannedEndpoint,
    RouteRequest, RouteResult, TravelMode, TripPlanResult, WeatherSnapshot,
};
pub use planner::TripPlanner;
pub use routing::{RouteProvider, RoutingClient};
pub use weather::{WeatherClient, WeatherProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, RoutewiseError>;
