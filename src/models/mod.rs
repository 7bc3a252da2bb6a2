//! Data models for the Routewise application
//!
//! This module contains the core domain models organized by concern:
//! - Location: validated coordinates and geocoding matches
//! - Route: route requests and provider route summaries
//! - Weather: current destination conditions
//! - Plan: the trip plan aggregate and error events

pub mod location;
pub mod plan;
pub mod route;
pub mod weather;

// Re-export all public types for convenient access
pub use location::{Coordinate, GeocodedPlace};
pub use plan::{ErrorEvent, ErrorKind, PlanPhase, PlanRequest, PlannedEndpoint, TripPlanResult};
pub use route::{RouteRequest, RouteResult, TravelMode};
pub use weather::WeatherSnapshot;
