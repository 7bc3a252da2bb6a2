//! Routing client
//!
//! Requests a traffic-aware route between two resolved coordinates from
//! the TomTom Routing API. The provider ranks candidate routes itself;
//! the first one is taken as-is. Transport failures, parse failures and
//! an empty candidate list all surface as absence, never as a panic or
//! a raised transport error.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::error::RoutewiseError;
use crate::models::{Coordinate, RouteRequest, RouteResult};

const ROUTE_TIMEOUT: Duration = Duration::from_secs(20);

/// Route computation seam used by the planner
#[async_trait]
pub trait RouteProvider: Send + Sync {
    /// Compute the best-ranked route, `None` when the provider reports no
    /// candidate routes.
    async fn route(&self, request: &RouteRequest) -> crate::Result<Option<RouteResult>>;
}

/// TomTom Routing API client
#[derive(Clone)]
pub struct RoutingClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl RoutingClient {
    /// Create a new client from application configuration
    pub fn new(config: &AppConfig) -> crate::Result<Self> {
        let client = Client::builder()
            .timeout(ROUTE_TIMEOUT)
            .user_agent(concat!("routewise/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RoutewiseError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.tomtom_api_key.clone(),
            base_url: config.tomtom_base_url.clone(),
        })
    }
}

#[async_trait]
impl RouteProvider for RoutingClient {
    async fn route(&self, request: &RouteRequest) -> crate::Result<Option<RouteResult>> {
        let url = format!(
            "{}/routing/1/calculateRoute/{},{}:{},{}/json",
            self.base_url,
            request.origin.latitude,
            request.origin.longitude,
            request.destination.latitude,
            request.destination.longitude,
        );

        let response = match self
            .client
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("travelMode", request.mode.as_wire()),
                ("traffic", if request.use_traffic { "true" } else { "false" }),
                ("routeRepresentation", "polyline"),
            ])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Routing request failed: {e}");
                return Ok(None);
            }
        };

        if !response.status().is_success() {
            warn!("Routing provider returned {}", response.status());
            return Ok(None);
        }

        let body: wire::CalculateRouteResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to parse routing response: {e}");
                return Ok(None);
            }
        };

        let Some(best) = body.routes.into_iter().next() else {
            debug!("Routing provider reported zero candidate routes");
            return Ok(None);
        };

        let result = summarize(best);
        debug!(
            "Route found: {} polyline point(s), distance {:?} m",
            result.polyline.len(),
            result.distance_meters
        );
        Ok(Some(result))
    }
}

/// Convert the provider's top-ranked route into a `RouteResult`.
///
/// Negative numerics from the provider are treated as absent (distance,
/// travel time) or clamped to zero (delay) so result invariants hold.
fn summarize(route: wire::Route) -> RouteResult {
    let summary = route.summary;
    RouteResult {
        polyline: assemble_polyline(&route.legs),
        distance_meters: summary.length_in_meters.filter(|v| *v >= 0.0),
        travel_time_seconds: summary.travel_time_in_seconds.filter(|v| *v >= 0.0),
        traffic_delay_seconds: summary.traffic_delay_in_seconds.unwrap_or(0.0).max(0.0),
        departure_time: parse_timestamp(summary.departure_time.as_deref()),
        arrival_time: parse_timestamp(summary.arrival_time.as_deref()),
    }
}

/// Concatenate every leg's points in provider order. Legs share their
/// boundary points, and those duplicates are kept.
fn assemble_polyline(legs: &[wire::Leg]) -> Vec<Coordinate> {
    legs.iter()
        .flat_map(|leg| leg.points.iter())
        .map(|point| Coordinate {
            latitude: point.latitude,
            longitude: point.longitude,
        })
        .collect()
}

fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(raw?);
    if let Err(e) = &parsed {
        warn!("Ignoring unparseable route timestamp {raw:?}: {e}");
    }
    parsed.ok().map(|dt| dt.with_timezone(&Utc))
}

/// TomTom Routing API response structures
mod wire {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct CalculateRouteResponse {
        #[serde(default)]
        pub routes: Vec<Route>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Route {
        #[serde(default)]
        pub summary: Summary,
        #[serde(default)]
        pub legs: Vec<Leg>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Summary {
        pub length_in_meters: Option<f64>,
        pub travel_time_in_seconds: Option<f64>,
        pub traffic_delay_in_seconds: Option<f64>,
        pub departure_time: Option<String>,
        pub arrival_time: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Leg {
        #[serde(default)]
        pub points: Vec<Point>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Point {
        pub latitude: f64,
        pub longitude: f64,
    }
}
