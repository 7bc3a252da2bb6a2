//! Trip planner orchestration
//!
//! Sequences geocoding, routing, weather and advisory generation for one
//! planning request and owns the partial-failure policy: a missing
//! endpoint or route aborts the run, while weather and advisory failures
//! only leave their slot empty and are recorded as error events. Every
//! invocation runs the full pipeline from scratch; nothing is cached or
//! carried over between requests.

use tracing::{debug, instrument, warn};

use crate::advisory::{AdvisoryGenerator, compose_prompt};
use crate::error::RoutewiseError;
use crate::geocoding::Geocoder;
use crate::models::{
    Coordinate, ErrorEvent, ErrorKind, PlanPhase, PlanRequest, PlannedEndpoint, RouteRequest,
    TripPlanResult,
};
use crate::routing::RouteProvider;
use crate::weather::WeatherProvider;

/// Orchestrator over the four provider seams
pub struct TripPlanner<G, R, W, A> {
    geocoder: G,
    router: R,
    weather: W,
    advisor: A,
}

impl<G, R, W, A> TripPlanner<G, R, W, A>
where
    G: Geocoder,
    R: RouteProvider,
    W: WeatherProvider,
    A: AdvisoryGenerator,
{
    pub fn new(geocoder: G, router: R, weather: W, advisor: A) -> Self {
        Self {
            geocoder,
            router,
            weather,
            advisor,
        }
    }

    /// Run the full planning pipeline for one request.
    ///
    /// Returns `Err` only for the fatal categories (unresolvable endpoint,
    /// no route); every other failure is absorbed into the result's error
    /// list.
    #[instrument(skip(self, request), fields(origin = %request.origin, destination = %request.destination))]
    pub async fn plan(&self, request: PlanRequest) -> crate::Result<TripPlanResult> {
        debug!(phase = ?PlanPhase::Geocoding, "Resolving endpoints");
        let (origin, destination) = self.resolve_endpoints(&request).await?;

        debug!(phase = ?PlanPhase::Routing, "Requesting route");
        let route_request = RouteRequest {
            origin: origin.coordinate,
            destination: destination.coordinate,
            mode: request.mode,
            use_traffic: request.use_traffic,
        };
        let route = match self.router.route(&route_request).await {
            Ok(Some(route)) => Some(route),
            Ok(None) => None,
            Err(e) => {
                warn!("Routing call failed: {e}");
                None
            }
        }
        .ok_or_else(|| {
            RoutewiseError::route_unavailable(format!(
                "No {} route between {} and {}",
                request.mode.as_wire(),
                origin.query,
                destination.query
            ))
        })?;

        let mut errors = Vec::new();

        debug!(phase = ?PlanPhase::WeatherFetch, "Fetching destination weather");
        let weather = match self.weather.current_weather(destination.coordinate).await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!("Weather fetch failed, continuing without it: {e}");
                errors.push(ErrorEvent::new(
                    ErrorKind::ContextUnavailable,
                    e.to_string(),
                ));
                None
            }
        };

        debug!(phase = ?PlanPhase::Advisory, "Generating advisory");
        let prompt = compose_prompt(&origin.query, &destination.query, &route, weather.as_ref());
        let advisory = match self.advisor.generate(&prompt).await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Advisory generation failed, continuing without it: {e}");
                errors.push(ErrorEvent::new(
                    ErrorKind::AdvisoryUnavailable,
                    e.to_string(),
                ));
                None
            }
        };

        debug!(phase = ?PlanPhase::Done, "Plan complete with {} error(s)", errors.len());
        Ok(TripPlanResult {
            origin,
            destination,
            route: Some(route),
            weather,
            advisory,
            errors,
        })
    }

    /// Geocode both endpoints concurrently; neither call observes the
    /// other's outcome, and both must resolve before routing.
    async fn resolve_endpoints(
        &self,
        request: &PlanRequest,
    ) -> crate::Result<(PlannedEndpoint, PlannedEndpoint)> {
        let (origin, destination) = tokio::join!(
            self.resolve_one(&request.origin),
            self.resolve_one(&request.destination),
        );
        Ok((origin?, destination?))
    }

    async fn resolve_one(&self, query: &str) -> crate::Result<PlannedEndpoint> {
        let coordinate: Option<Coordinate> = match self.geocoder.geocode(query).await {
            Ok(coordinate) => coordinate,
            Err(e) => {
                warn!("Geocoding {query:?} failed: {e}");
                None
            }
        };
        match coordinate {
            Some(coordinate) => Ok(PlannedEndpoint {
                query: query.to_string(),
                coordinate,
            }),
            None => Err(RoutewiseError::resolution(query)),
        }
    }
}
