//! Trip plan request/result models and the planning state machine labels

use serde::{Deserialize, Serialize};

use super::{Coordinate, RouteResult, TravelMode, WeatherSnapshot};

/// Raw planning input as received from presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub origin: String,
    pub destination: String,
    #[serde(default)]
    pub mode: TravelMode,
    #[serde(default = "default_use_traffic")]
    pub use_traffic: bool,
}

fn default_use_traffic() -> bool {
    true
}

/// A resolved trip endpoint: the query text plus its geocoded position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedEndpoint {
    pub query: String,
    pub coordinate: Coordinate,
}

/// Category of a recorded pipeline failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    ResolutionFailure,
    RouteUnavailable,
    ContextUnavailable,
    AdvisoryUnavailable,
    Configuration,
}

/// One non-fatal failure captured while the pipeline kept going
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEvent {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorEvent {
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Planner pipeline phase. Weather and advisory failures never reach
/// `Failed`; only geocoding and routing can abort the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlanPhase {
    Idle,
    Geocoding,
    Routing,
    WeatherFetch,
    Advisory,
    Done,
    Failed,
}

/// The single aggregate handed to presentation, rebuilt fresh on every
/// planning invocation. Optional slots stay empty when their provider
/// failed; the failure itself is listed in `errors`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripPlanResult {
    pub origin: PlannedEndpoint,
    pub destination: PlannedEndpoint,
    pub route: Option<RouteResult>,
    pub weather: Option<WeatherSnapshot>,
    pub advisory: Option<String>,
    pub errors: Vec<ErrorEvent>,
}
