//! Error types and handling for the Routewise application

use thiserror::Error;

use crate::models::PlanPhase;

/// Main error type for the Routewise application
#[derive(Error, Debug)]
pub enum RoutewiseError {
    /// A required credential or setting is missing at startup
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Transport or malformed-response errors from an external provider
    #[error("Provider error: {message}")]
    Provider { message: String },

    /// Geocoding produced no match for a query; fatal to the pipeline
    #[error("Could not resolve location: {query}")]
    Resolution { query: String },

    /// Routing produced no candidate route; fatal to the pipeline
    #[error("No route available: {message}")]
    RouteUnavailable { message: String },
}

impl RoutewiseError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new provider error
    pub fn provider<S: Into<String>>(message: S) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }

    /// Create a new resolution failure for a query
    pub fn resolution<S: Into<String>>(query: S) -> Self {
        Self::Resolution {
            query: query.into(),
        }
    }

    /// Create a new route-unavailable error
    pub fn route_unavailable<S: Into<String>>(message: S) -> Self {
        Self::RouteUnavailable {
            message: message.into(),
        }
    }

    /// True when this error aborts a planning run
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RoutewiseError::Resolution { .. }
                | RoutewiseError::RouteUnavailable { .. }
                | RoutewiseError::Config { .. }
        )
    }

    /// The pipeline phase this error is attributed to
    #[must_use]
    pub fn phase(&self) -> PlanPhase {
        match self {
            RoutewiseError::Config { .. } => PlanPhase::Idle,
            RoutewiseError::Resolution { .. } => PlanPhase::Geocoding,
            RoutewiseError::RouteUnavailable { .. } => PlanPhase::Routing,
            RoutewiseError::Validation { .. } | RoutewiseError::Provider { .. } => {
                PlanPhase::Failed
            }
        }
    }

    /// Get a user-friendly error message naming the failed step
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            RoutewiseError::Config { .. } => {
                "Configuration error. Please check your API keys.".to_string()
            }
            RoutewiseError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            RoutewiseError::Provider { .. } => {
                "Unable to reach an external service. Please try again.".to_string()
            }
            RoutewiseError::Resolution { query } => {
                format!("Unable to geocode \"{query}\". Try a more specific name.")
            }
            RoutewiseError::RouteUnavailable { .. } => {
                "No route found. Try changing mode or locations.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for RoutewiseError {
    fn from(err: reqwest::Error) -> Self {
        RoutewiseError::Provider {
            message: err.to_string(),
        }
    }
}
