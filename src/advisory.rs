//! Advisory composition and generation
//!
//! Builds a bounded trip-summary prompt from route and weather facts and
//! delegates to the Groq chat-completions API (OpenAI wire shape) for a
//! short natural-language travel advisory. A failed or empty generation
//! leaves the advisory slot empty; it never aborts a planning run.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use crate::config::AppConfig;
use crate::error::RoutewiseError;
use crate::models::{RouteResult, WeatherSnapshot};

const ADVISORY_TIMEOUT: Duration = Duration::from_secs(30);

/// Text-generation seam used by the planner
#[async_trait]
pub trait AdvisoryGenerator: Send + Sync {
    /// Generate advisory text from a composed prompt. An empty completion
    /// counts as a failure.
    async fn generate(&self, prompt: &str) -> crate::Result<String>;
}

/// Render meters as "12.3 km", or an em dash when absent or zero
#[must_use]
pub fn format_distance(meters: Option<f64>) -> String {
    match meters {
        Some(m) if m > 0.0 => format!("{:.1} km", m / 1000.0),
        _ => "—".to_string(),
    }
}

/// Render a duration in seconds as "42 min" below one hour and
/// "1 h 10 min" from one hour up; absent or non-positive renders as an
/// em dash. Minutes are rounded to the nearest whole minute.
#[must_use]
pub fn format_eta(seconds: Option<f64>) -> String {
    let Some(s) = seconds else {
        return "—".to_string();
    };
    if s <= 0.0 {
        return "—".to_string();
    }
    let minutes = (s / 60.0).round() as i64;
    if minutes < 60 {
        format!("{minutes} min")
    } else {
        format!("{} h {} min", minutes / 60, minutes % 60)
    }
}

/// Compose the trip-summary prompt sent to the text-generation provider.
///
/// Deterministic for a given set of facts: same endpoints, route and
/// weather always render the same prompt. Missing facts render as em
/// dashes instead of being dropped, so the layout is stable.
#[must_use]
pub fn compose_prompt(
    origin: &str,
    destination: &str,
    route: &RouteResult,
    weather: Option<&WeatherSnapshot>,
) -> String {
    let description = weather.map_or("—", |w| w.description.as_str());
    let temperature = weather
        .and_then(|w| w.temperature_celsius)
        .map_or_else(|| "—".to_string(), |t| format!("{t:.0}"));

    format!(
        "Trip Summary:\n\
         From: {origin}\n\
         To: {destination}\n\
         \n\
         Distance: {distance}\n\
         ETA: {eta}\n\
         Traffic Delay: {delay}\n\
         \n\
         Weather at destination:\n\
         {description}, {temperature}°C\n\
         \n\
         Give short, safe travel advice.\n",
        distance = format_distance(route.distance_meters),
        eta = format_eta(route.travel_time_seconds),
        delay = format_eta(Some(route.traffic_delay_seconds)),
    )
}

/// Groq chat-completions client
#[derive(Clone)]
pub struct AdvisoryClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl AdvisoryClient {
    /// Create a new client from application configuration
    pub fn new(config: &AppConfig) -> crate::Result<Self> {
        let client = Client::builder()
            .timeout(ADVISORY_TIMEOUT)
            .user_agent(concat!("routewise/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RoutewiseError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.groq_api_key.clone(),
            base_url: config.advisory_base_url.clone(),
            model: config.advisory_model.clone(),
        })
    }
}

#[async_trait]
impl AdvisoryGenerator for AdvisoryClient {
    async fn generate(&self, prompt: &str) -> crate::Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| RoutewiseError::provider(format!("Advisory request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(RoutewiseError::provider(format!(
                "Advisory provider returned {}",
                response.status()
            )));
        }

        let completion: wire::ChatCompletionResponse = response.json().await.map_err(|e| {
            RoutewiseError::provider(format!("Failed to parse advisory response: {e}"))
        })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(RoutewiseError::provider("Advisory completion was empty"));
        }

        debug!("Generated advisory of {} character(s)", content.len());
        Ok(content)
    }
}

/// OpenAI-compatible chat-completion response structures
mod wire {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct ChatCompletionResponse {
        #[serde(default)]
        pub choices: Vec<Choice>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Choice {
        pub message: Message,
    }

    #[derive(Debug, Deserialize)]
    pub struct Message {
        pub content: Option<String>,
    }
}
