//! Weather client
//!
//! Fetches current conditions at the destination from the OpenWeather
//! API. This is a single best-effort fetch: provider-side failures come
//! back as errors for the planner to absorb, they never abort a run.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::AppConfig;
use crate::error::RoutewiseError;
use crate::models::{Coordinate, WeatherSnapshot};

const WEATHER_TIMEOUT: Duration = Duration::from_secs(15);

/// Current-conditions seam used by the planner
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current_weather(&self, location: Coordinate) -> crate::Result<WeatherSnapshot>;
}

/// OpenWeather current-weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl WeatherClient {
    /// Create a new client from application configuration
    pub fn new(config: &AppConfig) -> crate::Result<Self> {
        let client = Client::builder()
            .timeout(WEATHER_TIMEOUT)
            .user_agent(concat!("routewise/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RoutewiseError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.openweather_api_key.clone(),
            base_url: config.weather_base_url.clone(),
        })
    }
}

#[async_trait]
impl WeatherProvider for WeatherClient {
    async fn current_weather(&self, location: Coordinate) -> crate::Result<WeatherSnapshot> {
        let url = format!("{}/data/2.5/weather", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", location.latitude.to_string()),
                ("lon", location.longitude.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await
            .map_err(|e| RoutewiseError::provider(format!("Weather request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(RoutewiseError::provider(format!(
                "Weather provider returned {}",
                response.status()
            )));
        }

        let body: wire::CurrentWeatherResponse = response.json().await.map_err(|e| {
            RoutewiseError::provider(format!("Failed to parse weather response: {e}"))
        })?;

        let description = body
            .weather
            .into_iter()
            .next()
            .map(|condition| condition.description)
            .ok_or_else(|| RoutewiseError::provider("Weather response had no conditions"))?;

        let snapshot = WeatherSnapshot {
            description,
            temperature_celsius: body.main.and_then(|main| main.temp),
        };
        debug!(
            "Weather at {}: {} ({:?} °C)",
            location.format_coordinates(),
            snapshot.description,
            snapshot.temperature_celsius
        );
        Ok(snapshot)
    }
}

/// OpenWeather current-weather response structures
mod wire {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct CurrentWeatherResponse {
        #[serde(default)]
        pub weather: Vec<Condition>,
        pub main: Option<Main>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Condition {
        pub description: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct Main {
        pub temp: Option<f64>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(server: &mockito::ServerGuard) -> WeatherClient {
        let config = AppConfig {
            tomtom_api_key: "unused".to_string(),
            openweather_api_key: "test_key".to_string(),
            groq_api_key: "unused".to_string(),
            tomtom_base_url: server.url(),
            weather_base_url: server.url(),
            advisory_base_url: server.url(),
            advisory_model: "test-model".to_string(),
            country_filter: None,
            port: 0,
        };
        WeatherClient::new(&config).unwrap()
    }

    fn igi_airport() -> Coordinate {
        Coordinate::new(28.5562, 77.1000).unwrap()
    }

    #[tokio::test]
    async fn test_current_weather_success() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/data/2.5/weather")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"weather": [{"description": "haze"}], "main": {"temp": 33.5}}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let snapshot = client.current_weather(igi_airport()).await.unwrap();
        assert_eq!(snapshot.description, "haze");
        assert_eq!(snapshot.temperature_celsius, Some(33.5));
    }

    #[tokio::test]
    async fn test_current_weather_missing_temperature() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"weather": [{"description": "mist"}], "main": {}}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let snapshot = client.current_weather(igi_airport()).await.unwrap();
        assert_eq!(snapshot.description, "mist");
        assert!(snapshot.temperature_celsius.is_none());
    }

    #[tokio::test]
    async fn test_current_weather_unauthorized_is_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(401)
            .with_body(r#"{"cod": 401, "message": "Invalid API key"}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.current_weather(igi_airport()).await;
        assert!(matches!(result, Err(RoutewiseError::Provider { .. })));
    }

    #[tokio::test]
    async fn test_current_weather_empty_conditions_is_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"weather": [], "main": {"temp": 30.0}}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        assert!(client.current_weather(igi_airport()).await.is_err());
    }
}
