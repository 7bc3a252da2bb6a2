//! Geocoding client
//!
//! Resolves free-text place queries to coordinates via the TomTom Search
//! API. A failed geocode is routine (typo, ambiguous name), so provider
//! failures are logged and swallowed here instead of surfacing to the
//! orchestrator: no match, malformed body, non-2xx and timeouts all come
//! back as absence.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::error::RoutewiseError;
use crate::models::{Coordinate, GeocodedPlace};

const GEOCODE_TIMEOUT: Duration = Duration::from_secs(15);

/// Place-query resolution seam used by the planner
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve a query to its best-ranked coordinate, `None` when the
    /// provider has no match.
    async fn geocode(&self, query: &str) -> crate::Result<Option<Coordinate>>;

    /// Ranked suggestions for autocomplete; empty on any provider failure.
    async fn suggest(&self, query: &str, limit: usize) -> crate::Result<Vec<GeocodedPlace>>;
}

/// TomTom Search API client
#[derive(Clone)]
pub struct GeocodingClient {
    client: Client,
    api_key: String,
    base_url: String,
    country_filter: Option<String>,
}

impl GeocodingClient {
    /// Create a new client from application configuration
    pub fn new(config: &AppConfig) -> crate::Result<Self> {
        let client = Client::builder()
            .timeout(GEOCODE_TIMEOUT)
            .user_agent(concat!("routewise/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RoutewiseError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.tomtom_api_key.clone(),
            base_url: config.tomtom_base_url.clone(),
            country_filter: config.country_filter.clone(),
        })
    }

    /// Run one geocode search, swallowing provider failures into an empty
    /// result list.
    async fn search(&self, query: &str, limit: usize) -> Vec<GeocodedPlace> {
        if query.trim().is_empty() {
            warn!("Refusing to geocode an empty query");
            return Vec::new();
        }

        let url = format!(
            "{}/search/2/geocode/{}.json",
            self.base_url,
            urlencoding::encode(query)
        );

        let limit = limit.to_string();
        let mut request = self.client.get(&url).query(&[
            ("key", self.api_key.as_str()),
            ("limit", limit.as_str()),
        ]);
        if let Some(country) = &self.country_filter {
            request = request.query(&[("countrySet", country.as_str())]);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Geocoding request for {query:?} failed: {e}");
                return Vec::new();
            }
        };

        if !response.status().is_success() {
            warn!(
                "Geocoding provider returned {} for {query:?}",
                response.status()
            );
            return Vec::new();
        }

        let body: wire::GeocodeResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to parse geocoding response for {query:?}: {e}");
                return Vec::new();
            }
        };

        let places: Vec<GeocodedPlace> = body
            .results
            .unwrap_or_default()
            .into_iter()
            .filter_map(|result| result.into_place())
            .collect();

        debug!("Geocoding {query:?} produced {} match(es)", places.len());
        places
    }
}

#[async_trait]
impl Geocoder for GeocodingClient {
    async fn geocode(&self, query: &str) -> crate::Result<Option<Coordinate>> {
        let best = self
            .search(query, 1)
            .await
            .into_iter()
            .next()
            .map(|place| place.coordinate);
        Ok(best)
    }

    async fn suggest(&self, query: &str, limit: usize) -> crate::Result<Vec<GeocodedPlace>> {
        Ok(self.search(query, limit).await)
    }
}

/// TomTom Search API response structures
mod wire {
    use serde::Deserialize;

    use crate::models::{Coordinate, GeocodedPlace};

    #[derive(Debug, Deserialize)]
    pub struct GeocodeResponse {
        pub results: Option<Vec<GeocodeResult>>,
    }

    #[derive(Debug, Deserialize)]
    pub struct GeocodeResult {
        pub position: Position,
        pub address: Option<Address>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Position {
        pub lat: f64,
        pub lon: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct Address {
        #[serde(rename = "freeformAddress")]
        pub freeform_address: Option<String>,
    }

    impl GeocodeResult {
        /// Convert one provider match; out-of-range positions count as
        /// no match.
        pub fn into_place(self) -> Option<GeocodedPlace> {
            let coordinate = Coordinate::new(self.position.lat, self.position.lon).ok()?;
            let label = self
                .address
                .and_then(|address| address.freeform_address)
                .unwrap_or_else(|| coordinate.format_coordinates());
            Some(GeocodedPlace { label, coordinate })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(server: &mockito::ServerGuard) -> GeocodingClient {
        let config = AppConfig {
            tomtom_api_key: "test_key".to_string(),
            openweather_api_key: "unused".to_string(),
            groq_api_key: "unused".to_string(),
            tomtom_base_url: server.url(),
            weather_base_url: server.url(),
            advisory_base_url: server.url(),
            advisory_model: "test-model".to_string(),
            country_filter: Some("IN".to_string()),
            port: 0,
        };
        GeocodingClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_geocode_returns_first_match() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/search/2/geocode/Delhi.json")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"results": [
                    {"position": {"lat": 28.6315, "lon": 77.2167},
                     "address": {"freeformAddress": "Connaught Place, New Delhi"}},
                    {"position": {"lat": 28.7, "lon": 77.1}, "address": null}
                ]}"#,
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let coordinate = client.geocode("Delhi").await.unwrap().unwrap();
        assert_eq!(coordinate.latitude, 28.6315);
        assert_eq!(coordinate.longitude, 77.2167);
    }

    #[tokio::test]
    async fn test_geocode_no_results_is_absence() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"results": []}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        assert!(client.geocode("Nowhere").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_geocode_server_error_is_absence() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(500)
            .with_body("internal error")
            .create_async()
            .await;

        let client = client_for(&server);
        assert!(client.geocode("Delhi").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_geocode_malformed_body_is_absence() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = client_for(&server);
        assert!(client.geocode("Delhi").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_geocode_empty_query_is_absence() {
        let server = mockito::Server::new_async().await;
        let client = client_for(&server);
        assert!(client.geocode("   ").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_geocode_out_of_range_position_is_absence() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"results": [{"position": {"lat": 128.0, "lon": 77.0}}]}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        assert!(client.geocode("Delhi").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_suggest_returns_labeled_places() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"results": [
                    {"position": {"lat": 28.6315, "lon": 77.2167},
                     "address": {"freeformAddress": "Connaught Place"}},
                    {"position": {"lat": 28.5562, "lon": 77.1}, "address": null}
                ]}"#,
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let places = client.suggest("Connaught", 5).await.unwrap();
        assert_eq!(places.len(), 2);
        assert_eq!(places[0].label, "Connaught Place");
        // Unnamed matches fall back to a coordinate label
        assert_eq!(places[1].label, "28.5562, 77.1000");
    }

    #[tokio::test]
    async fn test_suggest_failure_is_empty() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let client = client_for(&server);
        assert!(client.suggest("Connaught", 5).await.unwrap().is_empty());
    }
}
