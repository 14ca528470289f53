//! Open-Meteo gateway: current conditions and forward geocoding.
//!
//! Both calls are idempotent and never retried here; the caller decides.

use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::types::{CityInfo, Coordinate, CurrentConditions, WeatherError};

const FORECAST_BASE_URL: &str = "https://api.open-meteo.com";
const GEOCODING_BASE_URL: &str = "https://geocoding-api.open-meteo.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Open-Meteo reports `time` in GMT without seconds or offset.
const OBSERVED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: Option<CurrentWeatherBody>,
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherBody {
    temperature: f64,
    windspeed: f64,
    winddirection: f64,
    weathercode: i32,
    is_day: u8,
    time: String,
}

impl TryFrom<CurrentWeatherBody> for CurrentConditions {
    type Error = WeatherError;

    fn try_from(body: CurrentWeatherBody) -> Result<Self, Self::Error> {
        let observed_at = parse_observed_at(&body.time)?;
        Ok(Self {
            temperature_c: body.temperature,
            wind_speed_kmh: body.windspeed,
            wind_direction_deg: body.winddirection,
            weather_code: body.weathercode,
            is_day: body.is_day != 0,
            observed_at,
        })
    }
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    /// Absent (not empty) when nothing matched
    #[serde(default)]
    results: Vec<GeocodingResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    country: Option<String>,
}

impl From<GeocodingResult> for CityInfo {
    fn from(result: GeocodingResult) -> Self {
        Self {
            name: result.name,
            country: result.country.unwrap_or_default(),
            coordinate: Coordinate::new(result.latitude, result.longitude),
        }
    }
}

fn parse_observed_at(time: &str) -> Result<DateTime<Utc>, WeatherError> {
    NaiveDateTime::parse_from_str(time, OBSERVED_AT_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(time, "%Y-%m-%dT%H:%M:%S"))
        .map(|naive| naive.and_utc())
        .map_err(|e| WeatherError::parse(format!("invalid observation time {:?}: {}", time, e)))
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    forecast_base_url: String,
    geocoding_base_url: String,
}

impl WeatherProvider {
    /// Provider against the public Open-Meteo hosts
    pub fn new(timeout: Duration) -> Result<Self, WeatherError> {
        Self::with_base_urls(FORECAST_BASE_URL, GEOCODING_BASE_URL, timeout)
    }

    /// Provider against custom hosts (self-hosted mirror, tests)
    pub fn with_base_urls(
        forecast_base_url: &str,
        geocoding_base_url: &str,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client: Arc::new(client),
            forecast_base_url: forecast_base_url.trim_end_matches('/').to_string(),
            geocoding_base_url: geocoding_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch current conditions at `coordinate`.
    ///
    /// Fails with `Network` on transport errors, timeouts and non-2xx
    /// responses, and with `Parse` when `current_weather` is missing.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_current_conditions(
        &self,
        coordinate: &Coordinate,
    ) -> Result<CurrentConditions, WeatherError> {
        let url = format!(
            "{}/v1/forecast?latitude={}&longitude={}&current_weather=true",
            self.forecast_base_url, coordinate.latitude, coordinate.longitude
        );

        let body: ForecastResponse = self.get_json(&url).await?;
        let current = body
            .current_weather
            .ok_or_else(|| WeatherError::parse("response has no current_weather object"))?;

        CurrentConditions::try_from(current)
    }

    /// Look up a city by name. `Ok(None)` when the provider has no match.
    ///
    /// Ranking is entirely up to the provider; only the first result is used.
    #[instrument(skip(self), level = "info")]
    pub async fn geocode_city_name(&self, name: &str) -> Result<Option<CityInfo>, WeatherError> {
        let url = format!(
            "{}/v1/search?name={}&count=1&language=en&format=json",
            self.geocoding_base_url,
            urlencoding::encode(name),
        );

        let body: GeocodingResponse = self.get_json(&url).await?;
        let city = body.results.into_iter().next().map(CityInfo::from);

        match &city {
            Some(c) => tracing::info!(
                "Geocoded {:?} to {} ({})",
                name,
                c.display_name(),
                c.coordinate
            ),
            None => tracing::info!("No geocoding match for {:?}", name),
        }

        Ok(city)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, WeatherError> {
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?.error_for_status()?;
        let text = response.text().await?;

        serde_json::from_str(&text)
            .map_err(|e| WeatherError::parse(format!("JSON parse error: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> WeatherProvider {
        WeatherProvider::with_base_urls(&server.uri(), &server.uri(), DEFAULT_TIMEOUT).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_current_conditions() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "48.85"))
            .and(query_param("longitude", "2.35"))
            .and(query_param("current_weather", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "latitude": 48.86,
                "longitude": 2.34,
                "current_weather": {
                    "temperature": 17.4,
                    "windspeed": 11.2,
                    "winddirection": 250,
                    "weathercode": 3,
                    "is_day": 1,
                    "time": "2026-10-19T13:00"
                }
            })))
            .mount(&mock_server)
            .await;

        let provider = provider_for(&mock_server);
        let conditions = provider
            .fetch_current_conditions(&Coordinate::new(48.85, 2.35))
            .await
            .unwrap();

        assert_eq!(conditions.temperature_c, 17.4);
        assert_eq!(conditions.wind_speed_kmh, 11.2);
        assert_eq!(conditions.wind_direction_deg, 250.0);
        assert_eq!(conditions.weather_code, 3);
        assert!(conditions.is_day);
        assert_eq!(conditions.observed_at.to_rfc3339(), "2026-10-19T13:00:00+00:00");
        assert_eq!(conditions.description(), "Overcast");
    }

    #[tokio::test]
    async fn test_missing_current_weather_is_parse_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "latitude": 48.86,
                "longitude": 2.34
            })))
            .mount(&mock_server)
            .await;

        let provider = provider_for(&mock_server);
        let result = provider.fetch_current_conditions(&Coordinate::new(48.85, 2.35)).await;

        assert!(matches!(result, Err(WeatherError::Parse(_))));
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let provider = provider_for(&mock_server);
        let result = provider.fetch_current_conditions(&Coordinate::new(0.0, 0.0)).await;

        assert!(matches!(result, Err(WeatherError::Parse(_))));
    }

    #[tokio::test]
    async fn test_server_error_is_network_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let provider = provider_for(&mock_server);
        let result = provider.fetch_current_conditions(&Coordinate::new(0.0, 0.0)).await;

        assert!(matches!(result, Err(WeatherError::Network(_))));
    }

    #[tokio::test]
    async fn test_slow_response_times_out_as_network_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&mock_server)
            .await;

        let provider = WeatherProvider::with_base_urls(
            &mock_server.uri(),
            &mock_server.uri(),
            Duration::from_millis(50),
        )
        .unwrap();
        let result = provider.fetch_current_conditions(&Coordinate::new(0.0, 0.0)).await;

        let err = result.unwrap_err();
        assert!(matches!(err, WeatherError::Network(_)));
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let provider = WeatherProvider::with_base_urls(
            "http://127.0.0.1:1",
            "http://127.0.0.1:1",
            Duration::from_secs(2),
        )
        .unwrap();
        let result = provider.geocode_city_name("Paris").await;

        assert!(matches!(result, Err(WeatherError::Network(_))));
    }

    #[tokio::test]
    async fn test_geocode_city_name() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("name", "São Paulo"))
            .and(query_param("count", "1"))
            .and(query_param("language", "en"))
            .and(query_param("format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [{
                    "id": 3448439,
                    "name": "São Paulo",
                    "latitude": -23.5475,
                    "longitude": -46.63611,
                    "country": "Brazil"
                }],
                "generationtime_ms": 0.5
            })))
            .mount(&mock_server)
            .await;

        let provider = provider_for(&mock_server);
        let city = provider.geocode_city_name("São Paulo").await.unwrap().unwrap();

        assert_eq!(city.name, "São Paulo");
        assert_eq!(city.country, "Brazil");
        assert_eq!(city.coordinate, Coordinate::new(-23.5475, -46.63611));
    }

    #[tokio::test]
    async fn test_geocode_no_results_is_none() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("name", "Zzyxqplor"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "generationtime_ms": 0.3
            })))
            .mount(&mock_server)
            .await;

        let provider = provider_for(&mock_server);
        let city = provider.geocode_city_name("Zzyxqplor").await.unwrap();

        assert!(city.is_none());
    }

    #[tokio::test]
    async fn test_geocode_missing_country_is_empty() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [{ "name": "Atlantis", "latitude": 1.0, "longitude": 2.0 }]
            })))
            .mount(&mock_server)
            .await;

        let provider = provider_for(&mock_server);
        let city = provider.geocode_city_name("Atlantis").await.unwrap().unwrap();

        assert_eq!(city.country, "");
        assert_eq!(city.display_name(), "Atlantis");
    }

    #[test]
    fn test_parse_observed_at() {
        let at = parse_observed_at("2026-01-02T03:04").unwrap();
        assert_eq!(at.to_rfc3339(), "2026-01-02T03:04:00+00:00");
        assert!(parse_observed_at("yesterday").is_err());
    }
}
