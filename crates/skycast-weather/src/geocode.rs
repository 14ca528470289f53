//! Reverse geocoding: convert coordinates to a place name.
//! Uses Nominatim (OpenStreetMap) - free, no API key required.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::location::Place;
use crate::types::{Coordinate, WeatherError};

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/reverse";
const USER_AGENT: &str = "Skycast/0.1.0";

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
    state: Option<String>,
    region: Option<String>,
    county: Option<String>,
}

impl From<NominatimAddress> for Place {
    fn from(addr: NominatimAddress) -> Self {
        // Prefer city > town > village > municipality for the primary place name
        let city = addr.city.or(addr.town).or(addr.village).or(addr.municipality);
        let region = addr.state.or(addr.region).or(addr.county);
        Place { city, region }
    }
}

#[derive(Debug, Clone)]
pub struct ReverseGeocoder {
    client: Client,
    url: String,
}

impl ReverseGeocoder {
    pub fn new(timeout: Duration) -> Result<Self, WeatherError> {
        Self::with_url(NOMINATIM_URL, timeout)
    }

    pub fn with_url(url: &str, timeout: Duration) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// Reverse geocode `coordinate`. A response with no address yields an
    /// empty `Place`, which labels itself "Your Location".
    pub async fn reverse(&self, coordinate: &Coordinate) -> Result<Place, WeatherError> {
        let url = format!(
            "{}?lat={}&lon={}&format=json&addressdetails=1&zoom=10",
            self.url, coordinate.latitude, coordinate.longitude
        );
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).send().await?.error_for_status()?;
        let text = response.text().await?;
        let body: NominatimResponse = serde_json::from_str(&text)
            .map_err(|e| WeatherError::parse(format!("Reverse geocode parse error: {}", e)))?;

        let place = body.address.map(Place::from).unwrap_or_default();
        tracing::info!("Reverse geocoded {} to {}", coordinate, place.label());
        Ok(place)
    }
}
