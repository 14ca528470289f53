//! Device location seam.
//!
//! The presentation layer owns the platform services (permission prompt,
//! positioning, reverse geocoding); the core only sees `DeviceLocation`.

use async_trait::async_trait;

use crate::geocode::ReverseGeocoder;
use crate::types::{Coordinate, LocationError, WeatherError};

const UNNAMED_PLACE_LABEL: &str = "Your Location";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Result of reverse geocoding a device position
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Place {
    pub city: Option<String>,
    pub region: Option<String>,
}

impl Place {
    /// City name, else region name, else "Your Location"
    pub fn label(&self) -> String {
        [&self.city, &self.region]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .unwrap_or(UNNAMED_PLACE_LABEL)
            .to_string()
    }
}

#[async_trait]
pub trait DeviceLocation: Send + Sync {
    /// Ask for foreground location permission
    async fn request_permission(&self) -> PermissionStatus;

    async fn current_position(&self) -> Result<Coordinate, LocationError>;

    async fn reverse_geocode(&self, coordinate: &Coordinate) -> Result<Place, WeatherError>;
}

/// Location source for hosts without a positioning service.
///
/// Grants permission only when a fixed position is configured, and reverse
/// geocodes through Nominatim.
#[derive(Debug, Clone)]
pub struct ConfiguredLocation {
    position: Option<Coordinate>,
    geocoder: ReverseGeocoder,
}

impl ConfiguredLocation {
    pub fn new(position: Option<Coordinate>, geocoder: ReverseGeocoder) -> Self {
        Self { position, geocoder }
    }
}

#[async_trait]
impl DeviceLocation for ConfiguredLocation {
    async fn request_permission(&self) -> PermissionStatus {
        if self.position.is_some() {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }

    /// `PermissionDenied` when no position is configured
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        let position = self.position.ok_or(LocationError::PermissionDenied)?;
        if !position.is_valid() {
            return Err(LocationError::Other(format!(
                "configured position out of range: {}",
                position
            )));
        }
        Ok(position)
    }

    async fn reverse_geocode(&self, coordinate: &Coordinate) -> Result<Place, WeatherError> {
        self.geocoder.reverse(coordinate).await
    }
}
