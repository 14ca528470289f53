use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classifier::{self, ConditionsSummary};

/// Geographic point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Latitude within [-90, 90] and longitude within [-180, 180]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// A geocoded city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityInfo {
    pub name: String,
    pub country: String,
    pub coordinate: Coordinate,
}

impl CityInfo {
    /// "Paris, France", or just the name when the country is unknown
    pub fn display_name(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }
}

/// Current weather conditions at a point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: f64,
    pub wind_speed_kmh: f64,
    /// Degrees, 0-360
    pub wind_direction_deg: f64,
    /// WMO weather interpretation code
    pub weather_code: i32,
    pub is_day: bool,
    pub observed_at: DateTime<Utc>,
}

impl CurrentConditions {
    pub fn description(&self) -> &'static str {
        classifier::describe(self.weather_code)
    }

    /// Description, icon and palette for rendering these conditions
    pub fn summary(&self, is_dark: bool) -> ConditionsSummary {
        ConditionsSummary::for_code(self.weather_code, is_dark)
    }
}

/// Location service errors
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location request timed out")]
    Timeout,
    #[error("Location error: {0}")]
    Other(String),
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    /// Transport failure, timeout or non-success HTTP status
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Response body did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Location error: {0}")]
    Location(#[from] LocationError),
}

impl WeatherError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Network(e) if e.is_timeout())
            || matches!(self, Self::Location(LocationError::Timeout))
    }
}
