//! Weather service for Skycast
//!
//! Current conditions and city search via the Open-Meteo API, reverse
//! geocoding via Nominatim, and the WMO code classifier used to render them.

pub mod classifier;
pub mod geocode;
pub mod location;
pub mod provider;
pub mod types;

pub use classifier::{
    describe, icon_for, palette_for, ConditionsSummary, WeatherIcon, WeatherPalette,
};
pub use geocode::ReverseGeocoder;
pub use location::{ConfiguredLocation, DeviceLocation, PermissionStatus, Place};
pub use provider::WeatherProvider;
pub use types::*;
