pub mod detail_service;
pub mod home_service;
pub mod saved_service;
pub mod search_service;

use skycast_services::FavoritesError;
use skycast_weather::WeatherError;

pub use home_service::{resolve_home_weather, FallbackCity, HomeWeather};
pub use saved_service::{saved_with_weather, FavoriteWeather};
pub use search_service::{search_city, CitySearchResult};

/// Error type for one failed user action
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Weather(#[from] WeatherError),
    #[error(transparent)]
    Favorites(#[from] FavoritesError),
}

impl From<skycast_weather::LocationError> for ServiceError {
    fn from(e: skycast_weather::LocationError) -> Self {
        ServiceError::Weather(e.into())
    }
}
