//! Application services container.
//!
//! `WeatherApp` owns the gateway, the favorites store handle and the device
//! location source, and exposes one async method per user action. It is
//! cheap to clone and safe to share between tasks.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use skycast_core::{AppError, Config};
use skycast_services::{FavoriteLocation, FavoritesClient, SaveOutcome, SqliteFavoriteStore};
use skycast_weather::{
    ConditionsSummary, ConfiguredLocation, Coordinate, CurrentConditions, DeviceLocation,
    ReverseGeocoder, WeatherPalette, WeatherProvider,
};

use crate::services::{
    self, detail_service, CitySearchResult, FallbackCity, FavoriteWeather, HomeWeather,
};

#[derive(Clone)]
pub struct WeatherApp {
    provider: Arc<WeatherProvider>,
    favorites: FavoritesClient,
    location: Arc<dyn DeviceLocation>,
    fallback: FallbackCity,
    use_device_location: bool,
    dark_mode: bool,
}

impl WeatherApp {
    pub fn new(
        provider: WeatherProvider,
        favorites: FavoritesClient,
        location: Arc<dyn DeviceLocation>,
        fallback: FallbackCity,
    ) -> Self {
        Self {
            provider: Arc::new(provider),
            favorites,
            location,
            fallback,
            use_device_location: true,
            dark_mode: false,
        }
    }

    /// Build every service from configuration, opening (and creating if
    /// needed) the saved-locations database.
    pub fn from_config(config: &Config) -> Result<Self> {
        let timeout = Duration::from_secs(config.weather.request_timeout_secs);

        let provider = WeatherProvider::with_base_urls(
            &config.weather.forecast_base_url,
            &config.weather.geocoding_base_url,
            timeout,
        )
        .context("Failed to create weather provider")?;

        let geocoder = ReverseGeocoder::with_url(&config.weather.reverse_geocoding_url, timeout)
            .context("Failed to create reverse geocoder")?;
        let position = config
            .location
            .device_position()
            .map(|(lat, lon)| Coordinate::new(lat, lon));
        let location = ConfiguredLocation::new(position, geocoder);

        let db_path = config.database_path();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create data directory")?;
        }
        let store = SqliteFavoriteStore::open(&db_path)
            .with_context(|| format!("Failed to open {}", db_path.display()))?;
        tracing::info!("Saved locations database: {}", db_path.display());

        let fallback = FallbackCity {
            name: config.location.fallback_city.clone(),
            coordinate: Coordinate::new(
                config.location.fallback_latitude,
                config.location.fallback_longitude,
            ),
        };

        Ok(Self::new(
            provider,
            FavoritesClient::new(store),
            Arc::new(location),
            fallback,
        )
        .with_device_location(config.location.use_device_location)
        .with_dark_mode(config.ui.dark_mode))
    }

    pub fn with_device_location(mut self, enabled: bool) -> Self {
        self.use_device_location = enabled;
        self
    }

    pub fn with_dark_mode(mut self, dark_mode: bool) -> Self {
        self.dark_mode = dark_mode;
        self
    }

    /// Weather for the home screen: device location or the fallback city.
    pub async fn resolve_home_weather(&self) -> Result<HomeWeather, AppError> {
        services::resolve_home_weather(
            &self.provider,
            &self.favorites,
            self.location.as_ref(),
            &self.fallback,
            self.use_device_location,
        )
        .await
        .map_err(|e| log_failure("Home weather", e))
    }

    /// `Ok(None)` for blank queries and cities the provider doesn't know.
    pub async fn search_city(&self, name: &str) -> Result<Option<CitySearchResult>, AppError> {
        services::search_city(&self.provider, name)
            .await
            .map_err(|e| log_failure("City search", e))
    }

    pub async fn list_favorites(&self) -> Result<Vec<FavoriteLocation>, AppError> {
        self.favorites
            .list()
            .await
            .map_err(|e| log_failure("Listing saved locations", e.into()))
    }

    /// Every saved location with its current conditions, fetched concurrently.
    pub async fn saved_with_weather(&self) -> Result<Vec<FavoriteWeather>, AppError> {
        services::saved_with_weather(&self.provider, &self.favorites)
            .await
            .map_err(|e| log_failure("Loading saved locations", e))
    }

    pub async fn save_favorite(
        &self,
        name: &str,
        coordinate: Coordinate,
    ) -> Result<SaveOutcome, AppError> {
        self.favorites
            .add(name, coordinate)
            .await
            .map_err(|e| log_failure("Saving location", e.into()))
    }

    /// Returns whether anything was removed; unknown ids are not an error.
    pub async fn remove_favorite(&self, id: i64) -> Result<bool, AppError> {
        self.favorites
            .remove(id)
            .await
            .map_err(|e| log_failure("Removing location", e.into()))
    }

    pub async fn get_detailed_conditions(
        &self,
        coordinate: Coordinate,
    ) -> Result<CurrentConditions, AppError> {
        self.provider
            .fetch_current_conditions(&coordinate)
            .await
            .map_err(|e| log_failure("Detail weather", e.into()))
    }

    /// Description, icon and palette for `conditions` in the current color scheme.
    pub fn summary(&self, conditions: &CurrentConditions) -> ConditionsSummary {
        conditions.summary(self.dark_mode)
    }

    pub fn detail_palette(&self, conditions: Option<&CurrentConditions>) -> WeatherPalette {
        detail_service::detail_palette(conditions, self.dark_mode)
    }

    /// Summary for the detail card, `None` until conditions load
    pub fn detail_summary(
        &self,
        conditions: Option<&CurrentConditions>,
    ) -> Option<ConditionsSummary> {
        detail_service::detail_summary(conditions, self.dark_mode)
    }
}

fn log_failure(action: &str, e: services::ServiceError) -> AppError {
    let err = AppError::from(e);
    tracing::error!("{} failed: {}", action, err);
    err
}
