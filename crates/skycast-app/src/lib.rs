//! Skycast application layer.
//!
//! `WeatherApp` is the single entry point the presentation layer calls:
//! home weather resolution, city search, saved locations and the detail
//! view. Service errors come back as `skycast_core::AppError`, ready for
//! `user_message()`.

pub mod app_services;
mod error_mapping;
pub mod services;

pub use app_services::WeatherApp;
pub use services::{CitySearchResult, FallbackCity, FavoriteWeather, HomeWeather, ServiceError};

pub use skycast_weather::{
    describe, icon_for, palette_for, ConditionsSummary, WeatherIcon, WeatherPalette,
};
