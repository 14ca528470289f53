//! Saved locations screen: every favorite with its current conditions.

use futures::future::join_all;
use skycast_services::{FavoriteLocation, FavoritesClient};
use skycast_weather::{CurrentConditions, WeatherProvider};

use super::ServiceError;

#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteWeather {
    pub favorite: FavoriteLocation,
    /// `None` when the fetch for this location failed ("weather unavailable")
    pub conditions: Option<CurrentConditions>,
}

/// List favorites and fetch weather for all of them concurrently.
///
/// One result per favorite, in store order. A failed fetch only blanks that
/// entry; reading the store is the only error returned.
pub async fn saved_with_weather(
    provider: &WeatherProvider,
    favorites: &FavoritesClient,
) -> Result<Vec<FavoriteWeather>, ServiceError> {
    let saved = favorites.list().await?;

    let fetches = saved.into_iter().map(|favorite| async move {
        let conditions = match provider.fetch_current_conditions(&favorite.coordinate).await {
            Ok(c) => Some(c),
            Err(e) => {
                tracing::warn!("Weather unavailable for {}: {}", favorite.city_name, e);
                None
            }
        };
        FavoriteWeather {
            favorite,
            conditions,
        }
    });

    Ok(join_all(fetches).await)
}
