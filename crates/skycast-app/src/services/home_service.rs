//! Home screen: which weather to show when the app opens.

use skycast_services::FavoritesClient;
use skycast_weather::{
    Coordinate, CurrentConditions, DeviceLocation, PermissionStatus, WeatherProvider,
};

use super::ServiceError;

/// City shown when the device location can't be used
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackCity {
    pub name: String,
    pub coordinate: Coordinate,
}

impl FallbackCity {
    /// "Halifax (default)"
    pub fn label(&self) -> String {
        format!("{} (default)", self.name)
    }
}

impl Default for FallbackCity {
    fn default() -> Self {
        Self {
            name: "Halifax".to_string(),
            coordinate: Coordinate::new(44.6488, -63.5752),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HomeWeather {
    pub label: String,
    pub coordinate: Coordinate,
    pub conditions: CurrentConditions,
    /// Resolved from the fallback city rather than the device
    pub is_default: bool,
    /// A saved location has exactly this label
    pub is_saved: bool,
}

/// Resolve the home screen weather.
///
/// Device position (reverse geocoded) when permission is granted, the
/// fallback city otherwise. Location and network failures are returned;
/// a failing saved-location lookup only clears `is_saved`.
pub async fn resolve_home_weather(
    provider: &WeatherProvider,
    favorites: &FavoritesClient,
    location: &dyn DeviceLocation,
    fallback: &FallbackCity,
    use_device_location: bool,
) -> Result<HomeWeather, ServiceError> {
    let permission = if use_device_location {
        location.request_permission().await
    } else {
        PermissionStatus::Denied
    };

    let (label, coordinate, is_default) = match permission {
        PermissionStatus::Granted => {
            let coordinate = location.current_position().await?;
            let place = location.reverse_geocode(&coordinate).await?;
            (place.label(), coordinate, false)
        }
        PermissionStatus::Denied => {
            tracing::info!("Location unavailable, using {}", fallback.label());
            (fallback.label(), fallback.coordinate, true)
        }
    };

    let conditions = provider.fetch_current_conditions(&coordinate).await?;

    let is_saved = match favorites.find_by_name(&label).await {
        Ok(found) => found.is_some(),
        Err(e) => {
            tracing::warn!("Saved location lookup failed for {:?}: {}", label, e);
            false
        }
    };

    tracing::info!("Home weather resolved for {} ({})", label, coordinate);
    Ok(HomeWeather {
        label,
        coordinate,
        conditions,
        is_default,
        is_saved,
    })
}
