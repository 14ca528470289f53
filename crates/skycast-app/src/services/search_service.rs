//! City search: geocode a name, then fetch its current conditions.

use skycast_weather::{CityInfo, CurrentConditions, WeatherProvider};

use super::ServiceError;

#[derive(Debug, Clone, PartialEq)]
pub struct CitySearchResult {
    pub city: CityInfo,
    pub conditions: CurrentConditions,
}

/// Search for `query`. Blank queries and unknown cities give `Ok(None)`.
pub async fn search_city(
    provider: &WeatherProvider,
    query: &str,
) -> Result<Option<CitySearchResult>, ServiceError> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(None);
    }

    let Some(city) = provider.geocode_city_name(query).await? else {
        return Ok(None);
    };

    let conditions = provider.fetch_current_conditions(&city.coordinate).await?;
    Ok(Some(CitySearchResult { city, conditions }))
}
