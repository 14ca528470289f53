use skycast_core::{AppError, FavoritesError, RusqliteErrorExt};
use skycast_services::FavoritesError as StoreError;

pub(super) fn to_app_error(e: StoreError) -> AppError {
    match e {
        StoreError::CapacityExceeded { limit } => {
            AppError::Favorites(FavoritesError::LimitReached { limit })
        }
        e @ (StoreError::InvalidCityName | StoreError::InvalidCoordinate(_)) => {
            AppError::Favorites(FavoritesError::InvalidInput(e.to_string()))
        }
        StoreError::Storage(e) => AppError::Database(e.into_database_error()),
        StoreError::Task(msg) => AppError::Service(msg),
    }
}
