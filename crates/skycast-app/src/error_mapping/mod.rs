//! Maps service errors to skycast_core::AppError for consistent user-facing messages.
//! Each service family has its own module to keep mappings small and readable.

mod favorites;
mod weather;

use crate::services::ServiceError;
use skycast_core::AppError;

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Weather(e) => weather::to_app_error(e),
            ServiceError::Favorites(e) => favorites::to_app_error(e),
        }
    }
}
