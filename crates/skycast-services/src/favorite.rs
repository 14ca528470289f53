//! Favorite location model and error types.

use serde::{Deserialize, Serialize};
use skycast_weather::Coordinate;
use thiserror::Error;

/// Maximum number of saved locations.
pub const MAX_FAVORITES: usize = 5;

/// A saved, named coordinate. Never edited in place; only added or removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteLocation {
    pub id: i64,
    pub city_name: String,
    pub coordinate: Coordinate,
}

/// What `add` did.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// A new row was inserted.
    Saved(FavoriteLocation),
    /// A row with exactly this city name already existed; nothing changed.
    AlreadySaved,
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved(_))
    }
}

/// Errors that can occur during favorites operations.
#[derive(Debug, Error)]
pub enum FavoritesError {
    /// The store already holds `limit` rows.
    #[error("You can only save up to {limit} locations.")]
    CapacityExceeded { limit: usize },

    #[error("City name must not be empty")]
    InvalidCityName,

    #[error("Coordinate out of range: {0}")]
    InvalidCoordinate(Coordinate),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// The blocking task running a store operation failed.
    #[error("Task error: {0}")]
    Task(String),
}

/// Result type for favorites operations.
pub type FavoritesResult<T> = Result<T, FavoritesError>;
