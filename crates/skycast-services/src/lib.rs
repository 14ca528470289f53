//! Saved locations ("favorites") for Skycast.
//!
//! `SqliteFavoriteStore` owns the table and enforces the capacity and
//! duplicate-name rules; `FavoritesClient` shares it across async tasks.

pub mod favorite;
pub mod favorite_client;
pub mod favorite_store;

pub use favorite::{FavoriteLocation, FavoritesError, FavoritesResult, SaveOutcome, MAX_FAVORITES};
pub use favorite_client::FavoritesClient;
pub use favorite_store::SqliteFavoriteStore;
