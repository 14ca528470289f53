//! Async, cloneable handle to the favorites store.
//!
//! SQLite calls run on the blocking pool; the mutex serializes them so each
//! store operation stays atomic with respect to the others.

use std::sync::Arc;

use parking_lot::Mutex;
use skycast_weather::Coordinate;

use crate::favorite::{FavoriteLocation, FavoritesError, FavoritesResult, SaveOutcome};
use crate::favorite_store::SqliteFavoriteStore;

#[derive(Clone)]
pub struct FavoritesClient {
    store: Arc<Mutex<SqliteFavoriteStore>>,
}

impl FavoritesClient {
    pub fn new(store: SqliteFavoriteStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    async fn run<T, F>(&self, op: F) -> FavoritesResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteFavoriteStore) -> FavoritesResult<T> + Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = store.lock();
            op(&mut *guard)
        })
        .await
        .map_err(|e| FavoritesError::Task(e.to_string()))?
    }

    pub async fn list(&self) -> FavoritesResult<Vec<FavoriteLocation>> {
        self.run(|store| store.list()).await
    }

    pub async fn find_by_name(
        &self,
        city_name: &str,
    ) -> FavoritesResult<Option<FavoriteLocation>> {
        let city_name = city_name.to_string();
        self.run(move |store| store.find_by_name(&city_name)).await
    }

    pub async fn count(&self) -> FavoritesResult<usize> {
        self.run(|store| store.count()).await
    }

    /// See [`SqliteFavoriteStore::add`].
    pub async fn add(
        &self,
        city_name: &str,
        coordinate: Coordinate,
    ) -> FavoritesResult<SaveOutcome> {
        let city_name = city_name.to_string();
        self.run(move |store| store.add(&city_name, coordinate)).await
    }

    /// See [`SqliteFavoriteStore::remove`].
    pub async fn remove(&self, id: i64) -> FavoritesResult<bool> {
        self.run(move |store| store.remove(id)).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    fn client() -> FavoritesClient {
        FavoritesClient::new(SqliteFavoriteStore::in_memory().unwrap())
    }

    #[tokio::test]
    async fn test_client_round_trip() {
        let client = client();

        let outcome = client.add("Paris", Coordinate::new(48.85, 2.35)).await.unwrap();
        assert!(outcome.is_saved());

        let found = client.find_by_name("Paris").await.unwrap().unwrap();
        assert_eq!(client.count().await.unwrap(), 1);

        assert!(client.remove(found.id).await.unwrap());
        assert!(client.list().await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_saves_never_exceed_capacity() {
        let client = client();

        let tasks: Vec<_> = (0..12)
            .map(|i| {
                let client = client.clone();
                tokio::spawn(async move {
                    client.add(&format!("City {}", i), Coordinate::new(0.0, 0.0)).await
                })
            })
            .collect();

        let mut saved = 0;
        let mut rejected = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(SaveOutcome::Saved(_)) => saved += 1,
                Err(FavoritesError::CapacityExceeded { .. }) => rejected += 1,
                other => panic!("unexpected result: {:?}", other),
            }
        }

        assert_eq!(saved, 5);
        assert_eq!(rejected, 7);
        assert_eq!(client.count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_saves_insert_once() {
        let client = client();

        let (a, b) = tokio::join!(
            client.add("Oslo", Coordinate::new(59.91, 10.75)),
            client.add("Oslo", Coordinate::new(59.91, 10.75)),
        );

        let saved = [a.unwrap(), b.unwrap()]
            .iter()
            .filter(|outcome| outcome.is_saved())
            .count();
        assert_eq!(saved, 1);
        assert_eq!(client.count().await.unwrap(), 1);
    }
}
