//! SQLite-based favorites storage.
//!
//! One `locations` table, created if absent when the store is opened.

use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::path::Path;
use std::time::Duration;

use skycast_weather::Coordinate;

use crate::favorite::{
    FavoriteLocation, FavoritesError, FavoritesResult, SaveOutcome, MAX_FAVORITES,
};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-based favorites storage.
pub struct SqliteFavoriteStore {
    conn: Connection,
}

impl SqliteFavoriteStore {
    /// Open the store at `path`, creating the database file and table if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> FavoritesResult<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (tests, ephemeral sessions).
    pub fn in_memory() -> FavoritesResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> FavoritesResult<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS locations (
                id INTEGER PRIMARY KEY NOT NULL,
                cityName TEXT NOT NULL,
                latitude REAL NOT NULL,
                longitude REAL NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    fn row_to_favorite(row: &rusqlite::Row) -> rusqlite::Result<FavoriteLocation> {
        Ok(FavoriteLocation {
            id: row.get(0)?,
            city_name: row.get(1)?,
            coordinate: Coordinate::new(row.get(2)?, row.get(3)?),
        })
    }

    /// All saved locations in insertion (id) order.
    pub fn list(&self) -> FavoritesResult<Vec<FavoriteLocation>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, cityName, latitude, longitude FROM locations ORDER BY id")?;

        let favorites = stmt
            .query_map([], Self::row_to_favorite)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(favorites)
    }

    pub fn get(&self, id: i64) -> FavoritesResult<Option<FavoriteLocation>> {
        let favorite = self
            .conn
            .query_row(
                "SELECT id, cityName, latitude, longitude FROM locations WHERE id = ?1",
                params![id],
                Self::row_to_favorite,
            )
            .optional()?;
        Ok(favorite)
    }

    /// Saved location whose city name matches exactly (case-sensitive).
    pub fn find_by_name(&self, city_name: &str) -> FavoritesResult<Option<FavoriteLocation>> {
        let favorite = self
            .conn
            .query_row(
                "SELECT id, cityName, latitude, longitude FROM locations
                 WHERE cityName = ?1 ORDER BY id LIMIT 1",
                params![city_name],
                Self::row_to_favorite,
            )
            .optional()?;
        Ok(favorite)
    }

    pub fn count(&self) -> FavoritesResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM locations", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Save a location.
    ///
    /// The name is trimmed before it is stored and before the duplicate
    /// check, so `" Paris "` and `"Paris"` are the same saved location.
    /// Capacity is checked first: with `MAX_FAVORITES` rows present this fails
    /// with `CapacityExceeded` even for a name that is already saved. A name
    /// that is already saved (exact match, coordinate ignored) is a no-op.
    /// The check and insert run in one IMMEDIATE transaction, so concurrent
    /// adds from any connection cannot both pass the limit.
    pub fn add(
        &mut self,
        city_name: &str,
        coordinate: Coordinate,
    ) -> FavoritesResult<SaveOutcome> {
        let city_name = city_name.trim();
        if city_name.is_empty() {
            return Err(FavoritesError::InvalidCityName);
        }
        if !coordinate.is_valid() {
            return Err(FavoritesError::InvalidCoordinate(coordinate));
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let count: i64 = tx.query_row("SELECT COUNT(*) FROM locations", [], |row| row.get(0))?;
        if count as usize >= MAX_FAVORITES {
            tracing::info!(
                "Refusing to save {:?}: {} locations already saved",
                city_name,
                count
            );
            return Err(FavoritesError::CapacityExceeded {
                limit: MAX_FAVORITES,
            });
        }

        let inserted = tx.execute(
            "INSERT INTO locations (cityName, latitude, longitude)
             SELECT ?1, ?2, ?3
             WHERE NOT EXISTS (SELECT 1 FROM locations WHERE cityName = ?1)",
            params![city_name, coordinate.latitude, coordinate.longitude],
        )?;

        let outcome = if inserted == 0 {
            SaveOutcome::AlreadySaved
        } else {
            SaveOutcome::Saved(FavoriteLocation {
                id: tx.last_insert_rowid(),
                city_name: city_name.to_string(),
                coordinate,
            })
        };
        tx.commit()?;

        match &outcome {
            SaveOutcome::Saved(f) => tracing::info!("Saved location {} ({})", f.city_name, f.id),
            SaveOutcome::AlreadySaved => tracing::debug!("{:?} is already saved", city_name),
        }
        Ok(outcome)
    }

    /// Delete a saved location. Returns whether a row was removed; an unknown
    /// id is not an error.
    pub fn remove(&self, id: i64) -> FavoritesResult<bool> {
        let removed = self.conn.execute("DELETE FROM locations WHERE id = ?1", params![id])?;
        if removed > 0 {
            tracing::info!("Removed saved location {}", id);
        }
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use std::collections::HashSet;
    use tempfile::tempdir;

    fn create_test_store() -> SqliteFavoriteStore {
        SqliteFavoriteStore::in_memory().unwrap()
    }

    fn fill(store: &mut SqliteFavoriteStore, names: &[&str]) {
        for (i, name) in names.iter().enumerate() {
            let outcome = store.add(name, Coordinate::new(i as f64, i as f64)).unwrap();
            assert!(outcome.is_saved());
        }
    }

    #[test]
    fn test_empty_store() {
        let store = create_test_store();
        assert!(store.list().unwrap().is_empty());
        assert_eq!(store.count().unwrap(), 0);
        assert!(store.find_by_name("Paris").unwrap().is_none());
    }

    #[test]
    fn test_add_list_remove_round_trip() {
        let mut store = create_test_store();

        let outcome = store.add("Paris", Coordinate::new(48.85, 2.35)).unwrap();
        let SaveOutcome::Saved(saved) = outcome else {
            panic!("expected a new row");
        };

        let all = store.list().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].city_name, "Paris");
        assert_eq!(all[0].coordinate, Coordinate::new(48.85, 2.35));
        assert_eq!(all[0].id, saved.id);

        assert!(store.remove(saved.id).unwrap());
        assert!(store.list().unwrap().iter().all(|f| f.city_name != "Paris"));
        assert!(store.get(saved.id).unwrap().is_none());
    }

    #[test]
    fn test_list_in_insertion_order() {
        let mut store = create_test_store();
        fill(&mut store, &["Oslo", "Lima", "Cairo"]);

        let names: Vec<_> = store.list().unwrap().into_iter().map(|f| f.city_name).collect();
        assert_eq!(names, vec!["Oslo", "Lima", "Cairo"]);
    }

    #[test]
    fn test_sixth_city_exceeds_capacity() {
        let mut store = create_test_store();
        fill(&mut store, &["A", "B", "C", "D", "E"]);

        let result = store.add("F", Coordinate::new(1.0, 1.0));
        assert!(matches!(
            result,
            Err(FavoritesError::CapacityExceeded { limit: 5 })
        ));
        assert_eq!(store.count().unwrap(), 5);
        assert!(store.find_by_name("F").unwrap().is_none());
    }

    #[test]
    fn test_capacity_checked_before_duplicate() {
        let mut store = create_test_store();
        fill(&mut store, &["A", "B", "C", "D", "E"]);

        let result = store.add("A", Coordinate::new(0.0, 0.0));
        assert!(matches!(result, Err(FavoritesError::CapacityExceeded { .. })));
    }

    #[test]
    fn test_duplicate_name_is_noop() {
        let mut store = create_test_store();
        fill(&mut store, &["Paris"]);

        // Different coordinate, same label: still a duplicate.
        let outcome = store.add("Paris", Coordinate::new(33.66, -95.55)).unwrap();
        assert_eq!(outcome, SaveOutcome::AlreadySaved);
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(
            store.find_by_name("Paris").unwrap().unwrap().coordinate,
            Coordinate::new(0.0, 0.0)
        );
    }

    #[test]
    fn test_duplicate_check_is_case_sensitive() {
        let mut store = create_test_store();
        fill(&mut store, &["Paris"]);

        assert!(store.add("paris", Coordinate::new(1.0, 1.0)).unwrap().is_saved());
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_remove_nonexistent_is_noop() {
        let mut store = create_test_store();
        fill(&mut store, &["Oslo"]);

        assert!(!store.remove(99999).unwrap());
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_remove_frees_capacity() {
        let mut store = create_test_store();
        fill(&mut store, &["A", "B", "C", "D", "E"]);

        let first = store.find_by_name("A").unwrap().unwrap();
        assert!(store.remove(first.id).unwrap());
        assert!(store.add("F", Coordinate::new(5.0, 5.0)).unwrap().is_saved());
        assert_eq!(store.count().unwrap(), 5);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut store = create_test_store();
        fill(&mut store, &["A", "B", "C"]);

        let ids: HashSet<_> = store.list().unwrap().into_iter().map(|f| f.id).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_rejects_invalid_input() {
        let mut store = create_test_store();

        assert!(matches!(
            store.add("   ", Coordinate::new(0.0, 0.0)),
            Err(FavoritesError::InvalidCityName)
        ));
        assert!(matches!(
            store.add("Nowhere", Coordinate::new(95.0, 0.0)),
            Err(FavoritesError::InvalidCoordinate(_))
        ));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_name_is_trimmed() {
        let mut store = create_test_store();
        store.add("  Lima ", Coordinate::new(-12.04, -77.03)).unwrap();
        assert!(store.find_by_name("Lima").unwrap().is_some());
    }

    #[test]
    fn test_padded_name_matches_saved_name() {
        let mut store = create_test_store();
        store.add("Paris", Coordinate::new(48.85, 2.35)).unwrap();

        let outcome = store.add(" Paris ", Coordinate::new(48.85, 2.35)).unwrap();

        assert_eq!(outcome, SaveOutcome::AlreadySaved);
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.list().unwrap()[0].city_name, "Paris");
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("weather.db");

        {
            let mut store = SqliteFavoriteStore::open(&db_path).unwrap();
            store.add("Halifax", Coordinate::new(44.6488, -63.5752)).unwrap();
        }

        let store = SqliteFavoriteStore::open(&db_path).unwrap();
        let all = store.list().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].city_name, "Halifax");
    }

    #[test]
    fn test_concurrent_connections_respect_capacity() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("weather.db");
        SqliteFavoriteStore::open(&db_path).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let db_path = db_path.clone();
                std::thread::spawn(move || {
                    let mut store = SqliteFavoriteStore::open(&db_path).unwrap();
                    let mut saved = 0;
                    for i in 0..5 {
                        let name = format!("city-{}-{}", worker, i);
                        match store.add(&name, Coordinate::new(0.0, 0.0)) {
                            Ok(outcome) if outcome.is_saved() => saved += 1,
                            Ok(_) => panic!("unexpected duplicate"),
                            Err(FavoritesError::CapacityExceeded { .. }) => {}
                            Err(e) => panic!("unexpected error: {}", e),
                        }
                    }
                    saved
                })
            })
            .collect();

        let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total, MAX_FAVORITES);

        let store = SqliteFavoriteStore::open(&db_path).unwrap();
        assert_eq!(store.count().unwrap(), MAX_FAVORITES);
    }
}
