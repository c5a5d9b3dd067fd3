//! City persistence backends

use async_trait::async_trait;
use city_store::CityStore;
use std::path::PathBuf;
use tokio::sync::Mutex;
use types::{CityServiceError, Result};

/// Persistence interface for the city collection
#[async_trait]
pub trait CityStorage: Send + Sync {
    /// Read the whole collection
    async fn load(&self) -> Result<CityStore>;

    /// Replace the persisted collection with `store`
    async fn save(&self, store: CityStore) -> Result<()>;

    /// Human readable location, used in logs and status output
    fn location(&self) -> String;
}

/// CSV file implementation of city storage
///
/// Saves are serialized: autosave, `/admin/save` and the shutdown save may
/// be requested at the same time, and the last one to start wins.
pub struct CsvCityStorage {
    path: PathBuf,
    create_if_missing: bool,
    save_lock: Mutex<()>,
}

impl CsvCityStorage {
    pub fn new(path: impl Into<PathBuf>, create_if_missing: bool) -> Self {
        Self {
            path: path.into(),
            create_if_missing,
            save_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl CityStorage for CsvCityStorage {
    async fn load(&self) -> Result<CityStore> {
        if self.create_if_missing && !self.path.exists() {
            tracing::warn!(path = %self.path.display(), "City file not found, starting with an empty store");
            return Ok(CityStore::new());
        }

        let path = self.path.clone();
        let store = tokio::task::spawn_blocking(move || CityStore::load(path))
            .await
            .map_err(|e| CityServiceError::Internal(format!("load task failed: {}", e)))??;
        Ok(store)
    }

    async fn save(&self, store: CityStore) -> Result<()> {
        let _guard = self.save_lock.lock().await;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || store.save(path))
            .await
            .map_err(|e| CityServiceError::Internal(format!("save task failed: {}", e)))??;
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use types::{City, StorageError};

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = CsvCityStorage::new(dir.path().join("cities.csv"), false);

        let err = storage.load().await.unwrap_err();
        assert!(matches!(err, CityServiceError::Storage(StorageError::Io { .. })));
    }

    #[tokio::test]
    async fn test_create_if_missing_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = CsvCityStorage::new(dir.path().join("cities.csv"), true);

        let store = storage.load().await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let storage = CsvCityStorage::new(dir.path().join("cities.csv"), false);
        let store = CityStore::from_cities(vec![City::new(1, "Kazan", "Tatarstan", "Volga", 1257391, 1005)]);

        storage.save(store.clone()).await.unwrap();
        let loaded = storage.load().await.unwrap();

        assert_eq!(loaded.cities(), store.cities());
        assert!(storage.location().ends_with("cities.csv"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_overlapping_saves_leave_one_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cities.csv");
        let storage = Arc::new(CsvCityStorage::new(path.clone(), false));

        let snapshot = |rows: i64, region: &str| {
            CityStore::from_cities(
                (0..rows)
                    .map(|i| City::new(i, format!("City {i}"), region, "Central", i * 10, 1500 + i))
                    .collect(),
            )
        };
        let big = snapshot(20_000, "Big");
        let small = snapshot(10_000, "Small");

        for _ in 0..10 {
            let first = tokio::spawn({
                let storage = storage.clone();
                let big = big.clone();
                async move { storage.save(big).await }
            });
            let second = tokio::spawn({
                let storage = storage.clone();
                let small = small.clone();
                async move { storage.save(small).await }
            });
            first.await.unwrap().unwrap();
            second.await.unwrap().unwrap();

            let loaded = CityStore::load(&path).unwrap();
            assert!(
                loaded.cities() == big.cities() || loaded.cities() == small.cities(),
                "file holds {} rows matching neither snapshot",
                loaded.len()
            );
        }
    }
}
