//! Main application structure and lifecycle management

use crate::{
    api::ApiServer,
    scheduler::Scheduler,
    storage::{CityStorage, CsvCityStorage},
};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use city_store::CityStore;
use config::Config;
use std::{future::Future, sync::Arc};
use tokio::{sync::RwLock, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Main application state
pub struct AppState {
    pub config: Config,
    pub store: RwLock<CityStore>,
    pub storage: Arc<dyn CityStorage>,
    pub started_at: DateTime<Utc>,
}

/// Main application that coordinates all components
pub struct Application {
    state: Arc<AppState>,
    api_server: ApiServer,
    scheduler: Scheduler,
    shutdown_token: CancellationToken,
}

impl Application {
    /// Create a new application backed by the configured CSV file
    pub async fn new(config: Config) -> Result<Self> {
        let storage = Arc::new(CsvCityStorage::new(
            config.storage.csv_path.clone(),
            config.storage.create_if_missing,
        ));
        Self::with_storage(config, storage).await
    }

    /// Create a new application instance on top of an arbitrary storage
    pub async fn with_storage(config: Config, storage: Arc<dyn CityStorage>) -> Result<Self> {
        info!("Initializing application components...");

        let store = storage
            .load()
            .await
            .with_context(|| format!("Failed to load cities from {}", storage.location()))?;
        info!(count = store.len(), source = %storage.location(), "City store loaded");

        let state = Arc::new(AppState {
            config,
            store: RwLock::new(store),
            storage,
            started_at: Utc::now(),
        });

        let api_server = ApiServer::new(state.clone())
            .context("Failed to create API server")?;
        let scheduler = Scheduler::new(state.clone());

        info!("Application components initialized successfully");

        Ok(Self {
            state,
            api_server,
            scheduler,
            shutdown_token: CancellationToken::new(),
        })
    }

    /// Serve requests until `signal` resolves, then shut down gracefully
    pub async fn run<F>(&mut self, signal: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        info!("Starting application services...");

        let listener = self.api_server.bind().await?;
        let mut server_handle = tokio::spawn(ApiServer::serve(
            self.api_server.router(),
            listener,
            self.shutdown_token.clone(),
        ));

        let scheduler_token = self.shutdown_token.child_token();
        let scheduler_handle = {
            let scheduler = self.scheduler.clone();
            let token = scheduler_token.clone();
            tokio::spawn(async move {
                if let Err(e) = scheduler.run(token).await {
                    error!("Scheduler error: {}", e);
                }
            })
        };

        tokio::select! {
            result = &mut server_handle => {
                self.shutdown_token.cancel();
                scheduler_handle.abort();
                result.context("API server task failed")??;
                warn!("API server stopped without a shutdown signal");
                return Ok(());
            }
            _ = signal => {
                info!("Shutdown signal received");
            }
        }

        self.shutdown(server_handle, scheduler_token, scheduler_handle).await
    }

    /// Persist the store, stop the server and wait for in-flight requests
    async fn shutdown(
        &mut self,
        server_handle: JoinHandle<Result<()>>,
        scheduler_token: CancellationToken,
        scheduler_handle: JoinHandle<()>,
    ) -> Result<()> {
        info!("Shutting down application...");

        // Autosave must be finished before the final save
        scheduler_token.cancel();
        let _ = scheduler_handle.await;

        let saved = self.state.persist().await;
        match &saved {
            Ok(count) => info!(count, path = %self.state.storage.location(), "Cities saved"),
            Err(e) => error!(error = %e, "Failed to save cities on shutdown"),
        }

        self.shutdown_token.cancel();

        let grace = self.state.config.server.shutdown_grace();
        match tokio::time::timeout(grace, server_handle).await {
            Ok(joined) => {
                joined.context("API server task failed")??;
                info!("API server shutdown complete");
            }
            Err(_) => {
                warn!(grace_seconds = grace.as_secs(), "Grace period elapsed, dropping open connections");
            }
        }

        saved.context("Failed to save cities")?;
        info!("Application shutdown complete");
        Ok(())
    }
}

impl AppState {
    /// Write a snapshot of the store through the storage backend
    ///
    /// The read lock is held only while cloning the collection.
    pub async fn persist(&self) -> types::Result<usize> {
        let snapshot = self.store.read().await.clone();
        let count = snapshot.len();
        self.storage.save(snapshot).await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::City;

    fn test_config(csv_path: std::path::PathBuf) -> Config {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 0;
        config.storage.csv_path = csv_path;
        config
    }

    #[tokio::test]
    async fn test_startup_fails_without_data_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path().join("missing.csv"));

        assert!(Application::new(config).await.is_err());
    }

    #[tokio::test]
    async fn test_shutdown_saves_mutations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cities.csv");
        std::fs::write(&path, "1,Tver,Tver,Central,424969,1135\n").unwrap();

        let mut app = Application::new(test_config(path.clone())).await.unwrap();
        app.state
            .store
            .write()
            .await
            .add(City::new(2, "Pskov", "Pskov", "Northwestern", 193160, 903));

        app.run(async {}).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "1,Tver,Tver,Central,424969,1135\n2,Pskov,Pskov,Northwestern,193160,903\n"
        );
    }

    #[tokio::test]
    async fn test_shutdown_with_autosave_running() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cities.csv");
        std::fs::write(&path, "1,Tver,Tver,Central,424969,1135\n").unwrap();

        let mut config = test_config(path.clone());
        config.storage.autosave_interval_seconds = Some(1);
        let mut app = Application::new(config).await.unwrap();
        app.state
            .store
            .write()
            .await
            .add(City::new(2, "Pskov", "Pskov", "Northwestern", 193160, 903));

        app.run(tokio::time::sleep(std::time::Duration::from_millis(1100)))
            .await
            .unwrap();

        let loaded = CityStore::load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.cities()[1].name, "Pskov");
    }
}
