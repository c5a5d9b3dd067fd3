//! Background autosave task

use crate::app::AppState;
use anyhow::Result;
use std::sync::Arc;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Background task scheduler
#[derive(Clone)]
pub struct Scheduler {
    state: Arc<AppState>,
}

impl Scheduler {
    /// Create a new scheduler
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Run until `shutdown` is cancelled; returns at once when autosave is off
    pub async fn run(&self, shutdown: CancellationToken) -> Result<()> {
        let Some(period) = self.state.config.storage.autosave_interval() else {
            tracing::debug!("Autosave disabled");
            return Ok(());
        };

        let mut autosave_interval = interval(period);
        autosave_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately
        autosave_interval.tick().await;

        tracing::info!(interval_seconds = period.as_secs(), "Autosave scheduler started");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = autosave_interval.tick() => {
                    if let Err(e) = self.autosave().await {
                        tracing::error!("Autosave failed: {}", e);
                    }
                }
            }
        }

        tracing::info!("Scheduler shutdown complete");
        Ok(())
    }

    async fn autosave(&self) -> Result<()> {
        let count = self.state.persist().await?;
        tracing::debug!(count, "Autosave wrote cities");
        Ok(())
    }
}
