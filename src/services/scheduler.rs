//! Background maintenance scheduler
//!
//! Two independent loops run for the lifetime of the process: the
//! expiration sweep and the retention purge. Each tick is isolated; a
//! failing run is logged and the loop keeps its cadence.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::config::SchedulerConfig;
use crate::services::request::RequestService;

pub struct Scheduler {
    service: Arc<RequestService>,
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(service: Arc<RequestService>, config: SchedulerConfig) -> Self {
        Self { service, config }
    }

    /// Spawn both maintenance loops and return their handles
    pub fn start(&self) -> Vec<JoinHandle<()>> {
        info!(
            sweep_interval_seconds = self.config.sweep_interval_seconds,
            purge_interval_seconds = self.config.purge_interval_seconds,
            "Starting maintenance scheduler"
        );

        vec![
            self.spawn_sweep_loop(),
            self.spawn_purge_loop(),
        ]
    }

    fn spawn_sweep_loop(&self) -> JoinHandle<()> {
        let service = Arc::clone(&self.service);
        let interval = Duration::from_secs(self.config.sweep_interval_seconds);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; skip it so startup is quiet
            ticker.tick().await;

            loop {
                ticker.tick().await;
                match service.sweep_expired().await {
                    Ok(count) if count > 0 => {
                        info!(expired = count, "Expiration sweep transitioned requests");
                    }
                    Ok(_) => {}
                    Err(e) => {
                        error!(error = %e, "Expiration sweep failed");
                    }
                }
            }
        })
    }

    fn spawn_purge_loop(&self) -> JoinHandle<()> {
        let service = Arc::clone(&self.service);
        let interval = Duration::from_secs(self.config.purge_interval_seconds);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;

            loop {
                ticker.tick().await;
                match service.purge_old_requests().await {
                    Ok(count) if count > 0 => {
                        info!(purged = count, "Retention purge removed requests");
                    }
                    Ok(_) => {}
                    Err(e) => {
                        error!(error = %e, "Retention purge failed");
                    }
                }
            }
        })
    }
}
