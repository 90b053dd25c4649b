//! Periodic health probing.
//!
//! # Responsibilities
//! - Probe every registry endpoint on a fixed interval
//! - Record the upstream health gauge and log state observations
//! - Stop cleanly on the shutdown signal

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time;

use crate::client::GatewayClient;
use crate::observability::metrics;

/// Probes all configured endpoints through the client's own pipeline,
/// so an open circuit reports unhealthy instead of being bypassed.
pub struct HealthMonitor {
    client: Arc<GatewayClient>,
    interval: Duration,
}

impl HealthMonitor {
    pub fn new(client: Arc<GatewayClient>, interval: Duration) -> Self {
        Self { client, interval }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            endpoints = self.client.registry().len(),
            "Health monitor starting"
        );

        let mut ticker = time::interval(self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.check_all().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Health monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    async fn check_all(&self) {
        let ids: Vec<String> = self
            .client
            .registry()
            .ids()
            .into_iter()
            .map(String::from)
            .collect();

        for id in ids {
            let healthy = self.client.health_check(&id).await;
            if !healthy {
                tracing::warn!(endpoint = %id, "Endpoint unhealthy");
            }
            metrics::record_upstream_health(&id, healthy);
        }
    }
}
