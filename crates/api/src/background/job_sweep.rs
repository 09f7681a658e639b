//! Periodic eviction of aged-out job records.
//!
//! Spawns a loop that calls [`JobRegistry::sweep`] on a fixed interval using
//! `tokio::time::interval`.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::jobs::JobRegistry;

/// Run the job sweep loop until `cancel` is triggered.
pub async fn run(registry: Arc<JobRegistry>, period: Duration, cancel: CancellationToken) {
    tracing::info!(
        retention_secs = registry.retention().as_secs(),
        interval_secs = period.as_secs(),
        "Job sweep started"
    );

    let mut interval = tokio::time::interval(period);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Job sweep stopping");
                break;
            }
            _ = interval.tick() => {
                let evicted = registry.sweep().await;
                if evicted > 0 {
                    tracing::info!(evicted, "Job sweep: evicted expired jobs");
                } else {
                    tracing::debug!("Job sweep: nothing to evict");
                }
            }
        }
    }
}
