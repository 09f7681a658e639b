use std::sync::Arc;

use pulse_events::EventHub;
use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;
use crate::jobs::JobRegistry;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// In-memory registry of video generation jobs.
    pub jobs: Arc<JobRegistry>,
    /// Fan-out hub feeding the live SMS stream.
    pub event_hub: Arc<EventHub>,
    /// Cancelled once on shutdown; ends open event streams and background tasks.
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Build fresh, empty registries sized from `config`.
    pub fn new(config: ServerConfig) -> Self {
        let jobs = Arc::new(JobRegistry::new(config.job_retention()));
        Self {
            config: Arc::new(config),
            jobs,
            event_hub: Arc::new(EventHub::new()),
            shutdown: CancellationToken::new(),
        }
    }
}
