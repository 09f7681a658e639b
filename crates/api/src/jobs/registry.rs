use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use pulse_core::jobs::{JobId, JobPatch, JobRecord, JobStatus, PatchRejection};
use pulse_core::types::Timestamp;
use tokio::sync::RwLock;

/// Result of [`JobRegistry::update`].
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// The patch was merged; carries the record after the merge.
    Applied(JobRecord),
    /// No record exists under the key. Nothing was created.
    NotFound,
    /// The patch was refused and the record left as it was.
    Rejected {
        current: JobRecord,
        reason: PatchRejection,
    },
}

/// In-memory registry of video generation jobs.
///
/// Records live only in this process and are evicted by [`sweep`](Self::sweep)
/// once older than the retention window, whatever their status. Thread-safe
/// via interior `RwLock`; designed to be wrapped in `Arc` and shared across
/// the application.
pub struct JobRegistry {
    jobs: RwLock<HashMap<JobId, JobRecord>>,
    retention: Duration,
}

impl JobRegistry {
    /// Create an empty registry that evicts records older than `retention`.
    pub fn new(retention: Duration) -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
            retention,
        }
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }

    /// Register a new job with zero progress, stamped now.
    ///
    /// An existing record under the same key is replaced.
    pub async fn create(&self, job_id: impl Into<JobId>, status: JobStatus) -> JobRecord {
        let record = JobRecord::new(status, Utc::now());
        self.insert(job_id, record.clone()).await;
        record
    }

    /// Store `record` under `job_id` as-is, replacing any existing record.
    pub async fn insert(&self, job_id: impl Into<JobId>, record: JobRecord) {
        let job_id = job_id.into();
        let previous = self.jobs.write().await.insert(job_id.clone(), record);
        if let Some(previous) = previous {
            tracing::debug!(
                job_id = %job_id,
                previous_status = %previous.status,
                "Replaced existing job record",
            );
        }
    }

    /// Merge `patch` into the record for `job_id`.
    pub async fn update(&self, job_id: &str, patch: JobPatch) -> UpdateOutcome {
        let mut jobs = self.jobs.write().await;
        let Some(record) = jobs.get_mut(job_id) else {
            tracing::warn!(job_id = %job_id, "Update for unknown job ignored");
            return UpdateOutcome::NotFound;
        };

        match record.apply(patch) {
            Ok(()) => {
                tracing::debug!(
                    job_id = %job_id,
                    status = %record.status,
                    progress = record.progress,
                    "Job updated",
                );
                UpdateOutcome::Applied(record.clone())
            }
            Err(reason) => {
                tracing::warn!(job_id = %job_id, ?reason, "Job update rejected");
                UpdateOutcome::Rejected {
                    current: record.clone(),
                    reason,
                }
            }
        }
    }

    /// Current record for `job_id`, if it exists.
    pub async fn get(&self, job_id: &str) -> Option<JobRecord> {
        self.jobs.read().await.get(job_id).cloned()
    }

    /// Evict records older than the retention window as of now.
    pub async fn sweep(&self) -> usize {
        self.sweep_at(Utc::now()).await
    }

    /// Evict records created before `now - retention`.
    ///
    /// Non-terminal jobs are evicted too; their count is logged so orphaned
    /// long-running jobs are visible.
    pub async fn sweep_at(&self, now: Timestamp) -> usize {
        let Some(cutoff) = chrono::Duration::from_std(self.retention)
            .ok()
            .and_then(|retention| now.checked_sub_signed(retention))
        else {
            return 0;
        };

        let mut jobs = self.jobs.write().await;
        let before = jobs.len();
        let mut unfinished = 0usize;
        jobs.retain(|_, record| {
            let keep = !record.is_older_than(cutoff);
            if !keep && !record.status.is_terminal() {
                unfinished += 1;
            }
            keep
        });
        let evicted = before - jobs.len();

        if unfinished > 0 {
            tracing::warn!(
                evicted,
                unfinished,
                "Job sweep evicted jobs that never reached a terminal status",
            );
        }
        evicted
    }

    /// Number of tracked jobs.
    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }
}
