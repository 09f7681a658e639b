//! Video generation job model and its status transition rules.
//!
//! A job moves `queued -> generating -> complete | failed`. Status never
//! moves backwards, and once a job reaches a terminal status the record is
//! frozen: later patches are rejected as a whole.

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// Opaque job key. Callers generate these (UUID v4 in the API layer).
pub type JobId = String;

/// Upper bound for [`JobRecord::progress`]; larger values are clamped.
pub const MAX_PROGRESS: u32 = 100;

/// Lifecycle status of a generation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Generating,
    Complete,
    Failed,
}

impl JobStatus {
    /// Position along the lifecycle. Terminal statuses share the top rank.
    fn rank(self) -> u8 {
        match self {
            JobStatus::Queued => 0,
            JobStatus::Generating => 1,
            JobStatus::Complete | JobStatus::Failed => 2,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Complete | JobStatus::Failed)
    }

    /// Whether a record in `self` may be moved to `next`.
    ///
    /// Re-asserting the current non-terminal status is allowed (a worker
    /// reporting `generating` twice with new progress).
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        !self.is_terminal() && next.rank() >= self.rank()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Generating => "generating",
            JobStatus::Complete => "complete",
            JobStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current state of a tracked job, as returned to polling clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub status: JobStatus,
    pub progress: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: Timestamp,
}

/// Partial update sent by the generation worker. Absent fields are left as-is.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPatch {
    pub status: Option<JobStatus>,
    pub progress: Option<u32>,
    pub video_url: Option<String>,
    pub error: Option<String>,
}

/// Why a patch was refused. The record is untouched in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchRejection {
    /// The record already reached `complete` or `failed`.
    Terminal(JobStatus),
    /// The patch would move status backwards.
    Regression { from: JobStatus, to: JobStatus },
}

impl JobRecord {
    /// A fresh record with zero progress.
    pub fn new(status: JobStatus, created_at: Timestamp) -> Self {
        Self {
            status,
            progress: 0,
            video_url: None,
            error: None,
            created_at,
        }
    }

    /// Merge `patch` into this record.
    pub fn apply(&mut self, patch: JobPatch) -> Result<(), PatchRejection> {
        if self.status.is_terminal() {
            return Err(PatchRejection::Terminal(self.status));
        }
        if let Some(next) = patch.status {
            if !self.status.can_transition_to(next) {
                return Err(PatchRejection::Regression {
                    from: self.status,
                    to: next,
                });
            }
            self.status = next;
        }
        if let Some(progress) = patch.progress {
            self.progress = progress.min(MAX_PROGRESS);
        }
        if patch.video_url.is_some() {
            self.video_url = patch.video_url;
        }
        if patch.error.is_some() {
            self.error = patch.error;
        }
        Ok(())
    }

    /// Whether the record was created strictly before `cutoff`.
    pub fn is_older_than(&self, cutoff: Timestamp) -> bool {
        self.created_at < cutoff
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Utc;

    use super::*;

    fn generating(progress: u32) -> JobPatch {
        JobPatch {
            status: Some(JobStatus::Generating),
            progress: Some(progress),
            ..Default::default()
        }
    }

    #[test]
    fn new_record_starts_at_zero_progress() {
        let record = JobRecord::new(JobStatus::Queued, Utc::now());
        assert_eq!(record.progress, 0);
        assert!(record.video_url.is_none());
        assert!(record.error.is_none());
    }

    #[test]
    fn apply_merges_only_supplied_fields() {
        let mut record = JobRecord::new(JobStatus::Queued, Utc::now());
        record.apply(generating(50)).unwrap();
        record
            .apply(JobPatch {
                progress: Some(70),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(record.status, JobStatus::Generating);
        assert_eq!(record.progress, 70);
    }

    #[test]
    fn progress_is_clamped() {
        let mut record = JobRecord::new(JobStatus::Queued, Utc::now());
        record.apply(generating(250)).unwrap();
        assert_eq!(record.progress, MAX_PROGRESS);
    }

    #[test]
    fn terminal_record_rejects_every_patch() {
        let mut record = JobRecord::new(JobStatus::Generating, Utc::now());
        record
            .apply(JobPatch {
                status: Some(JobStatus::Failed),
                error: Some("gpu lost".into()),
                ..Default::default()
            })
            .unwrap();
        let frozen = record.clone();

        assert_matches!(
            record.apply(generating(10)),
            Err(PatchRejection::Terminal(JobStatus::Failed))
        );
        assert_matches!(
            record.apply(JobPatch {
                status: Some(JobStatus::Complete),
                ..Default::default()
            }),
            Err(PatchRejection::Terminal(JobStatus::Failed))
        );
        assert_eq!(record, frozen);
    }

    #[test]
    fn status_cannot_regress() {
        let mut record = JobRecord::new(JobStatus::Generating, Utc::now());
        assert_matches!(
            record.apply(JobPatch {
                status: Some(JobStatus::Queued),
                progress: Some(90),
                ..Default::default()
            }),
            Err(PatchRejection::Regression {
                from: JobStatus::Generating,
                to: JobStatus::Queued
            })
        );
        assert_eq!(record.progress, 0);
    }

    #[test]
    fn queued_may_jump_straight_to_terminal() {
        assert!(JobStatus::Queued.can_transition_to(JobStatus::Complete));
        assert!(JobStatus::Queued.can_transition_to(JobStatus::Failed));
        assert!(JobStatus::Generating.can_transition_to(JobStatus::Generating));
        assert!(!JobStatus::Complete.can_transition_to(JobStatus::Complete));
    }

    #[test]
    fn record_serializes_in_camel_case_without_empty_fields() {
        let mut record = JobRecord::new(JobStatus::Queued, Utc::now());
        record
            .apply(JobPatch {
                status: Some(JobStatus::Complete),
                video_url: Some("https://x/y.mp4".into()),
                ..Default::default()
            })
            .unwrap();

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "complete");
        assert_eq!(json["videoUrl"], "https://x/y.mp4");
        assert!(json.get("error").is_none());
        assert!(json["createdAt"].is_string());
    }

    #[test]
    fn patch_deserializes_camel_case() {
        let patch: JobPatch =
            serde_json::from_str(r#"{"status":"complete","videoUrl":"https://x/y.mp4"}"#).unwrap();
        assert_eq!(patch.status, Some(JobStatus::Complete));
        assert_eq!(patch.video_url.as_deref(), Some("https://x/y.mp4"));
        assert!(patch.progress.is_none());
    }
}
