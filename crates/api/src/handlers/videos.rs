//! Handlers for the `/videos/jobs` resource.
//!
//! Polling always answers `200`: an unknown or expired job id yields
//! `status: "not_found"` instead of a 404, so clients stop polling rather
//! than retry.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use pulse_core::jobs::{JobId, JobPatch, JobRecord, JobStatus, PatchRejection};
use serde::Serialize;

use crate::jobs::UpdateOutcome;
use crate::response::DataResponse;
use crate::state::AppState;

/// Status reported for ids the registry does not know.
pub const NOT_FOUND_STATUS: &str = "not_found";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobAccepted {
    pub job_id: JobId,
    pub status: JobStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobView {
    pub job_id: JobId,
    #[serde(flatten)]
    pub record: JobRecord,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingJobView {
    pub job_id: JobId,
    pub status: &'static str,
}

/// Either the job or the `not_found` marker.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum JobLookup {
    Found(JobView),
    NotFound(MissingJobView),
}

/// Body returned to the worker after a progress update.
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UpdateResponse {
    Applied { job: JobRecord },
    NotFound,
    Rejected { reason: &'static str, job: JobRecord },
}

impl From<UpdateOutcome> for UpdateResponse {
    fn from(outcome: UpdateOutcome) -> Self {
        match outcome {
            UpdateOutcome::Applied(job) => UpdateResponse::Applied { job },
            UpdateOutcome::NotFound => UpdateResponse::NotFound,
            UpdateOutcome::Rejected { current, reason } => UpdateResponse::Rejected {
                reason: match reason {
                    PatchRejection::Terminal(_) => "terminal",
                    PatchRejection::Regression { .. } => "regression",
                },
                job: current,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

/// POST /api/v1/videos/jobs
///
/// Accept a generation request and start tracking it as `queued`. Returns
/// 202 with the new job id for the client to poll.
pub async fn submit_job(State(state): State<AppState>) -> impl IntoResponse {
    let job_id = uuid::Uuid::new_v4().to_string();
    let record = state.jobs.create(job_id.clone(), JobStatus::Queued).await;

    tracing::info!(job_id = %job_id, "Video generation job accepted");

    (
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: JobAccepted {
                job_id,
                status: record.status,
            },
        }),
    )
}

// ---------------------------------------------------------------------------
// Poll
// ---------------------------------------------------------------------------

/// GET /api/v1/videos/jobs/{id}
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<JobId>,
) -> Json<DataResponse<JobLookup>> {
    let data = match state.jobs.get(&job_id).await {
        Some(record) => JobLookup::Found(JobView { job_id, record }),
        None => JobLookup::NotFound(MissingJobView {
            job_id,
            status: NOT_FOUND_STATUS,
        }),
    };
    Json(DataResponse { data })
}

// ---------------------------------------------------------------------------
// Worker update
// ---------------------------------------------------------------------------

/// PATCH /api/v1/videos/jobs/{id}
///
/// Merge a progress report from the generation worker. The outcome
/// (`applied`, `not_found`, `rejected`) is reported in the body with a 200 in
/// every case.
pub async fn update_job(
    State(state): State<AppState>,
    Path(job_id): Path<JobId>,
    Json(patch): Json<JobPatch>,
) -> Json<DataResponse<UpdateResponse>> {
    let outcome = state.jobs.update(&job_id, patch).await;
    Json(DataResponse {
        data: outcome.into(),
    })
}
