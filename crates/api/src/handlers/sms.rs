//! Handlers for the live SMS feed.

use std::convert::Infallible;

use axum::body::Body;
use axum::extract::State;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::HeaderName;
use axum::response::IntoResponse;
use axum::Json;
use futures::StreamExt;
use pulse_core::sms::SmsEvent;
use pulse_events::{BroadcastReport, StreamEvent};
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::sse;
use crate::state::AppState;

/// Disables response buffering in nginx-style reverse proxies.
static X_ACCEL_BUFFERING: HeaderName = HeaderName::from_static("x-accel-buffering");

#[derive(Debug, Serialize)]
pub struct PublishReport {
    pub delivered: usize,
    pub failed: usize,
}

impl From<BroadcastReport> for PublishReport {
    fn from(report: BroadcastReport) -> Self {
        Self {
            delivered: report.delivered,
            failed: report.failed,
        }
    }
}

/// GET /api/v1/sms/stream
///
/// Open a `text/event-stream` connection that receives every SMS event
/// broadcast while it stays open, plus a keep-alive comment on a timer.
pub async fn stream(State(state): State<AppState>) -> impl IntoResponse {
    let frames = sse::connection_stream(
        &state.event_hub,
        state.config.sse_heartbeat(),
        state.shutdown.clone(),
    );
    let body = Body::from_stream(frames.map(Ok::<_, Infallible>));

    (
        [
            (CONTENT_TYPE, sse::EVENT_STREAM_CONTENT_TYPE),
            (CACHE_CONTROL, "no-cache, no-transform"),
            (X_ACCEL_BUFFERING.clone(), "no"),
        ],
        body,
    )
}

/// POST /api/v1/sms/events
///
/// Publish an SMS event supplied as JSON, typically an outbound message the
/// application has just sent.
pub async fn publish_event(
    State(state): State<AppState>,
    Json(event): Json<SmsEvent>,
) -> AppResult<impl IntoResponse> {
    event.validate()?;

    let report = state.event_hub.broadcast(&StreamEvent::Sms(event));

    Ok(Json(DataResponse {
        data: PublishReport::from(report),
    }))
}
