//! Route definitions for the `/sms` live feed.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::sms;
use crate::state::AppState;

/// Routes mounted at `/sms`.
///
/// ```text
/// GET    /stream          -> stream
/// POST   /events          -> publish_event
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stream", get(sms::stream))
        .route("/events", post(sms::publish_event))
}
