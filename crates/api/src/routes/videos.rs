//! Route definitions for the `/videos` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::videos;
use crate::state::AppState;

/// Routes mounted at `/videos`.
///
/// ```text
/// POST   /jobs            -> submit_job
/// GET    /jobs/{id}       -> get_job
/// PATCH  /jobs/{id}       -> update_job
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/jobs", post(videos::submit_job))
        .route("/jobs/{id}", get(videos::get_job).patch(videos::update_job))
}
