pub mod health;
pub mod sms;
pub mod videos;
pub mod webhooks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /videos/jobs                                     submit (POST)
/// /videos/jobs/{id}                                poll (GET), worker update (PATCH)
///
/// /sms/stream                                      live event stream (GET)
/// /sms/events                                      publish an event (POST)
///
/// /webhooks/sms                                    inbound SMS webhook (POST, form)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/videos", videos::router())
        .nest("/sms", sms::router())
        .nest("/webhooks", webhooks::router())
}
