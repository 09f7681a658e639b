//! Route definitions for provider webhooks.

use axum::routing::post;
use axum::Router;

use crate::handlers::webhooks;
use crate::state::AppState;

/// Routes mounted at `/webhooks`.
///
/// ```text
/// POST   /sms             -> inbound_sms
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/sms", post(webhooks::inbound_sms))
}
