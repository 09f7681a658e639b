//! Inbound telephony provider webhooks.

use std::collections::HashMap;

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::Form;
use pulse_core::sms::SmsEvent;
use pulse_events::StreamEvent;

use crate::error::AppResult;
use crate::state::AppState;

/// Empty messaging-markup reply: acknowledge without sending anything back.
pub const EMPTY_MESSAGING_RESPONSE: &str =
    r#"<?xml version="1.0" encoding="UTF-8"?><Response></Response>"#;

/// POST /api/v1/webhooks/sms
///
/// Receive an inbound SMS as a form-encoded webhook and relay it to every
/// open SMS stream.
pub async fn inbound_sms(
    State(state): State<AppState>,
    Form(fields): Form<HashMap<String, String>>,
) -> AppResult<impl IntoResponse> {
    let event = SmsEvent::from_webhook_form(&fields)?;

    tracing::info!(from = %event.from, to = %event.to, "Inbound SMS received");

    let report = state.event_hub.broadcast(&StreamEvent::Sms(event));
    tracing::debug!(delivered = report.delivered, failed = report.failed, "Inbound SMS relayed");

    Ok(([(CONTENT_TYPE, "application/xml")], EMPTY_MESSAGING_RESPONSE))
}
