//! SMS events relayed to live UI feeds.
//!
//! Inbound messages arrive as form-encoded webhooks from the telephony
//! provider (`From`, `To`, `Body`, plus provider-specific fields). Outbound
//! messages are published by the application itself as JSON.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Form field carrying the sender number.
pub const FIELD_FROM: &str = "From";
/// Form field carrying the recipient number.
pub const FIELD_TO: &str = "To";
/// Form field carrying the message text.
pub const FIELD_BODY: &str = "Body";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmsDirection {
    Inbound,
    Outbound,
}

/// A single SMS, broadcast once and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmsEvent {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub body: String,
    pub direction: SmsDirection,
    /// Full provider payload, kept verbatim for the UI.
    #[serde(default = "empty_object")]
    pub raw: serde_json::Value,
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(Default::default())
}

impl SmsEvent {
    /// Build an inbound event from a decoded webhook form.
    ///
    /// Every form field is copied into `raw`. `From` and `To` are required;
    /// a missing `Body` becomes an empty string.
    pub fn from_webhook_form(fields: &HashMap<String, String>) -> Result<Self, CoreError> {
        let raw = fields
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect::<serde_json::Map<_, _>>();

        let event = Self {
            from: fields.get(FIELD_FROM).cloned().unwrap_or_default(),
            to: fields.get(FIELD_TO).cloned().unwrap_or_default(),
            body: fields.get(FIELD_BODY).cloned().unwrap_or_default(),
            direction: SmsDirection::Inbound,
            raw: serde_json::Value::Object(raw),
        };
        event.validate()?;
        Ok(event)
    }

    /// Reject events without both endpoints.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.from.trim().is_empty() {
            return Err(CoreError::Validation("from must not be empty".into()));
        }
        if self.to.trim().is_empty() {
            return Err(CoreError::Validation("to must not be empty".into()));
        }
        Ok(())
    }
}
