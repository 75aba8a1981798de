//! Error types for the tally-link client library.

use serde_json::Value;
use thiserror::Error;

use crate::models::entity::EntityId;

/// Result type for tally-link operations.
pub type Result<T> = std::result::Result<T, TallyLinkError>;

/// Errors surfaced by the client, the collection state machine, and the
/// mutation coordinator.
///
/// `StaleResponse` and `ViewClosed` are internal bookkeeping: the state
/// machine swallows them before they reach its public API.
#[derive(Debug, Error)]
pub enum TallyLinkError {
    /// Network-level failure: connect error, timeout, broken transfer.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-2xx response with the message extracted from the server envelope.
    #[error("Server error ({status_code}): {message}")]
    Server { status_code: u16, message: String },

    /// Payload rejected by the server, with field-level messages when the
    /// envelope carries them.
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        fields: Vec<FieldError>,
    },

    /// Login or token refresh failed, or a 401 persisted after the single
    /// refresh retry.
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Client misconfiguration (missing base URL etc.).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Well-formed response that does not deserialize into the expected type.
    #[error("Decode error: {0}")]
    Decode(String),

    /// A newer fetch superseded this one; the result was discarded.
    #[error("Stale response discarded")]
    StaleResponse,

    /// A mutation targeting the same entity is still in flight.
    #[error("Entity {0} has a change still in flight")]
    MutationInFlight(EntityId),

    /// The collection view was torn down while the request was in flight.
    #[error("Collection view is closed")]
    ViewClosed,
}

/// One field-level validation message from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl TallyLinkError {
    /// `true` for the synchronous same-identifier mutation rejection.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::MutationInFlight(_))
    }

    /// `true` for errors that are internal bookkeeping and never shown
    /// to the user.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::StaleResponse | Self::ViewClosed)
    }

    /// Build a typed error from a non-2xx status and its raw body.
    ///
    /// Total over arbitrary bodies: anything unparseable degrades to a
    /// generic message carrying the status code.
    pub(crate) fn from_status_body(status: u16, body: &str) -> Self {
        let parsed: Option<Value> = serde_json::from_str(body).ok();
        let message = parsed
            .as_ref()
            .and_then(extract_message)
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    format!("HTTP {status}")
                } else {
                    truncate(body, 200)
                }
            });

        match status {
            400 | 422 => Self::Validation {
                message,
                fields: parsed.as_ref().map(extract_fields).unwrap_or_default(),
            },
            401 | 403 => Self::Authentication(message),
            _ => Self::Server {
                status_code: status,
                message,
            },
        }
    }
}

/// Pull a human-readable message out of the common error envelopes:
/// `{"error": {"message": ...}}`, `{"error": "..."}`, `{"message": "..."}`.
fn extract_message(body: &Value) -> Option<String> {
    match body.get("error") {
        Some(Value::String(s)) => return Some(s.clone()),
        Some(Value::Object(map)) => {
            if let Some(Value::String(s)) = map.get("message") {
                return Some(s.clone());
            }
        }
        _ => {}
    }
    if let Some(Value::String(s)) = body.get("message") {
        return Some(s.clone());
    }
    None
}

/// Field-level messages appear either as `{"errors": {"field": "msg"}}` or
/// `{"errors": [{"field": ..., "message": ...}]}`.
fn extract_fields(body: &Value) -> Vec<FieldError> {
    let mut fields = Vec::new();
    match body.get("errors") {
        Some(Value::Object(map)) => {
            for (field, value) in map {
                if let Value::String(message) = value {
                    fields.push(FieldError {
                        field: field.clone(),
                        message: message.clone(),
                    });
                }
            }
        }
        Some(Value::Array(entries)) => {
            for entry in entries {
                let field = entry.get("field").and_then(Value::as_str);
                let message = entry.get("message").and_then(Value::as_str);
                if let (Some(field), Some(message)) = (field, message) {
                    fields.push(FieldError {
                        field: field.to_string(),
                        message: message.to_string(),
                    });
                }
            }
        }
        _ => {}
    }
    fields
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        text.to_string()
    } else {
        let cut = text
            .char_indices()
            .take_while(|(i, _)| *i < max)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}...", &text[..cut])
    }
}

impl From<reqwest::Error> for TallyLinkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transport(format!("request timed out: {err}"))
        } else if err.is_connect() {
            Self::Transport(format!("connection failed: {err}"))
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for TallyLinkError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
