// src/error.rs
//! Failure taxonomy shared by the gateway, the orchestrators and the presenter

use serde_json::Value;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    PreconditionFailed,
    Unauthenticated,
    ClientRejected,
    TransportFailure,
}

impl FailureKind {
    pub fn code(&self) -> &'static str {
        match self {
            Self::PreconditionFailed => "PRECONDITION_FAILED",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::ClientRejected => "CLIENT_REJECTED",
            Self::TransportFailure => "TRANSPORT_FAILURE",
        }
    }

    /// Only transport failures are worth retrying as-is
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransportFailure)
    }
}

/// Outcome of a gateway call that did not succeed
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("no credential available for a protected endpoint")]
    Unauthenticated,
    #[error("request rejected with status {status}")]
    ClientRejected { status: u16, payload: Value },
    #[error("transport failure: {0}")]
    TransportFailure(String),
}

impl ApiError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ApiError::Unauthenticated => FailureKind::Unauthenticated,
            ApiError::ClientRejected { .. } => FailureKind::ClientRejected,
            ApiError::TransportFailure(_) => FailureKind::TransportFailure,
        }
    }

    /// Server-supplied message of a rejection, if it carried one
    pub fn server_message(&self) -> Option<String> {
        match self {
            ApiError::ClientRejected { payload, .. } => rejection_message(payload),
            _ => None,
        }
    }
}

pub const LOGIN_REQUIRED: &str = "Please log in first.";

/// A failed lifecycle transition with its user-facing reason
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub kind: FailureKind,
    pub reason: String,
}

impl Failure {
    pub fn new(kind: FailureKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }

    pub fn precondition(reason: impl Into<String>) -> Self {
        Self::new(FailureKind::PreconditionFailed, reason)
    }

    /// Map a gateway error onto a failure, `fallback` covers everything the
    /// server did not explain itself
    pub fn from_api(error: &ApiError, fallback: &str) -> Self {
        let reason = match error {
            ApiError::Unauthenticated => LOGIN_REQUIRED.to_string(),
            ApiError::ClientRejected { .. } => error
                .server_message()
                .unwrap_or_else(|| fallback.to_string()),
            ApiError::TransportFailure(_) => fallback.to_string(),
        };
        Self::new(error.kind(), reason)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reason)
    }
}

/// Extract a human-readable message from a 4xx payload.
///
/// Understands the usual REST framework shapes: `detail`, `error` and
/// `message` strings, `non_field_errors`, and field-level error maps such as
/// `{"username": ["This field is required."]}`.
pub fn rejection_message(payload: &Value) -> Option<String> {
    match payload {
        Value::String(text) => plain_text(text),
        Value::Array(items) => join_messages(items),
        Value::Object(map) => {
            for key in ["detail", "error", "message"] {
                if let Some(Value::String(text)) = map.get(key) {
                    if let Some(text) = non_blank(text) {
                        return Some(text);
                    }
                }
            }

            if let Some(Value::Array(items)) = map.get("non_field_errors") {
                if let Some(joined) = join_messages(items) {
                    return Some(joined);
                }
            }

            let fields: Vec<String> = map
                .iter()
                .filter_map(|(field, value)| match value {
                    Value::Array(items) => {
                        join_messages(items).map(|msg| format!("{}: {}", field, msg))
                    }
                    _ => None,
                })
                .collect();

            if fields.is_empty() {
                None
            } else {
                Some(fields.join("; "))
            }
        }
        _ => None,
    }
}

fn join_messages(items: &[Value]) -> Option<String> {
    let messages: Vec<&str> = items
        .iter()
        .filter_map(|item| item.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if messages.is_empty() {
        None
    } else {
        Some(messages.join(" "))
    }
}

const MAX_PLAIN_REJECTION: usize = 300;

/// A raw body counts as a message only when it is short plain text, never a
/// markup page
fn plain_text(text: &str) -> Option<String> {
    let text = non_blank(text)?;
    if text.starts_with('<') || text.chars().count() > MAX_PLAIN_REJECTION {
        return None;
    }
    Some(text)
}

fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
