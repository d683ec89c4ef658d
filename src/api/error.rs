//! Error normalization for API calls.
//!
//! Every failed request passes through [`ApiError::from_response`] or
//! [`ApiError::network`], which log what went wrong and classify it into a
//! small closed set of [`ErrorKind`]s. What the user is shown stays coarse:
//! one generic message, except for registration, which surfaces the first
//! validation message the server returned.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Message shown for every failure outside of registration.
pub const GENERIC_ERROR_MESSAGE: &str = "Something bad happened; please try again later.";

/// Fallback shown when a failed registration carries no validation message.
pub const REGISTRATION_FALLBACK_MESSAGE: &str = "An error occurred";

/// Error kinds callers can react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Unauthorized,
    Validation,
    Server,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Network => "network",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Validation => "validation",
            ErrorKind::Server => "server",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Not logged in")]
    NoSession,

    #[error("Server rejected credentials ({status})")]
    Unauthorized { status: StatusCode, body: String },

    #[error("Validation failed ({status}): {}", messages.join("; "))]
    Validation {
        status: StatusCode,
        messages: Vec<String>,
    },

    #[error("Server returned error {status}: {body}")]
    Server { status: StatusCode, body: String },

    #[error("Failed to parse server response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Transport-level failure: no response was received.
    pub(crate) fn network(err: reqwest::Error) -> Self {
        tracing::error!(error = %err, "Some error occurred");
        ApiError::Network(err)
    }

    /// Classify a non-success response from its status and body.
    pub(crate) fn from_response(status: StatusCode, body: String) -> Self {
        tracing::error!(status = status.as_u16(), body = %body, "API request failed");

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return ApiError::Unauthorized { status, body };
        }

        if status.is_client_error() {
            if let Some(messages) = validation_messages(&body) {
                return ApiError::Validation { status, messages };
            }
        }

        ApiError::Server { status, body }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Network(_) => ErrorKind::Network,
            ApiError::NoSession | ApiError::Unauthorized { .. } => ErrorKind::Unauthorized,
            ApiError::Validation { .. } => ErrorKind::Validation,
            ApiError::Server { .. } | ApiError::Decode(_) => ErrorKind::Server,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Unauthorized { status, .. }
            | ApiError::Validation { status, .. }
            | ApiError::Server { status, .. } => Some(*status),
            ApiError::Network(err) => err.status(),
            ApiError::NoSession | ApiError::Decode(_) => None,
        }
    }

    /// The message shown to the user for any non-registration failure.
    pub fn user_message(&self) -> &'static str {
        GENERIC_ERROR_MESSAGE
    }

    /// The message shown to the user when registration fails.
    pub fn registration_message(&self) -> String {
        match self {
            ApiError::Validation { messages, .. } => messages
                .first()
                .cloned()
                .unwrap_or_else(|| REGISTRATION_FALLBACK_MESSAGE.to_string()),
            _ => REGISTRATION_FALLBACK_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ValidationEntry {
    msg: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ValidationBody {
    errors: Option<Vec<ValidationEntry>>,
    error: Option<Box<ValidationBody>>,
}

/// Extract `errors[].msg`, found either at the top level of the body or
/// nested under an `error` object.
fn validation_messages(body: &str) -> Option<Vec<String>> {
    let parsed: ValidationBody = serde_json::from_str(body).ok()?;
    let errors = match parsed.errors {
        Some(errors) => errors,
        None => parsed.error?.errors?,
    };
    Some(errors.into_iter().filter_map(|e| e.msg).collect())
}
