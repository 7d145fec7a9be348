//! Error types for the Stripe API client core.
//!
//! # Design
//! Every failure a call can produce is one variant of `StripeError`, so the
//! caller can decide between retrying, displaying, or fixing code without
//! string matching. Upstream rejections keep the decoded error envelope in
//! `ApiError`; a 2xx response whose body does not match the expected schema is
//! a `SchemaViolation`, unless the body is itself an error envelope.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::endpoint::{Action, Resource};

/// Result alias used throughout the crate.
pub type StripeResult<T> = Result<T, StripeError>;

/// Errors returned by the encoder, resolver, decoder and dispatcher.
#[derive(Debug, Error)]
pub enum StripeError {
    /// The (resource, action) pair is not registered, or the identifier does
    /// not fit the action. Always a programmer error.
    #[error("unknown endpoint: {action:?} on {resource:?}")]
    UnknownEndpoint { resource: Resource, action: Action },

    /// The transport could not complete the round-trip.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The upstream answered with a non-success status or an error envelope.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The upstream answered 2xx but the body does not fit the schema,
    /// including a list envelope where one record was expected or the
    /// reverse.
    #[error("schema violation at {path}: {message}")]
    SchemaViolation { path: String, message: String },

    /// A header name or value could not be represented on the wire.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// Missing or invalid client configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl StripeError {
    pub fn schema(path: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::SchemaViolation {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// HTTP status attached to the error, if the upstream produced one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(err) => err.status,
            _ => None,
        }
    }

    /// Whether a caller-supplied retry policy may reasonably try again.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Api(err) => matches!(err.status, Some(429) | Some(500..=599)),
            Self::UnknownEndpoint { .. }
            | Self::SchemaViolation { .. }
            | Self::InvalidHeader(_)
            | Self::Config(_) => false,
        }
    }

    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self.status(), Some(400..=499))
    }
}

/// Connectivity failures reported by a `Transport`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Other(String),
}

/// A rejection reported by the upstream API.
///
/// Decoded from the `{"error": {...}}` envelope. When the body carries no
/// usable envelope, `error_type` is `api_error` and `message` holds whatever
/// the upstream sent, so the value is always complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub param: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (HTTP {status}): {}", self.error_type, self.message),
            None => write!(f, "{}: {}", self.error_type, self.message),
        }
    }
}

impl std::error::Error for ApiError {}
