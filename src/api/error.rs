//! Normalized API error and the status/body normalization rules.
//!
//! Every failure the client can observe (HTTP status, malformed body,
//! transport failure) is folded into one [`ApiError`] shape:
//! `{ code, message, retry_after? }`. Backend-supplied codes pass through
//! unchanged; the client only synthesizes the four codes below.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const RATE_LIMITED: &str = "RATE_LIMITED";
pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
pub const CONTENT_TOO_LARGE: &str = "CONTENT_TOO_LARGE";
pub const UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";

/// Seconds to wait when a 429 carries no usable `Retry-After` header.
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

const NETWORK_MESSAGE: &str = "Unable to connect to server. Please check your connection.";

/// A normalized API failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{code}: {message}")]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

/// Classification of [`ApiError::code`] for callers that branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    RateLimited,
    Network,
    ContentTooLarge,
    /// Any other code, including `UNKNOWN_ERROR` and backend-specific ones.
    Other,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            retry_after: None,
        }
    }

    /// The error for a request that never produced an HTTP response.
    pub fn network() -> Self {
        Self::new(NETWORK_ERROR, NETWORK_MESSAGE)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(UNKNOWN_ERROR, message)
    }

    pub fn kind(&self) -> ErrorKind {
        match self.code.as_str() {
            RATE_LIMITED => ErrorKind::RateLimited,
            NETWORK_ERROR => ErrorKind::Network,
            CONTENT_TOO_LARGE => ErrorKind::ContentTooLarge,
            _ => ErrorKind::Other,
        }
    }
}

// ---------------------------------------------------------------------------
// Error body shapes
// ---------------------------------------------------------------------------

/// Top-level error body. The backend emits `{"error": {...}}` from its own
/// handlers and `{"detail": ...}` from framework-raised exceptions.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<ErrorBody>,
    #[serde(default)]
    detail: Option<Detail>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Detail {
    Wrapped { error: ErrorBody },
    Message(String),
    Other(serde_json::Value),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    retry_after: Option<serde_json::Value>,
}

impl ErrorBody {
    fn into_api_error(self) -> ApiError {
        ApiError {
            code: self.code.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            message: self.message.unwrap_or_default(),
            retry_after: self.retry_after.as_ref().and_then(json_seconds),
        }
    }
}

/// Accept `60`, `60.0` and `"60"` for `retry_after`.
fn json_seconds(value: &serde_json::Value) -> Option<u64> {
    match value {
        serde_json::Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f as u64)),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parse a JSON error body. Returns `None` when the body is empty, not JSON,
/// or JSON without a recognizable error shape.
pub fn parse_error_body(body: &str) -> Option<ApiError> {
    if body.trim().is_empty() {
        return None;
    }
    let envelope: ErrorEnvelope = serde_json::from_str(body).ok()?;

    if let Some(error) = envelope.error {
        return Some(error.into_api_error());
    }

    match envelope.detail? {
        Detail::Wrapped { error } => Some(error.into_api_error()),
        Detail::Message(message) => Some(ApiError::unknown(message)),
        Detail::Other(_) => None,
    }
}

/// Parse a `Retry-After` header value in seconds, defaulting to 60.
pub fn parse_retry_after(header: Option<&str>) -> u64 {
    header
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

/// Normalize a non-2xx response into an [`ApiError`].
///
/// - 429: a parsed body wins (inheriting the header's wait time when it has
///   none); otherwise `RATE_LIMITED` is synthesized.
/// - anything else: a parsed body wins; otherwise `UNKNOWN_ERROR` with
///   `HTTP <status>: <statusText>`.
pub fn from_response(
    status: u16,
    status_text: &str,
    retry_after_header: Option<&str>,
    body: Option<&str>,
) -> ApiError {
    let parsed = body.and_then(parse_error_body);

    if status == 429 {
        let retry_after = parse_retry_after(retry_after_header);
        return match parsed {
            Some(mut error) => {
                error.retry_after.get_or_insert(retry_after);
                error
            }
            None => ApiError {
                code: RATE_LIMITED.to_string(),
                message: format!("Rate limit exceeded. Retry after {retry_after} seconds."),
                retry_after: Some(retry_after),
            },
        };
    }

    parsed.unwrap_or_else(|| ApiError::unknown(format!("HTTP {status}: {status_text}")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
