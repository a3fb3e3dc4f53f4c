//! Page view-controllers.
//!
//! Every page follows one shape:
//! - local form state,
//! - a submit (or load-on-mount) handler that clears the previous
//!   error/result, calls one [`AieoApi`](crate::api::AieoApi) binding and
//!   stores either the result or a classified error message,
//! - rendering for the loading / error / result / empty states.
//!
//! Pages render HTML fragments for the web shell; the CLI reads the same
//! state and prints it to the terminal.

pub mod audit;
pub mod dashboard;
pub mod home;
pub mod optimize;
pub mod patterns;

pub use audit::AuditPage;
pub use dashboard::DashboardPage;
pub use home::HomePage;
pub use optimize::{OptimizePage, OptimizeStyle};
pub use patterns::PatternsPage;

use crate::api::error::{ApiError, DEFAULT_RETRY_AFTER_SECS, ErrorKind};

pub const GENERIC_ERROR: &str = "An error occurred";

// ---------------------------------------------------------------------------
// Error classification
// ---------------------------------------------------------------------------

/// Turn a normalized API error into the message a page shows inline.
pub fn describe_error(err: &ApiError) -> String {
    describe_error_or(err, GENERIC_ERROR)
}

/// Like [`describe_error`], with a page-specific fallback for errors that
/// carry no message.
pub fn describe_error_or(err: &ApiError, fallback: &str) -> String {
    let message = if err.message.trim().is_empty() {
        fallback
    } else {
        err.message.as_str()
    };

    match err.kind() {
        ErrorKind::RateLimited => {
            let wait = err.retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            format!("{message} Please wait {wait} seconds before trying again.")
        }
        ErrorKind::Network => {
            "Unable to connect to server. Please check your connection and try again.".to_string()
        }
        ErrorKind::ContentTooLarge => {
            "Content is too large. Please split into smaller sections.".to_string()
        }
        ErrorKind::Other => message.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Load-on-mount state
// ---------------------------------------------------------------------------

/// State of a page that fetches its data when it is opened.
#[derive(Debug, Clone, PartialEq)]
pub enum Load<T> {
    Loading,
    Failed(String),
    Ready(T),
}

impl<T> Load<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering helpers
// ---------------------------------------------------------------------------

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_error(message: &str) -> String {
    format!(
        r#"<div class="error-message"><strong>Error:</strong> {}</div>"#,
        escape_html(message)
    )
}

/// Submit button, disabled with a progress label while a request is out.
fn render_submit(loading: bool, idle_label: &str, busy_label: &str) -> String {
    if loading {
        format!(r#"<button type="submit" class="btn btn-primary" disabled>{busy_label}</button>"#)
    } else {
        format!(r#"<button type="submit" class="btn btn-primary">{idle_label}</button>"#)
    }
}

fn disabled_attr(loading: bool) -> &'static str {
    if loading { " disabled" } else { "" }
}

/// An API stub that fails the test if any binding is called.
#[cfg(test)]
pub(crate) struct NoNetwork;

#[cfg(test)]
impl crate::api::AieoApi for NoNetwork {
    fn audit(
        &self,
        _: &crate::api::AuditRequest,
    ) -> Result<crate::models::AuditResult, ApiError> {
        panic!("audit must not be called")
    }

    fn optimize(
        &self,
        _: &crate::api::OptimizeRequest,
    ) -> Result<crate::models::OptimizeResult, ApiError> {
        panic!("optimize must not be called")
    }

    fn list_patterns(&self) -> Result<crate::models::PatternList, ApiError> {
        panic!("list_patterns must not be called")
    }

    fn apply_pattern(&self, _: &str, _: &str) -> Result<crate::models::AppliedPattern, ApiError> {
        panic!("apply_pattern must not be called")
    }

    fn citations(
        &self,
        _: &crate::api::CitationQuery,
    ) -> Result<crate::models::CitationPage, ApiError> {
        panic!("citations must not be called")
    }

    fn dashboard(&self) -> Result<crate::models::DashboardData, ApiError> {
        panic!("dashboard must not be called")
    }
}
