//! Typed endpoint bindings.
//!
//! Each binding composes a path and payload and delegates to
//! [`ApiClient`]. No validation, transformation or caching happens here.

use serde::Serialize;

use super::AieoApi;
use super::client::ApiClient;
use super::error::ApiError;
use crate::models::{
    AppliedPattern, AuditResult, CitationPage, DashboardData, OptimizeResult, PatternList,
};

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

/// Body of `POST /aieo/audit`. Exactly one of `url` / `content` is expected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl AuditRequest {
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn for_markdown(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            format: Some("markdown".to_string()),
            ..Self::default()
        }
    }
}

/// Body of `POST /aieo/optimize`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OptimizeRequest {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_engines: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

#[derive(Debug, Serialize)]
struct ApplyPatternRequest<'a> {
    content: &'a str,
}

/// Filters for `GET /aieo/citations`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CitationQuery {
    pub url: Option<String>,
    pub domain: Option<String>,
    pub engine: Option<String>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

impl CitationQuery {
    /// Form-urlencoded query string without the leading `?`, parameters in
    /// the order url, domain, engine, limit, cursor.
    pub fn to_query_string(&self) -> String {
        let limit = self.limit.map(|l| l.to_string());
        let params = [
            ("url", self.url.as_deref()),
            ("domain", self.domain.as_deref()),
            ("engine", self.engine.as_deref()),
            ("limit", limit.as_deref()),
            ("cursor", self.cursor.as_deref()),
        ];

        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in params {
            if let Some(value) = value {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }

    /// Request path including the query string, if any.
    pub fn path(&self) -> String {
        let query = self.to_query_string();
        if query.is_empty() {
            "/aieo/citations".to_string()
        } else {
            format!("/aieo/citations?{query}")
        }
    }
}

pub fn apply_pattern_path(pattern_id: &str) -> String {
    format!("/aieo/patterns/{pattern_id}/apply")
}

// ---------------------------------------------------------------------------
// Bindings
// ---------------------------------------------------------------------------

impl AieoApi for ApiClient {
    fn audit(&self, request: &AuditRequest) -> Result<AuditResult, ApiError> {
        self.post("/aieo/audit", request)
    }

    fn optimize(&self, request: &OptimizeRequest) -> Result<OptimizeResult, ApiError> {
        self.post("/aieo/optimize", request)
    }

    fn list_patterns(&self) -> Result<PatternList, ApiError> {
        self.get("/aieo/patterns")
    }

    fn apply_pattern(&self, pattern_id: &str, content: &str) -> Result<AppliedPattern, ApiError> {
        self.post(
            &apply_pattern_path(pattern_id),
            &ApplyPatternRequest { content },
        )
    }

    fn citations(&self, query: &CitationQuery) -> Result<CitationPage, ApiError> {
        self.get(&query.path())
    }

    fn dashboard(&self) -> Result<DashboardData, ApiError> {
        self.get("/aieo/dashboard")
    }
}
