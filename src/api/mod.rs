/// AIEO backend API: HTTP client, normalized errors, API key storage and
/// typed endpoint bindings.
///
/// Pages and CLI commands depend on the [`AieoApi`] trait rather than on
/// [`ApiClient`] directly, so they can be driven by a stub in tests.
pub mod client;
pub mod endpoints;
pub mod error;
pub mod key_store;

pub use client::ApiClient;
pub use endpoints::{AuditRequest, CitationQuery, OptimizeRequest};
pub use error::ApiError;
pub use key_store::KeyStore;

use crate::models::{
    AppliedPattern, AuditResult, CitationPage, DashboardData, OptimizeResult, PatternList,
};

/// The domain operations the backend exposes.
pub trait AieoApi {
    /// `POST /aieo/audit`
    fn audit(&self, request: &AuditRequest) -> Result<AuditResult, ApiError>;

    /// `POST /aieo/optimize`
    fn optimize(&self, request: &OptimizeRequest) -> Result<OptimizeResult, ApiError>;

    /// `GET /aieo/patterns`
    fn list_patterns(&self) -> Result<PatternList, ApiError>;

    /// `POST /aieo/patterns/{id}/apply`
    fn apply_pattern(&self, pattern_id: &str, content: &str) -> Result<AppliedPattern, ApiError>;

    /// `GET /aieo/citations`
    fn citations(&self, query: &CitationQuery) -> Result<CitationPage, ApiError>;

    /// `GET /aieo/dashboard`
    fn dashboard(&self) -> Result<DashboardData, ApiError>;
}
