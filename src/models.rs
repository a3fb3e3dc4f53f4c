/// Response records exchanged with the AIEO backend.
///
/// Every record is an immutable value received from the API and held only for
/// the lifetime of a page visit or CLI invocation. Collections default to
/// empty so that partially populated responses still deserialize, and field
/// aliases accept the shapes the backend actually emits (`by_engine`,
/// `count`, `citation_rate`).
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Audit
// ---------------------------------------------------------------------------

/// Result of `POST /aieo/audit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditResult {
    pub score: f64,
    pub grade: String,
    /// Ordered most-important first.
    #[serde(default)]
    pub gaps: Vec<Gap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benchmark: Option<Benchmark>,
}

/// Percentile ranking against comparable content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Benchmark {
    pub percentile: f64,
    #[serde(default)]
    pub engine_scores: BTreeMap<String, f64>,
}

/// A detected deficiency in submitted content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    #[serde(default)]
    pub id: String,
    pub category: String,
    pub severity: Severity,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Span>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_fix: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// Character offsets into the submitted text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

// ---------------------------------------------------------------------------
// Optimize
// ---------------------------------------------------------------------------

/// Result of `POST /aieo/optimize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeResult {
    #[serde(default)]
    pub optimized_content: String,
    pub score_before: f64,
    pub score_after: f64,
    #[serde(default)]
    pub uplift: f64,
    #[serde(default)]
    pub changes: Vec<Change>,
}

/// One edit the optimizer made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    #[serde(default)]
    pub location: Span,
    #[serde(default)]
    pub original_text: String,
    #[serde(default)]
    pub optimized_text: String,
    #[serde(default)]
    pub expected_uplift: f64,
}

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

/// A named, reusable content technique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation_boost: Option<CitationBoost>,
}

/// Estimated citation-boost range, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CitationBoost {
    pub min: f64,
    pub max: f64,
}

/// Envelope returned by `GET /aieo/patterns`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternList {
    #[serde(default)]
    pub patterns: Vec<Pattern>,
}

/// Result of `POST /aieo/patterns/{id}/apply`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedPattern {
    pub optimized_content: String,
    #[serde(default)]
    pub pattern_id: String,
    #[serde(default)]
    pub pattern_name: String,
}

// ---------------------------------------------------------------------------
// Citations
// ---------------------------------------------------------------------------

/// Aggregated citation metrics from `GET /aieo/dashboard`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    #[serde(default)]
    pub total_citations: u64,
    #[serde(default, alias = "by_engine")]
    pub citations_by_engine: BTreeMap<String, u64>,
    /// Ranked most-cited first.
    #[serde(default)]
    pub top_cited_pages: Vec<CitedPage>,
    #[serde(default, alias = "citation_rate")]
    pub citation_trend: Vec<TrendPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitedPage {
    pub url: String,
    #[serde(default, alias = "count")]
    pub citation_count: u64,
    #[serde(default)]
    pub engines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub count: u64,
}

/// A single tracked citation of a page by an AI engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    #[serde(default)]
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub domain: String,
    pub engine: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub citation_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub detected_at: String,
}

/// Envelope returned by `GET /aieo/citations`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CitationPage {
    #[serde(default)]
    pub data: Vec<Citation>,
    #[serde(default)]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub total_count: u64,
}

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

/// Format a score, dropping the fractional part when it is integral
/// (`72.0` → `"72"`, `72.5` → `"72.5"`).
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.0}")
    } else {
        format!("{score:.1}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audit_result_parses_with_gaps_and_benchmark() {
        let json = r#"{
            "score": 72,
            "grade": "B",
            "gaps": [
                {"id": "g1", "category": "structure", "severity": "high",
                 "description": "No tables", "location": {"start": 0, "end": 10},
                 "example_fix": "Add a comparison table"}
            ],
            "benchmark": {"percentile": 81.5, "engine_scores": {"grok": 70}}
        }"#;
        let result: AuditResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.score, 72.0);
        assert_eq!(result.grade, "B");
        assert_eq!(result.gaps[0].severity, Severity::High);
        assert_eq!(result.gaps[0].location, Some(Span { start: 0, end: 10 }));
        assert_eq!(result.benchmark.unwrap().engine_scores["grok"], 70.0);
    }

    #[test]
    fn audit_result_tolerates_missing_gaps() {
        let result: AuditResult = serde_json::from_str(r#"{"score": 10, "grade": "F"}"#).unwrap();
        assert!(result.gaps.is_empty());
        assert!(result.benchmark.is_none());
    }

    #[test]
    fn unknown_severity_is_rejected() {
        let json = r#"{"category": "x", "severity": "critical", "description": "d"}"#;
        assert!(serde_json::from_str::<Gap>(json).is_err());
    }

    #[test]
    fn change_reads_type_field() {
        let json = r#"{"type": "table", "description": "Converted list",
                       "location": {"start": 3, "end": 9}, "original_text": "a",
                       "optimized_text": "b", "expected_uplift": 4.5}"#;
        let change: Change = serde_json::from_str(json).unwrap();
        assert_eq!(change.kind, "table");
        assert_eq!(change.expected_uplift, 4.5);
    }

    #[test]
    fn dashboard_accepts_backend_aliases() {
        let json = r#"{
            "citation_rate": [{"date": "2026-10-01", "count": 3}],
            "by_engine": {"perplexity": 4, "grok": 2},
            "top_cited_pages": [{"url": "https://x.com/a", "count": 5}]
        }"#;
        let data: DashboardData = serde_json::from_str(json).unwrap();
        assert_eq!(data.citations_by_engine["perplexity"], 4);
        assert_eq!(data.top_cited_pages[0].citation_count, 5);
        assert!(data.top_cited_pages[0].engines.is_empty());
        assert_eq!(data.citation_trend.len(), 1);
        assert_eq!(data.total_citations, 0);
    }

    #[test]
    fn pattern_boost_is_optional() {
        let json = r#"{"patterns": [
            {"id": "faq_injection", "name": "FAQ Injection", "category": "content",
             "description": "Answer questions inline", "citation_boost": {"min": 15, "max": 25}},
            {"id": "bare", "name": "Bare"}
        ]}"#;
        let list: PatternList = serde_json::from_str(json).unwrap();
        assert_eq!(list.patterns.len(), 2);
        assert_eq!(list.patterns[0].citation_boost.unwrap().max, 25.0);
        assert!(list.patterns[1].citation_boost.is_none());
    }

    #[test]
    fn citation_page_parses_pagination() {
        let json = r#"{"data": [{"url": "https://x.com", "engine": "grok", "position": 2}],
                       "pagination": {"next_cursor": null, "has_more": false, "total_count": 1}}"#;
        let page: CitationPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.data[0].position, Some(2));
        assert_eq!(page.pagination.total_count, 1);
    }

    #[test]
    fn format_score_drops_integral_fraction() {
        assert_eq!(format_score(72.0), "72");
        assert_eq!(format_score(72.5), "72.5");
        assert_eq!(format_score(0.0), "0");
    }
}
