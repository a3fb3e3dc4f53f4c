/// Web shell routing tests.
///
/// Exercises `web::dispatch` directly with a canned backend: route
/// resolution, active navigation, form submission and load-on-open pages.
use aieo::api::{AieoApi, ApiError, AuditRequest, CitationQuery, OptimizeRequest};
use aieo::models::{
    AppliedPattern, AuditResult, CitationBoost, CitationPage, DashboardData, OptimizeResult,
    Pattern, PatternList,
};
use aieo::web::dispatch;
use tiny_http::Method;

struct CannedApi;

impl AieoApi for CannedApi {
    fn audit(&self, request: &AuditRequest) -> Result<AuditResult, ApiError> {
        let grade = if request.url.is_some() { "A" } else { "C" };
        Ok(AuditResult {
            score: 88.0,
            grade: grade.to_string(),
            gaps: vec![],
            benchmark: None,
        })
    }

    fn optimize(&self, request: &OptimizeRequest) -> Result<OptimizeResult, ApiError> {
        Ok(OptimizeResult {
            optimized_content: format!("{} (optimized)", request.content),
            score_before: 50.0,
            score_after: 70.0,
            uplift: 20.0,
            changes: vec![],
        })
    }

    fn list_patterns(&self) -> Result<PatternList, ApiError> {
        Ok(PatternList {
            patterns: vec![Pattern {
                id: "faq_injection".to_string(),
                name: "FAQ Injection".to_string(),
                category: "content".to_string(),
                description: "Answer questions inline".to_string(),
                citation_boost: Some(CitationBoost { min: 15.0, max: 25.0 }),
            }],
        })
    }

    fn apply_pattern(&self, _: &str, _: &str) -> Result<AppliedPattern, ApiError> {
        Err(ApiError::unknown("not used"))
    }

    fn citations(&self, _: &CitationQuery) -> Result<CitationPage, ApiError> {
        Ok(CitationPage::default())
    }

    fn dashboard(&self) -> Result<DashboardData, ApiError> {
        Err(ApiError::new("DB_DOWN", ""))
    }
}

#[test]
fn home_has_no_active_nav_link() {
    let reply = dispatch(&CannedApi, &Method::Get, "/", None);
    assert_eq!(reply.status, 200);
    assert!(reply.body.contains("class=\"nav-logo\""));
    assert!(!reply.body.contains("class=\"active\""));
}

#[test]
fn each_page_marks_its_own_link_active() {
    for (path, label) in [
        ("/audit", "Audit"),
        ("/optimize", "Optimize"),
        ("/dashboard", "Dashboard"),
        ("/patterns", "Patterns"),
    ] {
        let reply = dispatch(&CannedApi, &Method::Get, path, None);
        let active = format!("<a href=\"{path}\" class=\"active\">{label}</a>");
        assert!(reply.body.contains(&active), "{path} not active");
        assert_eq!(reply.body.matches("class=\"active\"").count(), 1);
    }
}

#[test]
fn unknown_path_is_not_found() {
    let reply = dispatch(&CannedApi, &Method::Get, "/nope", None);
    assert_eq!(reply.status, 404);
    assert!(reply.body.contains("Page not found"));
}

#[test]
fn post_to_load_only_page_is_rejected() {
    let reply = dispatch(&CannedApi, &Method::Post, "/dashboard", Some(""));
    assert_eq!(reply.status, 405);
}

#[test]
fn audit_form_post_prefers_url() {
    let body = "url=https%3A%2F%2Fexample.com&content=%23+Draft";
    let reply = dispatch(&CannedApi, &Method::Post, "/audit", Some(body));
    assert_eq!(reply.status, 200);
    assert!(reply.body.contains("Grade: A"));
}

#[test]
fn audit_form_post_with_content_only() {
    let reply = dispatch(&CannedApi, &Method::Post, "/audit", Some("url=&content=%23+Draft"));
    assert!(reply.body.contains("Grade: C"));
}

#[test]
fn audit_form_post_blank_shows_validation_error() {
    let reply = dispatch(&CannedApi, &Method::Post, "/audit", Some("url=&content="));
    assert!(reply.body.contains("Please provide either a URL or content"));
    assert!(!reply.body.contains("audit-result"));
}

#[test]
fn optimize_form_post_renders_uplift() {
    let body = "content=%23+Draft&style=aggressive";
    let reply = dispatch(&CannedApi, &Method::Post, "/optimize", Some(body));
    assert!(reply.body.contains("+20 points"));
    assert!(reply.body.contains("# Draft (optimized)"));
    assert!(reply.body.contains(r#"<option value="aggressive" selected>"#));
}

#[test]
fn patterns_page_loads_cards() {
    let reply = dispatch(&CannedApi, &Method::Get, "/patterns", None);
    assert!(reply.body.contains("FAQ Injection"));
    assert!(reply.body.contains("Citation boost: 15% - 25%"));
}

#[test]
fn dashboard_failure_uses_page_fallback() {
    let reply = dispatch(&CannedApi, &Method::Get, "/dashboard", None);
    assert_eq!(reply.status, 200);
    assert!(reply.body.contains("Failed to load dashboard"));
}
