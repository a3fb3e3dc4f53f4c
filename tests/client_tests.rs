/// Client tests against a local mock backend.
///
/// Each test starts a `tiny_http` server on an ephemeral port that answers
/// every request with one canned response and reports what it received.
use std::io::Read;
use std::net::TcpListener;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use aieo::analytics::logger::RequestLog;
use aieo::api::error::{NETWORK_ERROR, RATE_LIMITED, UNKNOWN_ERROR};
use aieo::api::{AieoApi, ApiClient, ApiError, CitationQuery};
use aieo::models::DashboardData;
use aieo::pages::{AuditPage, describe_error};
use tiny_http::{Header, Response, Server, StatusCode};

// ---------------------------------------------------------------------------
// Mock backend
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Captured {
    method: String,
    url: String,
    api_key: Option<String>,
    body: String,
}

fn mock_backend(
    status: u16,
    headers: &[(&'static str, &'static str)],
    body: &'static str,
) -> (String, Receiver<Captured>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let headers = headers.to_vec();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for mut request in server.incoming_requests() {
            let mut received = String::new();
            let _ = request.as_reader().read_to_string(&mut received);
            let api_key = request
                .headers()
                .iter()
                .find(|h| h.field.equiv("X-API-Key"))
                .map(|h| h.value.as_str().to_string());
            let _ = tx.send(Captured {
                method: request.method().to_string(),
                url: request.url().to_string(),
                api_key,
                body: received,
            });

            let mut response = Response::from_string(body).with_status_code(StatusCode(status));
            for (field, value) in &headers {
                response = response.with_header(Header::from_bytes(*field, *value).unwrap());
            }
            let _ = request.respond(response);
        }
    });

    (format!("http://{addr}/api/v1"), rx)
}

fn received(rx: &Receiver<Captured>) -> Captured {
    rx.recv_timeout(Duration::from_secs(5)).unwrap()
}

/// A base URL nothing is listening on.
fn dead_backend() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}/api/v1")
}

// ---------------------------------------------------------------------------
// Error normalization
// ---------------------------------------------------------------------------

#[test]
fn backend_error_body_passes_through() {
    let (base, _rx) = mock_backend(
        422,
        &[("Content-Type", "application/json")],
        r#"{"error": {"code": "FETCH_FAILED", "message": "Could not fetch URL"}}"#,
    );
    let client = ApiClient::new(&base);

    let err = client.dashboard().unwrap_err();
    assert_eq!(err, ApiError::new("FETCH_FAILED", "Could not fetch URL"));
}

#[test]
fn rate_limit_without_body_or_header_waits_sixty_seconds() {
    let (base, _rx) = mock_backend(429, &[], "");
    let client = ApiClient::new(&base);

    let err = client.list_patterns().unwrap_err();
    assert_eq!(err.code, RATE_LIMITED);
    assert_eq!(err.retry_after, Some(60));
    assert!(describe_error(&err).contains("Please wait 60 seconds"));
}

#[test]
fn rate_limit_honors_retry_after_header() {
    let (base, _rx) = mock_backend(429, &[("Retry-After", "5")], "");
    let client = ApiClient::new(&base);

    let err = client.dashboard().unwrap_err();
    assert_eq!(err.code, RATE_LIMITED);
    assert_eq!(err.retry_after, Some(5));
}

#[test]
fn unparseable_error_body_becomes_unknown_error() {
    let (base, _rx) = mock_backend(500, &[], "<html>oops</html>");
    let client = ApiClient::new(&base);

    let err = client.dashboard().unwrap_err();
    assert_eq!(err.code, UNKNOWN_ERROR);
    assert!(err.message.starts_with("HTTP 500"));
}

#[test]
fn unfollowed_redirect_status_is_not_success() {
    let (base, _rx) = mock_backend(300, &[], r#"{"total_citations": 5}"#);
    let client = ApiClient::new(&base);

    let err = client.dashboard().unwrap_err();
    assert_eq!(err.code, UNKNOWN_ERROR);
    assert!(err.message.starts_with("HTTP 300"), "{}", err.message);
}

#[test]
fn not_modified_without_body_reports_status_line() {
    let (base, _rx) = mock_backend(304, &[], "");
    let client = ApiClient::new(&base);

    let err = client.dashboard().unwrap_err();
    assert_eq!(err, ApiError::unknown("HTTP 304: Not Modified"));
}

#[test]
fn unreachable_backend_is_network_error() {
    let client = ApiClient::new(&dead_backend());

    let err = client.dashboard().unwrap_err();
    assert_eq!(err.code, NETWORK_ERROR);
    assert_eq!(
        describe_error(&err),
        "Unable to connect to server. Please check your connection and try again."
    );
}

// ---------------------------------------------------------------------------
// Headers and paths
// ---------------------------------------------------------------------------

#[test]
fn api_key_header_follows_set_and_clear() {
    let (base, rx) = mock_backend(200, &[], "{}");
    let mut client = ApiClient::new(&base);

    client.dashboard().unwrap();
    assert_eq!(received(&rx).api_key, None);

    client.set_api_key("k-live-1").unwrap();
    client.dashboard().unwrap();
    assert_eq!(received(&rx).api_key.as_deref(), Some("k-live-1"));

    client.clear_api_key().unwrap();
    client.dashboard().unwrap();
    assert_eq!(received(&rx).api_key, None);
}

#[test]
fn citations_filters_reach_the_backend() {
    let (base, rx) = mock_backend(200, &[], r#"{"data": [], "pagination": {"has_more": false}}"#);
    let client = ApiClient::new(&base);

    let query = CitationQuery {
        engine: Some("perplexity".to_string()),
        limit: Some(10),
        ..CitationQuery::default()
    };
    let page = client.citations(&query).unwrap();
    assert!(page.data.is_empty());

    let request = received(&rx);
    assert_eq!(request.method, "GET");
    assert_eq!(request.url, "/api/v1/aieo/citations?engine=perplexity&limit=10");
}

#[test]
fn apply_pattern_posts_content() {
    let (base, rx) = mock_backend(
        200,
        &[],
        r##"{"optimized_content": "# Done", "pattern_id": "faq_injection", "pattern_name": "FAQ Injection"}"##,
    );
    let client = ApiClient::new(&base);

    let applied = client.apply_pattern("faq_injection", "# Draft").unwrap();
    assert_eq!(applied.optimized_content, "# Done");

    let request = received(&rx);
    assert_eq!(request.method, "POST");
    assert_eq!(request.url, "/api/v1/aieo/patterns/faq_injection/apply");
    assert_eq!(request.body, r##"{"content":"# Draft"}"##);
}

#[test]
fn empty_success_body_is_accepted_as_null() {
    let (base, _rx) = mock_backend(204, &[], "");
    let client = ApiClient::new(&base);

    let value: Option<DashboardData> = client.get("/aieo/dashboard").unwrap();
    assert!(value.is_none());
}

// ---------------------------------------------------------------------------
// Request log
// ---------------------------------------------------------------------------

#[test]
fn requests_are_logged_without_query() {
    let dir = tempfile::tempdir().unwrap();
    let log = RequestLog::at(dir.path().join("request-log.jsonl"));
    let (base, _rx) = mock_backend(429, &[], "");
    let client = ApiClient::new(&base).with_request_log(log.clone());

    let _ = client.citations(&CitationQuery {
        domain: Some("x.com".to_string()),
        ..CitationQuery::default()
    });

    let entries = log.read_all();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].method, "GET");
    assert_eq!(entries[0].path, "/aieo/citations");
    assert_eq!(entries[0].status, Some(429));
    assert!(!entries[0].success);
    assert_eq!(entries[0].error_code.as_deref(), Some(RATE_LIMITED));
}

// ---------------------------------------------------------------------------
// End to end through a page
// ---------------------------------------------------------------------------

#[test]
fn audit_page_against_backend_shows_top_five_gaps() {
    let (base, rx) = mock_backend(
        200,
        &[("Content-Type", "application/json")],
        r#"{"score": 72, "grade": "B", "gaps": [
            {"category": "structure", "severity": "high", "description": "gap 1"},
            {"category": "structure", "severity": "high", "description": "gap 2"},
            {"category": "evidence", "severity": "medium", "description": "gap 3"},
            {"category": "evidence", "severity": "medium", "description": "gap 4"},
            {"category": "freshness", "severity": "low", "description": "gap 5"},
            {"category": "freshness", "severity": "low", "description": "gap 6"},
            {"category": "freshness", "severity": "low", "description": "gap 7"}
        ]}"#,
    );
    let client = ApiClient::new(&base);

    let mut page = AuditPage::new();
    page.set_url("https://example.com/post");
    page.submit(&client);

    assert_eq!(page.error(), None);
    let result = page.result().unwrap();
    assert_eq!(result.score, 72.0);
    assert_eq!(result.grade, "B");
    assert_eq!(page.visible_gaps().len(), 5);

    let html = page.render();
    assert!(html.contains(r#"<div class="score-value">72</div>"#));
    assert!(html.contains("gap 5"));
    assert!(!html.contains("gap 6"));

    let request = received(&rx);
    assert_eq!(request.url, "/api/v1/aieo/audit");
    assert_eq!(request.body, r#"{"url":"https://example.com/post"}"#);
}
