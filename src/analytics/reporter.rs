//! Request history reporter: aggregation over the JSONL request log.
//!
//! Provides the summary behind `aieo history`: totals, success rate,
//! per-endpoint counts and latency, per-error-code counts, and a daily trend.

use std::collections::HashMap;

use serde::Serialize;

use crate::analytics::logger::{RequestLog, RequestLogEntry};

// ---------------------------------------------------------------------------
// Aggregated history
// ---------------------------------------------------------------------------

/// Summary statistics for `aieo history`.
#[derive(Debug, Default, Serialize)]
pub struct History {
    pub total_requests: usize,
    pub successful: usize,
    pub success_pct: f64,
    pub endpoints: Vec<EndpointStat>,
    pub error_codes: Vec<ErrorCodeStat>,
    pub daily: Vec<DailyEntry>,
}

/// Per-endpoint aggregate, keyed by `METHOD path`.
#[derive(Debug, Clone, Serialize)]
pub struct EndpointStat {
    pub endpoint: String,
    pub count: usize,
    pub failures: usize,
    pub avg_latency_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorCodeStat {
    pub code: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyEntry {
    pub date: String,
    pub requests: usize,
    pub failures: usize,
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// Compute history from the given log, optionally limited to the last
/// `days` days.
pub fn compute_history(log: &RequestLog, days: Option<u32>) -> History {
    build_history(&log.read_since_days(days))
}

pub fn build_history(entries: &[RequestLogEntry]) -> History {
    if entries.is_empty() {
        return History::default();
    }

    let total_requests = entries.len();
    let successful = entries.iter().filter(|e| e.success).count();
    let success_pct = (successful as f64 / total_requests as f64) * 100.0;

    History {
        total_requests,
        successful,
        success_pct,
        endpoints: compute_endpoint_stats(entries),
        error_codes: compute_error_codes(entries),
        daily: compute_daily(entries),
    }
}

/// Group by `METHOD path`, most-used first.
fn compute_endpoint_stats(entries: &[RequestLogEntry]) -> Vec<EndpointStat> {
    let mut groups: HashMap<String, Vec<&RequestLogEntry>> = HashMap::new();
    for entry in entries {
        let key = format!("{} {}", entry.method, entry.path);
        groups.entry(key).or_default().push(entry);
    }

    let mut stats: Vec<EndpointStat> = groups
        .into_iter()
        .map(|(endpoint, group)| {
            let count = group.len();
            let failures = group.iter().filter(|e| !e.success).count();
            let avg_latency_ms =
                group.iter().map(|e| e.latency_ms as f64).sum::<f64>() / count as f64;

            EndpointStat {
                endpoint,
                count,
                failures,
                avg_latency_ms,
            }
        })
        .collect();

    stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.endpoint.cmp(&b.endpoint)));
    stats
}

fn compute_error_codes(entries: &[RequestLogEntry]) -> Vec<ErrorCodeStat> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for code in entries.iter().filter_map(|e| e.error_code.as_deref()) {
        *counts.entry(code).or_default() += 1;
    }

    let mut codes: Vec<ErrorCodeStat> = counts
        .into_iter()
        .map(|(code, count)| ErrorCodeStat {
            code: code.to_string(),
            count,
        })
        .collect();

    codes.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.code.cmp(&b.code)));
    codes
}

fn compute_daily(entries: &[RequestLogEntry]) -> Vec<DailyEntry> {
    let mut daily: HashMap<String, Vec<&RequestLogEntry>> = HashMap::new();
    for entry in entries {
        // RFC 3339; the first 10 chars are YYYY-MM-DD
        let date = entry.timestamp.get(..10).unwrap_or("unknown").to_string();
        daily.entry(date).or_default().push(entry);
    }

    let mut days: Vec<DailyEntry> = daily
        .into_iter()
        .map(|(date, group)| DailyEntry {
            date,
            requests: group.len(),
            failures: group.iter().filter(|e| !e.success).count(),
        })
        .collect();

    days.sort_by(|a, b| a.date.cmp(&b.date));
    days
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(ts: &str, method: &str, path: &str, code: Option<&str>, latency_ms: u64) -> RequestLogEntry {
        RequestLogEntry {
            timestamp: ts.to_string(),
            method: method.to_string(),
            path: path.to_string(),
            status: Some(if code.is_some() { 500 } else { 200 }),
            success: code.is_none(),
            error_code: code.map(|c| c.to_string()),
            latency_ms,
        }
    }

    fn sample_entries() -> Vec<RequestLogEntry> {
        vec![
            entry("2026-10-01T10:00:00+00:00", "POST", "/aieo/audit", None, 100),
            entry("2026-10-01T10:05:00+00:00", "POST", "/aieo/audit", Some("RATE_LIMITED"), 20),
            entry("2026-10-02T09:00:00+00:00", "POST", "/aieo/audit", None, 300),
            entry("2026-10-02T09:30:00+00:00", "GET", "/aieo/dashboard", Some("NETWORK_ERROR"), 5),
        ]
    }

    #[test]
    fn totals_and_success_rate() {
        let history = build_history(&sample_entries());
        assert_eq!(history.total_requests, 4);
        assert_eq!(history.successful, 2);
        assert!((history.success_pct - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn endpoints_grouped_and_sorted_by_count() {
        let history = build_history(&sample_entries());
        let audit = &history.endpoints[0];
        assert_eq!(audit.endpoint, "POST /aieo/audit");
        assert_eq!(audit.count, 3);
        assert_eq!(audit.failures, 1);
        assert!((audit.avg_latency_ms - 140.0).abs() < f64::EPSILON);
    }

    #[test]
    fn error_codes_counted() {
        let history = build_history(&sample_entries());
        assert_eq!(history.error_codes.len(), 2);
        assert!(history.error_codes.iter().all(|c| c.count == 1));
    }

    #[test]
    fn daily_sorted_ascending() {
        let history = build_history(&sample_entries());
        let dates: Vec<&str> = history.daily.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, ["2026-10-01", "2026-10-02"]);
        assert_eq!(history.daily[1].failures, 1);
    }

    #[test]
    fn empty_log_yields_empty_history() {
        let history = build_history(&[]);
        assert_eq!(history.total_requests, 0);
        assert_eq!(history.success_pct, 0.0);
        assert!(history.endpoints.is_empty());
    }
}
