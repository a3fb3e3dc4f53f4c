use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Request log entry (JSONL)
// ---------------------------------------------------------------------------

/// A single entry in the structured request log (`~/.aieo/request-log.jsonl`).
///
/// One line per API call made by the client, successful or not. Used by the
/// reporter for `aieo history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestLogEntry {
    pub timestamp: String,
    pub method: String,
    /// Request path without the query string (e.g. `/aieo/citations`).
    pub path: String,
    /// HTTP status, absent when the request never got a response.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub status: Option<u16>,
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error_code: Option<String>,
    pub latency_ms: u64,
}

fn default_true() -> bool {
    true
}

impl RequestLogEntry {
    /// Build an entry stamped with the current time.
    pub fn now(
        method: &str,
        path: &str,
        status: Option<u16>,
        error_code: Option<&str>,
        latency_ms: u64,
    ) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            method: method.to_string(),
            path: strip_query(path).to_string(),
            status,
            success: error_code.is_none(),
            error_code: error_code.map(|c| c.to_string()),
            latency_ms,
        }
    }
}

/// Drop the query string so entries group by endpoint.
pub fn strip_query(path: &str) -> &str {
    path.split('?').next().unwrap_or(path)
}

// ---------------------------------------------------------------------------
// Log file
// ---------------------------------------------------------------------------

/// Append-only JSONL request log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLog {
    path: PathBuf,
}

impl RequestLog {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Log at `~/.aieo/request-log.jsonl`.
    pub fn default_location() -> Option<Self> {
        request_log_path().map(Self::at)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record an entry. Best-effort: failures are silently ignored.
    pub fn record(&self, entry: &RequestLogEntry) {
        let _ = self.append(entry);
    }

    fn append(&self, entry: &RequestLogEntry) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let json = serde_json::to_string(entry)?;
        writeln!(file, "{json}")?;

        Ok(())
    }

    /// Read all entries. Silently skips malformed lines; a missing file
    /// yields an empty vec.
    pub fn read_all(&self) -> Vec<RequestLogEntry> {
        let Ok(file) = fs::File::open(&self.path) else {
            return Vec::new();
        };

        BufReader::new(file)
            .lines()
            .map_while(Result::ok)
            .filter_map(|line| serde_json::from_str::<RequestLogEntry>(&line).ok())
            .collect()
    }

    /// Read entries from the last `days` days, or all when `None`.
    pub fn read_since_days(&self, days: Option<u32>) -> Vec<RequestLogEntry> {
        let entries = self.read_all();

        let Some(days) = days else {
            return entries;
        };

        let cutoff = (Utc::now() - chrono::Duration::days(i64::from(days))).to_rfc3339();

        entries
            .into_iter()
            .filter(|e| e.timestamp >= cutoff)
            .collect()
    }
}

/// Return the path to the request log file.
pub fn request_log_path() -> Option<PathBuf> {
    crate::config::aieo_dir().map(|dir| dir.join("request-log.jsonl"))
}
