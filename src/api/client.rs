/// HTTP client wrapper for the AIEO backend.
///
/// Issues JSON requests against a configured base URL using the synchronous
/// `ureq` client, attaches the `X-API-Key` header when a key is set, and
/// folds every failure into an [`ApiError`]:
///
/// - **2xx**: the body is parsed as JSON into the caller's type.
/// - **429**: see [`error::from_response`], giving `RATE_LIMITED` with a wait time.
/// - **other non-2xx**: backend error body, else `UNKNOWN_ERROR`.
/// - **transport failure**: `NETWORK_ERROR`.
///
/// One attempt per call. Retry policy belongs to the caller.
use std::time::Instant;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::{self, ApiError};
use super::key_store::KeyStore;
use crate::analytics::logger::{RequestLog, RequestLogEntry};
use crate::config::AieoConfig;

/// Synchronous AIEO API client.
///
/// Holds the in-memory API key; when a [`KeyStore`] is attached,
/// [`set_api_key`](Self::set_api_key) and [`clear_api_key`](Self::clear_api_key)
/// keep the durable copy in step.
#[derive(Debug)]
pub struct ApiClient {
    agent: ureq::Agent,
    base_url: String,
    api_key: Option<String>,
    key_store: Option<KeyStore>,
    request_log: Option<RequestLog>,
}

impl ApiClient {
    /// A bare client: no key, no key store, no request log.
    pub fn new(base_url: &str) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
            key_store: None,
            request_log: None,
        }
    }

    /// Build a client from the resolved config.
    ///
    /// The key comes from `api_key` when given, otherwise from the default
    /// key store. Requests are logged when `[logging] enabled` is set.
    pub fn from_config(config: &AieoConfig, api_key: Option<String>) -> Self {
        let mut client = Self::new(&config.api.base_url);
        if let Some(store) = KeyStore::default_location() {
            client = client.with_key_store(store);
        }
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            client = client.with_api_key(key);
        }
        if config.logging.enabled
            && let Some(log) = RequestLog::default_location()
        {
            client = client.with_request_log(log);
        }
        client
    }

    /// Attach a durable key store and load any key it holds.
    pub fn with_key_store(mut self, store: KeyStore) -> Self {
        if let Some(key) = store.load() {
            self.api_key = Some(key);
        }
        self.key_store = Some(store);
        self
    }

    /// Use `key` in memory only, without touching the key store.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_request_log(mut self, log: RequestLog) -> Self {
        self.request_log = Some(log);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// The durable key store, if one is attached.
    pub fn key_store(&self) -> Option<&KeyStore> {
        self.key_store.as_ref()
    }

    /// Persist `key` and send it on every subsequent request.
    pub fn set_api_key(&mut self, key: &str) -> anyhow::Result<()> {
        if let Some(store) = &self.key_store {
            store.save(key)?;
        }
        self.api_key = Some(key.trim().to_string());
        Ok(())
    }

    /// Forget the key both in memory and in the key store.
    pub fn clear_api_key(&mut self) -> anyhow::Result<()> {
        if let Some(store) = &self.key_store {
            store.clear()?;
        }
        self.api_key = None;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Verbs
    // -----------------------------------------------------------------------

    pub fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request("GET", path, None)
    }

    pub fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request("POST", path, Some(encode_body(body)?))
    }

    pub fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request("PUT", path, Some(encode_body(body)?))
    }

    pub fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request("DELETE", path, None)
    }

    // -----------------------------------------------------------------------
    // Request execution
    // -----------------------------------------------------------------------

    fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        body: Option<String>,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let start = Instant::now();

        let (status, result) = self.execute(method, &url, body.as_deref());

        if let Some(log) = &self.request_log {
            let latency_ms = start.elapsed().as_millis() as u64;
            let code = result.as_ref().err().map(|e| e.code.as_str());
            log.record(&RequestLogEntry::now(method, path, status, code, latency_ms));
        }

        result.and_then(|text| decode_body(&text))
    }

    /// Perform the HTTP exchange. Returns the status (if a response arrived)
    /// and either the raw 2xx body or the normalized error.
    fn execute(
        &self,
        method: &str,
        url: &str,
        body: Option<&str>,
    ) -> (Option<u16>, Result<String, ApiError>) {
        let mut request = self
            .agent
            .request(method, url)
            .set("Content-Type", "application/json");
        if let Some(key) = &self.api_key {
            request = request.set("X-API-Key", key);
        }

        let outcome = match body {
            Some(body) => request.send_string(body),
            None => request.call(),
        };

        match outcome {
            Ok(resp) if (200..300).contains(&resp.status()) => {
                let status = resp.status();
                let text = resp.into_string().map_err(|_| ApiError::network());
                (Some(status), text)
            }
            // ureq only reports 4xx/5xx as `Status`; unfollowed 1xx/3xx land here.
            Ok(resp) => (Some(resp.status()), Err(normalize_failure(resp))),
            Err(ureq::Error::Status(status, resp)) => (Some(status), Err(normalize_failure(resp))),
            Err(ureq::Error::Transport(_)) => (None, Err(ApiError::network())),
        }
    }
}

/// Fold a non-2xx response into an [`ApiError`].
fn normalize_failure(resp: ureq::Response) -> ApiError {
    let status = resp.status();
    let status_text = resp.status_text().to_string();
    let retry_after = resp.header("Retry-After").map(str::to_string);
    let body = resp.into_string().ok();
    error::from_response(status, &status_text, retry_after.as_deref(), body.as_deref())
}

fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<String, ApiError> {
    serde_json::to_string(body)
        .map_err(|e| ApiError::unknown(format!("failed to encode request body: {e}")))
}

/// Parse a 2xx body. An empty body reads as JSON `null`.
fn decode_body<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    let text = if text.trim().is_empty() { "null" } else { text };
    serde_json::from_str(text)
        .map_err(|e| ApiError::unknown(format!("invalid response from server: {e}")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
