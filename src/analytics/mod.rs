/// Request analytics: a JSONL log of every API call and the aggregation
/// behind `aieo history`.
///
/// Logging is best-effort and never interrupts a request. It is controlled by
/// `[logging] enabled` in the config or `AIEO_LOG_REQUESTS`.
pub mod logger;
pub mod reporter;
