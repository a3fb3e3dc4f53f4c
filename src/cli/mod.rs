//! CLI command implementations.
//!
//! Provides subcommand handlers for:
//! - `aieo audit`: score a URL or markdown file
//! - `aieo optimize FILE`: rewrite a file and show the score uplift
//! - `aieo dashboard`: citation dashboard
//! - `aieo patterns list|apply`: pattern library
//! - `aieo citations`: tracked citations with filters
//! - `aieo key set|clear|show`: API key management
//! - `aieo config show|init|set|reset`: configuration management
//! - `aieo history`: local request log summary
//!
//! The form commands drive the same page controllers as the web UI, so
//! validation and error classification are shared.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use crate::analytics::logger::RequestLog;
use crate::analytics::reporter::{self, History};
use crate::api::key_store::mask_key;
use crate::api::{AieoApi, ApiClient, CitationQuery};
use crate::config;
use crate::models::{AuditResult, CitationPage, DashboardData, Pattern, format_score};
use crate::pages::audit::MAX_VISIBLE_GAPS;
use crate::pages::{AuditPage, DashboardPage, Load, OptimizePage, OptimizeStyle, PatternsPage, describe_error};

/// Output format for read commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            _ => Self::Table,
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// aieo audit
// ---------------------------------------------------------------------------

/// What to audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditInput {
    Url(String),
    Content(String),
}

/// Resolve the audit source: `--file`, then `--url`, then the positional
/// INPUT (a URL when it starts with `http://`/`https://`, else a file path).
pub fn resolve_audit_input(
    input: Option<&str>,
    file: Option<&Path>,
    url: Option<&str>,
) -> Result<AuditInput> {
    if let Some(file) = file {
        return read_text(file).map(AuditInput::Content);
    }
    if let Some(url) = url {
        return Ok(AuditInput::Url(url.to_string()));
    }
    let Some(input) = input else {
        anyhow::bail!("Please provide a URL, file path, or use --file/--url");
    };
    if input.starts_with("http://") || input.starts_with("https://") {
        return Ok(AuditInput::Url(input.to_string()));
    }
    fs::read_to_string(input)
        .map(AuditInput::Content)
        .map_err(|_| anyhow::anyhow!("'{input}' is not a valid file or URL"))
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Error reading file {}", path.display()))
}

/// Audit content and print the score, grade and top gaps.
pub fn run_audit(api: &impl AieoApi, input: AuditInput, format: OutputFormat) -> Result<()> {
    let mut page = AuditPage::new();
    match input {
        AuditInput::Url(url) => page.set_url(url),
        AuditInput::Content(content) => page.set_content(content),
    }

    eprintln!("{}", "Auditing content...".dimmed());
    page.submit(api);

    if let Some(error) = page.error() {
        anyhow::bail!("{error}");
    }
    let Some(result) = page.result() else {
        return Ok(());
    };

    match format {
        OutputFormat::Json => print_json(result)?,
        OutputFormat::Table => print_audit_table(result, page.visible_gaps().len()),
    }
    Ok(())
}

fn print_audit_table(result: &AuditResult, shown: usize) {
    println!();
    println!("  {} {}/100", "Score:".bold(), format_score(result.score).bold().cyan());
    println!("  {} {}", "Grade:".bold(), result.grade);

    if let Some(benchmark) = &result.benchmark {
        println!("  {} {}", "Percentile:".bold(), format_score(benchmark.percentile));
    }

    if result.gaps.is_empty() {
        println!();
        println!("{}", "No gaps found!".green());
        return;
    }

    println!();
    println!("{}", format!("Top {shown} Gaps:").bold().cyan());
    for (i, gap) in result.gaps.iter().take(MAX_VISIBLE_GAPS).enumerate() {
        println!("  {}. [{}] {}", i + 1, gap.category, gap.description);
        println!("     Severity: {}", colorize_severity(&gap.severity.to_string()));
        if let Some(fix) = &gap.example_fix {
            println!("     {} {}", "Fix:".dimmed(), fix.dimmed());
        }
    }
}

fn colorize_severity(severity: &str) -> colored::ColoredString {
    match severity {
        "high" => severity.red(),
        "medium" => severity.yellow(),
        "low" => severity.green(),
        _ => severity.normal(),
    }
}

// ---------------------------------------------------------------------------
// aieo optimize
// ---------------------------------------------------------------------------

/// Optimize a file. The score line and changes go to stderr so stdout
/// carries only the optimized content.
pub fn run_optimize(
    api: &impl AieoApi,
    file: &Path,
    style: &str,
    output: Option<&Path>,
    diff: bool,
) -> Result<()> {
    let style = OptimizeStyle::parse(style)
        .with_context(|| format!("unknown style '{style}' (expected preserve or aggressive)"))?;

    let mut page = OptimizePage::new();
    page.set_content(read_text(file)?);
    page.set_style(style);

    eprintln!("{}", "Optimizing content...".dimmed());
    page.submit(api);

    if let Some(error) = page.error() {
        anyhow::bail!("{error}");
    }
    let Some(result) = page.result() else {
        return Ok(());
    };

    eprintln!();
    eprintln!(
        "{} {} → {} ({})",
        "Score:".bold(),
        format_score(result.score_before),
        format_score(result.score_after),
        format!("+{} points", format_score(result.uplift)).green(),
    );

    if diff && !result.changes.is_empty() {
        eprintln!();
        eprintln!("{}", "Changes:".bold().cyan());
        for change in &result.changes {
            eprintln!("  [{}] {}", change.kind, change.description);
        }
    }

    write_output(&result.optimized_content, output)
}

fn write_output(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content)
                .with_context(|| format!("Error writing output file {}", path.display()))?;
            eprintln!();
            eprintln!("Optimized content written to: {}", path.display());
        }
        None => println!("{content}"),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// aieo dashboard
// ---------------------------------------------------------------------------

pub fn run_dashboard(api: &impl AieoApi, format: OutputFormat) -> Result<()> {
    let page = DashboardPage::mount(api);
    let data = match page.state() {
        Load::Ready(data) => data,
        Load::Failed(error) => anyhow::bail!("{error}"),
        Load::Loading => return Ok(()),
    };

    match format {
        OutputFormat::Json => print_json(data)?,
        OutputFormat::Table => print_dashboard_table(data),
    }
    Ok(())
}

fn print_dashboard_table(data: &DashboardData) {
    println!("{}", "Citation Dashboard".bold().cyan());
    println!("{}", "=".repeat(50));
    println!("  {} {}", "Total citations:".bold(), format_number(data.total_citations));

    if !data.citations_by_engine.is_empty() {
        println!();
        println!("{}", "Citations by Engine".bold().cyan());
        for (engine, count) in &data.citations_by_engine {
            println!("  {:<20} {:>8}", engine, format_number(*count));
        }
    }

    if !data.top_cited_pages.is_empty() {
        println!();
        println!("{}", "Top Cited Pages".bold().cyan());
        for (i, page) in data.top_cited_pages.iter().take(10).enumerate() {
            println!(
                "  {:>2}. {} ({} citations)",
                i + 1,
                page.url,
                format_number(page.citation_count)
            );
        }
    }
}

// ---------------------------------------------------------------------------
// aieo patterns
// ---------------------------------------------------------------------------

pub fn run_patterns_list(api: &impl AieoApi, format: OutputFormat) -> Result<()> {
    let page = PatternsPage::mount(api);
    let patterns = match page.state() {
        Load::Ready(patterns) => patterns,
        Load::Failed(error) => anyhow::bail!("{error}"),
        Load::Loading => return Ok(()),
    };

    match format {
        OutputFormat::Json => print_json(patterns)?,
        OutputFormat::Table => print_patterns_table(patterns),
    }
    Ok(())
}

fn print_patterns_table(patterns: &[Pattern]) {
    if patterns.is_empty() {
        println!("{}", crate::pages::patterns::EMPTY_MESSAGE.yellow());
        return;
    }

    println!("{}", "AIEO Pattern Library".bold().cyan());
    println!("{}", "=".repeat(70));
    println!("  {:<24} {:<12} {:>10}  Name", "ID", "Category", "Boost");
    println!("  {}", "-".repeat(68));
    for pattern in patterns {
        let boost = pattern
            .citation_boost
            .map(|b| format!("{}-{}%", format_score(b.min), format_score(b.max)))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<24} {:<12} {:>10}  {}",
            truncate(&pattern.id, 24),
            truncate(&pattern.category, 12),
            boost,
            pattern.name
        );
        if !pattern.description.is_empty() {
            println!("  {:<24} {}", "", pattern.description.dimmed());
        }
    }
}

/// Apply one pattern to a file.
pub fn run_patterns_apply(
    api: &impl AieoApi,
    pattern_id: &str,
    file: &Path,
    output: Option<&Path>,
) -> Result<()> {
    let content = read_text(file)?;
    if content.trim().is_empty() {
        anyhow::bail!("{}", crate::pages::optimize::MISSING_CONTENT);
    }

    let applied = api
        .apply_pattern(pattern_id, &content)
        .map_err(|e| anyhow::anyhow!(describe_error(&e)))?;

    let name = if applied.pattern_name.is_empty() {
        pattern_id
    } else {
        applied.pattern_name.as_str()
    };
    eprintln!("{} Applied pattern {}", "✓".green().bold(), name.bold());

    write_output(&applied.optimized_content, output)
}

// ---------------------------------------------------------------------------
// aieo citations
// ---------------------------------------------------------------------------

pub fn run_citations(api: &impl AieoApi, query: &CitationQuery, format: OutputFormat) -> Result<()> {
    let page = api
        .citations(query)
        .map_err(|e| anyhow::anyhow!(describe_error(&e)))?;

    match format {
        OutputFormat::Json => print_json(&page)?,
        OutputFormat::Table => print_citations_table(&page),
    }
    Ok(())
}

fn print_citations_table(page: &CitationPage) {
    if page.data.is_empty() {
        println!("{}", "No citations found for these filters.".yellow());
        return;
    }

    println!("{}", "Citations".bold().cyan());
    println!("{}", "=".repeat(80));
    println!("  {:<12} {:<44} {:>4}  Detected", "Engine", "URL", "Pos");
    println!("  {}", "-".repeat(78));

    for (i, citation) in page.data.iter().enumerate() {
        let position = citation
            .position
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        let line = format!(
            "  {:<12} {:<44} {:>4}  {}",
            truncate(&citation.engine, 12),
            truncate(&citation.url, 44),
            position,
            citation.detected_at.get(..10).unwrap_or(citation.detected_at.as_str()),
        );

        if i % 2 == 0 {
            println!("{line}");
        } else {
            println!("{}", line.dimmed());
        }
    }

    println!();
    println!(
        "  {} {} shown",
        "Total:".bold(),
        format_number(page.pagination.total_count.max(page.data.len() as u64))
    );
    if page.pagination.has_more {
        match &page.pagination.next_cursor {
            Some(cursor) => println!("  {} --cursor {}", "More results:".dimmed(), cursor),
            None => println!("  {}", "More results available; raise --limit.".dimmed()),
        }
    }
}

// ---------------------------------------------------------------------------
// aieo key
// ---------------------------------------------------------------------------

pub fn run_key_set(client: &mut ApiClient, key: &str) -> Result<()> {
    if key.trim().is_empty() {
        anyhow::bail!("API key must not be empty");
    }
    let Some(store) = client.key_store() else {
        anyhow::bail!("could not determine home directory; API key not saved");
    };
    let path = store.path().to_path_buf();
    client.set_api_key(key)?;
    println!("{} API key saved to {}", "✓".green().bold(), path.display());
    Ok(())
}

pub fn run_key_clear(client: &mut ApiClient) -> Result<()> {
    client.clear_api_key()?;
    println!("{} API key removed", "✓".green().bold());
    Ok(())
}

pub fn run_key_show(client: &ApiClient) -> Result<()> {
    match client.api_key() {
        Some(key) => println!("  {} {}", "API key:".bold(), mask_key(key)),
        None => println!(
            "{}",
            "No API key set. Run `aieo key set <KEY>` or set AIEO_API_KEY.".yellow()
        ),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// aieo config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective aieo Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source(global_exists, "~/.aieo/config.toml");
    print_source(project_exists, ".aieo.toml");
    println!("  {} {}", "·".dimmed(), "AIEO_* environment variables".dimmed());

    Ok(())
}

fn print_source(exists: bool, name: &str) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

/// Initialize a default config file at `~/.aieo/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!("{} Config written to {}", "✓".green().bold(), path.display());
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// aieo history
// ---------------------------------------------------------------------------

/// Summarize the local request log.
pub fn run_history(days: Option<u32>, format: OutputFormat) -> Result<()> {
    let log = RequestLog::default_location().context("could not determine home directory")?;
    let history = reporter::compute_history(&log, days);

    if history.total_requests == 0 {
        println!(
            "{}",
            "No requests logged yet. Run some aieo commands to see history.".yellow()
        );
        return Ok(());
    }

    match format {
        OutputFormat::Json => print_json(&history)?,
        OutputFormat::Table => print_history_table(&history),
    }
    Ok(())
}

fn print_history_table(history: &History) {
    println!("{}", "aieo Request History".bold().cyan());
    println!("{}", "=".repeat(60));
    println!("  {} {}", "Requests:    ".bold(), format_number(history.total_requests as u64));
    println!("  {} {:.1}%", "Success rate:".bold(), history.success_pct);
    println!();

    println!("{}", "By Endpoint".bold().cyan());
    println!("  {:<32} {:>6} {:>8} {:>10}", "Endpoint", "Count", "Failed", "Avg ms");
    println!("  {}", "-".repeat(58));
    for stat in &history.endpoints {
        println!(
            "  {:<32} {:>6} {:>8} {:>10.0}",
            truncate(&stat.endpoint, 32),
            stat.count,
            stat.failures,
            stat.avg_latency_ms
        );
    }

    if !history.error_codes.is_empty() {
        println!();
        println!("{}", "Errors".bold().cyan());
        for code in &history.error_codes {
            println!("  {:<24} {:>6}", code.code.red(), code.count);
        }
    }
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Format a number with comma separators for readability.
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Truncate a string to `max_len` characters, appending "…" if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_set_without_store_is_refused() {
        let mut client = ApiClient::new("http://localhost:8000/api/v1");
        let err = run_key_set(&mut client, "k-live-1").unwrap_err();
        assert!(err.to_string().contains("API key not saved"));
        assert_eq!(client.api_key(), None);
    }

    #[test]
    fn key_set_with_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let store = crate::api::KeyStore::at(dir.path().join("api_key"));
        let mut client = ApiClient::new("http://localhost:8000/api/v1").with_key_store(store.clone());

        run_key_set(&mut client, "k-live-1").unwrap();
        assert_eq!(store.load().as_deref(), Some("k-live-1"));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 5), "hell…");
        assert_eq!(truncate("ab", 2), "ab");
        assert_eq!(truncate("ééééé", 3), "éé…");
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(OutputFormat::from_str_opt(None), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str_opt(Some("json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str_opt(Some("csv")), OutputFormat::Table);
    }

    #[test]
    fn audit_input_prefers_file_then_url() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("post.md");
        fs::write(&file, "# Post").unwrap();

        assert_eq!(
            resolve_audit_input(Some("https://ignored"), Some(&file), Some("https://u")).unwrap(),
            AuditInput::Content("# Post".to_string())
        );
        assert_eq!(
            resolve_audit_input(Some("https://ignored"), None, Some("https://u")).unwrap(),
            AuditInput::Url("https://u".to_string())
        );
    }

    #[test]
    fn audit_input_positional_url_or_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("post.md");
        fs::write(&file, "body").unwrap();

        assert_eq!(
            resolve_audit_input(Some("http://x.com/a"), None, None).unwrap(),
            AuditInput::Url("http://x.com/a".to_string())
        );
        assert_eq!(
            resolve_audit_input(file.to_str(), None, None).unwrap(),
            AuditInput::Content("body".to_string())
        );
    }

    #[test]
    fn audit_input_rejects_missing_or_bad() {
        assert!(resolve_audit_input(None, None, None).is_err());
        let err = resolve_audit_input(Some("no/such/file.md"), None, None).unwrap_err();
        assert!(err.to_string().contains("is not a valid file or URL"));
    }
}
