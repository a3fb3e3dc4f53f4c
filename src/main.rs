use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use aieo::api::{ApiClient, CitationQuery};
use aieo::cli::{self, OutputFormat};
use aieo::config;

#[derive(Debug, Parser)]
#[command(name = "aieo")]
#[command(about = "AI Engine Optimization: audit and optimize content for AI citations")]
struct App {
    /// Backend base URL (overrides config and AIEO_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// API key for this invocation (overrides AIEO_API_KEY and the stored key)
    #[arg(long, global = true)]
    api_key: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Score a URL or markdown file for AI citation readiness
    Audit {
        /// URL or path to a markdown file
        input: Option<String>,
        /// Read content from this file
        #[arg(long)]
        file: Option<PathBuf>,
        /// Audit this URL
        #[arg(long)]
        url: Option<String>,
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Rewrite a markdown file to improve its score
    Optimize {
        /// Path to the markdown file
        file: PathBuf,
        /// Optimization style: preserve (default), aggressive
        #[arg(long, default_value = "preserve")]
        style: String,
        /// Write optimized content here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Show the list of changes
        #[arg(long)]
        diff: bool,
    },
    /// Show the citation dashboard
    Dashboard {
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Browse and apply optimization patterns
    Patterns {
        #[command(subcommand)]
        action: PatternsAction,
    },
    /// List tracked citations
    Citations {
        /// Only citations of this URL
        #[arg(long)]
        url: Option<String>,
        /// Only citations on this domain
        #[arg(long)]
        domain: Option<String>,
        /// Only citations by this engine
        #[arg(long)]
        engine: Option<String>,
        /// Page size
        #[arg(long)]
        limit: Option<u32>,
        /// Cursor from a previous page
        #[arg(long)]
        cursor: Option<String>,
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Manage the stored API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
    /// Manage aieo configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Summarize the local request log
    History {
        /// Only include the last N days of data
        #[arg(long)]
        days: Option<u32>,
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Launch the web UI
    Web {
        /// Listen address (overrides [web] addr)
        #[arg(long)]
        addr: Option<String>,
        /// Do not open a browser window
        #[arg(long)]
        no_open: bool,
    },
}

#[derive(Debug, Subcommand)]
enum PatternsAction {
    /// List available patterns
    List {
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Apply a pattern to a file
    Apply {
        /// Pattern identifier
        pattern_id: String,
        /// Path to the markdown file
        file: PathBuf,
        /// Write the result here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Subcommand)]
enum KeyAction {
    /// Store an API key in ~/.aieo/api_key
    Set {
        /// The API key
        key: String,
    },
    /// Remove the stored API key
    Clear,
    /// Show the active API key (masked)
    Show,
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective (merged) configuration
    Show,
    /// Create a default config file at ~/.aieo/config.toml
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Set a config value (e.g. `aieo config set api.base_url https://...`)
    Set {
        /// Dotted key path (e.g. api.base_url, web.open_browser)
        key: String,
        /// Value to set
        value: String,
    },
    /// Reset configuration to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    let mut cfg = config::load();
    if let Some(url) = app.api_url {
        cfg.api.base_url = url;
    }
    let api_key = app
        .api_key
        .or_else(|| std::env::var("AIEO_API_KEY").ok());
    let mut client = ApiClient::from_config(&cfg, api_key);

    match app.command {
        Commands::Audit {
            input,
            file,
            url,
            format,
        } => {
            let input = cli::resolve_audit_input(input.as_deref(), file.as_deref(), url.as_deref())?;
            cli::run_audit(&client, input, OutputFormat::from_str_opt(Some(&format)))
        }
        Commands::Optimize {
            file,
            style,
            output,
            diff,
        } => cli::run_optimize(&client, &file, &style, output.as_deref(), diff),
        Commands::Dashboard { format } => {
            cli::run_dashboard(&client, OutputFormat::from_str_opt(Some(&format)))
        }
        Commands::Patterns { action } => match action {
            PatternsAction::List { format } => {
                cli::run_patterns_list(&client, OutputFormat::from_str_opt(Some(&format)))
            }
            PatternsAction::Apply {
                pattern_id,
                file,
                output,
            } => cli::run_patterns_apply(&client, &pattern_id, &file, output.as_deref()),
        },
        Commands::Citations {
            url,
            domain,
            engine,
            limit,
            cursor,
            format,
        } => {
            let query = CitationQuery {
                url,
                domain,
                engine,
                limit,
                cursor,
            };
            cli::run_citations(&client, &query, OutputFormat::from_str_opt(Some(&format)))
        }
        Commands::Key { action } => match action {
            KeyAction::Set { key } => cli::run_key_set(&mut client, &key),
            KeyAction::Clear => cli::run_key_clear(&mut client),
            KeyAction::Show => cli::run_key_show(&client),
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
        Commands::History { days, format } => {
            cli::run_history(days, OutputFormat::from_str_opt(Some(&format)))
        }
        Commands::Web { addr, no_open } => {
            let addr = addr.unwrap_or_else(|| cfg.web.addr.clone());
            aieo::web::serve(&addr, &client, cfg.web.open_browser && !no_open)
        }
    }
}
