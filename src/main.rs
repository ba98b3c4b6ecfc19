//! ticketpulse - support ticket analytics
//!
//! A CLI and HTTP service that fetches a batch of support tickets and
//! reports status mix, priority mix, due-date performance and
//! high-priority resolution times.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (fetch failure, bad config, write failure, etc.)
//!   2 - The ticket source returned no tickets

mod analysis;
mod cli;
mod config;
mod error;
mod models;
mod report;
mod server;
mod source;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use error::TicketError;
use indicatif::{ProgressBar, ProgressStyle};
use models::{Report, ReportMetadata, TicketRecord};
use source::{HttpSource, TicketSource};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};
use tracing_subscriber::{filter::LevelFilter, EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // The config decides the log level, so it is read before logging starts.
    let mut config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(config.log_level(&args));

    info!("ticketpulse v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", redacted(&args));

    match run(args, config).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .ticketpulse.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Set [source].url to your ticket endpoint.");
    Ok(())
}

/// Initialize logging at the given level; `RUST_LOG` directives take precedence.
fn init_logging(level: tracing::Level) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Copy of the arguments with the token masked, for debug logging.
fn redacted(args: &Args) -> Args {
    let mut args = args.clone();
    if args.token.is_some() {
        args.token = Some("***".to_string());
    }
    args
}

/// Run in the requested mode. Returns the process exit code.
async fn run(args: Args, config: Config) -> Result<i32> {
    let source = resolve_source(&args, &config)?;

    if args.serve {
        let source_label = source.describe();
        let state = server::AppState {
            source,
            request_timeout: Duration::from_secs(config.server.request_timeout_seconds),
        };
        println!("🌐 Serving ticket analysis from {}", source_label);
        server::run(state, &config.server.bind).await?;
        return Ok(0);
    }

    run_report(&args, &config, &source).await
}

/// Fetch once, analyze, and write the report.
async fn run_report(args: &Args, config: &Config, source: &TicketSource) -> Result<i32> {
    let start_time = Instant::now();

    println!("📥 Loading tickets from: {}", source.describe());
    let tickets = fetch_with_progress(source, args.quiet).await?;
    info!("Loaded {} tickets", tickets.len());

    let analysis_date = Utc::now();
    let report = match analysis::analyze_at(&tickets, analysis_date) {
        Ok(report) => report,
        Err(TicketError::EmptyDataset) => {
            eprintln!("\n⚠️  The ticket source returned no tickets. Nothing to report.");
            return Ok(2);
        }
        Err(e) => return Err(e.into()),
    };

    let metadata = ReportMetadata {
        source: source.describe(),
        analysis_date,
        duration_seconds: start_time.elapsed().as_secs_f64(),
    };

    let output = render(&report, &metadata, config.general.format)?;

    if args.stdout {
        println!("{}", output);
        return Ok(0);
    }

    std::fs::write(&config.general.output, &output)
        .with_context(|| format!("Failed to write report to {}", config.general.output))?;

    println!("\n📊 Ticket Summary:");
    println!("{}", report::generator::generate_console_summary(&report));
    println!("   Duration: {:.1}s", metadata.duration_seconds);
    println!(
        "\n✅ Analysis complete! Report saved to: {}",
        config.general.output
    );

    Ok(0)
}

fn render(report: &Report, metadata: &ReportMetadata, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => report::generate_json_report(report),
        OutputFormat::Markdown => Ok(report::generate_markdown_report(report, metadata)),
    }
}

/// Fetch tickets, showing a spinner unless running quietly.
async fn fetch_with_progress(source: &TicketSource, quiet: bool) -> Result<Vec<TicketRecord>> {
    let spinner = if quiet || matches!(source, TicketSource::File(_)) {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
        {
            pb.set_style(style);
        }
        pb.set_message("Fetching tickets...");
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    };

    let result = source.fetch().await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    Ok(result?)
}

/// Pick the ticket source: a local file wins over a configured URL.
fn resolve_source(args: &Args, config: &Config) -> Result<TicketSource> {
    if let Some(ref input) = args.input {
        info!("Using local ticket file: {}", input.display());
        return Ok(TicketSource::File(input.clone()));
    }

    let Some(http_config) = config.http_source_config() else {
        bail!(
            "No ticket source configured. Pass --source-url or --input, or set [source].url in {}",
            CONFIG_FILE_NAME
        );
    };

    if !http_config.url.starts_with("http://") && !http_config.url.starts_with("https://") {
        bail!("Source URL must start with 'http://' or 'https://'");
    }

    Ok(TicketSource::Http(HttpSource::new(http_config)?))
}

/// Load configuration from file or use defaults.
///
/// Runs before logging is set up, so problems go straight to stderr.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok(config),
        Ok(None) => Ok(Config::default()),
        Err(e) => {
            eprintln!("⚠️  Failed to load config: {:#}. Using defaults.", e);
            Ok(Config::default())
        }
    }
}
