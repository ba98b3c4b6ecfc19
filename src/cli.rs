//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// ticketpulse - support ticket analytics
///
/// Fetch a batch of support tickets and summarize status mix, priority
/// mix, due-date performance and high-priority resolution times.
///
/// Examples:
///   ticketpulse --source-url https://support.example.com/api/v2/tickets.json
///   ticketpulse --input tickets.json --format json --stdout
///   ticketpulse --serve --bind 0.0.0.0:8080
///   ticketpulse --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Ticket endpoint to fetch from
    ///
    /// The endpoint must return a JSON array of tickets or an object with
    /// a `tickets` array. Can also be set in .ticketpulse.toml.
    #[arg(short, long, value_name = "URL", env = "TICKETPULSE_SOURCE_URL")]
    pub source_url: Option<String>,

    /// Bearer token for the ticket endpoint
    #[arg(long, env = "TICKETPULSE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Read tickets from a local JSON file instead of a URL
    #[arg(short, long, value_name = "FILE", conflicts_with = "source_url")]
    pub input: Option<PathBuf>,

    /// Number of tickets to request
    #[arg(long, value_name = "COUNT")]
    pub batch_size: Option<usize>,

    /// Fetch timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Output file path for the report
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Print the report to stdout instead of writing a file
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,

    /// Run as an HTTP service instead of producing one report
    #[arg(long)]
    pub serve: bool,

    /// Address for --serve to listen on
    #[arg(long, value_name = "ADDR", requires = "serve")]
    pub bind: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .ticketpulse.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .ticketpulse.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(ref url) = self.source_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("Source URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(ref input) = self.input {
            if !input.is_file() {
                return Err(format!("Input file does not exist: {}", input.display()));
            }
        }

        if self.batch_size == Some(0) {
            return Err("Batch size must be at least 1".to_string());
        }

        if self.timeout == Some(0) {
            return Err("Timeout must be at least 1 second".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            source_url: Some("https://support.example.com/api/v2/tickets.json".to_string()),
            token: None,
            input: None,
            batch_size: None,
            timeout: None,
            output: None,
            format: None,
            stdout: false,
            serve: false,
            bind: None,
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_valid_args() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_url() {
        let mut args = make_args();
        args.source_url = Some("ftp://example.com/tickets".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_input_file() {
        let mut args = make_args();
        args.source_url = None;
        args.input = Some(PathBuf::from("/nonexistent/tickets.json"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_values() {
        let mut args = make_args();
        args.batch_size = Some(0);
        assert!(args.validate().is_err());

        let mut args = make_args();
        args.timeout = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_init_config_skips_validation() {
        let mut args = make_args();
        args.source_url = Some("not a url".to_string());
        args.init_config = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_input_conflicts_with_source_url() {
        let result = Args::try_parse_from([
            "ticketpulse",
            "--source-url",
            "https://example.com/tickets",
            "--input",
            "tickets.json",
        ]);
        assert!(result.is_err());
    }
}
