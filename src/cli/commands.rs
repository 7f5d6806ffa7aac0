//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Secret-backed SaaS integration tools
#[derive(Parser, Debug)]
#[command(name = "saas-bridge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// AWS region for secrets (overrides the config file)
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every Klaviyo tag and/or segment for a client
    Resources {
        /// Client (dataset) identifier used in the secret name
        #[arg(long)]
        client_id: String,

        /// `tags`, `segments`, or `all`
        #[arg(long, default_value = "all")]
        kind: String,

        /// Fail instead of stopping when a next link has no cursor
        #[arg(long)]
        strict: bool,

        /// Longest wait between retries, in seconds
        #[arg(long)]
        max_delay: Option<u64>,

        /// Retries after the first attempt
        #[arg(long)]
        max_retries: Option<u32>,
    },

    /// Print the header row of a Google Sheet
    SheetColumns {
        /// Spreadsheet ID
        #[arg(long)]
        sheet_id: String,

        /// Sheet (tab) name; defaults to the first sheet
        #[arg(long)]
        sheet_name: Option<String>,

        /// Service account key file; defaults to the `gcp/sheets` secret
        #[arg(long)]
        service_account_file: Option<PathBuf>,

        /// User to impersonate; defaults to the configured address
        #[arg(long)]
        delegated_email: Option<String>,
    },

    /// Run the header-extraction handler on an event file (`-` for stdin)
    HandleColumns {
        /// Event JSON with a string `body`
        #[arg(long)]
        event: PathBuf,
    },

    /// Show the field names of a secret (values are never printed)
    Secret {
        /// Secret name or ARN
        name: String,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Human-readable output
    Pretty,
}
