use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use a11y_verify::review::StatusFilter;
use a11y_verify_common::{ConfidenceLevel, Severity, VerificationMethod, VerificationStatus};

mod cmd;

#[derive(Parser)]
#[command(name = "a11y-verify")]
#[command(version, about = "Manual verification queue for automated accessibility findings")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[arg(long, value_enum, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Path to verify.toml (defaults to .a11y-verify/verify.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Job id used for remote persistence
    #[arg(long, global = true)]
    pub job: Option<String>,

    /// Reviewer identity recorded with each decision
    #[arg(long, global = true)]
    pub reviewer: Option<String>,

    /// Record decisions locally without calling the remote service
    #[arg(long, global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Findings export plus the saved-decision file.
#[derive(Args, Clone, Debug)]
pub struct InputArgs {
    /// JSON array of automated findings
    #[arg(long)]
    pub findings: PathBuf,

    /// JSON map of saved decisions keyed by item id
    #[arg(long)]
    pub saved: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the review queue in triage order with suggested decisions
    Queue {
        #[command(flatten)]
        input: InputArgs,

        /// Only these severities (comma-separated)
        #[arg(long, value_delimiter = ',')]
        severity: Vec<Severity>,

        /// Only these confidence levels (comma-separated)
        #[arg(long, value_delimiter = ',')]
        confidence: Vec<ConfidenceLevel>,

        /// Only these statuses (comma-separated; `verified` matches any verified_*)
        #[arg(long, value_delimiter = ',')]
        status: Vec<StatusFilter>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show verification progress
    Progress {
        #[command(flatten)]
        input: InputArgs,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Record a decision for one or more items
    Submit {
        #[command(flatten)]
        input: InputArgs,

        /// verified_pass, verified_fail, verified_partial or deferred
        #[arg(long)]
        status: VerificationStatus,

        /// Tool or technique used
        #[arg(long, default_value = "manual")]
        method: VerificationMethod,

        /// Required for verified_fail and verified_partial
        #[arg(long, default_value = "")]
        notes: String,

        /// Item ids
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Accept high-confidence Not Applicable suggestions
    QuickAccept {
        #[command(flatten)]
        input: InputArgs,

        /// Item ids (defaults to every eligible item)
        ids: Vec<String>,
    },
    /// Show job metadata from the remote service
    Job,
    /// Show or create the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the resolved configuration
    Show,
    /// Write a default verify.toml
    Init {
        /// Remote service base URL to record
        #[arg(long)]
        base_url: Option<String>,
    },
}

fn init_tracing(cli: &Cli) {
    use tracing_subscriber::EnvFilter;

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match cli.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.with_target(false).init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli);

    match &cli.command {
        Commands::Queue {
            input,
            severity,
            confidence,
            status,
            json,
        } => {
            cmd::cmd_queue(&cli, input, severity, confidence, status, *json)?;
        }
        Commands::Progress { input, json } => cmd::cmd_progress(&cli, input, *json)?,
        Commands::Submit {
            input,
            status,
            method,
            notes,
            ids,
        } => {
            cmd::cmd_submit(&cli, input, *status, *method, notes, ids).await?;
        }
        Commands::QuickAccept { input, ids } => cmd::cmd_quick_accept(&cli, input, ids).await?,
        Commands::Job => cmd::cmd_job(&cli).await?,
        Commands::Config { command } => cmd::cmd_config(&cli, command)?,
    }

    Ok(())
}
