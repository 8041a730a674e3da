//! CLI command implementations.
//!
//! | Module   | Commands handled          |
//! |----------|---------------------------|
//! | `queue`  | `Queue`, `Progress`       |
//! | `submit` | `Submit`, `QuickAccept`   |
//! | `job`    | `Job`                     |
//! | `config` | `Config`                  |

pub mod config;
pub mod job;
pub mod queue;
pub mod submit;

pub use config::cmd_config;
pub use job::cmd_job;
pub use queue::{cmd_progress, cmd_queue};
pub use submit::{cmd_quick_accept, cmd_submit};

use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use a11y_verify::backend;
use a11y_verify::config::{CliOverrides, VerifyConfig};
use a11y_verify::review::VerificationSession;
use a11y_verify_common::{AutomatedFinding, SavedVerification};

use crate::{Cli, InputArgs};

/// Resolve configuration from the config file, environment and global flags.
pub fn resolve_config(cli: &Cli) -> Result<VerifyConfig> {
    let overrides = CliOverrides {
        job_id: cli.job.clone(),
        reviewer: cli.reviewer.clone(),
        base_url: None,
        offline: cli.offline,
    };
    VerifyConfig::load(cli.config.as_deref(), &overrides)
}

pub fn load_findings(path: &Path) -> Result<Vec<AutomatedFinding>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read findings file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse findings file: {}", path.display()))
}

/// Saved decisions keyed by item id. A missing file means none yet.
pub fn load_saved(path: Option<&Path>) -> Result<HashMap<String, SavedVerification>> {
    let Some(path) = path else {
        return Ok(HashMap::new());
    };
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read saved decisions: {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(HashMap::new());
    }
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse saved decisions: {}", path.display()))
}

pub fn write_saved(path: &Path, saved: &BTreeMap<String, SavedVerification>) -> Result<()> {
    let content =
        serde_json::to_string_pretty(saved).context("Failed to serialize saved decisions")?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write saved decisions: {}", path.display()))
}

/// Build a session for `config` and load the findings into it.
pub fn open_session(config: &VerifyConfig, input: &InputArgs) -> Result<VerificationSession> {
    let findings = load_findings(&input.findings)?;
    let saved = load_saved(input.saved.as_deref())?;

    let backend = backend::from_config(config)?;
    let mut session = VerificationSession::new(backend, config.submit_settings());
    let stats = session.refresh(&findings, &saved);
    tracing::debug!(
        findings = findings.len(),
        items = stats.adopted + stats.preserved,
        "Loaded review queue"
    );
    Ok(session)
}
