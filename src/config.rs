//! Configuration for the verification engine.
//!
//! Settings are read from `.a11y-verify/verify.toml` and layered:
//! file → environment → CLI flags.
//!
//! # Configuration File Format
//!
//! ```toml
//! [remote]
//! base_url = "https://reviews.example.org/api"
//! timeout_secs = 15
//! offline = false
//!
//! [reviewer]
//! name = "alex"
//! ```
//!
//! # Environment
//!
//! | Variable                   | Overrides             |
//! |----------------------------|-----------------------|
//! | `A11Y_VERIFY_API_URL`      | `remote.base_url`     |
//! | `A11Y_VERIFY_API_TOKEN`    | `remote.api_token`    |
//! | `A11Y_VERIFY_TIMEOUT_SECS` | `remote.timeout_secs` |
//! | `A11Y_VERIFY_OFFLINE`      | `remote.offline`      |
//! | `A11Y_VERIFY_REVIEWER`     | `reviewer.name`       |

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::review::submit::{DEFAULT_REMOTE_TIMEOUT_SECS, SubmitSettings};

/// Directory holding the config file, relative to the working directory.
pub const CONFIG_DIR: &str = ".a11y-verify";
pub const CONFIG_FILE: &str = "verify.toml";

pub const ENV_API_URL: &str = "A11Y_VERIFY_API_URL";
pub const ENV_API_TOKEN: &str = "A11Y_VERIFY_API_TOKEN";
pub const ENV_TIMEOUT_SECS: &str = "A11Y_VERIFY_TIMEOUT_SECS";
pub const ENV_OFFLINE: &str = "A11Y_VERIFY_OFFLINE";
pub const ENV_REVIEWER: &str = "A11Y_VERIFY_REVIEWER";

/// Remote persistence settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSection {
    /// Base URL of the analysis/persistence service
    #[serde(default)]
    pub base_url: Option<String>,
    /// Bearer token sent with every request
    #[serde(default)]
    pub api_token: Option<String>,
    /// Per-call timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Record every decision locally without calling the service
    #[serde(default)]
    pub offline: bool,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_REMOTE_TIMEOUT_SECS
}

impl Default for RemoteSection {
    fn default() -> Self {
        Self {
            base_url: None,
            api_token: None,
            timeout_secs: default_timeout_secs(),
            offline: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewerSection {
    /// Identity stamped on recorded decisions
    #[serde(default)]
    pub name: Option<String>,
}

/// The complete verify.toml structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyToml {
    #[serde(default)]
    pub remote: RemoteSection,
    #[serde(default)]
    pub reviewer: ReviewerSection,
}

impl VerifyToml {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse verify.toml")
    }

    /// Load `verify.toml` from `config_dir`, or defaults if it doesn't exist.
    pub fn load_or_default(config_dir: &Path) -> Result<Self> {
        let config_path = config_dir.join(CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize verify.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }
}

/// Values given on the command line. `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub job_id: Option<String>,
    pub reviewer: Option<String>,
    pub base_url: Option<String>,
    pub offline: bool,
}

/// Fully resolved engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyConfig {
    pub base_url: Option<String>,
    pub api_token: Option<String>,
    pub timeout: Duration,
    pub offline: bool,
    pub reviewer: String,
    pub job_id: Option<String>,
}

impl VerifyConfig {
    /// Load the config file at `path` (or the default location) and resolve it
    /// against the process environment and `cli`.
    pub fn load(path: Option<&Path>, cli: &CliOverrides) -> Result<Self> {
        let toml = match path {
            Some(path) => VerifyToml::load(path)?,
            None => VerifyToml::load_or_default(&default_config_dir())?,
        };
        Ok(Self::resolve(&toml, cli, |key| std::env::var(key).ok()))
    }

    /// Resolve `toml` against an environment lookup and `cli`.
    pub fn resolve<F>(toml: &VerifyToml, cli: &CliOverrides, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_nonempty = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let base_url = cli
            .base_url
            .clone()
            .or_else(|| env_nonempty(ENV_API_URL))
            .or_else(|| toml.remote.base_url.clone());

        let api_token = env_nonempty(ENV_API_TOKEN).or_else(|| toml.remote.api_token.clone());

        let timeout_secs = match env_nonempty(ENV_TIMEOUT_SECS) {
            Some(raw) => raw.trim().parse::<u64>().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "Ignoring invalid {}", ENV_TIMEOUT_SECS);
                toml.remote.timeout_secs
            }),
            None => toml.remote.timeout_secs,
        };

        let offline = cli.offline
            || env_nonempty(ENV_OFFLINE)
                .map(|v| parse_flag(&v))
                .unwrap_or(toml.remote.offline);

        let reviewer = cli
            .reviewer
            .clone()
            .or_else(|| env_nonempty(ENV_REVIEWER))
            .or_else(|| toml.reviewer.name.clone())
            .or_else(|| env_nonempty("USER"))
            .unwrap_or_else(|| "reviewer".to_string());

        Self {
            base_url,
            api_token,
            timeout: Duration::from_secs(timeout_secs),
            offline,
            reviewer,
            job_id: cli.job_id.clone(),
        }
    }

    /// Whether decisions can only be recorded locally.
    pub fn is_offline(&self) -> bool {
        self.offline || self.base_url.is_none()
    }

    pub fn submit_settings(&self) -> SubmitSettings {
        SubmitSettings {
            job_id: self.job_id.clone(),
            reviewer: self.reviewer.clone(),
            timeout: self.timeout,
            offline: self.is_offline(),
        }
    }
}

/// `.a11y-verify` under the current directory.
pub fn default_config_dir() -> PathBuf {
    PathBuf::from(CONFIG_DIR)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
