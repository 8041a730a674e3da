//! Job metadata lookup: `a11y-verify job`.

use anyhow::{Context, Result, bail};
use console::style;

use a11y_verify::backend;

use super::resolve_config;
use crate::Cli;

pub async fn cmd_job(cli: &Cli) -> Result<()> {
    let config = resolve_config(cli)?;
    let Some(job_id) = config.job_id.clone() else {
        bail!("No job id given. Pass --job <ID>.");
    };
    if config.is_offline() {
        bail!(
            "No remote service configured. Set remote.base_url in verify.toml or {}.",
            a11y_verify::config::ENV_API_URL
        );
    }

    let backend = backend::from_config(&config)?;
    let job = tokio::time::timeout(config.timeout, backend.fetch_job(&job_id))
        .await
        .with_context(|| format!("Timed out fetching job {}", job_id))?
        .with_context(|| format!("Failed to fetch job {}", job_id))?;

    println!("{} {}", style("Job:").bold(), job.job_id);
    println!("{} {}", style("File:").bold(), job.file_name);
    println!(
        "{} {}",
        style("Remediated artifact:").bold(),
        if job.has_remediated_artifact { "yes" } else { "no" }
    );
    Ok(())
}
