//! Read-only views of the queue: `a11y-verify queue` and `a11y-verify progress`.

use anyhow::{Context, Result};
use console::style;
use serde::Serialize;

use a11y_verify::review::{DecisionDraft, FilterCriteria, StatusFilter, triage_order};
use a11y_verify::ui;
use a11y_verify_common::{ConfidenceLevel, Severity, VerificationItem};

use super::{open_session, resolve_config};
use crate::{Cli, InputArgs};

#[derive(Serialize)]
struct QueueEntry<'a> {
    item: &'a VerificationItem,
    suggestion: &'a DecisionDraft,
}

pub fn cmd_queue(
    cli: &Cli,
    input: &InputArgs,
    severities: &[Severity],
    confidence_levels: &[ConfidenceLevel],
    statuses: &[StatusFilter],
    json: bool,
) -> Result<()> {
    let config = resolve_config(cli)?;
    let mut session = open_session(&config, input)?;
    session.set_filter(
        FilterCriteria::new()
            .with_severities(severities.iter().copied())
            .with_confidence_levels(confidence_levels.iter().copied())
            .with_statuses(statuses.iter().copied()),
    );

    let mut items = session.filtered_items();
    items.sort_by(triage_order);
    let drafts = items
        .iter()
        .map(|item| session.draft(&item.id))
        .collect::<Result<Vec<_>, _>>()?;

    if json {
        let entries: Vec<QueueEntry<'_>> = items
            .iter()
            .zip(&drafts)
            .map(|(item, suggestion)| QueueEntry { item, suggestion })
            .collect();
        let out = serde_json::to_string_pretty(&entries).context("Failed to serialize queue")?;
        println!("{}", out);
        return Ok(());
    }

    if items.is_empty() {
        println!("{}", style("No items match the current filter.").dim());
        return Ok(());
    }
    for (item, draft) in items.iter().zip(&drafts) {
        println!("{}", ui::queue_line(item, draft));
    }
    println!();
    println!(
        "{} of {} items shown",
        style(items.len()).bold(),
        session.total_count()
    );
    Ok(())
}

pub fn cmd_progress(cli: &Cli, input: &InputArgs, json: bool) -> Result<()> {
    let config = resolve_config(cli)?;
    let session = open_session(&config, input)?;
    let summary = session.summary();

    if json {
        let out =
            serde_json::to_string_pretty(&summary).context("Failed to serialize progress")?;
        println!("{}", out);
        return Ok(());
    }

    println!("{}", ui::progress_line(&summary));
    println!();
    println!("By status:");
    for (status, count) in &summary.by_status {
        println!("  {:<18} {}", status, count);
    }
    println!("By severity:");
    for (severity, count) in &summary.by_severity {
        println!("  {:<18} {}", severity, count);
    }
    Ok(())
}
