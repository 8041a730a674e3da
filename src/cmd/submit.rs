//! Decision recording: `a11y-verify submit` and `a11y-verify quick-accept`.

use anyhow::{Result, anyhow, bail};
use console::style;
use std::path::Path;

use a11y_verify::errors::VerificationError;
use a11y_verify::review::smart_default::is_quick_accept_eligible;
use a11y_verify::review::{BulkOutcome, DecisionRequest, VerificationSession};
use a11y_verify::ui;
use a11y_verify::ui::icons::{CHECK, SPARKLE};
use a11y_verify_common::{VerificationMethod, VerificationStatus};

use super::{open_session, resolve_config, write_saved};
use crate::{Cli, InputArgs};

/// Validation failures name the offending field.
fn user_error(err: VerificationError) -> anyhow::Error {
    match err {
        VerificationError::Validation(v) => anyhow!("Invalid {}: {}", v.field(), v),
        other => other.into(),
    }
}

fn saved_path(input: &InputArgs) -> Result<&Path> {
    match input.saved.as_deref() {
        Some(path) => Ok(path),
        None => bail!("--saved <FILE> is required to record decisions"),
    }
}

pub async fn cmd_submit(
    cli: &Cli,
    input: &InputArgs,
    status: VerificationStatus,
    method: VerificationMethod,
    notes: &str,
    ids: &[String],
) -> Result<()> {
    let saved = saved_path(input)?;
    let config = resolve_config(cli)?;
    let mut session = open_session(&config, input)?;
    let request = DecisionRequest::new(status, method).with_notes(notes);

    if let [id] = ids {
        let outcome = session.submit(id, &request).await.map_err(user_error)?;
        if let Some(reason) = outcome.warning() {
            eprintln!("{}", ui::warning_line(id, reason));
        }
        println!("{}{} {}", CHECK, id, ui::status_badge(outcome.item.status()));
    } else {
        let outcome = session
            .bulk_submit(ids, &request)
            .await
            .map_err(user_error)?;
        report_bulk(&outcome)?;
    }

    persist(&session, saved)?;
    print_progress(&session);
    Ok(())
}

pub async fn cmd_quick_accept(cli: &Cli, input: &InputArgs, ids: &[String]) -> Result<()> {
    let saved = saved_path(input)?;
    let config = resolve_config(cli)?;
    let mut session = open_session(&config, input)?;

    let ids: Vec<String> = if ids.is_empty() {
        session
            .items()
            .into_iter()
            .filter(|item| item.is_pending() && is_quick_accept_eligible(item))
            .map(|item| item.id)
            .collect()
    } else {
        ids.to_vec()
    };

    let outcome = session.quick_accept_na(&ids).await.map_err(user_error)?;
    println!(
        "{}Accepted {} Not Applicable suggestion(s)",
        SPARKLE,
        style(outcome.applied()).bold()
    );
    report_bulk(&outcome)?;

    persist(&session, saved)?;
    print_progress(&session);
    Ok(())
}

fn report_bulk(outcome: &BulkOutcome) -> Result<()> {
    for id in &outcome.missing {
        eprintln!("{} Unknown item id: {}", style("warning:").yellow(), id);
    }
    for (id, reason) in &outcome.failures {
        eprintln!("{}", ui::warning_line(id, reason));
    }
    if outcome.applied() == 0 {
        bail!("None of the given item ids are in the queue");
    }
    for item in &outcome.items {
        println!("{}{} {}", CHECK, item.id, ui::status_badge(item.status()));
    }
    if outcome.failed > 0 {
        println!(
            "{} remote, {} local only",
            style(outcome.succeeded).green(),
            style(outcome.failed).yellow()
        );
    }
    Ok(())
}

fn persist(session: &VerificationSession, path: &Path) -> Result<()> {
    let decisions = session.saved_decisions();
    write_saved(path, &decisions)?;
    tracing::debug!(path = %path.display(), decisions = decisions.len(), "Saved decisions written");
    Ok(())
}

fn print_progress(session: &VerificationSession) {
    println!("{}", ui::progress_line(&session.summary()));
}
