use a11y_verify_common::{ConfidenceLevel, Severity, VerificationItem, VerificationStatus};
use console::style;

use crate::errors::RemoteSubmitError;
use crate::review::filter::ProgressSummary;
use crate::review::smart_default::DecisionDraft;
use crate::ui::icons::{CHECK, CROSS, DEFERRED, OFFLINE, PARTIAL, PENDING, PROGRESS, WARNING};

pub fn status_badge(status: VerificationStatus) -> String {
    match status {
        VerificationStatus::Pending => format!("{}{}", PENDING, style(status).dim()),
        VerificationStatus::VerifiedPass => format!("{}{}", CHECK, style(status).green()),
        VerificationStatus::VerifiedFail => format!("{}{}", CROSS, style(status).red()),
        VerificationStatus::VerifiedPartial => format!("{}{}", PARTIAL, style(status).yellow()),
        VerificationStatus::Deferred => format!("{}{}", DEFERRED, style(status).cyan()),
    }
}

pub fn severity_label(severity: Severity) -> String {
    let label = style(format!("{:<8}", severity.as_str()));
    match severity {
        Severity::Critical => label.red().bold().to_string(),
        Severity::Serious => label.red().to_string(),
        Severity::Moderate => label.yellow().to_string(),
        Severity::Minor => label.dim().to_string(),
    }
}

pub fn confidence_label(level: ConfidenceLevel, score: u8) -> String {
    match level {
        ConfidenceLevel::Manual => style("manual").magenta().to_string(),
        _ => format!("{} ({}%)", level, score),
    }
}

/// One row of the review queue.
pub fn queue_line(item: &VerificationItem, draft: &DecisionDraft) -> String {
    let suggestion = match (draft.status, draft.locked) {
        (Some(status), true) => format!("{} (N/A suggestion, accept to unlock)", status),
        (Some(status), false) => status.to_string(),
        (None, _) => style("choose").dim().to_string(),
    };
    format!(
        "{} {:<20} {} {:<8} {}  {}  -> {}",
        status_badge(item.status()),
        item.id,
        severity_label(item.severity),
        item.criterion_id,
        confidence_label(item.confidence_level, item.confidence_score),
        style(&item.automated_notes).dim(),
        suggestion
    )
}

pub fn progress_line(summary: &ProgressSummary) -> String {
    format!(
        "{}{}/{} verified ({}%)",
        PROGRESS,
        style(summary.verified).bold(),
        summary.total,
        summary.percent
    )
}

/// Notice for a decision that was only recorded locally.
pub fn warning_line(id: &str, reason: &RemoteSubmitError) -> String {
    match reason {
        RemoteSubmitError::Offline => format!("{}{} saved locally", OFFLINE, id),
        other => format!(
            "{}{} saved locally: {}",
            WARNING,
            id,
            style(other).yellow()
        ),
    }
}
