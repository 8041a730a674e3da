//! Classification of automated findings into verification items.
//!
//! Every function here is pure: the same finding (and saved decision) always
//! produces the same item. Confidence is normalised to the 0-100 scale before
//! any threshold is applied.
//!
//! ## Example
//!
//! ```
//! use a11y_verify::review::classify::classify;
//! use a11y_verify_common::{AutomatedFinding, ConfidenceLevel, FindingStatus, Severity};
//!
//! let finding = AutomatedFinding::new("f-1", "1.4.3", FindingStatus::Fail, 0.45);
//! let item = classify(&finding, None);
//!
//! assert_eq!(item.severity, Severity::Critical);
//! assert_eq!(item.confidence_level, ConfidenceLevel::Low);
//! assert_eq!(item.confidence_score, 45);
//! ```

use std::collections::{HashMap, HashSet};

use a11y_verify_common::{
    AutomatedFinding, AutomatedResult, ConfidenceLevel, FindingStatus, NeedsVerification,
    SavedVerification, Severity, VerificationItem,
};

pub use a11y_verify_common::normalize_confidence;

/// Scores at or above this are `high` confidence.
pub const HIGH_CONFIDENCE_THRESHOLD: u8 = 90;
/// Scores at or above this (and below high) are `medium` confidence.
pub const MEDIUM_CONFIDENCE_THRESHOLD: u8 = 60;
/// Non-failing findings below this score are `serious`.
pub const SERIOUS_BELOW: u8 = 50;
/// Non-failing findings below this score (and not serious) are `moderate`.
pub const MODERATE_BELOW: u8 = 70;

const UNKNOWN_CRITERION: &str = "unknown";

/// Bucket a normalised score.
///
/// An explicit verification request always means manual review, as does a
/// zero score.
pub fn confidence_level(score: u8, needs_verification: NeedsVerification) -> ConfidenceLevel {
    if score == 0 || needs_verification == NeedsVerification::Required {
        ConfidenceLevel::Manual
    } else if score >= HIGH_CONFIDENCE_THRESHOLD {
        ConfidenceLevel::High
    } else if score >= MEDIUM_CONFIDENCE_THRESHOLD {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Low
    }
}

/// Triage severity. A failing status overrides the score.
pub fn severity(status: FindingStatus, score: u8) -> Severity {
    severity_of(status == FindingStatus::Fail, score)
}

fn severity_of(failing: bool, score: u8) -> Severity {
    if failing {
        Severity::Critical
    } else if score < SERIOUS_BELOW {
        Severity::Serious
    } else if score < MODERATE_BELOW {
        Severity::Moderate
    } else {
        Severity::Minor
    }
}

pub fn automated_result(status: FindingStatus) -> AutomatedResult {
    match status {
        FindingStatus::Pass => AutomatedResult::Pass,
        FindingStatus::Fail => AutomatedResult::Fail,
        FindingStatus::NotTested => AutomatedResult::NotTested,
        FindingStatus::NotApplicable | FindingStatus::Other => AutomatedResult::Warning,
    }
}

/// Re-derive level and severity for an item received from the backend.
///
/// Remote records carry their own score and result, but their buckets may be
/// missing or stale.
pub fn reclassify(item: &mut VerificationItem) {
    item.confidence_level = confidence_level(item.confidence_score, NeedsVerification::Unspecified);
    item.severity = severity_of(
        item.automated_result == AutomatedResult::Fail,
        item.confidence_score,
    );
}

/// Whether a finding belongs in the review queue.
pub fn is_included(finding: &AutomatedFinding) -> bool {
    finding.needs_verification.requires_review()
}

/// Summary line shown next to the automated result.
pub fn automated_notes(finding: &AutomatedFinding, score: u8) -> String {
    let remaining = finding.related_issues.len();
    let fixed = finding.fixed_issues.len();

    match (remaining, fixed) {
        (0, 0) => {}
        (r, 0) => return format!("{} {} remaining", r, plural(r)),
        (0, f) => return format!("All {} {} fixed during remediation", f, plural(f)),
        (r, f) => return format!("{} {} remaining, {} fixed during remediation", r, plural(r), f),
    }

    match finding.remarks.as_deref().map(str::trim) {
        Some(remarks) if !remarks.is_empty() => remarks.to_string(),
        _ => format!("Automated analysis completed with {}% confidence", score),
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "issue" } else { "issues" }
}

/// Classify one finding, using its own id.
///
/// A finding without an id gets the positional fallback for index 0; use
/// [`build_queue`] to classify a whole list with stable positional ids.
pub fn classify(finding: &AutomatedFinding, saved: Option<&SavedVerification>) -> VerificationItem {
    let id = finding
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| fallback_id(0, finding));
    classify_as(id, finding, saved)
}

fn classify_as(
    id: String,
    finding: &AutomatedFinding,
    saved: Option<&SavedVerification>,
) -> VerificationItem {
    let score = normalize_confidence(finding.confidence_score.unwrap_or(0.0));
    let criterion_id = finding
        .criterion_id
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(UNKNOWN_CRITERION)
        .to_string();

    let mut item = VerificationItem::new(id, criterion_id);
    item.criterion_name = if finding.name.trim().is_empty() {
        item.criterion_id.clone()
    } else {
        finding.name.clone()
    };
    item.wcag_level = finding.level;
    item.severity = severity(finding.status, score);
    item.confidence_level = confidence_level(score, finding.needs_verification);
    item.confidence_score = score;
    item.automated_result = automated_result(finding.status);
    item.automated_notes = automated_notes(finding, score);
    item.issues = finding.related_issues.clone();
    item.fixed_issues = finding.fixed_issues.clone();
    item.na_suggestion = finding.na_suggestion.clone();

    match saved {
        Some(saved) => {
            let entry = saved.to_entry(&item.id);
            item.with_decision(entry)
        }
        None => item,
    }
}

/// Positional id for a finding the producer sent without one.
fn fallback_id(index: usize, finding: &AutomatedFinding) -> String {
    match finding.criterion_id.as_deref().map(str::trim) {
        Some(criterion) if !criterion.is_empty() => format!("{}-{}", criterion, index),
        _ => format!("finding-{}", index),
    }
}

/// Classify every included finding into a candidate item set.
///
/// Ids are unique in the result: findings without an id get a positional
/// fallback, and a repeated id is disambiguated with its position so two
/// findings never collapse into one item.
pub fn build_queue(
    findings: &[AutomatedFinding],
    saved: &HashMap<String, SavedVerification>,
) -> Vec<VerificationItem> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut items = Vec::with_capacity(findings.len());

    for (index, finding) in findings.iter().enumerate() {
        if !is_included(finding) {
            continue;
        }

        let mut id = match finding.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                let fallback = fallback_id(index, finding);
                tracing::warn!(
                    index,
                    fallback = %fallback,
                    "Finding without id; using positional fallback"
                );
                fallback
            }
        };
        if seen.contains(&id) {
            let mut unique = format!("{}#{}", id, index);
            let mut attempt = 1;
            while seen.contains(&unique) {
                unique = format!("{}#{}-{}", id, index, attempt);
                attempt += 1;
            }
            tracing::warn!(duplicate = %id, id = %unique, "Duplicate finding id");
            id = unique;
        }
        seen.insert(id.clone());

        let decision = saved.get(&id);
        items.push(classify_as(id, finding, decision));
    }

    items
}
