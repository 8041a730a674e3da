//! Pre-filled decisions for the review form.
//!
//! The policy only ever suggests. Nothing here writes to an item's history;
//! a suggestion becomes a decision only when the reviewer submits it.
//!
//! | Situation                                   | Suggestion                        |
//! |---------------------------------------------|-----------------------------------|
//! | N/A suggestion says `not_applicable`        | `verified_pass`, Manual Review, locked until accepted |
//! | confidence >= 80 and automated pass / fail  | `verified_pass` / `verified_fail` |
//! | anything else                               | unset, reviewer must choose       |

use a11y_verify_common::{
    AutomatedResult, NaSuggestion, VerificationItem, VerificationMethod, VerificationStatus,
};
use serde::{Deserialize, Serialize};

/// Minimum confidence for pre-selecting the automated outcome.
pub const SMART_DEFAULT_THRESHOLD: u8 = 80;

/// Minimum N/A-suggestion confidence for one-click acceptance.
pub const QUICK_ACCEPT_NA_THRESHOLD: u8 = 90;

/// Why a draft looks the way it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionReason {
    /// The criterion was suggested as not applicable.
    NotApplicable,
    /// Automation is confident enough to pre-select its own outcome.
    HighConfidence,
    /// The reviewer has to choose.
    ExplicitChoiceRequired,
    /// The item already carries a decision; the draft mirrors it.
    AlreadyReviewed,
    /// The reviewer undid an accepted N/A suggestion.
    Dismissed,
}

/// Editable decision shown in the review form for one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionDraft {
    pub status: Option<VerificationStatus>,
    pub method: Option<VerificationMethod>,
    pub notes: String,
    /// Status and method cannot be edited until the N/A suggestion is accepted.
    pub locked: bool,
    /// The N/A suggestion was explicitly accepted into this draft.
    pub na_accepted: bool,
    pub reason: SuggestionReason,
}

impl DecisionDraft {
    fn unset(reason: SuggestionReason) -> Self {
        Self {
            status: None,
            method: None,
            notes: String::new(),
            locked: false,
            na_accepted: false,
            reason,
        }
    }

    /// Blank, editable draft left behind by an undo.
    pub fn dismissed() -> Self {
        Self::unset(SuggestionReason::Dismissed)
    }

    /// Draft after the reviewer explicitly accepts an N/A suggestion.
    pub fn accepted_na(suggestion: &NaSuggestion) -> Self {
        Self {
            status: Some(VerificationStatus::VerifiedPass),
            method: Some(VerificationMethod::ManualReview),
            notes: na_acceptance_note(suggestion),
            locked: false,
            na_accepted: true,
            reason: SuggestionReason::NotApplicable,
        }
    }
}

/// Suggest an initial decision for `item`.
///
/// # Examples
///
/// ```
/// use a11y_verify::review::smart_default::suggest;
/// use a11y_verify_common::{AutomatedResult, VerificationItem, VerificationStatus};
///
/// let mut item = VerificationItem::new("f-1", "1.4.1");
/// item.confidence_score = 95;
/// item.automated_result = AutomatedResult::Pass;
///
/// assert_eq!(suggest(&item).status, Some(VerificationStatus::VerifiedPass));
/// ```
pub fn suggest(item: &VerificationItem) -> DecisionDraft {
    if !item.is_pending() {
        return DecisionDraft {
            status: Some(item.status()),
            method: item.method(),
            notes: item.notes().to_string(),
            locked: false,
            na_accepted: false,
            reason: SuggestionReason::AlreadyReviewed,
        };
    }

    if item
        .na_suggestion
        .as_ref()
        .is_some_and(NaSuggestion::is_not_applicable)
    {
        return DecisionDraft {
            status: Some(VerificationStatus::VerifiedPass),
            method: Some(VerificationMethod::ManualReview),
            notes: String::new(),
            locked: true,
            na_accepted: false,
            reason: SuggestionReason::NotApplicable,
        };
    }

    if item.confidence_score >= SMART_DEFAULT_THRESHOLD {
        let status = match item.automated_result {
            AutomatedResult::Pass => Some(VerificationStatus::VerifiedPass),
            AutomatedResult::Fail => Some(VerificationStatus::VerifiedFail),
            AutomatedResult::Warning | AutomatedResult::NotTested => None,
        };
        if let Some(status) = status {
            return DecisionDraft {
                status: Some(status),
                method: None,
                notes: String::new(),
                locked: false,
                na_accepted: false,
                reason: SuggestionReason::HighConfidence,
            };
        }
    }

    DecisionDraft::unset(SuggestionReason::ExplicitChoiceRequired)
}

/// Whether `item` qualifies for one-click N/A acceptance.
pub fn is_quick_accept_eligible(item: &VerificationItem) -> bool {
    item.na_suggestion
        .as_ref()
        .is_some_and(|na| na.is_not_applicable() && na.confidence >= QUICK_ACCEPT_NA_THRESHOLD)
}

/// Audit note recorded when an N/A suggestion is accepted.
pub fn na_acceptance_note(suggestion: &NaSuggestion) -> String {
    format!(
        "AI-suggested Not Applicable ({}% confidence): {}",
        suggestion.confidence, suggestion.rationale
    )
}
