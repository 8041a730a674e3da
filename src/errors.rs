//! Typed error hierarchy for the verification engine.
//!
//! - `ValidationError`: a decision was rejected before any mutation
//! - `RemoteSubmitError`: the persistence call failed; recovered locally
//! - `VerificationError`: everything an engine operation can return

use a11y_verify_common::{BackendError, VerificationStatus};
use std::time::Duration;
use thiserror::Error;

/// A decision rejected before touching the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Choose a verification status")]
    StatusRequired,

    #[error("Notes are required when marking an item {status}")]
    NotesRequired { status: VerificationStatus },

    #[error("No items selected")]
    NoItemsSelected,

    #[error("None of the selected items has a high-confidence Not Applicable suggestion")]
    NoEligibleItems,
}

impl ValidationError {
    /// Form field the message should be shown next to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::StatusRequired => "status",
            Self::NotesRequired { .. } => "notes",
            Self::NoItemsSelected | Self::NoEligibleItems => "selection",
        }
    }
}

/// Why a decision could not be persisted remotely.
///
/// Never fatal: the orchestrator applies the same decision to the local store
/// and reports this as a warning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteSubmitError {
    #[error("Running in offline mode")]
    Offline,

    #[error("Remote submit timed out after {}s", .after.as_secs())]
    Timeout { after: Duration },

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("Backend confirmed item {returned} for a submission to {requested}")]
    MismatchedItem { requested: String, returned: String },
}

/// Errors from engine operations.
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Verification item {id} not found")]
    ItemNotFound { id: String },

    #[error("Item {id} has no Not Applicable suggestion")]
    NoSuggestion { id: String },

    #[error("Item {id} has no accepted Not Applicable suggestion to undo")]
    NothingToUndo { id: String },

    #[error("Decision for item {id} is locked until the Not Applicable suggestion is accepted")]
    DraftLocked { id: String },

    #[error("No job id configured for remote operations")]
    NoJob,

    #[error("Failed to refresh from backend: {0}")]
    Refresh(#[source] RemoteSubmitError),
}
