//! Submission of verification decisions.
//!
//! Every submission tries the remote backend first. If that fails, times out,
//! or the session is offline, the identical decision is appended to the local
//! store and the remote failure is reported as a warning. A validated
//! decision is therefore never lost.
//!
//! Bulk submissions fan out one remote call per item, run them concurrently,
//! and apply each outcome independently.
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use a11y_verify::backend::OfflineBackend;
//! use a11y_verify::review::store::ReconciliationStore;
//! use a11y_verify::review::submit::{DecisionRequest, SubmissionOrchestrator, SubmitSettings};
//! use a11y_verify_common::{VerificationMethod, VerificationStatus};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let store = ReconciliationStore::shared();
//! let orchestrator = SubmissionOrchestrator::new(
//!     Arc::new(OfflineBackend),
//!     store.clone(),
//!     SubmitSettings::offline("alex"),
//! );
//!
//! let request = DecisionRequest::new(VerificationStatus::VerifiedFail, VerificationMethod::Nvda)
//!     .with_notes("Reading order jumps from heading to footer");
//! let outcome = orchestrator.submit("f-1", &request).await?;
//! if let Some(warning) = outcome.warning() {
//!     eprintln!("saved locally: {}", warning);
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use a11y_verify_common::{
    SubmitRequest, VerificationBackend, VerificationHistoryEntry, VerificationItem,
    VerificationMethod, VerificationStatus,
};
use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::errors::{RemoteSubmitError, ValidationError, VerificationError};
use crate::review::smart_default::{is_quick_accept_eligible, na_acceptance_note};
use crate::review::store::{SharedStore, lock_store};

/// Default per-call timeout for remote submissions.
pub const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 15;

/// A decision as entered by the reviewer, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRequest {
    pub status: Option<VerificationStatus>,
    #[serde(default)]
    pub method: VerificationMethod,
    #[serde(default)]
    pub notes: String,
}

impl DecisionRequest {
    pub fn new(status: VerificationStatus, method: VerificationMethod) -> Self {
        Self {
            status: Some(status),
            method,
            notes: String::new(),
        }
    }

    /// A request with no status chosen yet.
    pub fn unset(method: VerificationMethod) -> Self {
        Self {
            status: None,
            method,
            notes: String::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Check the request before anything is mutated.
    ///
    /// A status must be chosen (`pending` counts as not chosen), and fail or
    /// partial decisions need non-blank notes.
    ///
    /// # Examples
    ///
    /// ```
    /// use a11y_verify::review::submit::DecisionRequest;
    /// use a11y_verify_common::{VerificationMethod, VerificationStatus};
    ///
    /// let blank = DecisionRequest::new(VerificationStatus::VerifiedFail, VerificationMethod::Nvda)
    ///     .with_notes("   ");
    /// assert!(blank.validate().is_err());
    ///
    /// let pass = DecisionRequest::new(VerificationStatus::VerifiedPass, VerificationMethod::Nvda);
    /// assert!(pass.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<ValidDecision, ValidationError> {
        let status = match self.status {
            Some(status) if !status.is_pending() => status,
            _ => return Err(ValidationError::StatusRequired),
        };
        let notes = self.notes.trim();
        if status.requires_notes() && notes.is_empty() {
            return Err(ValidationError::NotesRequired { status });
        }
        Ok(ValidDecision {
            status,
            method: self.method,
            notes: notes.to_string(),
        })
    }
}

/// A decision that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDecision {
    status: VerificationStatus,
    method: VerificationMethod,
    notes: String,
}

impl ValidDecision {
    pub fn status(&self) -> VerificationStatus {
        self.status
    }

    pub fn method(&self) -> VerificationMethod {
        self.method
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    fn to_request(&self, item_id: &str) -> SubmitRequest {
        SubmitRequest {
            item_id: item_id.to_string(),
            status: self.status,
            method: self.method,
            notes: self.notes.clone(),
        }
    }

    fn to_entry(&self, reviewer: &str) -> VerificationHistoryEntry {
        VerificationHistoryEntry::new(self.status, self.method, self.notes.clone(), reviewer)
    }
}

/// Where a decision ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persistence {
    /// The backend confirmed the decision.
    Remote,
    /// The decision was applied to the local store only.
    Local { reason: RemoteSubmitError },
}

/// Result of a single submission.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub item: VerificationItem,
    pub persistence: Persistence,
}

impl SubmitOutcome {
    pub fn is_remote(&self) -> bool {
        matches!(self.persistence, Persistence::Remote)
    }

    /// Remote failure recovered by the local fallback, if any.
    pub fn warning(&self) -> Option<&RemoteSubmitError> {
        match &self.persistence {
            Persistence::Remote => None,
            Persistence::Local { reason } => Some(reason),
        }
    }
}

/// Result of a bulk submission.
///
/// `succeeded` and `failed` count remote outcomes. Every item in `items` holds
/// the decision either way.
#[derive(Debug, Clone, Default)]
pub struct BulkOutcome {
    pub items: Vec<VerificationItem>,
    pub succeeded: usize,
    pub failed: usize,
    /// Remote failures, per item id, recovered locally.
    pub failures: Vec<(String, RemoteSubmitError)>,
    /// Requested ids that are not in the store.
    pub missing: Vec<String>,
}

impl BulkOutcome {
    pub fn is_partial_failure(&self) -> bool {
        self.failed > 0 && self.succeeded > 0
    }

    pub fn applied(&self) -> usize {
        self.items.len()
    }
}

/// Settings for remote submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitSettings {
    /// Job the items belong to; without one every submission is local.
    pub job_id: Option<String>,
    /// Identity stamped on every history entry.
    pub reviewer: String,
    pub timeout: Duration,
    /// Skip the backend entirely.
    pub offline: bool,
}

impl SubmitSettings {
    pub fn new(job_id: impl Into<String>, reviewer: impl Into<String>) -> Self {
        Self {
            job_id: Some(job_id.into()),
            reviewer: reviewer.into(),
            timeout: Duration::from_secs(DEFAULT_REMOTE_TIMEOUT_SECS),
            offline: false,
        }
    }

    pub fn offline(reviewer: impl Into<String>) -> Self {
        Self {
            job_id: None,
            reviewer: reviewer.into(),
            timeout: Duration::from_secs(DEFAULT_REMOTE_TIMEOUT_SECS),
            offline: true,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Validates decisions and persists them remotely or locally.
pub struct SubmissionOrchestrator {
    backend: Arc<dyn VerificationBackend>,
    store: SharedStore,
    settings: SubmitSettings,
}

impl SubmissionOrchestrator {
    pub fn new(
        backend: Arc<dyn VerificationBackend>,
        store: SharedStore,
        settings: SubmitSettings,
    ) -> Self {
        Self {
            backend,
            store,
            settings,
        }
    }

    pub fn settings(&self) -> &SubmitSettings {
        &self.settings
    }

    /// Submit one decision.
    pub async fn submit(
        &self,
        item_id: &str,
        request: &DecisionRequest,
    ) -> Result<SubmitOutcome, VerificationError> {
        let decision = request.validate()?;
        if !lock_store(&self.store).contains(item_id) {
            return Err(VerificationError::ItemNotFound {
                id: item_id.to_string(),
            });
        }

        let remote = self.remote_submit(item_id, &decision).await;
        self.apply(item_id, &decision, remote)
    }

    /// Submit the same decision for every id.
    pub async fn bulk_submit(
        &self,
        item_ids: &[String],
        request: &DecisionRequest,
    ) -> Result<BulkOutcome, VerificationError> {
        let decision = request.validate()?;
        if item_ids.is_empty() {
            return Err(ValidationError::NoItemsSelected.into());
        }
        let batch: Vec<(String, ValidDecision)> = dedup(item_ids)
            .into_iter()
            .map(|id| (id, decision.clone()))
            .collect();
        Ok(self.submit_batch(batch).await)
    }

    /// Accept high-confidence Not Applicable suggestions in one go.
    ///
    /// Ids whose suggestion is missing, not `not_applicable`, or below the
    /// quick-accept threshold are skipped. Each accepted item records
    /// `verified_pass` via Manual Review with a note quoting the suggestion.
    pub async fn quick_accept_na(
        &self,
        item_ids: &[String],
    ) -> Result<BulkOutcome, VerificationError> {
        let batch: Vec<(String, ValidDecision)> = {
            let store = lock_store(&self.store);
            dedup(item_ids)
                .into_iter()
                .filter_map(|id| {
                    let item = store.get(&id)?;
                    if !is_quick_accept_eligible(item) {
                        return None;
                    }
                    let suggestion = item.na_suggestion.as_ref()?;
                    let decision = DecisionRequest::new(
                        VerificationStatus::VerifiedPass,
                        VerificationMethod::ManualReview,
                    )
                    .with_notes(na_acceptance_note(suggestion))
                    .validate()
                    .ok()?;
                    Some((id, decision))
                })
                .collect()
        };

        if batch.is_empty() {
            return Err(ValidationError::NoEligibleItems.into());
        }
        Ok(self.submit_batch(batch).await)
    }

    async fn submit_batch(&self, batch: Vec<(String, ValidDecision)>) -> BulkOutcome {
        let mut outcome = BulkOutcome::default();

        let (present, missing): (Vec<_>, Vec<_>) = {
            let store = lock_store(&self.store);
            batch.into_iter().partition(|(id, _)| store.contains(id))
        };
        outcome.missing = missing.into_iter().map(|(id, _)| id).collect();

        let calls = present
            .iter()
            .map(|(id, decision)| self.remote_submit(id, decision));
        let results = join_all(calls).await;

        for ((id, decision), remote) in present.iter().zip(results) {
            let remote_ok = remote.is_ok();
            match self.apply(id, decision, remote) {
                Ok(applied) => {
                    if remote_ok {
                        outcome.succeeded += 1;
                    } else {
                        outcome.failed += 1;
                        if let Some(reason) = applied.warning() {
                            outcome.failures.push((id.clone(), reason.clone()));
                        }
                    }
                    outcome.items.push(applied.item);
                }
                Err(e) => {
                    // Dropped by a refresh while the call was in flight
                    tracing::warn!(id = %id, error = %e, "Item vanished before submission applied");
                    outcome.missing.push(id.clone());
                }
            }
        }

        if outcome.failed > 0 {
            tracing::warn!(
                succeeded = outcome.succeeded,
                failed = outcome.failed,
                "Bulk submission partially persisted remotely; failures kept locally"
            );
        } else {
            tracing::info!(succeeded = outcome.succeeded, "Bulk submission persisted");
        }

        outcome
    }

    async fn remote_submit(
        &self,
        item_id: &str,
        decision: &ValidDecision,
    ) -> Result<VerificationItem, RemoteSubmitError> {
        let job_id = match (&self.settings.job_id, self.settings.offline) {
            (Some(job_id), false) => job_id,
            _ => return Err(RemoteSubmitError::Offline),
        };

        let request = decision.to_request(item_id);
        let confirmed = tokio::time::timeout(
            self.settings.timeout,
            self.backend.submit(job_id, &request),
        )
        .await
        .map_err(|_| RemoteSubmitError::Timeout {
            after: self.settings.timeout,
        })??;

        if confirmed.id != item_id {
            return Err(RemoteSubmitError::MismatchedItem {
                requested: item_id.to_string(),
                returned: confirmed.id,
            });
        }
        Ok(confirmed)
    }

    fn apply(
        &self,
        item_id: &str,
        decision: &ValidDecision,
        remote: Result<VerificationItem, RemoteSubmitError>,
    ) -> Result<SubmitOutcome, VerificationError> {
        let entry = decision.to_entry(&self.settings.reviewer);
        let mut store = lock_store(&self.store);

        match remote {
            Ok(confirmed) => {
                let item = store.apply_confirmed(&confirmed, entry)?;
                tracing::info!(id = %item_id, status = %decision.status, "Decision persisted remotely");
                Ok(SubmitOutcome {
                    item,
                    persistence: Persistence::Remote,
                })
            }
            Err(reason) => {
                let item = store.record(item_id, entry)?;
                if matches!(reason, RemoteSubmitError::Offline) {
                    tracing::debug!(id = %item_id, status = %decision.status, "Decision recorded locally");
                } else {
                    tracing::warn!(
                        id = %item_id,
                        error = %reason,
                        "Remote submit failed; decision recorded locally"
                    );
                }
                Ok(SubmitOutcome {
                    item,
                    persistence: Persistence::Local { reason },
                })
            }
        }
    }
}

fn dedup(ids: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}
