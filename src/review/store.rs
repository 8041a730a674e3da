//! Live set of verification items and the reconciliation merge.
//!
//! Upstream data is refreshed in the background while reviewers work, so a
//! refresh must never clobber a decision. [`ReconciliationStore::reconcile`]
//! merges a freshly classified candidate set into the live items:
//!
//! 1. The first candidate set of a session is adopted as is.
//! 2. A live item that already carries a decision keeps its status and
//!    history; everything else (issues, notes, scores) comes from the
//!    candidate.
//! 3. Any other candidate replaces the live item wholesale.
//! 4. Live items missing from the candidate set are dropped.
//!
//! Item mutations otherwise only happen through [`ReconciliationStore::record`]
//! and [`ReconciliationStore::apply_confirmed`], both of which append.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use a11y_verify_common::{SavedVerification, VerificationHistoryEntry, VerificationItem};
use serde::{Deserialize, Serialize};

use crate::errors::VerificationError;

/// Store shared between the session and in-flight submissions.
pub type SharedStore = Arc<Mutex<ReconciliationStore>>;

/// Lock the shared store.
///
/// Every store operation leaves the store consistent before it can panic, so
/// a poisoned lock is recovered rather than propagated.
pub fn lock_store(store: &SharedStore) -> MutexGuard<'_, ReconciliationStore> {
    store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Counts from one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileStats {
    /// Candidates adopted wholesale (new or still pending).
    pub adopted: usize,
    /// Live items whose decisions were preserved over the candidate.
    pub preserved: usize,
    /// Live items no longer present upstream.
    pub dropped: usize,
}

/// Ordered, id-indexed collection of verification items.
#[derive(Debug, Default)]
pub struct ReconciliationStore {
    items: Vec<VerificationItem>,
    index: HashMap<String, usize>,
    initialized: bool,
}

impl ReconciliationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a new store for sharing.
    pub fn shared() -> SharedStore {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Whether a candidate set has been adopted this session.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn items(&self) -> &[VerificationItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&VerificationItem> {
        self.index.get(id).map(|&i| &self.items[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Merge a fresh candidate set into the live items.
    pub fn reconcile(&mut self, candidates: Vec<VerificationItem>) -> ReconcileStats {
        let mut stats = ReconcileStats::default();
        let first = !self.initialized;

        let mut merged: Vec<VerificationItem> = Vec::with_capacity(candidates.len());
        let mut index: HashMap<String, usize> = HashMap::with_capacity(candidates.len());

        for mut candidate in candidates {
            if index.contains_key(&candidate.id) {
                tracing::warn!(id = %candidate.id, "Ignoring duplicate candidate");
                continue;
            }

            match self.get(&candidate.id) {
                Some(live) if !first && !live.is_pending() => {
                    candidate.carry_review_from(live);
                    stats.preserved += 1;
                }
                _ => stats.adopted += 1,
            }

            index.insert(candidate.id.clone(), merged.len());
            merged.push(candidate);
        }

        stats.dropped = self
            .items
            .iter()
            .filter(|item| !index.contains_key(&item.id))
            .count();

        self.items = merged;
        self.index = index;
        self.initialized = true;

        tracing::debug!(
            adopted = stats.adopted,
            preserved = stats.preserved,
            dropped = stats.dropped,
            first,
            "Reconciled verification items"
        );

        stats
    }

    /// Append a decision committed locally.
    pub fn record(
        &mut self,
        id: &str,
        entry: VerificationHistoryEntry,
    ) -> Result<VerificationItem, VerificationError> {
        let item = self.get_mut(id)?;
        item.record(entry);
        Ok(item.clone())
    }

    /// Apply a backend-confirmed item.
    ///
    /// Only the confirmed decision log is taken; descriptive fields stay as
    /// the live store has them, since a refresh may have landed while the
    /// call was in flight. If the confirmed log does not extend the live log,
    /// or was rebuilt from a bare status, `fallback` is appended locally
    /// instead so nothing is lost.
    pub fn apply_confirmed(
        &mut self,
        confirmed: &VerificationItem,
        fallback: VerificationHistoryEntry,
    ) -> Result<VerificationItem, VerificationError> {
        let item = self.get_mut(&confirmed.id)?;
        let extends = confirmed.history().len() > item.history().len()
            && item.history().is_prefix_of(confirmed.history());

        if confirmed.has_synthesized_history() {
            tracing::debug!(
                id = %confirmed.id,
                status = %confirmed.status(),
                "Backend confirmed without a decision log; recording locally"
            );
            item.record(fallback);
        } else if extends {
            item.carry_review_from(confirmed);
        } else {
            tracing::warn!(
                id = %confirmed.id,
                "Confirmed history does not extend the live history; recording locally"
            );
            item.record(fallback);
        }
        Ok(item.clone())
    }

    /// Latest decision per item, for persisting between sessions.
    pub fn saved_decisions(&self) -> BTreeMap<String, SavedVerification> {
        self.items
            .iter()
            .filter_map(|item| {
                item.history()
                    .latest()
                    .map(|entry| (item.id.clone(), SavedVerification::from_entry(entry)))
            })
            .collect()
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut VerificationItem, VerificationError> {
        match self.index.get(id) {
            Some(&i) => Ok(&mut self.items[i]),
            None => Err(VerificationError::ItemNotFound { id: id.to_string() }),
        }
    }
}
