//! Append-only verification history.
//!
//! Every decision a reviewer commits becomes one [`VerificationHistoryEntry`].
//! [`VerificationHistory`] only exposes read access and a crate-private append,
//! so prior entries can never be edited or removed once recorded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{VerificationMethod, VerificationStatus};

/// One committed reviewer decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationHistoryEntry {
    pub id: String,
    pub status: VerificationStatus,
    pub method: VerificationMethod,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub verified_by: String,
    pub verified_at: DateTime<Utc>,
}

impl VerificationHistoryEntry {
    /// Create an entry stamped with a fresh id and the current time.
    pub fn new(
        status: VerificationStatus,
        method: VerificationMethod,
        notes: impl Into<String>,
        verified_by: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            status,
            method,
            notes: notes.into(),
            verified_by: verified_by.into(),
            verified_at: Utc::now(),
        }
    }
}

/// Ordered decision log. Insertion order is chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerificationHistory(Vec<VerificationHistoryEntry>);

impl VerificationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn single(entry: VerificationHistoryEntry) -> Self {
        Self(vec![entry])
    }

    pub(crate) fn append(&mut self, entry: VerificationHistoryEntry) {
        self.0.push(entry);
    }

    /// The most recent decision, if any.
    pub fn latest(&self) -> Option<&VerificationHistoryEntry> {
        self.0.last()
    }

    pub fn entries(&self) -> &[VerificationHistoryEntry] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VerificationHistoryEntry> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when `other` starts with every entry of `self`, in order.
    pub fn is_prefix_of(&self, other: &VerificationHistory) -> bool {
        other.0.len() >= self.0.len() && self.0.iter().zip(&other.0).all(|(a, b)| a.id == b.id)
    }
}

impl<'a> IntoIterator for &'a VerificationHistory {
    type Item = &'a VerificationHistoryEntry;
    type IntoIter = std::slice::Iter<'a, VerificationHistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(status: VerificationStatus) -> VerificationHistoryEntry {
        VerificationHistoryEntry::new(status, VerificationMethod::ManualReview, "", "alex")
    }

    #[test]
    fn test_append_preserves_order() {
        let mut history = VerificationHistory::new();
        history.append(entry(VerificationStatus::VerifiedFail));
        history.append(entry(VerificationStatus::VerifiedPass));

        assert_eq!(history.len(), 2);
        assert_eq!(history.entries()[0].status, VerificationStatus::VerifiedFail);
        assert_eq!(
            history.latest().map(|e| e.status),
            Some(VerificationStatus::VerifiedPass)
        );
    }

    #[test]
    fn test_new_entries_get_distinct_ids() {
        let a = entry(VerificationStatus::Deferred);
        let b = entry(VerificationStatus::Deferred);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_is_prefix_of() {
        let first = entry(VerificationStatus::VerifiedPass);
        let second = entry(VerificationStatus::VerifiedFail);

        let short = VerificationHistory::single(first.clone());
        let mut long = VerificationHistory::single(first);
        long.append(second.clone());

        assert!(short.is_prefix_of(&long));
        assert!(!long.is_prefix_of(&short));
        assert!(VerificationHistory::new().is_prefix_of(&short));
        assert!(!VerificationHistory::single(second).is_prefix_of(&long));
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let history = VerificationHistory::single(entry(VerificationStatus::VerifiedPass));
        let json = serde_json::to_value(&history).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["status"], "verified_pass");
        assert_eq!(json[0]["method"], "Manual Review");
    }
}
