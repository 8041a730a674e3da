//! Read-only views over the verification items.
//!
//! Filtering, progress metrics and selection-set semantics. Nothing here
//! mutates an item.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use a11y_verify_common::{ConfidenceLevel, Severity, VerificationItem, VerificationStatus};
use serde::{Deserialize, Serialize};

/// Status filter token. `Verified` matches every `verified_*` status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    Pending,
    Verified,
    VerifiedPass,
    VerifiedFail,
    VerifiedPartial,
    Deferred,
}

impl StatusFilter {
    pub fn matches(&self, status: VerificationStatus) -> bool {
        match self {
            Self::Verified => status.is_verified(),
            Self::Pending => status == VerificationStatus::Pending,
            Self::VerifiedPass => status == VerificationStatus::VerifiedPass,
            Self::VerifiedFail => status == VerificationStatus::VerifiedFail,
            Self::VerifiedPartial => status == VerificationStatus::VerifiedPartial,
            Self::Deferred => status == VerificationStatus::Deferred,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Verified => "verified",
            Self::VerifiedPass => "verified_pass",
            Self::VerifiedFail => "verified_fail",
            Self::VerifiedPartial => "verified_partial",
            Self::Deferred => "deferred",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "pending" => Ok(Self::Pending),
            "verified" => Ok(Self::Verified),
            "verified_pass" => Ok(Self::VerifiedPass),
            "verified_fail" => Ok(Self::VerifiedFail),
            "verified_partial" => Ok(Self::VerifiedPartial),
            "deferred" => Ok(Self::Deferred),
            _ => Err(format!(
                "Invalid status filter '{}'. Valid values: pending, verified, verified_pass, verified_fail, verified_partial, deferred",
                s
            )),
        }
    }
}

/// Set-membership filter. An empty set places no constraint on its field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub severities: BTreeSet<Severity>,
    #[serde(default)]
    pub confidence_levels: BTreeSet<ConfidenceLevel>,
    #[serde(default)]
    pub statuses: BTreeSet<StatusFilter>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_severities(mut self, severities: impl IntoIterator<Item = Severity>) -> Self {
        self.severities.extend(severities);
        self
    }

    pub fn with_confidence_levels(
        mut self,
        levels: impl IntoIterator<Item = ConfidenceLevel>,
    ) -> Self {
        self.confidence_levels.extend(levels);
        self
    }

    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = StatusFilter>) -> Self {
        self.statuses.extend(statuses);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.severities.is_empty() && self.confidence_levels.is_empty() && self.statuses.is_empty()
    }

    pub fn matches(&self, item: &VerificationItem) -> bool {
        let severity_ok = self.severities.is_empty() || self.severities.contains(&item.severity);
        let confidence_ok = self.confidence_levels.is_empty()
            || self.confidence_levels.contains(&item.confidence_level);
        let status = item.status();
        let status_ok = self.statuses.is_empty() || self.statuses.iter().any(|f| f.matches(status));
        severity_ok && confidence_ok && status_ok
    }
}

/// Items matching `criteria`, in store order.
pub fn filter_items<'a>(
    items: &'a [VerificationItem],
    criteria: &FilterCriteria,
) -> Vec<&'a VerificationItem> {
    items.iter().filter(|item| criteria.matches(item)).collect()
}

pub fn verified_count(items: &[VerificationItem]) -> usize {
    items.iter().filter(|item| item.is_verified()).count()
}

/// Rounded percentage of verified items; 0 for an empty queue.
pub fn progress_percent(verified: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((verified as f64 / total as f64) * 100.0).round() as u8
}

/// Triage ordering: most severe first, then least confident, then criterion.
pub fn triage_order(a: &VerificationItem, b: &VerificationItem) -> Ordering {
    a.severity
        .cmp(&b.severity)
        .then(a.confidence_score.cmp(&b.confidence_score))
        .then_with(|| a.criterion_id.cmp(&b.criterion_id))
        .then_with(|| a.id.cmp(&b.id))
}

/// Aggregate progress over a set of items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub verified: usize,
    pub total: usize,
    pub percent: u8,
    pub by_status: BTreeMap<String, usize>,
    pub by_severity: BTreeMap<String, usize>,
}

impl ProgressSummary {
    pub fn from_items(items: &[VerificationItem]) -> Self {
        let verified = verified_count(items);
        let total = items.len();
        let mut by_status = BTreeMap::new();
        let mut by_severity = BTreeMap::new();
        for item in items {
            *by_status.entry(item.status().to_string()).or_insert(0) += 1;
            *by_severity.entry(item.severity.to_string()).or_insert(0) += 1;
        }
        Self {
            verified,
            total,
            percent: progress_percent(verified, total),
            by_status,
            by_severity,
        }
    }
}

/// Selected item ids. Operations are scoped to the currently visible ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select or deselect one id. Ids outside `visible` are ignored.
    pub fn select(&mut self, id: &str, selected: bool, visible: &[&VerificationItem]) -> bool {
        if !visible.iter().any(|item| item.id == id) {
            return false;
        }
        if selected {
            self.ids.insert(id.to_string());
        } else {
            self.ids.remove(id);
        }
        true
    }

    /// Clear the selection if every visible item is selected, else select
    /// every visible item.
    pub fn toggle_all(&mut self, visible: &[&VerificationItem]) {
        let all_selected =
            !visible.is_empty() && visible.iter().all(|item| self.ids.contains(&item.id));
        if all_selected {
            self.ids.clear();
        } else {
            self.ids = visible.iter().map(|item| item.id.clone()).collect();
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop selected ids that are no longer visible.
    pub fn retain_visible(&mut self, visible: &[&VerificationItem]) {
        let keep: BTreeSet<&str> = visible.iter().map(|item| item.id.as_str()).collect();
        self.ids.retain(|id| keep.contains(id.as_str()));
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use a11y_verify_common::{VerificationHistoryEntry, VerificationMethod};

    fn item(id: &str, severity: Severity, level: ConfidenceLevel) -> VerificationItem {
        let mut item = VerificationItem::new(id, format!("crit-{}", id));
        item.severity = severity;
        item.confidence_level = level;
        item
    }

    fn decided(mut item: VerificationItem, status: VerificationStatus) -> VerificationItem {
        item.record(VerificationHistoryEntry::new(
            status,
            VerificationMethod::ManualReview,
            "n",
            "alex",
        ));
        item
    }

    fn sample() -> Vec<VerificationItem> {
        vec![
            item("a", Severity::Critical, ConfidenceLevel::Low),
            decided(
                item("b", Severity::Minor, ConfidenceLevel::High),
                VerificationStatus::VerifiedPass,
            ),
            decided(
                item("c", Severity::Serious, ConfidenceLevel::Medium),
                VerificationStatus::VerifiedPartial,
            ),
            decided(
                item("d", Severity::Critical, ConfidenceLevel::Manual),
                VerificationStatus::Deferred,
            ),
        ]
    }

    fn ids(items: &[&VerificationItem]) -> Vec<String> {
        items.iter().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn test_empty_criteria_match_everything() {
        let items = sample();
        assert_eq!(filter_items(&items, &FilterCriteria::new()).len(), 4);
    }

    #[test]
    fn test_filter_by_severity() {
        let items = sample();
        let criteria = FilterCriteria::new().with_severities([Severity::Critical]);
        assert_eq!(ids(&filter_items(&items, &criteria)), vec!["a", "d"]);
    }

    #[test]
    fn test_generic_verified_token_matches_all_verified_statuses() {
        let items = sample();
        let criteria = FilterCriteria::new().with_statuses([StatusFilter::Verified]);
        assert_eq!(ids(&filter_items(&items, &criteria)), vec!["b", "c"]);
    }

    #[test]
    fn test_filters_combine_across_fields() {
        let items = sample();
        let criteria = FilterCriteria::new()
            .with_severities([Severity::Critical, Severity::Serious])
            .with_confidence_levels([ConfidenceLevel::Low, ConfidenceLevel::Medium]);
        assert_eq!(ids(&filter_items(&items, &criteria)), vec!["a", "c"]);
    }

    #[test]
    fn test_progress_metrics() {
        let items = sample();
        assert_eq!(verified_count(&items), 2);
        assert_eq!(progress_percent(2, 4), 50);
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 67);
        assert_eq!(progress_percent(0, 0), 0);
    }

    #[test]
    fn test_progress_summary_counts() {
        let summary = ProgressSummary::from_items(&sample());
        assert_eq!(summary.verified, 2);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.percent, 50);
        assert_eq!(summary.by_status["pending"], 1);
        assert_eq!(summary.by_status["deferred"], 1);
        assert_eq!(summary.by_severity["critical"], 2);
    }

    #[test]
    fn test_triage_order() {
        let mut items = sample();
        items[0].confidence_score = 40;
        items[3].confidence_score = 10;
        items.sort_by(triage_order);
        let ordered: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ordered, vec!["d", "a", "c", "b"]);
    }

    #[test]
    fn test_select_only_visible_ids() {
        let items = sample();
        let visible = filter_items(&items, &FilterCriteria::new().with_severities([Severity::Critical]));
        let mut selection = Selection::new();

        assert!(selection.select("a", true, &visible));
        assert!(!selection.select("b", true, &visible));
        assert_eq!(selection.ids(), vec!["a"]);

        assert!(selection.select("a", false, &visible));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_toggle_all_selects_then_clears() {
        let items = sample();
        let visible = filter_items(&items, &FilterCriteria::new().with_severities([Severity::Critical]));
        let mut selection = Selection::new();

        selection.select("a", true, &visible);
        selection.toggle_all(&visible);
        assert_eq!(selection.ids(), vec!["a", "d"]);

        selection.toggle_all(&visible);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_toggle_all_on_empty_view_is_a_no_op() {
        let mut selection = Selection::new();
        selection.toggle_all(&[]);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_retain_visible_prunes_hidden_ids() {
        let items = sample();
        let all = filter_items(&items, &FilterCriteria::new());
        let mut selection = Selection::new();
        selection.toggle_all(&all);
        assert_eq!(selection.len(), 4);

        let pending = filter_items(&items, &FilterCriteria::new().with_statuses([StatusFilter::Pending]));
        selection.retain_visible(&pending);
        assert_eq!(selection.ids(), vec!["a"]);
    }

    #[test]
    fn test_status_filter_parsing() {
        assert_eq!("verified".parse::<StatusFilter>().unwrap(), StatusFilter::Verified);
        assert_eq!(
            "verified-fail".parse::<StatusFilter>().unwrap(),
            StatusFilter::VerifiedFail
        );
        assert!("done".parse::<StatusFilter>().is_err());
    }
}
