//! Review session: the surface the presentation layer drives.
//!
//! A [`VerificationSession`] owns the live store, the filter, the selection and
//! the per-item decision drafts. Reads are snapshots; writes go through the
//! [`SubmissionOrchestrator`] so every decision takes the remote-then-local
//! path.

use std::collections::HashMap;
use std::sync::Arc;

use a11y_verify_common::{
    AutomatedFinding, SavedVerification, VerificationBackend, VerificationItem,
};

use crate::errors::{RemoteSubmitError, VerificationError};
use crate::review::classify::{build_queue, reclassify};
use crate::review::filter::{
    FilterCriteria, ProgressSummary, Selection, filter_items, progress_percent, verified_count,
};
use crate::review::smart_default::{DecisionDraft, suggest};
use crate::review::store::{ReconcileStats, ReconciliationStore, SharedStore, lock_store};
use crate::review::submit::{
    BulkOutcome, DecisionRequest, SubmissionOrchestrator, SubmitOutcome, SubmitSettings,
};

pub struct VerificationSession {
    store: SharedStore,
    backend: Arc<dyn VerificationBackend>,
    orchestrator: SubmissionOrchestrator,
    criteria: FilterCriteria,
    selection: Selection,
    drafts: HashMap<String, DecisionDraft>,
}

impl VerificationSession {
    pub fn new(backend: Arc<dyn VerificationBackend>, settings: SubmitSettings) -> Self {
        let store = ReconciliationStore::shared();
        let orchestrator = SubmissionOrchestrator::new(backend.clone(), store.clone(), settings);
        Self {
            store,
            backend,
            orchestrator,
            criteria: FilterCriteria::default(),
            selection: Selection::new(),
            drafts: HashMap::new(),
        }
    }

    pub fn settings(&self) -> &SubmitSettings {
        self.orchestrator.settings()
    }

    /// Classify `findings` and merge them into the live items.
    pub fn refresh(
        &mut self,
        findings: &[AutomatedFinding],
        saved: &HashMap<String, SavedVerification>,
    ) -> ReconcileStats {
        let candidates = build_queue(findings, saved);
        self.reconcile(candidates)
    }

    /// Fetch the job's queue from the backend and merge it as another
    /// candidate set.
    pub async fn refresh_from_backend(&mut self) -> Result<ReconcileStats, VerificationError> {
        let settings = self.orchestrator.settings();
        let job_id = settings.job_id.clone().ok_or(VerificationError::NoJob)?;
        if settings.offline {
            return Err(VerificationError::Refresh(RemoteSubmitError::Offline));
        }
        let timeout = settings.timeout;

        let queue = tokio::time::timeout(timeout, self.backend.fetch_queue(&job_id))
            .await
            .map_err(|_| VerificationError::Refresh(RemoteSubmitError::Timeout { after: timeout }))?
            .map_err(|e| VerificationError::Refresh(e.into()))?;

        if queue.total_count != queue.items.len() {
            tracing::debug!(
                job = %job_id,
                reported = queue.total_count,
                received = queue.items.len(),
                "Remote queue count disagrees with item list"
            );
        }
        let mut candidates = queue.items;
        candidates.iter_mut().for_each(reclassify);
        Ok(self.reconcile(candidates))
    }

    fn reconcile(&mut self, candidates: Vec<VerificationItem>) -> ReconcileStats {
        let stats = lock_store(&self.store).reconcile(candidates);
        {
            let store = lock_store(&self.store);
            self.drafts
                .retain(|id, _| store.get(id).is_some_and(VerificationItem::is_pending));
        }
        self.prune_selection();
        stats
    }

    pub fn items(&self) -> Vec<VerificationItem> {
        lock_store(&self.store).items().to_vec()
    }

    pub fn item(&self, id: &str) -> Option<VerificationItem> {
        lock_store(&self.store).get(id).cloned()
    }

    /// Items passing the current filter, in store order.
    pub fn filtered_items(&self) -> Vec<VerificationItem> {
        let store = lock_store(&self.store);
        filter_items(store.items(), &self.criteria)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn filter(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn selected_ids(&self) -> Vec<String> {
        self.selection.ids()
    }

    pub fn verified_count(&self) -> usize {
        verified_count(lock_store(&self.store).items())
    }

    pub fn total_count(&self) -> usize {
        lock_store(&self.store).len()
    }

    pub fn progress_percent(&self) -> u8 {
        let store = lock_store(&self.store);
        progress_percent(verified_count(store.items()), store.len())
    }

    pub fn summary(&self) -> ProgressSummary {
        ProgressSummary::from_items(lock_store(&self.store).items())
    }

    /// Select or deselect a visible item. Returns false if `id` is not visible.
    pub fn select(&mut self, id: &str, selected: bool) -> bool {
        let store = lock_store(&self.store);
        let visible = filter_items(store.items(), &self.criteria);
        self.selection.select(id, selected, &visible)
    }

    /// Select every visible item, or clear the selection if all already are.
    pub fn select_all(&mut self) {
        let store = lock_store(&self.store);
        let visible = filter_items(store.items(), &self.criteria);
        self.selection.toggle_all(&visible);
    }

    pub fn deselect_all(&mut self) {
        self.selection.clear();
    }

    /// Replace the filter. Selected ids that are no longer visible are dropped.
    pub fn set_filter(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.prune_selection();
    }

    fn prune_selection(&mut self) {
        let store = lock_store(&self.store);
        let visible = filter_items(store.items(), &self.criteria);
        self.selection.retain_visible(&visible);
    }

    /// The decision form for `id`: the in-session draft if any, else the
    /// smart-default suggestion.
    pub fn draft(&self, id: &str) -> Result<DecisionDraft, VerificationError> {
        if let Some(draft) = self.drafts.get(id) {
            return Ok(draft.clone());
        }
        let store = lock_store(&self.store);
        let item = store.get(id).ok_or_else(|| VerificationError::ItemNotFound {
            id: id.to_string(),
        })?;
        Ok(suggest(item))
    }

    /// Edit the decision form for `id`.
    ///
    /// Fails with `DraftLocked` while an unaccepted N/A suggestion holds the
    /// form.
    pub fn edit_draft(
        &mut self,
        id: &str,
        request: &DecisionRequest,
    ) -> Result<DecisionDraft, VerificationError> {
        let mut draft = self.draft(id)?;
        if draft.locked {
            return Err(VerificationError::DraftLocked { id: id.to_string() });
        }
        draft.status = request.status;
        draft.method = Some(request.method);
        draft.notes = request.notes.clone();
        self.drafts.insert(id.to_string(), draft.clone());
        Ok(draft)
    }

    /// Accept the N/A suggestion on `id` into its draft.
    pub fn accept_na_suggestion(&mut self, id: &str) -> Result<DecisionDraft, VerificationError> {
        let draft = {
            let store = lock_store(&self.store);
            let item = store.get(id).ok_or_else(|| VerificationError::ItemNotFound {
                id: id.to_string(),
            })?;
            match &item.na_suggestion {
                Some(na) if na.is_not_applicable() => DecisionDraft::accepted_na(na),
                _ => return Err(VerificationError::NoSuggestion { id: id.to_string() }),
            }
        };
        self.drafts.insert(id.to_string(), draft.clone());
        Ok(draft)
    }

    /// Revert an accepted N/A suggestion to a blank, editable draft.
    ///
    /// Only drafts change. Decisions already recorded in history stay.
    pub fn undo(&mut self, id: &str) -> Result<DecisionDraft, VerificationError> {
        if !lock_store(&self.store).contains(id) {
            return Err(VerificationError::ItemNotFound { id: id.to_string() });
        }
        match self.drafts.get_mut(id) {
            Some(draft) if draft.na_accepted => {
                *draft = DecisionDraft::dismissed();
                Ok(draft.clone())
            }
            _ => Err(VerificationError::NothingToUndo { id: id.to_string() }),
        }
    }

    /// Submit a decision for one item.
    pub async fn submit(
        &mut self,
        id: &str,
        request: &DecisionRequest,
    ) -> Result<SubmitOutcome, VerificationError> {
        let outcome = self.orchestrator.submit(id, request).await?;
        self.drafts.remove(id);
        self.prune_selection();
        Ok(outcome)
    }

    /// Submit the same decision for several items.
    pub async fn bulk_submit(
        &mut self,
        ids: &[String],
        request: &DecisionRequest,
    ) -> Result<BulkOutcome, VerificationError> {
        let outcome = self.orchestrator.bulk_submit(ids, request).await?;
        self.after_bulk(&outcome);
        Ok(outcome)
    }

    /// Submit the same decision for the current selection.
    pub async fn bulk_submit_selected(
        &mut self,
        request: &DecisionRequest,
    ) -> Result<BulkOutcome, VerificationError> {
        let ids = self.selection.ids();
        self.bulk_submit(&ids, request).await
    }

    /// Quick-accept high-confidence N/A suggestions among `ids`.
    pub async fn quick_accept_na(&mut self, ids: &[String]) -> Result<BulkOutcome, VerificationError> {
        let outcome = self.orchestrator.quick_accept_na(ids).await?;
        self.after_bulk(&outcome);
        Ok(outcome)
    }

    fn after_bulk(&mut self, outcome: &BulkOutcome) {
        for item in &outcome.items {
            self.drafts.remove(&item.id);
            self.selection.select(&item.id, false, &[item]);
        }
        self.prune_selection();
    }

    /// Latest decision per item, for persisting between sessions.
    pub fn saved_decisions(&self) -> std::collections::BTreeMap<String, SavedVerification> {
        lock_store(&self.store).saved_decisions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::OfflineBackend;
    use crate::review::filter::StatusFilter;
    use crate::review::smart_default::SuggestionReason;
    use a11y_verify_common::{
        BackendError, FindingStatus, IssueRef, JobMetadata, NaSuggestion, NeedsVerification,
        RemoteQueue, SubmitRequest, VerificationMethod, VerificationStatus,
    };
    use async_trait::async_trait;

    fn offline_session() -> VerificationSession {
        VerificationSession::new(Arc::new(OfflineBackend), SubmitSettings::offline("alex"))
    }

    fn findings() -> Vec<AutomatedFinding> {
        vec![
            AutomatedFinding::new("contrast", "1.4.3", FindingStatus::Fail, 0.45),
            AutomatedFinding::new("alt", "1.1.1", FindingStatus::Pass, 95.0),
            AutomatedFinding::new("color", "1.4.1", FindingStatus::NotApplicable, 30.0)
                .with_na_suggestion(NaSuggestion::not_applicable(92, "No color-only indicators found")),
            AutomatedFinding::new("skipped", "2.4.1", FindingStatus::Pass, 99.0)
                .with_needs_verification(NeedsVerification::NotRequired),
        ]
    }

    fn loaded() -> VerificationSession {
        let mut session = offline_session();
        session.refresh(&findings(), &HashMap::new());
        session
    }

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_refresh_builds_queue() {
        let session = loaded();
        assert_eq!(session.total_count(), 3);
        assert_eq!(session.verified_count(), 0);
        assert_eq!(session.progress_percent(), 0);
        assert!(session.item("skipped").is_none());
    }

    #[test]
    fn test_refresh_rehydrates_saved_decisions() {
        let mut session = offline_session();
        let mut saved = HashMap::new();
        saved.insert(
            "alt".to_string(),
            SavedVerification {
                status: VerificationStatus::VerifiedPass,
                method: VerificationMethod::VoiceOver,
                notes: String::new(),
                verified_at: chrono::Utc::now(),
                verified_by: Some("sam".to_string()),
            },
        );
        session.refresh(&findings(), &saved);
        assert_eq!(session.verified_count(), 1);
        assert_eq!(
            session.item("alt").and_then(|i| i.method()),
            Some(VerificationMethod::VoiceOver)
        );
    }

    #[tokio::test]
    async fn test_progress_is_monotonic() {
        let mut session = loaded();
        let total = session.total_count();
        for (n, id) in ["contrast", "alt", "color"].iter().enumerate() {
            let request =
                DecisionRequest::new(VerificationStatus::VerifiedPass, VerificationMethod::ManualReview);
            session.submit(id, &request).await.unwrap();
            assert_eq!(session.verified_count(), n + 1);
            assert_eq!(session.total_count(), total);
        }
        assert_eq!(session.progress_percent(), 100);
    }

    #[tokio::test]
    async fn test_deferred_does_not_count_as_verified() {
        let mut session = loaded();
        let request = DecisionRequest::new(VerificationStatus::Deferred, VerificationMethod::ManualReview);
        session.submit("alt", &request).await.unwrap();
        assert_eq!(session.verified_count(), 0);
        assert_eq!(session.summary().by_status["deferred"], 1);
    }

    #[tokio::test]
    async fn test_offline_submit_records_locally() {
        let mut session = loaded();
        let request = DecisionRequest::new(VerificationStatus::VerifiedFail, VerificationMethod::Nvda)
            .with_notes("Low contrast on captions");
        let outcome = session.submit("contrast", &request).await.unwrap();
        assert!(!outcome.is_remote());
        assert_eq!(outcome.item.status(), VerificationStatus::VerifiedFail);

        let saved = session.saved_decisions();
        assert_eq!(saved["contrast"].notes, "Low contrast on captions");
        assert_eq!(saved["contrast"].verified_by.as_deref(), Some("alex"));
    }

    #[tokio::test]
    async fn test_refresh_after_submit_keeps_decision_and_takes_new_evidence() {
        let mut session = loaded();
        let request = DecisionRequest::new(VerificationStatus::VerifiedPass, VerificationMethod::Nvda);
        session.submit("alt", &request).await.unwrap();
        session.submit("alt", &request).await.unwrap();

        let mut refreshed = findings();
        refreshed[1] = AutomatedFinding::new("alt", "1.1.1", FindingStatus::Pass, 95.0)
            .with_fixed_issues(vec![IssueRef::new("Image alt added")]);
        session.refresh(&refreshed, &HashMap::new());

        let item = session.item("alt").unwrap();
        assert_eq!(item.status(), VerificationStatus::VerifiedPass);
        assert_eq!(item.history().len(), 2);
        assert_eq!(item.fixed_issues.len(), 1);
    }

    #[test]
    fn test_filter_prunes_selection() {
        let mut session = loaded();
        session.select_all();
        assert_eq!(session.selected_ids().len(), 3);

        session.set_filter(
            FilterCriteria::new().with_severities([a11y_verify_common::Severity::Critical]),
        );
        assert_eq!(session.selected_ids(), vec!["contrast"]);
        assert!(!session.select("alt", true));
    }

    #[test]
    fn test_select_all_toggles() {
        let mut session = loaded();
        session.select_all();
        session.select_all();
        assert!(session.selected_ids().is_empty());

        assert!(session.select("alt", true));
        session.select_all();
        assert_eq!(session.selected_ids().len(), 3);
        session.deselect_all();
        assert!(session.selected_ids().is_empty());
    }

    #[tokio::test]
    async fn test_submitted_items_leave_pending_filter_and_selection() {
        let mut session = loaded();
        session.set_filter(FilterCriteria::new().with_statuses([StatusFilter::Pending]));
        session.select_all();

        let request =
            DecisionRequest::new(VerificationStatus::VerifiedPass, VerificationMethod::ManualReview);
        let outcome = session
            .bulk_submit(&ids(&["alt", "contrast"]), &request)
            .await
            .unwrap();
        assert_eq!(outcome.applied(), 2);
        assert_eq!(session.selected_ids(), vec!["color"]);
        assert_eq!(session.filtered_items().len(), 1);
    }

    #[tokio::test]
    async fn test_bulk_submit_selected() {
        let mut session = loaded();
        let request = DecisionRequest::new(VerificationStatus::Deferred, VerificationMethod::Narrator);
        let err = session.bulk_submit_selected(&request).await.unwrap_err();
        assert!(matches!(
            err,
            VerificationError::Validation(crate::errors::ValidationError::NoItemsSelected)
        ));

        session.select("alt", true);
        session.select("color", true);
        let outcome = session.bulk_submit_selected(&request).await.unwrap();
        assert_eq!(outcome.applied(), 2);
        assert_eq!(outcome.failed, 2);
        assert!(session.selected_ids().is_empty());
    }

    #[test]
    fn test_na_draft_accept_and_undo() {
        let mut session = loaded();

        let draft = session.draft("color").unwrap();
        assert!(draft.locked);
        let edit = DecisionRequest::new(VerificationStatus::VerifiedFail, VerificationMethod::Nvda);
        assert!(matches!(
            session.edit_draft("color", &edit),
            Err(VerificationError::DraftLocked { .. })
        ));

        let accepted = session.accept_na_suggestion("color").unwrap();
        assert!(accepted.na_accepted);
        assert!(accepted.notes.contains("92% confidence"));

        let undone = session.undo("color").unwrap();
        assert_eq!(undone.reason, SuggestionReason::Dismissed);
        assert_eq!(undone.status, None);
        assert!(!undone.locked);
        assert!(session.item("color").unwrap().history().is_empty());

        assert!(matches!(
            session.undo("color"),
            Err(VerificationError::NothingToUndo { .. })
        ));
        session.edit_draft("color", &edit.with_notes("Color used for links")).unwrap();
    }

    #[test]
    fn test_accept_without_suggestion_fails() {
        let mut session = loaded();
        assert!(matches!(
            session.accept_na_suggestion("alt"),
            Err(VerificationError::NoSuggestion { .. })
        ));
        assert!(matches!(
            session.undo("ghost"),
            Err(VerificationError::ItemNotFound { .. })
        ));
    }

    #[test]
    fn test_smart_default_drafts() {
        let session = loaded();
        assert_eq!(
            session.draft("alt").unwrap().status,
            Some(VerificationStatus::VerifiedPass)
        );
        assert_eq!(session.draft("contrast").unwrap().status, None);
    }

    #[tokio::test]
    async fn test_quick_accept_through_session() {
        let mut session = loaded();
        session.accept_na_suggestion("color").unwrap();
        let outcome = session.quick_accept_na(&ids(&["color", "alt"])).await.unwrap();

        assert_eq!(outcome.applied(), 1);
        let item = session.item("color").unwrap();
        assert_eq!(item.status(), VerificationStatus::VerifiedPass);
        assert!(item.notes().contains("No color-only indicators found"));
        assert_eq!(
            session.draft("color").unwrap().reason,
            SuggestionReason::AlreadyReviewed
        );
    }

    struct QueueBackend(RemoteQueue);

    #[async_trait]
    impl VerificationBackend for QueueBackend {
        async fn fetch_queue(&self, _job_id: &str) -> Result<RemoteQueue, BackendError> {
            Ok(self.0.clone())
        }

        async fn submit(
            &self,
            _job_id: &str,
            _request: &SubmitRequest,
        ) -> Result<VerificationItem, BackendError> {
            Err(BackendError::Unavailable)
        }

        async fn fetch_job(&self, _job_id: &str) -> Result<JobMetadata, BackendError> {
            Err(BackendError::Unavailable)
        }
    }

    #[tokio::test]
    async fn test_refresh_from_backend() {
        let queue = RemoteQueue {
            items: vec![
                VerificationItem::new("r-1", "1.3.1"),
                VerificationItem::new("r-2", "2.1.1"),
            ],
            verified_count: 0,
            total_count: 2,
        };
        let mut session = VerificationSession::new(
            Arc::new(QueueBackend(queue)),
            SubmitSettings::new("job-1", "alex"),
        );
        let stats = session.refresh_from_backend().await.unwrap();
        assert_eq!(stats.adopted, 2);
        assert_eq!(session.total_count(), 2);

        let mut offline = offline_session();
        assert!(matches!(
            offline.refresh_from_backend().await,
            Err(VerificationError::NoJob)
        ));
    }

    #[tokio::test]
    async fn test_remote_items_are_reclassified() {
        let item: VerificationItem = serde_json::from_str(
            r#"{"id": "r-1", "criterionId": "1.4.3", "confidenceScore": 0.95, "automatedResult": "fail"}"#,
        )
        .unwrap();
        let queue = RemoteQueue {
            items: vec![item],
            verified_count: 0,
            total_count: 1,
        };
        let mut session = VerificationSession::new(
            Arc::new(QueueBackend(queue)),
            SubmitSettings::new("job-1", "alex"),
        );
        session.refresh_from_backend().await.unwrap();

        let item = session.item("r-1").unwrap();
        assert_eq!(item.confidence_score, 95);
        assert_eq!(item.confidence_level, a11y_verify_common::ConfidenceLevel::High);
        assert_eq!(item.severity, a11y_verify_common::Severity::Critical);
    }
}
