//! Verification reconciliation engine.
//!
//! Turns automated accessibility findings into a human review queue and keeps
//! reviewer decisions safe while the underlying analysis is refreshed.
//!
//! ## Components
//!
//! - [`classify`]: findings → verification items (severity, confidence, notes)
//! - [`smart_default`]: pre-filled decisions for the review form
//! - [`store`]: live items and the reconciliation merge
//! - [`submit`]: validated single, bulk and quick-accept submissions with
//!   local fallback
//! - [`filter`]: filtering, triage order, progress and selection
//! - [`session`]: the facade driven by a presentation layer
//!
//! ## Example
//!
//! ```
//! use std::collections::HashMap;
//! use std::sync::Arc;
//! use a11y_verify::backend::OfflineBackend;
//! use a11y_verify::review::{SubmitSettings, VerificationSession};
//! use a11y_verify_common::{AutomatedFinding, FindingStatus, VerificationStatus};
//!
//! let mut session =
//!     VerificationSession::new(Arc::new(OfflineBackend), SubmitSettings::offline("alex"));
//!
//! let findings = vec![AutomatedFinding::new("f-1", "1.1.1", FindingStatus::Pass, 0.95)];
//! session.refresh(&findings, &HashMap::new());
//!
//! let draft = session.draft("f-1").unwrap();
//! assert_eq!(draft.status, Some(VerificationStatus::VerifiedPass));
//! assert_eq!(session.progress_percent(), 0);
//! ```

pub mod classify;
pub mod filter;
pub mod session;
pub mod smart_default;
pub mod store;
pub mod submit;

// Re-export main types
pub use classify::{build_queue, classify};
pub use filter::{FilterCriteria, ProgressSummary, Selection, StatusFilter, triage_order};
pub use session::VerificationSession;
pub use smart_default::{DecisionDraft, SuggestionReason, suggest};
pub use store::{ReconcileStats, ReconciliationStore, SharedStore};
pub use submit::{
    BulkOutcome, DecisionRequest, Persistence, SubmissionOrchestrator, SubmitOutcome,
    SubmitSettings,
};
