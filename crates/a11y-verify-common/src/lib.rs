//! Shared domain types for the accessibility verification engine.
//!
//! This crate holds the data model exchanged between the upstream analysis
//! producer, the verification engine and the remote persistence service:
//!
//! - [`model`]: findings, verification items and their enumerations
//! - [`history`]: the append-only decision log carried by every item
//! - [`confidence`]: normalisation of producer confidence scores to 0-100
//! - [`backend`]: the async persistence interface and its wire types

pub mod backend;
pub mod confidence;
pub mod history;
pub mod model;

pub use backend::{BackendError, JobMetadata, RemoteQueue, SubmitRequest, VerificationBackend};
pub use confidence::normalize_confidence;
pub use history::{VerificationHistory, VerificationHistoryEntry};
pub use model::{
    AutomatedFinding, AutomatedResult, ConfidenceLevel, FindingStatus, IssueRef, NaSuggestedStatus,
    NaSuggestion, NeedsVerification, SavedVerification, Severity, VerificationItem,
    VerificationMethod, VerificationStatus, WcagLevel,
};
