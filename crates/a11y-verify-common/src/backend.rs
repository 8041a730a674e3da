//! Remote persistence interface.
//!
//! The verification engine talks to the analysis/persistence service through
//! [`VerificationBackend`]. Real implementation: the HTTP client in the main
//! crate. Tests use scripted in-memory doubles.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{VerificationItem, VerificationMethod, VerificationStatus};

/// Errors returned by a persistence backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("Verification backend is unavailable")]
    Unavailable,

    #[error("Backend returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to decode backend response: {0}")]
    Decode(String),
}

/// Body of a single-item submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub item_id: String,
    pub status: VerificationStatus,
    pub method: VerificationMethod,
    #[serde(default)]
    pub notes: String,
}

/// Verification queue as served by the backend for one job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteQueue {
    #[serde(default)]
    pub items: Vec<VerificationItem>,
    #[serde(default)]
    pub verified_count: usize,
    #[serde(default)]
    pub total_count: usize,
}

/// Display metadata for a review job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMetadata {
    #[serde(default)]
    pub job_id: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub has_remediated_artifact: bool,
}

/// Abstraction over the remote persistence service.
#[async_trait]
pub trait VerificationBackend: Send + Sync {
    /// Fetch the verification queue for a job.
    async fn fetch_queue(&self, job_id: &str) -> Result<RemoteQueue, BackendError>;

    /// Persist one decision and return the item as confirmed by the backend.
    async fn submit(
        &self,
        job_id: &str,
        request: &SubmitRequest,
    ) -> Result<VerificationItem, BackendError>;

    /// Fetch display metadata for a job.
    async fn fetch_job(&self, job_id: &str) -> Result<JobMetadata, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoBackend;

    #[async_trait]
    impl VerificationBackend for EchoBackend {
        async fn fetch_queue(&self, _job_id: &str) -> Result<RemoteQueue, BackendError> {
            Ok(RemoteQueue::default())
        }

        async fn submit(
            &self,
            _job_id: &str,
            request: &SubmitRequest,
        ) -> Result<VerificationItem, BackendError> {
            Ok(VerificationItem::new(request.item_id.clone(), "1.1.1"))
        }

        async fn fetch_job(&self, job_id: &str) -> Result<JobMetadata, BackendError> {
            Ok(JobMetadata {
                job_id: job_id.to_string(),
                ..JobMetadata::default()
            })
        }
    }

    #[tokio::test]
    async fn test_backend_is_object_safe() {
        let backend: Box<dyn VerificationBackend> = Box::new(EchoBackend);
        let request = SubmitRequest {
            item_id: "f-1".to_string(),
            status: VerificationStatus::VerifiedPass,
            method: VerificationMethod::ManualReview,
            notes: String::new(),
        };
        let item = backend.submit("job-1", &request).await.unwrap();
        assert_eq!(item.id, "f-1");
        assert_eq!(backend.fetch_job("job-1").await.unwrap().job_id, "job-1");
    }

    #[test]
    fn test_submit_request_wire_format() {
        let request = SubmitRequest {
            item_id: "f-1".to_string(),
            status: VerificationStatus::VerifiedFail,
            method: VerificationMethod::Nvda,
            notes: "Reading order broken".to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["itemId"], "f-1");
        assert_eq!(json["status"], "verified_fail");
        assert_eq!(json["method"], "NVDA");
    }

    #[test]
    fn test_remote_queue_tolerates_missing_counts() {
        let queue: RemoteQueue =
            serde_json::from_str(r#"{"items": [{"id": "f-1", "confidenceScore": 0.5}]}"#)
                .unwrap();
        assert_eq!(queue.items.len(), 1);
        assert_eq!(queue.items[0].confidence_score, 50);
        assert_eq!(queue.total_count, 0);
    }

    #[test]
    fn test_backend_error_messages() {
        let err = BackendError::Http {
            status: 503,
            body: "maintenance".to_string(),
        };
        assert!(err.to_string().contains("503"));
        assert!(BackendError::Unavailable.to_string().contains("unavailable"));
    }
}
