use a11y_verify_common::{
    BackendError, JobMetadata, RemoteQueue, SubmitRequest, VerificationBackend, VerificationItem,
};
use async_trait::async_trait;

/// Backend for sessions without a remote service.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineBackend;

#[async_trait]
impl VerificationBackend for OfflineBackend {
    async fn fetch_queue(&self, _job_id: &str) -> Result<RemoteQueue, BackendError> {
        Err(BackendError::Unavailable)
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
