use a11y_verify_common::{
    BackendError, JobMetadata, RemoteQueue, SubmitRequest, VerificationBackend, VerificationItem,
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

const USER_AGENT: &str = concat!("a11y-verify/", env!("CARGO_PKG_VERSION"));

/// JSON-over-HTTP client for the analysis/persistence service.
///
/// Routes, relative to the base URL:
///
/// | Call          | Route                                        |
/// |---------------|----------------------------------------------|
/// | `fetch_queue` | `GET  /jobs/{job}/verification`              |
/// | `submit`      | `POST /jobs/{job}/verification/{item}`       |
/// | `fetch_job`   | `GET  /jobs/{job}`                           |
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| BackendError::Transport(format!("Invalid base URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::Transport(format!(
                "Invalid base URL '{}'",
                base_url
            )));
        }
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url,
            token: None,
        })
    }

    /// Send `token` as a bearer credential.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Join path segments onto the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::Transport(format!("Invalid base URL '{}'", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, BackendError> {
        let response = self
            .authorized(request)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(BackendError::Http {
                status: status.as_u16(),
                body,
            });
        }
        serde_json::from_str(&body).map_err(|e| BackendError::Decode(e.to_string()))
    }
}

#[async_trait]
impl VerificationBackend for HttpBackend {
    async fn fetch_queue(&self, job_id: &str) -> Result<RemoteQueue, BackendError> {
        let url = self.endpoint(&["jobs", job_id, "verification"])?;
        tracing::debug!(%url, "Fetching verification queue");
        self.send(self.client.get(url)).await
    }

    async fn submit(
        &self,
        job_id: &str,
        request: &SubmitRequest,
    ) -> Result<VerificationItem, BackendError> {
        let url = self.endpoint(&["jobs", job_id, "verification", request.item_id.as_str()])?;
        tracing::debug!(%url, status = %request.status, "Submitting verification");
        self.send(self.client.post(url).json(request)).await
    }

    async fn fetch_job(&self, job_id: &str) -> Result<JobMetadata, BackendError> {
        let url = self.endpoint(&["jobs", job_id])?;
        self.send(self.client.get(url)).await
    }
}
