//! Remote persistence backends.
//!
//! - [`HttpBackend`]: JSON over HTTP against the analysis/persistence service
//! - [`OfflineBackend`]: always unavailable, so every decision is recorded locally

mod http;
mod offline;

pub use http::HttpBackend;
pub use offline::OfflineBackend;

use std::sync::Arc;

use a11y_verify_common::VerificationBackend;
use anyhow::{Context, Result};

use crate::config::VerifyConfig;

/// Build the backend described by `config`.
pub fn from_config(config: &VerifyConfig) -> Result<Arc<dyn VerificationBackend>> {
    let base_url = match (&config.base_url, config.offline) {
        (Some(base_url), false) => base_url,
        _ => {
            tracing::debug!("No remote configured; using offline backend");
            return Ok(Arc::new(OfflineBackend));
        }
    };

    let mut backend = HttpBackend::new(base_url)
        .with_context(|| format!("Failed to create HTTP backend for {}", base_url))?;
    if let Some(token) = &config.api_token {
        backend = backend.with_token(token.clone());
    }
    Ok(Arc::new(backend))
}
