use super::error::ApiError;
use super::request::Request;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

/// Sends catalog requests and returns the decoded JSON body.
///
/// The production implementation is [`ReqwestTransport`]; tests substitute
/// an in-memory fake.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, request: &Request) -> Result<serde_json::Value, ApiError>;
}

/// HTTP transport over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base: Url,
}

impl ReqwestTransport {
    /// `base_url` is the API root, e.g. `http://localhost:8000/api`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let mut base = Url::parse(base_url)
            .map_err(|e| ApiError::Network(format!("URL base inválida '{base_url}': {e}")))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::Network(format!("Ruta inválida '{path}': {e}")))
    }
}

fn log_failure(url: &Url, err: ApiError) -> ApiError {
    error!(method = "GET", %url, status = err.status(), error = %err, "API request failed");
    err
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, request: &Request) -> Result<serde_json::Value, ApiError> {
        let url = self.url(&request.path)?;
        debug!(%url, query = ?request.query, "GET");

        let response = self
            .client
            .get(url.clone())
            .query(&request.query)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| log_failure(&url, e.into()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(log_failure(&url, ApiError::from_status(status.as_u16(), &body)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| log_failure(&url, e.into()))?;
        serde_json::from_slice(&bytes).map_err(|e| log_failure(&url, e.into()))
    }
}
