//! Client side of the companion file server protocol.

use async_trait::async_trait;
use log::{info, warn};
use reqwest::{StatusCode, Url};
use serde::Deserialize;

use super::StorageError;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:3001";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FixtureReport {
    pub message: String,
    pub path: String,
}

#[async_trait]
pub trait RemoteTransport: Send + Sync {
    /// Reads the whole file body.
    async fn fetch(&self, filename: &str) -> Result<String, StorageError>;

    /// Replaces the file with `content`. Resolves once the server has
    /// finished writing.
    async fn push(&self, filename: &str, content: &str) -> Result<(), StorageError>;

    async fn generate_fixture(&self) -> Result<FixtureReport, StorageError>;
}

#[derive(Debug, Clone)]
pub struct RemoteClient {
    base_url: String,
    http: reqwest::Client,
}

impl RemoteClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Appends `segments` to the base URL, each percent-encoded as a single
    /// path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, StorageError> {
        let invalid = || StorageError::Transfer(format!("invalid server URL {}", self.base_url));

        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl Default for RemoteClient {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER_URL)
    }
}

#[async_trait]
impl RemoteTransport for RemoteClient {
    async fn fetch(&self, filename: &str) -> Result<String, StorageError> {
        let url = self.endpoint(&["file", filename])?;
        let response = self.http.get(url).send().await?;

        match response.status() {
            status if status.is_success() => {
                let body = response.text().await?;
                info!("Fetched {} ({} bytes)", filename, body.len());
                Ok(body)
            }
            StatusCode::NOT_FOUND => Err(StorageError::NotFound(filename.to_string())),
            status => {
                warn!("Fetch of {} failed with {}", filename, status);
                Err(StorageError::Transfer(format!("GET {filename}: {status}")))
            }
        }
    }

    async fn push(&self, filename: &str, content: &str) -> Result<(), StorageError> {
        let response = self
            .http
            .post(self.endpoint(&["file", filename])?)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(content.to_string())
            .send()
            .await?;

        if !response.status().is_success() {
            warn!("Push of {} failed with {}", filename, response.status());
            return Err(StorageError::Transfer(format!(
                "POST {filename}: {}",
                response.status()
            )));
        }

        info!("Pushed {} ({} bytes)", filename, content.len());
        Ok(())
    }

    async fn generate_fixture(&self) -> Result<FixtureReport, StorageError> {
        let response = self
            .http
            .post(self.endpoint(&["generate-big-json"])?)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StorageError::Transfer(format!(
                "fixture generation: {}",
                response.status()
            )));
        }

        Ok(response.json::<FixtureReport>().await?)
    }
}
