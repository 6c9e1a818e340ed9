use crate::config::BlobConfig;
use crate::error::UpstreamError;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Deserialize;

const BLOB_API_VERSION: &str = "7";

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` under `key` with public read access and return the
    /// public locator issued by the store.
    async fn put(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<PutBlobResult, UpstreamError>;
}

#[derive(Debug, Clone, Deserialize)]
pub struct PutBlobResult {
    pub url: String,
}

/// Uploads objects to the Vercel Blob HTTP API, authenticated with the
/// process-wide read-write token.
pub struct VercelBlobStore {
    config: BlobConfig,
    client: Client,
}

impl VercelBlobStore {
    pub fn new(config: BlobConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl BlobStore for VercelBlobStore {
    async fn put(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<PutBlobResult, UpstreamError> {
        let url = format!("{}/{}", self.config.base_url, key);
        let response = self
            .client
            .put(&url)
            .bearer_auth(self.config.token.expose_secret())
            .header("x-api-version", BLOB_API_VERSION)
            .header("x-content-type", content_type)
            .header("x-access", "public")
            .body(data)
            .send()
            .await
            .map_err(|e| UpstreamError::Upload(format!("blob upload failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Upload(format!(
                "blob store returned {}: {}",
                status, body
            )));
        }

        let result: PutBlobResult = response
            .json()
            .await
            .map_err(|e| UpstreamError::Upload(format!("invalid blob response: {}", e)))?;

        Ok(result)
    }
}
