use crate::config::GoogleConfig;
use crate::error::UpstreamError;
use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Read-only scope; the service never writes to or deletes from Drive.
const DRIVE_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/drive.readonly";

const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

#[async_trait]
pub trait DocumentExporter: Send + Sync {
    /// Ask the document service to convert the identified document
    /// server-side into a .docx file and return the raw bytes.
    async fn export_docx(&self, doc_id: &str) -> Result<Vec<u8>, UpstreamError>;
}

/// Exports documents through the Google Drive v3 `files.export` endpoint,
/// authenticating with a service-account JWT grant.
pub struct GoogleDriveExporter {
    config: GoogleConfig,
    client: Client,
}

/// Claims for the service-account token grant (RFC 7523 profile).
#[derive(Debug, Serialize)]
struct GrantClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl GoogleDriveExporter {
    pub fn new(config: GoogleConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Claims for the token grant: read-only Drive scope, one-hour lifetime.
    fn grant_claims(&self, now: i64) -> GrantClaims {
        GrantClaims {
            iss: self.config.client_email.clone(),
            scope: DRIVE_READONLY_SCOPE.to_string(),
            aud: self.config.token_uri.clone(),
            iat: now,
            exp: now + 3600,
        }
    }

    /// Exchange a signed service-account assertion for a short-lived access
    /// token. A fresh token is acquired per export; there is no cache.
    async fn get_access_token(&self) -> Result<String, UpstreamError> {
        let claims = self.grant_claims(Utc::now().timestamp());

        let key = EncodingKey::from_rsa_pem(self.config.private_key.expose_secret().as_bytes())
            .map_err(|e| UpstreamError::Token(format!("invalid service account key: {}", e)))?;
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &key)
            .map_err(|e| UpstreamError::Token(format!("failed to sign token grant: {}", e)))?;

        let response = self
            .client
            .post(&self.config.token_uri)
            .form(&[
                ("grant_type", JWT_BEARER_GRANT_TYPE),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .map_err(|e| UpstreamError::Token(format!("token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Token(format!(
                "token endpoint returned {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::Token(format!("invalid token response: {}", e)))?;

        Ok(token.access_token)
    }
}

#[async_trait]
impl DocumentExporter for GoogleDriveExporter {
    async fn export_docx(&self, doc_id: &str) -> Result<Vec<u8>, UpstreamError> {
        let access_token = self.get_access_token().await?;

        let url = format!("{}/files/{}/export", self.config.drive_base_url, doc_id);
        let response = self
            .client
            .get(&url)
            .query(&[("mimeType", DOCX_MIME_TYPE)])
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| UpstreamError::Export(format!("export request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Export(format!(
                "drive export returned {}: {}",
                status, body
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::Export(format!("failed to read export body: {}", e)))?;

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GoogleConfig;
    use secrecy::SecretString;

    fn exporter() -> GoogleDriveExporter {
        GoogleDriveExporter::new(GoogleConfig {
            client_email: "exporter@test-project.iam.gserviceaccount.com".to_string(),
            private_key: SecretString::new("unused".to_string()),
            token_uri: "https://oauth2.googleapis.com/token".to_string(),
            drive_base_url: "https://www.googleapis.com/drive/v3".to_string(),
        })
    }

    #[test]
    fn grant_claims_request_read_only_drive_access() {
        let claims = exporter().grant_claims(1_700_000_000);

        assert_eq!(claims.iss, "exporter@test-project.iam.gserviceaccount.com");
        assert_eq!(claims.scope, DRIVE_READONLY_SCOPE);
        assert_eq!(claims.aud, "https://oauth2.googleapis.com/token");
        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp - claims.iat, 3600);
    }
}
