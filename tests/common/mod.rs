use async_trait::async_trait;
use doc_export_service::config::{BlobConfig, ExportConfig, GoogleConfig};
use doc_export_service::error::UpstreamError;
use doc_export_service::services::{BlobStore, DocumentExporter, PutBlobResult};
use doc_export_service::startup::Application;
use secrecy::SecretString;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub struct TestApp {
    pub address: String,
    pub port: u16,
}

/// Config with unreachable upstream endpoints; tests inject mock clients so
/// nothing ever dials these.
pub fn test_config() -> ExportConfig {
    ExportConfig {
        port: 0, // Random port for testing
        google: GoogleConfig {
            client_email: "exporter@test-project.iam.gserviceaccount.com".to_string(),
            private_key: SecretString::new("unused".to_string()),
            token_uri: "http://127.0.0.1:1/token".to_string(),
            drive_base_url: "http://127.0.0.1:1/drive/v3".to_string(),
        },
        blob: BlobConfig {
            token: SecretString::new("test-blob-token".to_string()),
            base_url: "http://127.0.0.1:1/blob".to_string(),
        },
    }
}

impl TestApp {
    pub async fn spawn(
        exporter: Arc<dyn DocumentExporter>,
        blob: Arc<dyn BlobStore>,
    ) -> Self {
        let app = Application::build_with_clients(test_config(), exporter, blob)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        TestApp { address, port }
    }
}

/// Exporter double with a fixed outcome and a call counter.
pub struct MockExporter {
    calls: AtomicUsize,
    response: Result<Vec<u8>, String>,
}

impl MockExporter {
    pub fn returning(data: Vec<u8>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            response: Ok(data),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            response: Err(message.to_string()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentExporter for MockExporter {
    async fn export_docx(&self, _doc_id: &str) -> Result<Vec<u8>, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone().map_err(UpstreamError::Export)
    }
}

/// Blob store double recording the keys it was asked to store.
pub struct MockBlobStore {
    calls: AtomicUsize,
    keys: Mutex<Vec<String>>,
    response: Result<String, String>,
}

impl MockBlobStore {
    pub fn returning(url: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            keys: Mutex::new(Vec::new()),
            response: Ok(url.to_string()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            keys: Mutex::new(Vec::new()),
            response: Err(message.to_string()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn keys(&self) -> Vec<String> {
        self.keys.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlobStore for MockBlobStore {
    async fn put(
        &self,
        key: &str,
        _data: Vec<u8>,
        _content_type: &str,
    ) -> Result<PutBlobResult, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.keys.lock().unwrap().push(key.to_string());
        self.response
            .clone()
            .map(|url| PutBlobResult { url })
            .map_err(UpstreamError::Upload)
    }
}
