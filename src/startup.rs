use crate::config::ExportConfig;
use crate::error::AppError;
use crate::handlers;
use crate::services::{BlobStore, DocumentExporter, GoogleDriveExporter, VercelBlobStore};
use axum::{
    routing::{get, post},
    Router,
};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: ExportConfig,
    pub exporter: Arc<dyn DocumentExporter>,
    pub blob: Arc<dyn BlobStore>,
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
}

impl Application {
    /// Build the application with production clients wired from config.
    pub async fn build(config: ExportConfig) -> Result<Self, AppError> {
        let exporter: Arc<dyn DocumentExporter> =
            Arc::new(GoogleDriveExporter::new(config.google.clone()));
        let blob: Arc<dyn BlobStore> = Arc::new(VercelBlobStore::new(config.blob.clone()));
        Self::build_with_clients(config, exporter, blob).await
    }

    /// Build with injected collaborators. Tests use this to substitute the
    /// Drive and blob clients with doubles.
    pub async fn build_with_clients(
        config: ExportConfig,
        exporter: Arc<dyn DocumentExporter>,
        blob: Arc<dyn BlobStore>,
    ) -> Result<Self, AppError> {
        let state = AppState {
            config: config.clone(),
            exporter,
            blob,
        };

        let app = Router::new()
            .route("/health", get(handlers::health_check))
            .route("/metrics", get(handlers::metrics_endpoint))
            .route(
                "/api/download",
                post(handlers::export_document).fallback(handlers::method_not_allowed),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
