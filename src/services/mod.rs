pub mod blob;
pub mod drive;
pub mod metrics;

pub use blob::{BlobStore, PutBlobResult, VercelBlobStore};
pub use drive::{DocumentExporter, GoogleDriveExporter, DOCX_MIME_TYPE};
pub use metrics::{get_metrics, init_metrics};
