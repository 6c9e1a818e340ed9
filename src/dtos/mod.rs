use serde::{Deserialize, Serialize};

/// Request body for the export endpoint.
///
/// `docId` defaults to empty when the field is absent so that a missing
/// identifier and an empty one take the same validation path.
#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    #[serde(rename = "docId", default)]
    pub doc_id: String,
}

/// Success payload: the public locator of the stored export.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportResponse {
    #[serde(rename = "downloadUrl")]
    pub download_url: String,
}
