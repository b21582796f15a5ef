//! Upload Service Port - hands a file to the ingestion backend.

use async_trait::async_trait;

use crate::domain::foundation::ReportId;
use crate::domain::report::ReportDocument;

use super::CollaboratorError;

/// A file received from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// What the backend returned for an upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadReceipt {
    pub report_id: ReportId,
    /// Present when the backend produced the report synchronously.
    pub document: Option<ReportDocument>,
}

#[async_trait]
pub trait UploadService: Send + Sync {
    async fn upload(&self, file: UploadedFile) -> Result<UploadReceipt, CollaboratorError>;
}
