//! UploadReportHandler - accept a file and start tracking its report.

use std::sync::Arc;

use thiserror::Error;

use crate::application::availability::ReportWatcher;
use crate::application::handlers::documents::save_document;
use crate::config::UploadConfig;
use crate::domain::foundation::{ReportId, Timestamp};
use crate::ports::{CollaboratorError, DocumentStore, UploadService, UploadedFile};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadReportError {
    #[error("Only {accepted} files are allowed")]
    UnsupportedType { accepted: String, found: String },

    #[error("File size must be less than {max_megabytes}MB")]
    TooLarge { size: usize, max_megabytes: usize },

    #[error("File is empty")]
    EmptyFile,

    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

/// Whether the report is usable right away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Processed,
    Processing,
}

impl UploadStatus {
    pub fn message(&self) -> &'static str {
        match self {
            UploadStatus::Processed => "File processed successfully",
            UploadStatus::Processing => "File uploaded successfully, processing in progress",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadReportResult {
    pub report_id: ReportId,
    pub status: UploadStatus,
    pub filename: String,
    pub size: usize,
    pub uploaded_at: Timestamp,
}

pub struct UploadReportHandler {
    uploads: Arc<dyn UploadService>,
    store: Arc<dyn DocumentStore>,
    watcher: Arc<ReportWatcher>,
    limits: UploadConfig,
}

impl UploadReportHandler {
    pub fn new(
        uploads: Arc<dyn UploadService>,
        store: Arc<dyn DocumentStore>,
        watcher: Arc<ReportWatcher>,
        limits: UploadConfig,
    ) -> Self {
        Self {
            uploads,
            store,
            watcher,
            limits,
        }
    }

    pub async fn handle(&self, file: UploadedFile) -> Result<UploadReportResult, UploadReportError> {
        self.check(&file)?;

        let filename = file.filename.clone();
        let size = file.size();
        let receipt = self.uploads.upload(file).await?;
        let report_id = receipt.report_id;

        let status = match receipt.document {
            Some(document) => {
                save_document(self.store.as_ref(), &report_id, document).await?;
                self.watcher.forget(&report_id).await;
                UploadStatus::Processed
            }
            None => {
                self.watcher.watch(report_id.clone()).await;
                UploadStatus::Processing
            }
        };
        tracing::info!(report_id = %report_id, filename = %filename, size, status = ?status, "Upload accepted");

        Ok(UploadReportResult {
            report_id,
            status,
            filename,
            size,
            uploaded_at: Timestamp::now(),
        })
    }

    fn check(&self, file: &UploadedFile) -> Result<(), UploadReportError> {
        if !same_media_type(&file.content_type, &self.limits.accepted_content_type) {
            return Err(UploadReportError::UnsupportedType {
                accepted: type_label(&self.limits.accepted_content_type),
                found: file.content_type.clone(),
            });
        }
        if file.size() == 0 {
            return Err(UploadReportError::EmptyFile);
        }
        if file.size() > self.limits.max_bytes {
            return Err(UploadReportError::TooLarge {
                size: file.size(),
                max_megabytes: self.limits.max_megabytes(),
            });
        }
        Ok(())
    }
}

/// Compares media types, ignoring case and parameters.
fn same_media_type(found: &str, accepted: &str) -> bool {
    let essence = |s: &str| s.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    essence(found) == essence(accepted)
}

/// `application/pdf` -> `PDF`.
fn type_label(content_type: &str) -> String {
    content_type
        .rsplit('/')
        .next()
        .unwrap_or(content_type)
        .to_ascii_uppercase()
}
