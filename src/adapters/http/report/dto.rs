//! HTTP DTOs for report endpoints.

use serde::Serialize;

use crate::application::handlers::UploadReportResult;

/// 202 body while the backend is still building a report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingResponse {
    pub status: &'static str,
    pub report_id: String,
}

impl ProcessingResponse {
    pub fn new(report_id: impl Into<String>) -> Self {
        Self {
            status: "processing",
            report_id: report_id.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub report_id: String,
    pub message: String,
    pub filename: String,
    pub size: usize,
    pub uploaded_at: String,
}

impl From<UploadReportResult> for UploadResponse {
    fn from(result: UploadReportResult) -> Self {
        Self {
            report_id: result.report_id.to_string(),
            message: result.status.message().to_string(),
            filename: result.filename,
            size: result.size,
            uploaded_at: result.uploaded_at.to_rfc3339(),
        }
    }
}
