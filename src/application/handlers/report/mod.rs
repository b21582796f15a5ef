//! Report handlers: lookup and upload.

mod report_lookup;
mod upload_report;

pub use report_lookup::{ReportLookup, ReportLookupError, ReportLookupHandler};
pub use upload_report::{UploadReportError, UploadReportHandler, UploadReportResult, UploadStatus};
