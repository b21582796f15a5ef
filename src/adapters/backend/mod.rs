//! HTTP clients for the ingestion backend.
//!
//! The backend turns uploaded PDFs into reports, serves finished reports
//! by id, and answers escalated queries with retrieval over the source
//! document.

mod http_report_source;
mod http_retrieval_client;
mod http_upload_client;

pub use http_report_source::HttpReportSource;
pub use http_retrieval_client::HttpRetrievalClient;
pub use http_upload_client::HttpUploadClient;

use reqwest::Client;

use crate::config::BackendConfig;
use crate::ports::CollaboratorError;

/// Shared client construction; every adapter gets the backend timeout.
fn build_client(config: &BackendConfig, service: &str) -> Result<Client, CollaboratorError> {
    Client::builder()
        .timeout(config.timeout())
        .build()
        .map_err(|e| {
            CollaboratorError::unavailable(service, format!("Failed to create HTTP client: {}", e))
        })
}

/// Maps a transport failure to a collaborator error.
fn send_error(service: &str, err: reqwest::Error) -> CollaboratorError {
    if err.is_timeout() {
        CollaboratorError::unavailable(service, "request timed out")
    } else if err.is_connect() {
        CollaboratorError::unavailable(service, format!("Connection failed: {}", err))
    } else {
        CollaboratorError::unavailable(service, err.to_string())
    }
}
