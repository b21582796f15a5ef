//! Ingestion backend configuration
//!
//! The backend parses uploaded PDFs into reports and answers escalated
//! queries with retrieval over the source document.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Base URL, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path the report id is appended to
    #[serde(default = "default_report_path")]
    pub report_path: String,

    #[serde(default = "default_upload_path")]
    pub upload_path: String,

    #[serde(default = "default_query_path")]
    pub query_path: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// URL of one report.
    pub fn report_url(&self, report_id: &str) -> String {
        format!("{}{}", self.join(&self.report_path), report_id)
    }

    pub fn upload_url(&self) -> String {
        self.join(&self.upload_path)
    }

    pub fn query_url(&self) -> String {
        self.join(&self.query_path)
    }

    fn join(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidUrl {
                field: "backend.base_url",
                value: self.base_url.clone(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            report_path: default_report_path(),
            upload_path: default_upload_path(),
            query_path: default_query_path(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_report_path() -> String {
    "/report/".to_string()
}

fn default_upload_path() -> String {
    "/upload/".to_string()
}

fn default_query_path() -> String {
    "/query/".to_string()
}

fn default_timeout() -> u64 {
    30
}
