//! Upload constraints

use serde::Deserialize;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Largest accepted file, in bytes
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    #[serde(default = "default_content_type")]
    pub accepted_content_type: String,
}

impl UploadConfig {
    /// Whole megabytes, for user-facing messages.
    pub fn max_megabytes(&self) -> usize {
        self.max_bytes / (1024 * 1024)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_bytes == 0 {
            return Err(ValidationError::InvalidUploadLimit);
        }
        if self.accepted_content_type.trim().is_empty() {
            return Err(ValidationError::MissingRequired("UPLOAD__ACCEPTED_CONTENT_TYPE"));
        }
        Ok(())
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
            accepted_content_type: default_content_type(),
        }
    }
}

fn default_max_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_content_type() -> String {
    "application/pdf".to_string()
}
