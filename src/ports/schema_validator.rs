//! Schema Validator Port - Report validation interface.
//!
//! The routing layer depends on this trait to check structured model output
//! against the report schema before merging it; `JsonSchemaValidator`
//! provides the implementation.

use serde_json::Value;
use thiserror::Error;

/// Port for validating report JSON against the report schema.
///
/// # Usage
///
/// ```rust,ignore
/// // Full validation (required fields enforced)
/// validator.validate(&document.to_value())?;
///
/// // Partial validation for generator output (any subset is allowed)
/// validator.validate_partial(&partial)?;
/// ```
pub trait ReportSchemaValidator: Send + Sync {
    /// Validate a complete report. Required fields must be present.
    fn validate(&self, report: &Value) -> Result<(), SchemaValidationError>;

    /// Validate a partial report: present fields must have the right types,
    /// missing fields are fine.
    fn validate_partial(&self, partial: &Value) -> Result<(), SchemaValidationError>;

    /// The raw schema JSON.
    fn schema(&self) -> &Value;
}

/// Errors that can occur during schema validation.
///
/// # Security
///
/// These errors name schema paths. When returning errors to clients, use
/// `to_client_message()` to get the sanitized first error only.
#[derive(Debug, Clone, Error)]
pub enum SchemaValidationError {
    #[error("Missing required field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid type for field {field}: expected {expected}, got {actual}")]
    InvalidType {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("Invalid format for field {field}: expected {format}")]
    InvalidFormat { field: String, format: String },

    #[error("Schema validation failed: {message}")]
    Generic { message: String },

    #[error("Validation errors: {0:?}")]
    Multiple(Vec<SchemaValidationError>),
}

impl SchemaValidationError {
    /// Convert to client-safe error message.
    pub fn to_client_message(&self) -> String {
        match self {
            SchemaValidationError::MissingRequired { field } => {
                format!("Missing required field: {}", field)
            }
            SchemaValidationError::InvalidType { field, expected, .. } => {
                format!("Invalid type for field '{}': expected {}", field, expected)
            }
            SchemaValidationError::InvalidFormat { field, format } => {
                format!("Field '{}' must be a valid {}", field, format)
            }
            SchemaValidationError::Generic { message } => {
                if message.len() > 100 {
                    let cut = (0..=97)
                        .rev()
                        .find(|i| message.is_char_boundary(*i))
                        .unwrap_or(0);
                    format!("Validation failed: {}...", &message[..cut])
                } else {
                    format!("Validation failed: {}", message)
                }
            }
            SchemaValidationError::Multiple(errors) => errors
                .first()
                .map(|e| e.to_client_message())
                .unwrap_or_else(|| "Validation failed".to_string()),
        }
    }

    /// Collapses a list of errors: one error stays as-is, more become `Multiple`.
    pub fn collect(mut errors: Vec<SchemaValidationError>) -> Result<(), SchemaValidationError> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(SchemaValidationError::Multiple(errors)),
        }
    }

    /// Get the count of validation errors.
    pub fn error_count(&self) -> usize {
        match self {
            SchemaValidationError::Multiple(errors) => errors.len(),
            _ => 1,
        }
    }
}

impl PartialEq for SchemaValidationError {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
