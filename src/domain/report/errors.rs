//! Error types for report documents.

use thiserror::Error;

/// Errors raised when constructing or reading a report document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("Report document must be a JSON object, got {found}")]
    NotAnObject { found: &'static str },

    #[error("Section '{section}' does not match its expected shape: {reason}")]
    SectionShape { section: String, reason: String },
}

/// Errors raised by the merge engine.
///
/// The merge itself is total; this covers results that cannot be a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error("Merged report is not a JSON object (got {found})")]
    NonObjectRoot { found: &'static str },
}

/// Name of a JSON value's type, for error messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
