//! The report schema descriptor.
//!
//! One schema describes every report. It is handed to the language model as
//! the parameter schema of the `update_report` function and used to validate
//! whatever structured output comes back.

use once_cell::sync::Lazy;
use serde_json::Value;

use super::ReportSection;

static REPORT_SCHEMA: Lazy<ReportSchema> = Lazy::new(|| {
    let raw = include_str!("schemas/report.json");
    let root: Value = serde_json::from_str(raw)
        .unwrap_or_else(|e| panic!("Failed to parse embedded report schema: {}", e));
    ReportSchema { root }
});

/// The shared report schema, embedded at compile time.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSchema {
    root: Value,
}

impl ReportSchema {
    /// Returns the process-wide schema instance.
    pub fn global() -> &'static ReportSchema {
        &REPORT_SCHEMA
    }

    /// The full schema as JSON.
    pub fn as_value(&self) -> &Value {
        &self.root
    }

    /// Schema fragment for a single top-level section.
    pub fn section_schema(&self, section: ReportSection) -> Option<&Value> {
        self.root
            .get("properties")
            .and_then(|props| props.get(section.as_str()))
    }

    /// Names of the top-level properties declared by the schema.
    pub fn section_keys(&self) -> Vec<&str> {
        self.root
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| props.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}
