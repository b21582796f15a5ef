//! JSON Schema Validator - Implementation of ReportSchemaValidator.
//!
//! Walks the embedded report schema by hand. Supports the subset the schema
//! uses: `type` (single or list), `properties`, `items`, `required` and the
//! `date` string format. Unknown keys are allowed.

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::domain::report::{json_type_name, ReportSchema};
use crate::ports::{ReportSchemaValidator, SchemaValidationError};

/// Validator over a JSON schema value.
///
/// # Thread Safety
///
/// This struct is `Send + Sync` and can be shared across threads.
#[derive(Debug, Clone)]
pub struct JsonSchemaValidator {
    schema: Value,
}

impl Default for JsonSchemaValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonSchemaValidator {
    /// Validator for the embedded report schema.
    pub fn new() -> Self {
        Self::with_schema(ReportSchema::global().as_value().clone())
    }

    /// Validator for an arbitrary schema of the supported subset.
    pub fn with_schema(schema: Value) -> Self {
        Self { schema }
    }

    fn run(&self, value: &Value, enforce_required: bool) -> Result<(), SchemaValidationError> {
        let mut errors = Vec::new();
        Self::validate_node(&self.schema, value, "", enforce_required, &mut errors);
        SchemaValidationError::collect(errors)
    }

    // =========================================================================
    // Tree walk
    // =========================================================================

    fn validate_node(
        schema: &Value,
        value: &Value,
        path: &str,
        enforce_required: bool,
        errors: &mut Vec<SchemaValidationError>,
    ) {
        if let Some(expected) = schema.get("type") {
            if !Self::type_matches(expected, value) {
                errors.push(SchemaValidationError::InvalidType {
                    field: Self::display_path(path),
                    expected: Self::describe_type(expected),
                    actual: json_type_name(value).to_string(),
                });
                return;
            }
        }

        match value {
            Value::Object(object) => {
                Self::validate_object(schema, object, path, enforce_required, errors)
            }
            Value::Array(items) => {
                if let Some(item_schema) = schema.get("items") {
                    for (i, item) in items.iter().enumerate() {
                        let item_path = format!("{}[{}]", path, i);
                        Self::validate_node(item_schema, item, &item_path, enforce_required, errors);
                    }
                }
            }
            Value::String(text) => {
                if schema.get("format").and_then(Value::as_str) == Some("date")
                    && NaiveDate::parse_from_str(text, "%Y-%m-%d").is_err()
                {
                    errors.push(SchemaValidationError::InvalidFormat {
                        field: Self::display_path(path),
                        format: "date".to_string(),
                    });
                }
            }
            _ => {}
        }
    }

    fn validate_object(
        schema: &Value,
        object: &Map<String, Value>,
        path: &str,
        enforce_required: bool,
        errors: &mut Vec<SchemaValidationError>,
    ) {
        if enforce_required {
            if let Some(required) = schema.get("required").and_then(Value::as_array) {
                for field in required.iter().filter_map(Value::as_str) {
                    if !object.contains_key(field) {
                        errors.push(SchemaValidationError::MissingRequired {
                            field: Self::join(path, field),
                        });
                    }
                }
            }
        }

        if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
            for (key, property_schema) in properties {
                if let Some(child) = object.get(key) {
                    Self::validate_node(
                        property_schema,
                        child,
                        &Self::join(path, key),
                        enforce_required,
                        errors,
                    );
                }
            }
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn type_matches(expected: &Value, value: &Value) -> bool {
        match expected {
            Value::String(name) => Self::single_type_matches(name, value),
            Value::Array(names) => names
                .iter()
                .filter_map(Value::as_str)
                .any(|name| Self::single_type_matches(name, value)),
            _ => true,
        }
    }

    fn single_type_matches(name: &str, value: &Value) -> bool {
        match name {
            "object" => value.is_object(),
            "array" => value.is_array(),
            "string" => value.is_string(),
            "boolean" => value.is_boolean(),
            "null" => value.is_null(),
            "number" => value.is_number(),
            "integer" => match value {
                Value::Number(n) => {
                    n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
                }
                _ => false,
            },
            _ => true,
        }
    }

    fn describe_type(expected: &Value) -> String {
        match expected {
            Value::String(name) => name.clone(),
            Value::Array(names) => names
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(" or "),
            other => other.to_string(),
        }
    }

    fn join(path: &str, key: &str) -> String {
        if path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", path, key)
        }
    }

    fn display_path(path: &str) -> String {
        if path.is_empty() {
            "root".to_string()
        } else {
            path.to_string()
        }
    }
}

impl ReportSchemaValidator for JsonSchemaValidator {
    fn validate(&self, report: &Value) -> Result<(), SchemaValidationError> {
        self.run(report, true)
    }

    fn validate_partial(&self, partial: &Value) -> Result<(), SchemaValidationError> {
        self.run(partial, false)
    }

    fn schema(&self) -> &Value {
        &self.schema
    }
}
