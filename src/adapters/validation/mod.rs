//! Validation adapters.

mod json_schema_validator;

pub use json_schema_validator::JsonSchemaValidator;
