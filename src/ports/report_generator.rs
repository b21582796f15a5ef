//! Report Generator Port - schema-constrained generation.
//!
//! Given a query, the current report and the report schema, a generator
//! returns one of: a schema-conformant (possibly partial) object, the
//! escalation sentinel, or natural-language text. Anything else is an error.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::report::ReportDocument;
use crate::domain::report::ReportSchema;
use crate::domain::routing::GeneratorOutcome;

use super::{AIError, SchemaValidationError};

/// Port for schema-constrained generation. Stateless per call.
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    async fn generate(
        &self,
        query: &str,
        document: &ReportDocument,
        schema: &ReportSchema,
    ) -> Result<GeneratorOutcome, GeneratorError>;
}

/// Generation failures. A parse failure is never "no change needed".
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The model call failed or timed out.
    #[error("generation call failed: {0}")]
    Transport(#[from] AIError),

    /// Structured output did not conform to the schema.
    #[error("structured output failed validation: {0}")]
    SchemaValidation(#[from] SchemaValidationError),

    /// Output was neither valid structured JSON, the sentinel, nor text.
    #[error("malformed model output: {0}")]
    MalformedOutput(String),
}

impl GeneratorError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedOutput(reason.into())
    }

    /// Stable snake_case label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            GeneratorError::Transport(AIError::Timeout { .. }) => "generator_timeout",
            GeneratorError::Transport(_) => "generator_transport",
            GeneratorError::SchemaValidation(_) => "schema_validation",
            GeneratorError::MalformedOutput(_) => "malformed_output",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_stable() {
        assert_eq!(
            GeneratorError::from(AIError::timeout(5)).kind(),
            "generator_timeout"
        );
        assert_eq!(
            GeneratorError::from(AIError::network("reset")).kind(),
            "generator_transport"
        );
        assert_eq!(GeneratorError::malformed("x").kind(), "malformed_output");
    }
}
