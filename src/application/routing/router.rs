//! QueryRouter - decide and apply one user turn against a report.
//!
//! The router makes exactly one generator call per turn and never retries.
//! Structured output is merged into the current document (the generator's
//! values win where present); the sentinel becomes `Escalate`; text
//! becomes `Answer`. Generator failures are returned, never converted into
//! an escalation or an empty update.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::domain::report::{MergeError, ReportDocument, ReportSchema};
use crate::domain::routing::{GeneratorOutcome, RouterDecision};
use crate::ports::{GeneratorError, ReportGenerator};

/// Errors surfaced by [`QueryRouter::route`].
#[derive(Debug, Error)]
pub enum RouterError {
    #[error(transparent)]
    Generator(#[from] GeneratorError),

    #[error(transparent)]
    Merge(#[from] MergeError),
}

impl RouterError {
    /// Stable snake_case label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RouterError::Generator(err) => err.kind(),
            RouterError::Merge(_) => "merge",
        }
    }
}

pub struct QueryRouter {
    generator: Arc<dyn ReportGenerator>,
    schema: &'static ReportSchema,
}

impl QueryRouter {
    /// Router over the embedded report schema.
    pub fn new(generator: Arc<dyn ReportGenerator>) -> Self {
        Self {
            generator,
            schema: ReportSchema::global(),
        }
    }

    pub async fn route(
        &self,
        query: &str,
        document: &ReportDocument,
    ) -> Result<RouterDecision, RouterError> {
        let outcome = self.generator.generate(query, document, self.schema).await?;
        tracing::debug!(outcome = outcome.kind(), "Generator returned");

        let decision = decide(outcome, document)?;
        tracing::debug!(decision = decision.kind(), "Routed query");
        Ok(decision)
    }
}

/// Maps one generator outcome to a decision. An empty structured object is
/// still a mutation.
fn decide(
    outcome: GeneratorOutcome,
    document: &ReportDocument,
) -> Result<RouterDecision, MergeError> {
    match outcome {
        GeneratorOutcome::Escalate => Ok(RouterDecision::Escalate),
        GeneratorOutcome::Text(text) => Ok(RouterDecision::Answer { text }),
        GeneratorOutcome::Structured(partial) => {
            let document = document.apply_partial(&Value::Object(partial))?;
            Ok(RouterDecision::Mutation { document })
        }
    }
}
