//! Routing decisions and generator outcomes.

use serde_json::{Map, Value};

use crate::domain::report::ReportDocument;

/// What a generator returned for one query.
///
/// Exactly one case per call. Failures are carried by the caller's `Result`,
/// never folded into one of these cases.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratorOutcome {
    /// A schema-conformant object, possibly a partial subtree of the report.
    Structured(Map<String, Value>),
    /// The model signalled that the report cannot answer the query.
    Escalate,
    /// Natural-language text.
    Text(String),
}

impl GeneratorOutcome {
    pub fn kind(&self) -> &'static str {
        match self {
            GeneratorOutcome::Structured(_) => "structured",
            GeneratorOutcome::Escalate => "escalate",
            GeneratorOutcome::Text(_) => "text",
        }
    }
}

/// The result of routing one user turn.
#[derive(Debug, Clone, PartialEq)]
pub enum RouterDecision {
    /// Answer from the report; the document is unchanged.
    Answer { text: String },
    /// A new, fully merged document.
    Mutation { document: ReportDocument },
    /// The caller must consult the retrieval service.
    Escalate,
}

impl RouterDecision {
    /// Stable label used in logs and API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            RouterDecision::Answer { .. } => "answer",
            RouterDecision::Mutation { .. } => "mutation",
            RouterDecision::Escalate => "escalate",
        }
    }
}
