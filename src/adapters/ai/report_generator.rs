//! Function-calling report generator.
//!
//! Implements `ReportGenerator` on top of any `AIProvider`. The model is
//! offered a single `update_report` function whose parameters are the full
//! report schema; it may call it (structured partial), answer in text, or
//! return the escalation sentinel.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::domain::report::{ReportDocument, ReportSchema};
use crate::domain::routing::{classify_reply, GeneratorOutcome, ReplyShape};
use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FunctionDefinition, GeneratorError,
    MessageRole, ReportGenerator, ReportSchemaValidator, RequestMetadata,
};

/// Name of the function the model calls to return report changes.
pub const UPDATE_FUNCTION: &str = "update_report";

const UPDATE_FUNCTION_DESCRIPTION: &str =
    "Update or answer about the report using the provided schema.";

/// System prompt for routing queries over a report.
pub const SYSTEM_PROMPT: &str = r#"You are an assistant that answers queries based on a JSON report.
Rules:
1. You are given a report JSON as reference.
2. If the query asks to modify the report, call the update_report function with only the fields that change.
3. If the query asks for information:
  - If it can be fully answered from the JSON, return the answer as plain text.
  - If it can be reasoned from the JSON, generate a natural answer referencing the JSON data.
4. If the answer cannot be derived or reasoned from the JSON, return exactly: {"result": "call_rag"}
Do not include extra explanations outside JSON unless generating natural answers."#;

/// Settings for one generator instance.
#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    /// Upper bound on one generation call.
    pub timeout: Duration,
    pub temperature: f32,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            temperature: 0.0,
        }
    }
}

/// `ReportGenerator` backed by an `AIProvider` with function calling.
pub struct FunctionCallingGenerator {
    provider: Arc<dyn AIProvider>,
    validator: Arc<dyn ReportSchemaValidator>,
    settings: GeneratorSettings,
}

impl FunctionCallingGenerator {
    pub fn new(
        provider: Arc<dyn AIProvider>,
        validator: Arc<dyn ReportSchemaValidator>,
        settings: GeneratorSettings,
    ) -> Self {
        Self {
            provider,
            validator,
            settings,
        }
    }

    /// Builds the completion request for one query.
    pub fn build_request(
        &self,
        query: &str,
        document: &ReportDocument,
        schema: &ReportSchema,
    ) -> Result<CompletionRequest, GeneratorError> {
        let report_json = serde_json::to_string(document.as_map())
            .map_err(|e| GeneratorError::malformed(format!("report is not serializable: {}", e)))?;

        Ok(CompletionRequest::new(RequestMetadata::new(uuid::Uuid::new_v4().to_string()))
            .with_system_prompt(SYSTEM_PROMPT)
            .with_message(
                MessageRole::User,
                format!("Report JSON:\n{}\n\nQuery: {}", report_json, query),
            )
            .with_temperature(self.settings.temperature)
            .with_function(FunctionDefinition::new(
                UPDATE_FUNCTION,
                UPDATE_FUNCTION_DESCRIPTION,
                schema.as_value().clone(),
            )))
    }

    /// Classifies a provider response into an outcome.
    pub fn interpret(&self, response: CompletionResponse) -> Result<GeneratorOutcome, GeneratorError> {
        if let Some(call) = response.function_call {
            if call.name != UPDATE_FUNCTION {
                return Err(GeneratorError::malformed(format!(
                    "unexpected function '{}'",
                    call.name
                )));
            }
            let arguments = if call.arguments.trim().is_empty() {
                "{}"
            } else {
                call.arguments.as_str()
            };
            let value: Value = serde_json::from_str(arguments).map_err(|e| {
                GeneratorError::malformed(format!("function arguments are not JSON: {}", e))
            })?;
            return self.structured(value);
        }

        match classify_reply(response.content.as_deref().unwrap_or_default()) {
            ReplyShape::Empty => Err(GeneratorError::malformed("empty response")),
            ReplyShape::Sentinel => Ok(GeneratorOutcome::Escalate),
            ReplyShape::Object(object) => self.structured(Value::Object(object)),
            ReplyShape::Text(text) => Ok(GeneratorOutcome::Text(text)),
        }
    }

    fn structured(&self, value: Value) -> Result<GeneratorOutcome, GeneratorError> {
        self.validator.validate_partial(&value)?;
        match value {
            Value::Object(object) => Ok(GeneratorOutcome::Structured(object)),
            _ => Err(GeneratorError::malformed("structured output is not an object")),
        }
    }
}

#[async_trait]
impl ReportGenerator for FunctionCallingGenerator {
    async fn generate(
        &self,
        query: &str,
        document: &ReportDocument,
        schema: &ReportSchema,
    ) -> Result<GeneratorOutcome, GeneratorError> {
        let request = self.build_request(query, document, schema)?;

        let response = tokio::time::timeout(self.settings.timeout, self.provider.complete(request))
            .await
            .map_err(|_| AIError::timed_out_after(self.settings.timeout))??;

        debug!(
            finish_reason = ?response.finish_reason,
            tokens = response.usage.total_tokens,
            "generator response received"
        );

        self.interpret(response)
    }
}
