//! AnswerQueryHandler - one stateless question/answer exchange.
//!
//! Backs the chat endpoints that carry no session: route the message,
//! apply an update, or escalate, and return a single reply text.

use std::sync::Arc;

use thiserror::Error;

use crate::application::handlers::documents::{load_document, save_document};
use crate::application::routing::{QueryRouter, RouterError};
use crate::domain::foundation::ReportId;
use crate::domain::report::{changed_sections, describe_changes, ReportDocument};
use crate::domain::routing::RouterDecision;
use crate::ports::{CollaboratorError, DocumentStore, EscalationService};

#[derive(Debug, Clone)]
pub struct AnswerQueryCommand {
    pub report_id: ReportId,
    pub message: String,
    /// Overrides the stored document for this exchange.
    pub document: Option<ReportDocument>,
}

impl AnswerQueryCommand {
    pub fn new(report_id: ReportId, message: impl Into<String>) -> Self {
        Self {
            report_id,
            message: message.into(),
            document: None,
        }
    }

    pub fn with_document(mut self, document: ReportDocument) -> Self {
        self.document = Some(document);
        self
    }
}

#[derive(Debug, Error)]
pub enum AnswerQueryError {
    #[error("Message is required")]
    EmptyMessage,

    #[error("Report not found: {0}")]
    ReportNotFound(ReportId),

    #[error(transparent)]
    Router(#[from] RouterError),

    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

impl AnswerQueryError {
    pub fn kind(&self) -> &'static str {
        match self {
            AnswerQueryError::EmptyMessage => "empty_message",
            AnswerQueryError::ReportNotFound(_) => "report_not_found",
            AnswerQueryError::Router(err) => err.kind(),
            AnswerQueryError::Collaborator(err) => err.kind(),
        }
    }
}

/// A routed exchange whose reply has not been produced yet.
#[derive(Debug, Clone)]
pub struct RoutedQuery {
    report_id: ReportId,
    query: String,
    document: ReportDocument,
    decision: RouterDecision,
}

impl RoutedQuery {
    /// True when answering needs the retrieval service.
    pub fn needs_escalation(&self) -> bool {
        matches!(self.decision, RouterDecision::Escalate)
    }

    pub fn decision_kind(&self) -> &'static str {
        self.decision.kind()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnswerQueryResult {
    pub reply: String,
    /// `answer`, `mutation` or `escalate`.
    pub outcome: &'static str,
    /// The updated document, for mutations.
    pub document: Option<ReportDocument>,
}

pub struct AnswerQueryHandler {
    router: Arc<QueryRouter>,
    escalation: Arc<dyn EscalationService>,
    store: Arc<dyn DocumentStore>,
}

impl AnswerQueryHandler {
    pub fn new(
        router: Arc<QueryRouter>,
        escalation: Arc<dyn EscalationService>,
        store: Arc<dyn DocumentStore>,
    ) -> Self {
        Self {
            router,
            escalation,
            store,
        }
    }

    pub async fn handle(&self, cmd: AnswerQueryCommand) -> Result<AnswerQueryResult, AnswerQueryError> {
        let routed = self.route(cmd).await?;
        self.answer(routed).await
    }

    /// First half of [`handle`](Self::handle): resolve the document and route.
    pub async fn route(&self, cmd: AnswerQueryCommand) -> Result<RoutedQuery, AnswerQueryError> {
        let query = cmd.message.trim().to_string();
        if query.is_empty() {
            return Err(AnswerQueryError::EmptyMessage);
        }

        let document = match cmd.document {
            Some(document) => document,
            None => load_document(self.store.as_ref(), &cmd.report_id)
                .await?
                .ok_or_else(|| AnswerQueryError::ReportNotFound(cmd.report_id.clone()))?,
        };

        let decision = self.router.route(&query, &document).await?;
        tracing::info!(
            report_id = %cmd.report_id,
            decision = decision.kind(),
            "Query routed"
        );

        Ok(RoutedQuery {
            report_id: cmd.report_id,
            query,
            document,
            decision,
        })
    }

    /// Second half: apply the decision and produce the reply.
    pub async fn answer(&self, routed: RoutedQuery) -> Result<AnswerQueryResult, AnswerQueryError> {
        let outcome = routed.decision.kind();
        match routed.decision {
            RouterDecision::Answer { text } => Ok(AnswerQueryResult {
                reply: text,
                outcome,
                document: None,
            }),
            RouterDecision::Mutation { document } => {
                let changed = changed_sections(&routed.document, &document);
                save_document(self.store.as_ref(), &routed.report_id, document.clone()).await?;
                Ok(AnswerQueryResult {
                    reply: describe_changes(&changed),
                    outcome,
                    document: Some(document),
                })
            }
            RouterDecision::Escalate => {
                let reply = self
                    .escalation
                    .retrieve(&routed.query, &routed.document)
                    .await?;
                Ok(AnswerQueryResult {
                    reply,
                    outcome,
                    document: None,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{
        FunctionCallingGenerator, GeneratorSettings, MockAIProvider, UPDATE_FUNCTION,
    };
    use crate::adapters::storage::InMemoryDocumentStore;
    use crate::adapters::validation::JsonSchemaValidator;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingRetrieval {
        queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl EscalationService for RecordingRetrieval {
        async fn retrieve(
            &self,
            query: &str,
            _document: &ReportDocument,
        ) -> Result<String, CollaboratorError> {
            self.queries.lock().unwrap().push(query.to_string());
            Ok("From the offering memorandum: two schools within a mile.".to_string())
        }
    }

    struct Fixture {
        handler: AnswerQueryHandler,
        store: Arc<InMemoryDocumentStore>,
        retrieval: Arc<RecordingRetrieval>,
    }

    async fn fixture(provider: MockAIProvider) -> Fixture {
        let store = Arc::new(InMemoryDocumentStore::new());
        store
            .set(
                &id("r1"),
                ReportDocument::from_value(json!({"property_details": {"unit_count": 25}}))
                    .unwrap(),
            )
            .await
            .unwrap();
        let generator = FunctionCallingGenerator::new(
            Arc::new(provider),
            Arc::new(JsonSchemaValidator::new()),
            GeneratorSettings::default(),
        );
        let retrieval = Arc::new(RecordingRetrieval::default());
        let handler = AnswerQueryHandler::new(
            Arc::new(QueryRouter::new(Arc::new(generator))),
            retrieval.clone(),
            store.clone(),
        );
        Fixture {
            handler,
            store,
            retrieval,
        }
    }

    fn id(s: &str) -> ReportId {
        ReportId::new(s).unwrap()
    }

    #[tokio::test]
    async fn text_reply_is_returned() {
        let f = fixture(MockAIProvider::new().with_response("There are 25 units.")).await;

        let result = f
            .handler
            .handle(AnswerQueryCommand::new(id("r1"), "how many units?"))
            .await
            .unwrap();

        assert_eq!(result.reply, "There are 25 units.");
        assert_eq!(result.outcome, "answer");
        assert!(result.document.is_none());
    }

    #[tokio::test]
    async fn mutation_updates_store_and_returns_document() {
        let f = fixture(
            MockAIProvider::new()
                .with_function_call(UPDATE_FUNCTION, r#"{"proscons":{"pros":["New roof"]}}"#),
        )
        .await;

        let result = f
            .handler
            .handle(AnswerQueryCommand::new(id("r1"), "add a pro: new roof"))
            .await
            .unwrap();

        assert_eq!(result.outcome, "mutation");
        assert_eq!(result.reply, "Updated the report: pros and cons.");
        let stored = f.store.get(&id("r1")).await.unwrap().unwrap();
        assert_eq!(result.document, Some(stored.clone()));
        assert_eq!(stored.pointer("property_details.unit_count"), Some(&json!(25)));
    }

    #[tokio::test]
    async fn escalation_asks_retrieval() {
        let f = fixture(MockAIProvider::new().with_response(r#"{"result":"call_rag"}"#)).await;

        let routed = f
            .handler
            .route(AnswerQueryCommand::new(id("r1"), " schools nearby? "))
            .await
            .unwrap();
        assert!(routed.needs_escalation());

        let result = f.handler.answer(routed).await.unwrap();
        assert_eq!(result.outcome, "escalate");
        assert!(result.reply.contains("two schools"));
        assert_eq!(
            *f.retrieval.queries.lock().unwrap(),
            vec!["schools nearby?".to_string()]
        );
    }

    #[tokio::test]
    async fn supplied_document_overrides_store() {
        let provider = MockAIProvider::new().with_response("ok");
        let f = fixture(provider).await;
        let supplied = ReportDocument::from_value(json!({"debt_financing": {"walt": "5 years"}}))
            .unwrap();

        let routed = f
            .handler
            .route(AnswerQueryCommand::new(id("unknown"), "walt?").with_document(supplied.clone()))
            .await
            .unwrap();

        assert_eq!(routed.document, supplied);
    }

    #[tokio::test]
    async fn empty_and_unknown_are_rejected() {
        let f = fixture(MockAIProvider::new()).await;

        let err = f
            .handler
            .handle(AnswerQueryCommand::new(id("r1"), "  "))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "empty_message");

        let err = f
            .handler
            .handle(AnswerQueryCommand::new(id("nope"), "hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, AnswerQueryError::ReportNotFound(_)));
    }
}
