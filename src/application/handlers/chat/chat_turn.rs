//! ChatTurnHandler - drives one conversation turn end to end.
//!
//! The session lock is held only around state transitions, never across
//! the generator or retrieval calls, so the session can be observed (and a
//! second submit rejected) while a turn is in flight.

use std::sync::Arc;

use crate::application::handlers::documents::{load_document, save_document};
use crate::application::routing::QueryRouter;
use crate::domain::conversation::{ConversationError, ConversationSession};
use crate::domain::foundation::ReportId;
use crate::domain::report::{changed_sections, describe_changes, ReportDocument};
use crate::domain::routing::RouterDecision;
use crate::ports::{DocumentStore, EscalationService, SessionHandle};

/// What the user submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatTurnCommand {
    Message(String),
    /// Index into the suggested questions.
    Suggestion(usize),
}

impl ChatTurnCommand {
    pub fn message(text: impl Into<String>) -> Self {
        Self::Message(text.into())
    }
}

/// How a turn ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    Answered,
    Updated {
        changed: Vec<String>,
        document: ReportDocument,
    },
    /// The placeholder was replaced with the retrieval answer.
    Escalated,
    /// The apology message was shown.
    Failed { kind: &'static str },
    /// Another turn was already in flight; nothing changed.
    Rejected,
}

impl TurnOutcome {
    pub fn kind(&self) -> &'static str {
        match self {
            TurnOutcome::Answered => "answered",
            TurnOutcome::Updated { .. } => "updated",
            TurnOutcome::Escalated => "escalated",
            TurnOutcome::Failed { .. } => "failed",
            TurnOutcome::Rejected => "rejected",
        }
    }
}

#[derive(Clone)]
pub struct ChatTurnHandler {
    router: Arc<QueryRouter>,
    escalation: Arc<dyn EscalationService>,
    store: Arc<dyn DocumentStore>,
}

impl ChatTurnHandler {
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

    /// Runs one turn.
    ///
    /// Only input problems (empty message, bad suggestion index) are
    /// returned as errors; everything after the turn starts ends in a
    /// [`TurnOutcome`] with the session back in `Idle`.
    pub async fn handle(
        &self,
        session: &SessionHandle,
        cmd: ChatTurnCommand,
    ) -> Result<TurnOutcome, ConversationError> {
        let (session_id, report_id, query) = {
            let mut guard = session.lock().await;
            match begin(&mut guard, cmd) {
                Ok(query) => (guard.id(), guard.report_id().clone(), query),
                Err(ConversationError::TurnInFlight) => {
                    tracing::debug!(session_id = %guard.id(), "Turn rejected; another is in flight");
                    return Ok(TurnOutcome::Rejected);
                }
                Err(err) => return Err(err),
            }
        };
        tracing::info!(session_id = %session_id, report_id = %report_id, "Chat turn started");

        // The session is now `Sending`. The rest of the turn runs detached so
        // a dropped request (timeout, disconnect) still returns it to `Idle`.
        let worker = self.clone();
        let task_session = Arc::clone(session);
        let task_report_id = report_id.clone();
        let turn = tokio::spawn(async move {
            worker.run(&task_session, &task_report_id, &query).await
        });
        let outcome = match turn.await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!(session_id = %session_id, error = %err, "Chat turn task aborted");
                fail(session, "turn_aborted").await
            }
        };
        tracing::info!(
            session_id = %session_id,
            report_id = %report_id,
            outcome = outcome.kind(),
            "Chat turn finished"
        );
        Ok(outcome)
    }

    async fn run(&self, session: &SessionHandle, report_id: &ReportId, query: &str) -> TurnOutcome {
        let document = match load_document(self.store.as_ref(), report_id).await {
            Ok(Some(document)) => document,
            Ok(None) => return fail(session, "report_not_found").await,
            Err(err) => {
                tracing::warn!(report_id = %report_id, error = %err, "Document store failed");
                return fail(session, err.kind()).await;
            }
        };

        let decision = match self.router.route(query, &document).await {
            Ok(decision) => decision,
            Err(err) => {
                tracing::warn!(report_id = %report_id, error = %err, kind = err.kind(), "Routing failed");
                return fail(session, err.kind()).await;
            }
        };

        match decision {
            RouterDecision::Answer { text } => {
                finish(session, |s| s.complete_with_answer(text), TurnOutcome::Answered).await
            }
            RouterDecision::Mutation { document: updated } => {
                let changed = changed_sections(&document, &updated);
                if let Err(err) =
                    save_document(self.store.as_ref(), report_id, updated.clone()).await
                {
                    tracing::warn!(report_id = %report_id, error = %err, "Failed to store update");
                    return fail(session, err.kind()).await;
                }
                let confirmation = describe_changes(&changed);
                finish(
                    session,
                    |s| s.complete_with_update(confirmation),
                    TurnOutcome::Updated {
                        changed,
                        document: updated,
                    },
                )
                .await
            }
            RouterDecision::Escalate => self.escalate(session, query, &document).await,
        }
    }

    async fn escalate(
        &self,
        session: &SessionHandle,
        query: &str,
        document: &ReportDocument,
    ) -> TurnOutcome {
        if let Err(err) = session.lock().await.await_escalation() {
            tracing::warn!(error = %err, "Could not show escalation placeholder");
            return fail(session, "invalid_transition").await;
        }

        match self.escalation.retrieve(query, document).await {
            Ok(text) => {
                finish(session, |s| s.resolve_escalation(text), TurnOutcome::Escalated).await
            }
            Err(err) => {
                tracing::warn!(error = %err, "Escalation failed");
                fail(session, err.kind()).await
            }
        }
    }
}

fn begin(session: &mut ConversationSession, cmd: ChatTurnCommand) -> Result<String, ConversationError> {
    if session.loading() {
        return Err(ConversationError::TurnInFlight);
    }
    let text = match cmd {
        ChatTurnCommand::Message(text) => text,
        ChatTurnCommand::Suggestion(index) => session.select_suggestion(index)?.to_string(),
    };
    session.begin_turn(&text)
}

/// Applies the closing transition; a refused transition still ends the turn.
async fn finish<F>(session: &SessionHandle, complete: F, outcome: TurnOutcome) -> TurnOutcome
where
    F: FnOnce(&mut ConversationSession) -> Result<(), ConversationError>,
{
    let mut guard = session.lock().await;
    match complete(&mut guard) {
        Ok(()) => outcome,
        Err(err) => {
            tracing::warn!(session_id = %guard.id(), error = %err, "Turn completion refused");
            guard.fail_turn();
            TurnOutcome::Failed {
                kind: "invalid_transition",
            }
        }
    }
}

async fn fail(session: &SessionHandle, kind: &'static str) -> TurnOutcome {
    session.lock().await.fail_turn();
    TurnOutcome::Failed { kind }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryDocumentStore;
    use crate::domain::conversation::texts::{APOLOGY, SUGGESTED_QUESTIONS};
    use crate::domain::conversation::{MessageContent, Role, TurnState};
    use crate::domain::report::ReportSchema;
    use crate::domain::routing::GeneratorOutcome;
    use crate::ports::{CollaboratorError, GeneratorError, ReportGenerator};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex as StdMutex;
    use tokio::sync::{Mutex, Notify};

    struct FixedGenerator(StdMutex<Option<Result<GeneratorOutcome, GeneratorError>>>);

    #[async_trait]
    impl ReportGenerator for FixedGenerator {
        async fn generate(
            &self,
            _query: &str,
            _document: &ReportDocument,
            _schema: &ReportSchema,
        ) -> Result<GeneratorOutcome, GeneratorError> {
            self.0
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Ok(GeneratorOutcome::Text("again".to_string())))
        }
    }

    /// Retrieval that waits for `release` before answering.
    struct GatedRetrieval {
        release: Notify,
        reply: Result<String, CollaboratorError>,
    }

    #[async_trait]
    impl EscalationService for GatedRetrieval {
        async fn retrieve(
            &self,
            _query: &str,
            _document: &ReportDocument,
        ) -> Result<String, CollaboratorError> {
            self.release.notified().await;
            self.reply.clone()
        }
    }

    struct Fixture {
        handler: Arc<ChatTurnHandler>,
        store: Arc<InMemoryDocumentStore>,
        retrieval: Arc<GatedRetrieval>,
        session: SessionHandle,
    }

    fn report() -> ReportDocument {
        ReportDocument::from_value(json!({
            "property_details": {"property_name": "Elm Court", "unit_count": 25}
        }))
        .unwrap()
    }

    async fn fixture(
        outcome: Result<GeneratorOutcome, GeneratorError>,
        retrieval: Result<String, CollaboratorError>,
    ) -> Fixture {
        let store = Arc::new(InMemoryDocumentStore::new());
        let id = ReportId::new("r1").unwrap();
        store.set(&id, report()).await.unwrap();
        let retrieval = Arc::new(GatedRetrieval {
            release: Notify::new(),
            reply: retrieval,
        });
        let router = Arc::new(QueryRouter::new(Arc::new(FixedGenerator(StdMutex::new(
            Some(outcome),
        )))));
        let handler = Arc::new(ChatTurnHandler::new(
            router,
            retrieval.clone(),
            store.clone(),
        ));
        Fixture {
            handler,
            store,
            retrieval,
            session: Arc::new(Mutex::new(ConversationSession::new(id))),
        }
    }

    fn text_of(session: &ConversationSession, index: usize) -> Option<String> {
        session.messages()[index].content().as_text().map(str::to_string)
    }

    mod answers {
        use super::*;

        #[tokio::test]
        async fn answer_appends_user_then_assistant() {
            let f = fixture(Ok(GeneratorOutcome::Text("25 units".into())), Ok(String::new())).await;

            let outcome = f
                .handler
                .handle(&f.session, ChatTurnCommand::message("how many units?"))
                .await
                .unwrap();

            assert_eq!(outcome, TurnOutcome::Answered);
            let s = f.session.lock().await;
            assert_eq!(s.messages().len(), 3);
            assert_eq!(s.messages()[1].role(), Role::User);
            assert_eq!(text_of(&s, 2).as_deref(), Some("25 units"));
            assert!(!s.loading());
            assert!(!s.suggestions_visible());
        }

        #[tokio::test]
        async fn suggestion_is_submitted_as_question() {
            let f = fixture(Ok(GeneratorOutcome::Text("ok".into())), Ok(String::new())).await;

            f.handler
                .handle(&f.session, ChatTurnCommand::Suggestion(0))
                .await
                .unwrap();

            let s = f.session.lock().await;
            assert_eq!(text_of(&s, 1).as_deref(), Some(SUGGESTED_QUESTIONS[0]));
        }

        #[tokio::test]
        async fn empty_message_is_an_input_error() {
            let f = fixture(Ok(GeneratorOutcome::Escalate), Ok(String::new())).await;

            let err = f
                .handler
                .handle(&f.session, ChatTurnCommand::message("   "))
                .await
                .unwrap_err();

            assert_eq!(err, ConversationError::EmptyMessage);
            assert_eq!(f.session.lock().await.messages().len(), 1);
        }
    }

    mod updates {
        use super::*;
        use serde_json::Value;

        #[tokio::test]
        async fn mutation_is_stored_and_confirmed() {
            let partial = json!({"property_details": {"unit_count": 30}});
            let Value::Object(partial) = partial else { unreachable!() };
            let f = fixture(Ok(GeneratorOutcome::Structured(partial)), Ok(String::new())).await;

            let outcome = f
                .handler
                .handle(&f.session, ChatTurnCommand::message("set units to 30"))
                .await
                .unwrap();

            let TurnOutcome::Updated { changed, document } = outcome else {
                panic!("expected update");
            };
            assert_eq!(changed, vec!["property_details".to_string()]);
            assert_eq!(document.pointer("property_details.unit_count"), Some(&json!(30)));

            let stored = f.store.get(&ReportId::new("r1").unwrap()).await.unwrap();
            assert_eq!(stored, Some(document));

            let s = f.session.lock().await;
            assert_eq!(
                text_of(&s, 2).as_deref(),
                Some("Updated the report: property details.")
            );
        }
    }

    mod escalation {
        use super::*;

        #[tokio::test]
        async fn placeholder_is_replaced_in_place() {
            let f = fixture(Ok(GeneratorOutcome::Escalate), Ok("Two schools nearby.".into())).await;

            let handler = f.handler.clone();
            let session = f.session.clone();
            let turn = tokio::spawn(async move {
                handler
                    .handle(&session, ChatTurnCommand::message("nearby schools?"))
                    .await
            });

            // Wait until the placeholder is visible.
            loop {
                let s = f.session.lock().await;
                if s.state() == TurnState::AwaitingEscalation {
                    assert_eq!(s.messages().len(), 3);
                    assert!(s.messages()[2].is_placeholder());
                    assert!(s.loading());
                    assert!(!s.input_enabled());
                    break;
                }
                drop(s);
                tokio::task::yield_now().await;
            }

            f.retrieval.release.notify_one();
            let outcome = turn.await.unwrap().unwrap();

            assert_eq!(outcome, TurnOutcome::Escalated);
            let s = f.session.lock().await;
            assert_eq!(s.messages().len(), 3);
            assert_eq!(text_of(&s, 2).as_deref(), Some("Two schools nearby."));
            assert!(!s.loading());
        }

        #[tokio::test]
        async fn second_submit_during_escalation_is_rejected() {
            let f = fixture(Ok(GeneratorOutcome::Escalate), Ok("answer".into())).await;

            let handler = f.handler.clone();
            let session = f.session.clone();
            let turn = tokio::spawn(async move {
                handler
                    .handle(&session, ChatTurnCommand::message("first"))
                    .await
            });
            while !f.session.lock().await.loading() {
                tokio::task::yield_now().await;
            }

            let second = f
                .handler
                .handle(&f.session, ChatTurnCommand::message("second"))
                .await
                .unwrap();
            assert_eq!(second, TurnOutcome::Rejected);

            f.retrieval.release.notify_one();
            turn.await.unwrap().unwrap();
            let s = f.session.lock().await;
            assert!(s
                .messages()
                .iter()
                .all(|m| m.content().as_text() != Some("second")));
        }

        #[tokio::test]
        async fn retrieval_failure_replaces_placeholder_with_apology() {
            let f = fixture(
                Ok(GeneratorOutcome::Escalate),
                Err(CollaboratorError::unavailable("retrieval", "down")),
            )
            .await;
            f.retrieval.release.notify_one();

            let outcome = f
                .handler
                .handle(&f.session, ChatTurnCommand::message("nearby schools?"))
                .await
                .unwrap();

            assert_eq!(
                outcome,
                TurnOutcome::Failed {
                    kind: "collaborator_unavailable"
                }
            );
            let s = f.session.lock().await;
            assert_eq!(s.messages().len(), 3);
            assert_eq!(text_of(&s, 2).as_deref(), Some(APOLOGY));
            assert!(s.messages().iter().all(|m| !m.is_placeholder()));
            assert!(s.input_enabled());
        }
    }

    mod failures {
        use super::*;
        use crate::ports::AIError;

        #[tokio::test]
        async fn generator_failure_appends_apology() {
            let f = fixture(
                Err(GeneratorError::from(AIError::timeout(60))),
                Ok(String::new()),
            )
            .await;

            let outcome = f
                .handler
                .handle(&f.session, ChatTurnCommand::message("q"))
                .await
                .unwrap();

            assert_eq!(
                outcome,
                TurnOutcome::Failed {
                    kind: "generator_timeout"
                }
            );
            let s = f.session.lock().await;
            assert_eq!(text_of(&s, 2).as_deref(), Some(APOLOGY));
            assert!(matches!(s.messages()[2].content(), MessageContent::Text(_)));
            assert!(!s.loading());
        }

        #[tokio::test]
        async fn missing_report_fails_the_turn() {
            let f = fixture(Ok(GeneratorOutcome::Escalate), Ok(String::new())).await;
            let orphan: SessionHandle = Arc::new(Mutex::new(ConversationSession::new(
                ReportId::new("missing").unwrap(),
            )));

            let outcome = f
                .handler
                .handle(&orphan, ChatTurnCommand::message("q"))
                .await
                .unwrap();

            assert_eq!(
                outcome,
                TurnOutcome::Failed {
                    kind: "report_not_found"
                }
            );
            assert!(orphan.lock().await.input_enabled());
        }
    }
}
