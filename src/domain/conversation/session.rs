//! Conversation session: the message list and its turn state machine.

use crate::domain::foundation::{MessageId, ReportId, SessionId, StateMachine, Timestamp};

use super::texts::{APOLOGY, GREETING, SUGGESTED_QUESTIONS};
use super::{ConversationError, Message, TurnState};

/// One open chat panel over a report.
///
/// # Invariants
///
/// - messages are only appended, never reordered or removed
/// - at most one turn is in flight; input is disabled until it finishes
/// - the escalation placeholder keeps its position; only its content changes
/// - suggestions, once hidden, stay hidden
#[derive(Debug, Clone)]
pub struct ConversationSession {
    id: SessionId,
    report_id: ReportId,
    messages: Vec<Message>,
    state: TurnState,
    suggestions_visible: bool,
    placeholder_index: Option<usize>,
    created_at: Timestamp,
}

impl ConversationSession {
    /// Opens a session with the greeting message and suggestions visible.
    pub fn new(report_id: ReportId) -> Self {
        Self {
            id: SessionId::new(),
            report_id,
            messages: vec![Message::assistant(GREETING)],
            state: TurnState::Idle,
            suggestions_visible: true,
            placeholder_index: None,
            created_at: Timestamp::now(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn report_id(&self) -> &ReportId {
        &self.report_id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// True while a turn is in flight.
    pub fn loading(&self) -> bool {
        self.state.is_busy()
    }

    pub fn input_enabled(&self) -> bool {
        self.state == TurnState::Idle
    }

    pub fn suggestions_visible(&self) -> bool {
        self.suggestions_visible
    }

    pub fn suggestions(&self) -> &'static [&'static str] {
        &SUGGESTED_QUESTIONS
    }

    /// Picks a suggested question, hiding the suggestions.
    pub fn select_suggestion(&mut self, index: usize) -> Result<&'static str, ConversationError> {
        if !self.suggestions_visible {
            return Err(ConversationError::SuggestionsHidden);
        }
        let question = SUGGESTED_QUESTIONS
            .get(index)
            .copied()
            .ok_or(ConversationError::SuggestionOutOfRange { index })?;
        self.suggestions_visible = false;
        Ok(question)
    }

    /// Submits a user message and enters `Sending`.
    ///
    /// Returns the trimmed text that should be routed.
    pub fn begin_turn(&mut self, text: &str) -> Result<String, ConversationError> {
        if self.state.is_busy() {
            return Err(ConversationError::TurnInFlight);
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(ConversationError::EmptyMessage);
        }
        self.state = self.state.transition_to(TurnState::Sending)?;
        self.messages.push(Message::user(text));
        self.suggestions_visible = false;
        Ok(text.to_string())
    }

    /// Finishes a turn with a direct answer.
    pub fn complete_with_answer(&mut self, text: impl Into<String>) -> Result<(), ConversationError> {
        self.state = self.state.transition_to(TurnState::Idle)?;
        self.messages.push(Message::assistant(text));
        Ok(())
    }

    /// Finishes a turn that changed the report, with a confirmation message.
    pub fn complete_with_update(
        &mut self,
        confirmation: impl Into<String>,
    ) -> Result<(), ConversationError> {
        self.complete_with_answer(confirmation)
    }

    /// Shows the placeholder and enters `AwaitingEscalation`.
    pub fn await_escalation(&mut self) -> Result<MessageId, ConversationError> {
        self.state = self.state.transition_to(TurnState::AwaitingEscalation)?;
        let placeholder = Message::placeholder();
        let id = placeholder.id();
        self.placeholder_index = Some(self.messages.len());
        self.messages.push(placeholder);
        Ok(id)
    }

    /// Replaces the placeholder with the retrieval result and returns to `Idle`.
    pub fn resolve_escalation(&mut self, text: impl Into<String>) -> Result<(), ConversationError> {
        let next = self.state.transition_to(TurnState::Idle)?;
        self.replace_placeholder(text.into());
        self.state = next;
        Ok(())
    }

    /// Ends the in-flight turn with the apology message.
    ///
    /// A pending placeholder is replaced with the apology; otherwise the
    /// apology is appended. Does nothing when no turn is in flight.
    pub fn fail_turn(&mut self) {
        match self.state {
            TurnState::Idle => {}
            TurnState::Sending => {
                self.messages.push(Message::assistant(APOLOGY));
                self.state = TurnState::Idle;
            }
            TurnState::AwaitingEscalation => {
                self.replace_placeholder(APOLOGY.to_string());
                self.state = TurnState::Idle;
            }
        }
    }

    fn replace_placeholder(&mut self, text: String) {
        if let Some(index) = self.placeholder_index.take() {
            if let Some(message) = self.messages.get_mut(index) {
                message.resolve_placeholder(text);
            }
        }
    }
}
