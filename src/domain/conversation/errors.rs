//! Conversation errors.

use thiserror::Error;

use crate::domain::foundation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversationError {
    #[error("A turn is already in flight for this session")]
    TurnInFlight,

    #[error("Message cannot be empty")]
    EmptyMessage,

    #[error("No suggestion at index {index}")]
    SuggestionOutOfRange { index: usize },

    #[error("Suggestions are no longer available")]
    SuggestionsHidden,

    #[error(transparent)]
    InvalidTransition(#[from] ValidationError),
}
