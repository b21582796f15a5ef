//! Chat handlers: session-bound turns and stateless exchanges.

mod answer_query;
mod chat_turn;

pub use answer_query::{
    AnswerQueryCommand, AnswerQueryError, AnswerQueryHandler, AnswerQueryResult, RoutedQuery,
};
pub use chat_turn::{ChatTurnCommand, ChatTurnHandler, TurnOutcome};
