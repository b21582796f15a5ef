//! Chat sessions over a report.

mod errors;
mod message;
mod session;
pub mod texts;
mod turn_state;

pub use errors::ConversationError;
pub use message::{Message, MessageContent, Role};
pub use session::ConversationSession;
pub use turn_state::TurnState;
