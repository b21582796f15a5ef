//! HTTP adapter for session-based conversations.

mod dto;
mod handlers;
mod routes;

pub use dto::{MessageView, SessionView, TurnResponse};
pub use routes::conversation_routes;
