//! HTTP adapter for stateless chat, plain and streamed.

mod dto;
mod handlers;
mod routes;
mod streaming;

pub use routes::chat_routes;
pub use streaming::DONE_MARKER;
