//! Axum routes for chat endpoints.

use axum::routing::post;
use axum::Router;

use crate::adapters::http::state::AppState;

use super::handlers::chat;
use super::streaming::stream_chat;

/// Creates routes for chat endpoints.
///
/// - POST /chat/:id - JSON reply
/// - POST /chat/:id/stream - SSE reply (when streaming is enabled)
pub fn chat_routes(enable_streaming: bool) -> Router<AppState> {
    let router = Router::new().route("/chat/:id", post(chat));
    if enable_streaming {
        router.route("/chat/:id/stream", post(stream_chat))
    } else {
        router
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_routes_creates_valid_router() {
        let _with = chat_routes(true);
        let _without = chat_routes(false);
    }
}
