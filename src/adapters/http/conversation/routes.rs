//! Axum routes for conversation endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::adapters::http::state::AppState;

use super::handlers::{close_conversation, get_conversation, open_conversation, post_message};

/// Creates routes for conversation endpoints.
///
/// - POST /reports/:id/conversations - Open a session
/// - GET /conversations/:sid - Session view
/// - DELETE /conversations/:sid - Close a session
/// - POST /conversations/:sid/messages - Run a turn
pub fn conversation_routes() -> Router<AppState> {
    Router::new()
        .route("/reports/:id/conversations", post(open_conversation))
        .route(
            "/conversations/:sid",
            get(get_conversation).delete(close_conversation),
        )
        .route("/conversations/:sid/messages", post(post_message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversation_routes_creates_valid_router() {
        let _routes = conversation_routes();
    }
}
