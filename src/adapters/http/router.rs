//! Application router: every HTTP surface plus the shared layers.

use axum::routing::get;
use axum::{Json, Router};
use http::HeaderValue;
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::{AppConfig, ServerConfig};

use super::chat::chat_routes;
use super::conversation::conversation_routes;
use super::report::report_routes;
use super::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /health - Liveness probe.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Builds the full router.
///
/// API routes are nested under `/api`; `/health` sits at the root.
pub fn app_router(state: AppState, config: &AppConfig) -> Router {
    let api = Router::new()
        .merge(report_routes(config.upload.max_bytes))
        .merge(chat_routes(config.features.enable_streaming))
        .merge(conversation_routes());

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .with_state(state)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http())
}

/// Any origin unless an allow-list is configured.
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .into_iter()
        .filter_map(|origin| match HeaderValue::from_str(&origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_reports_ok_and_version() {
        let Json(body) = health().await;
        assert_eq!(body.status, "ok");
        assert_eq!(body.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn cors_layer_accepts_configured_origins() {
        let server = ServerConfig {
            cors_origins: Some("http://localhost:3000, https://app.example.com".to_string()),
            ..ServerConfig::default()
        };
        let _layer = cors_layer(&server);
    }

    #[test]
    fn cors_layer_defaults_to_any_origin() {
        let _layer = cors_layer(&ServerConfig::default());
    }
}
