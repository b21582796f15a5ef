//! Axum routes for report endpoints.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::adapters::http::state::AppState;

use super::handlers::{get_report, upload_report};

/// Multipart framing allowance on top of the file size limit.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Creates routes for report endpoints.
///
/// - GET /report/:id - Fetch a report (200/202/404/410)
/// - POST /upload - Upload a PDF
pub fn report_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new().route("/report/:id", get(get_report)).route(
        "/upload",
        post(upload_report).layer(DefaultBodyLimit::max(
            max_upload_bytes.saturating_add(MULTIPART_OVERHEAD),
        )),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_routes_creates_valid_router() {
        let _routes = report_routes(10 * 1024 * 1024);
    }
}
