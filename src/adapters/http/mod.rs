//! HTTP adapters - REST and SSE endpoints.
//!
//! Each surface has its own module with DTOs, handlers and routes;
//! `app_router` stitches them together.

pub mod chat;
pub mod conversation;
mod error;
pub mod report;
mod router;
mod state;

pub use error::{ApiError, ErrorResponse};
pub use router::{app_router, health, HealthResponse};
pub use state::AppState;
