//! Adapters - Implementations of port interfaces.
//!
//! - `ai` - OpenAI and mock providers, function-calling report generator
//! - `backend` - HTTP clients for the ingestion backend
//! - `http` - Axum REST and SSE surface
//! - `storage` - in-memory document store and conversation registry
//! - `validation` - JSON Schema validation of reports

pub mod ai;
pub mod backend;
pub mod http;
pub mod storage;
pub mod validation;
