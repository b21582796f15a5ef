//! HTTP adapter for report lookup and upload.

mod dto;
mod handlers;
mod routes;

pub(crate) use handlers::parse_report_id;
pub use routes::report_routes;
