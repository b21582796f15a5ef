//! Application layer: routing, handlers, and background availability.

pub mod availability;
pub mod handlers;
pub mod routing;
