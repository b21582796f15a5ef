//! Domain layer: pure types and rules, no I/O.

pub mod availability;
pub mod conversation;
pub mod foundation;
pub mod report;
pub mod routing;
