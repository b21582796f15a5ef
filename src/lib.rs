//! Report Assistant - conversational help over structured property reports
//!
//! A user opens a report and asks questions in a chat panel. Each question
//! is either answered directly, turned into an edit of the report, or
//! escalated to a retrieval backend for a grounded answer.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
