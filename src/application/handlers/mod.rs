//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations over the
//! ports.

pub mod chat;
mod documents;
pub mod report;

pub use chat::{
    AnswerQueryCommand, AnswerQueryError, AnswerQueryHandler, AnswerQueryResult, ChatTurnCommand,
    ChatTurnHandler, RoutedQuery, TurnOutcome,
};
pub use report::{
    ReportLookup, ReportLookupError, ReportLookupHandler, UploadReportError, UploadReportHandler,
    UploadReportResult, UploadStatus,
};
