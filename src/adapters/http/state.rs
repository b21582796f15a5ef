//! Shared state for every HTTP handler.

use std::fmt::Display;
use std::sync::Arc;

use crate::application::availability::ReportWatcher;
use crate::application::handlers::{
    AnswerQueryHandler, ChatTurnHandler, ReportLookupHandler, UploadReportHandler,
};
use crate::config::FeatureFlags;
use crate::ports::ConversationRegistry;

use super::error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub lookup: Arc<ReportLookupHandler>,
    pub uploads: Arc<UploadReportHandler>,
    pub answers: Arc<AnswerQueryHandler>,
    pub turns: Arc<ChatTurnHandler>,
    pub conversations: Arc<dyn ConversationRegistry>,
    pub watcher: Arc<ReportWatcher>,
    pub features: FeatureFlags,
}

impl AppState {
    /// Upstream failure, with details only when verbose errors are on.
    pub fn upstream(&self, err: impl Display) -> ApiError {
        tracing::warn!(error = %err, "Upstream failure");
        ApiError::Upstream {
            details: self.features.verbose_errors.then(|| err.to_string()),
        }
    }
}
