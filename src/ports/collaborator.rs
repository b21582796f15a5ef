//! Errors shared by every external collaborator port.

use thiserror::Error;

/// Failure talking to an external collaborator (store, backend, retrieval).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    #[error("{service} unavailable: {message}")]
    Unavailable { service: String, message: String },

    #[error("{service} returned an invalid response: {message}")]
    InvalidResponse { service: String, message: String },

    #[error("{service} has no {what}")]
    NotFound { service: String, what: String },
}

impl CollaboratorError {
    pub fn unavailable(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unavailable {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn invalid_response(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn not_found(service: impl Into<String>, what: impl Into<String>) -> Self {
        Self::NotFound {
            service: service.into(),
            what: what.into(),
        }
    }

    /// Stable snake_case label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CollaboratorError::Unavailable { .. } => "collaborator_unavailable",
            CollaboratorError::InvalidResponse { .. } => "collaborator_invalid_response",
            CollaboratorError::NotFound { .. } => "collaborator_not_found",
        }
    }
}
