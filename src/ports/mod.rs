//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## AI
//!
//! - `AIProvider` - chat completions with function calling
//! - `ReportGenerator` - schema-constrained generation over a report
//! - `ReportSchemaValidator` - report schema validation
//!
//! ## Collaborators
//!
//! - `DocumentStore` - keyed in-process report storage
//! - `ReportSource` - report fetch from the ingestion backend
//! - `UploadService` - file upload to the ingestion backend
//! - `EscalationService` - retrieval-augmented answers
//! - `ConversationRegistry` - live chat sessions

mod ai_provider;
mod collaborator;
mod conversation_registry;
mod document_store;
mod escalation_service;
mod report_generator;
mod report_source;
mod schema_validator;
mod upload_service;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, FunctionCall,
    FunctionDefinition, Message, MessageRole, RequestMetadata, TokenUsage,
};
pub use collaborator::CollaboratorError;
pub use conversation_registry::{ConversationRegistry, SessionHandle};
pub use document_store::DocumentStore;
pub use escalation_service::EscalationService;
pub use report_generator::{GeneratorError, ReportGenerator};
pub use report_source::{ReportAvailability, ReportSource};
pub use schema_validator::{ReportSchemaValidator, SchemaValidationError};
pub use upload_service::{UploadReceipt, UploadService, UploadedFile};
