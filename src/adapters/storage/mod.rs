//! In-memory storage adapters.

mod in_memory_conversation_registry;
mod in_memory_document_store;

pub use in_memory_conversation_registry::InMemoryConversationRegistry;
pub use in_memory_document_store::InMemoryDocumentStore;
