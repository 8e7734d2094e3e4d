//! # SAIA Chain Core
//!
//! Domain types, traits, and error definitions for the SAIA conversational
//! chain. This crate has **no HTTP or runtime dependencies**: it defines the
//! domain model that the other crates implement against.
//!
//! Every collaborator (assistant transport, catalog, chat model, memory) is a
//! trait here. Implementations live in their respective crates.

pub mod assistant;
pub mod catalog;
pub mod document;
pub mod error;
pub mod memory;
pub mod message;
pub mod model;

// Re-export key types at crate root for ergonomics
pub use assistant::{
    AssistantExchange, AssistantId, AssistantReply, AssistantResponse, AssistantTransport,
    ContextVariable, OutboundRequest,
};
pub use catalog::{AssistantCatalog, AssistantOption};
pub use document::{DocumentInput, SupportingDocument};
pub use error::{Error, Result};
pub use memory::{ConversationMemory, DEFAULT_MEMORY_KEY};
pub use message::{Message, Role};
pub use model::{ChatCompletion, ChatModel, ChatModelSettings};
