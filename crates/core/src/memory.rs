//! Conversation memory trait.
//!
//! The host owns the memory object. The chain only reads its history-slot
//! name, loads history when rendering a prompt, and records finished turns.
//! Concurrency discipline is the implementation's business.

use async_trait::async_trait;

use crate::error::MemoryError;
use crate::message::Message;

/// Slot name used when a memory does not declare one.
pub const DEFAULT_MEMORY_KEY: &str = "chat_history";

#[async_trait]
pub trait ConversationMemory: Send + Sync {
    /// The backend name (e.g. "buffer", "none").
    fn name(&self) -> &str;

    /// The template placeholder this memory's history is injected under,
    /// if the memory declares one.
    fn memory_key(&self) -> Option<&str>;

    /// Prior turns, oldest first.
    async fn load_history(&self) -> Result<Vec<Message>, MemoryError>;

    /// Record one completed turn.
    async fn save_turn(&self, input: &str, output: &str) -> Result<(), MemoryError>;

    /// Forget everything.
    async fn clear(&self) -> Result<(), MemoryError>;
}

/// The history-slot name of `memory`, falling back to [`DEFAULT_MEMORY_KEY`].
pub fn history_slot(memory: &dyn ConversationMemory) -> &str {
    memory.memory_key().unwrap_or(DEFAULT_MEMORY_KEY)
}
