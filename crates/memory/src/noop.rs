//! No-op memory: the chain runs without any conversation history.

use async_trait::async_trait;
use saiachain_core::error::MemoryError;
use saiachain_core::memory::ConversationMemory;
use saiachain_core::message::Message;

/// A memory that remembers nothing. It declares no slot name, so prompts
/// built over it use the default `chat_history` placeholder.
pub struct NoopMemory;

#[async_trait]
impl ConversationMemory for NoopMemory {
    fn name(&self) -> &str {
        "none"
    }

    fn memory_key(&self) -> Option<&str> {
        None
    }

    async fn load_history(&self) -> Result<Vec<Message>, MemoryError> {
        Ok(Vec::new())
    }

    async fn save_turn(&self, _input: &str, _output: &str) -> Result<(), MemoryError> {
        Ok(())
    }

    async fn clear(&self) -> Result<(), MemoryError> {
        Ok(())
    }
}
