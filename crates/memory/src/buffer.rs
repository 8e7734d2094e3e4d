//! Buffer memory: keeps every turn in process memory.

use async_trait::async_trait;
use saiachain_core::error::MemoryError;
use saiachain_core::memory::ConversationMemory;
use saiachain_core::message::Message;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// An in-process conversation buffer.
///
/// Clones share the same underlying history, so one buffer can be handed to
/// several chains. An optional window limits how many of the most recent
/// turns `load_history` returns; everything is still kept.
#[derive(Clone)]
pub struct BufferMemory {
    memory_key: Option<String>,
    window_turns: Option<usize>,
    messages: Arc<RwLock<Vec<Message>>>,
}

impl BufferMemory {
    pub fn new() -> Self {
        Self {
            memory_key: None,
            window_turns: None,
            messages: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Declare the history-slot name prompts should use for this memory.
    pub fn with_memory_key(mut self, key: impl Into<String>) -> Self {
        self.memory_key = Some(key.into());
        self
    }

    /// Only expose the last `turns` user/assistant pairs.
    pub fn with_window(mut self, turns: usize) -> Self {
        self.window_turns = Some(turns);
        self
    }

    /// Seed the buffer with existing messages.
    pub async fn extend(&self, messages: impl IntoIterator<Item = Message>) {
        self.messages.write().await.extend(messages);
    }

    /// Number of stored messages.
    pub async fn len(&self) -> usize {
        self.messages.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.messages.read().await.is_empty()
    }
}

impl Default for BufferMemory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationMemory for BufferMemory {
    fn name(&self) -> &str {
        "buffer"
    }

    fn memory_key(&self) -> Option<&str> {
        self.memory_key.as_deref()
    }

    async fn load_history(&self) -> Result<Vec<Message>, MemoryError> {
        let messages = self.messages.read().await;
        let skip = match self.window_turns {
            Some(turns) => messages.len().saturating_sub(turns * 2),
            None => 0,
        };
        Ok(messages[skip..].to_vec())
    }

    async fn save_turn(&self, input: &str, output: &str) -> Result<(), MemoryError> {
        let mut messages = self.messages.write().await;
        messages.push(Message::user(input));
        messages.push(Message::assistant(output));
        debug!(stored = messages.len(), "Buffer memory: turn saved");
        Ok(())
    }

    async fn clear(&self) -> Result<(), MemoryError> {
        self.messages.write().await.clear();
        Ok(())
    }
}
