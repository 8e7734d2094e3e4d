//! The conversation chain: model client + memory + prompt, bound together.

use saiachain_core::memory::ConversationMemory;
use saiachain_core::message::Message;
use saiachain_core::model::ChatModel;
use saiachain_core::Result;
use std::sync::Arc;
use tracing::{debug, info};

use crate::prompt::PromptTemplate;

/// A reusable chain descriptor produced by the assembler.
///
/// Cheap to clone; the model and memory are shared.
#[derive(Clone)]
pub struct ConversationChain {
    model: Arc<dyn ChatModel>,
    memory: Arc<dyn ConversationMemory>,
    prompt: PromptTemplate,
    verbose: bool,
}

impl ConversationChain {
    pub(crate) fn new(
        model: Arc<dyn ChatModel>,
        memory: Arc<dyn ConversationMemory>,
        prompt: PromptTemplate,
        verbose: bool,
    ) -> Self {
        Self {
            model,
            memory,
            prompt,
            verbose,
        }
    }

    pub fn prompt(&self) -> &PromptTemplate {
        &self.prompt
    }

    pub fn model(&self) -> &Arc<dyn ChatModel> {
        &self.model
    }

    pub fn memory(&self) -> &Arc<dyn ConversationMemory> {
        &self.memory
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Render the prompt for `input` over the memory's current history.
    pub async fn format_messages(&self, input: &str) -> Result<Vec<Message>> {
        let history = self.memory.load_history().await?;
        Ok(self.prompt.format_messages(&history, input))
    }

    /// Answer `input` with the bound chat model and record the turn.
    pub async fn predict(&self, input: &str) -> Result<String> {
        let messages = self.format_messages(input).await?;

        if self.verbose {
            for message in &messages {
                info!(role = message.role.as_str(), content = %message.content, "Chain prompt");
            }
        }

        let completion = self.model.complete(&messages).await?;
        let reply = completion.message.content;

        debug!(model = %completion.model, chars = reply.len(), "Chain prediction complete");

        self.record_turn(input, &reply).await?;
        Ok(reply)
    }

    /// Store a finished turn in the bound memory.
    pub async fn record_turn(&self, input: &str, output: &str) -> Result<()> {
        self.memory.save_turn(input, output).await?;
        Ok(())
    }
}

impl std::fmt::Debug for ConversationChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationChain")
            .field("model", &self.model.name())
            .field("memory", &self.memory.name())
            .field("prompt", &self.prompt)
            .field("verbose", &self.verbose)
            .finish()
    }
}
