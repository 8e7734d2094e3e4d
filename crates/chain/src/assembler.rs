//! Chain assembly: binds a chat model, a memory and the conversation
//! prompt into a `ConversationChain`.
//!
//! Assembly performs no network I/O and is idempotent for a given
//! configuration. The only failure is an unresolvable model client
//! (missing credential, unusable endpoint), reported as `Error::Config`.

use saiachain_config::SaiaConfig;
use saiachain_core::memory::{ConversationMemory, history_slot};
use saiachain_core::model::ChatModel;
use saiachain_core::Result;
use saiachain_providers::OpenAiChatModel;
use std::sync::Arc;
use tracing::debug;

use crate::chain::ConversationChain;
use crate::prompt::PromptTemplate;

/// Builds conversation chains from one resolved configuration.
pub struct ChainAssembler {
    config: SaiaConfig,
}

impl ChainAssembler {
    pub fn new(config: SaiaConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SaiaConfig {
        &self.config
    }

    /// Assemble a chain over the SAIA model proxy.
    pub fn assemble(
        &self,
        memory: Arc<dyn ConversationMemory>,
        system_override: Option<&str>,
    ) -> Result<ConversationChain> {
        let model = OpenAiChatModel::saia_proxy(&self.config)?;
        Ok(Self::bind(
            Arc::new(model),
            memory,
            system_override,
            self.config.debug,
        ))
    }

    /// Bind an already-constructed model client.
    pub fn bind(
        model: Arc<dyn ChatModel>,
        memory: Arc<dyn ConversationMemory>,
        system_override: Option<&str>,
        verbose: bool,
    ) -> ConversationChain {
        let prompt = PromptTemplate::conversation(system_override, history_slot(memory.as_ref()));

        debug!(
            model_client = model.name(),
            memory = memory.name(),
            memory_key = prompt.memory_key().unwrap_or_default(),
            has_override = system_override.is_some_and(|s| !s.is_empty()),
            "Chain assembled"
        );

        ConversationChain::new(model, memory, prompt, verbose)
    }
}
