//! The node facade a host engine drives.
//!
//! `init` runs once per configuration (assembly, transport setup); `run`
//! runs once per user message and always yields a string.

use async_trait::async_trait;
use saiachain_config::{ChainMode, SaiaConfig};
use saiachain_core::assistant::{
    AssistantExchange, AssistantId, AssistantTransport, OutboundRequest,
};
use saiachain_core::catalog::{AssistantCatalog, AssistantOption};
use saiachain_core::document::DocumentInput;
use saiachain_core::error::AssistantError;
use saiachain_core::memory::ConversationMemory;
use saiachain_core::{Error, Result};
use saiachain_providers::{HttpAssistantTransport, StaticCatalog};
use std::sync::Arc;
use tracing::{info, warn};

use crate::assembler::ChainAssembler;
use crate::chain::ConversationChain;
use crate::executor::{TurnExecutor, TurnOutcome};

/// What the host wires into the node.
pub struct NodeInputs {
    /// Selected assistant. Falls back to `chain.assistant` from config.
    pub assistant: Option<AssistantId>,
    pub memory: Arc<dyn ConversationMemory>,
    pub documents: Vec<DocumentInput>,
    /// Prefix for the default system instructions.
    pub system_message: Option<String>,
}

impl NodeInputs {
    pub fn new(memory: Arc<dyn ConversationMemory>) -> Self {
        Self {
            assistant: None,
            memory,
            documents: Vec::new(),
            system_message: None,
        }
    }

    pub fn with_assistant(mut self, assistant: impl Into<AssistantId>) -> Self {
        self.assistant = Some(assistant.into());
        self
    }

    pub fn with_documents(mut self, documents: Vec<DocumentInput>) -> Self {
        self.documents = documents;
        self
    }

    pub fn with_system_message(mut self, message: impl Into<String>) -> Self {
        self.system_message = Some(message.into());
        self
    }
}

/// A configured chain node.
pub struct SaiaChainNode {
    assistant: AssistantId,
    documents: Vec<DocumentInput>,
    executor: TurnExecutor,
}

impl SaiaChainNode {
    /// Assemble the chain and connect the assistant transport.
    pub fn init(config: &SaiaConfig, inputs: NodeInputs) -> Result<Self> {
        let assistant = inputs
            .assistant
            .or_else(|| config.chain.assistant.as_deref().map(AssistantId::from))
            .ok_or_else(|| Error::config("no assistant selected"))?;

        let system_message = inputs
            .system_message
            .as_deref()
            .or(config.chain.system_message.as_deref());

        let chain = ChainAssembler::new(config.clone()).assemble(inputs.memory, system_message)?;

        let mode = config.chain.mode;
        let transport: Arc<dyn AssistantTransport> = match mode {
            ChainMode::Remote => Arc::new(HttpAssistantTransport::from_config(config)?),
            ChainMode::Local => match HttpAssistantTransport::from_config(config) {
                Ok(transport) => Arc::new(transport),
                Err(e) => Arc::new(DetachedTransport(e.to_string())),
            },
        };

        info!(
            assistant = %assistant,
            mode = ?mode,
            documents = inputs.documents.len(),
            "Chain node initialized"
        );

        Ok(Self {
            assistant,
            documents: inputs.documents,
            executor: TurnExecutor::new(chain, transport).with_mode(mode),
        })
    }

    /// Replace the assistant transport.
    pub fn with_transport(self, transport: Arc<dyn AssistantTransport>) -> Self {
        let mode = self.executor.mode();
        let chain = self.executor.chain().clone();
        Self {
            executor: TurnExecutor::new(chain, transport).with_mode(mode),
            ..self
        }
    }

    pub fn assistant(&self) -> &AssistantId {
        &self.assistant
    }

    pub fn chain(&self) -> &ConversationChain {
        self.executor.chain()
    }

    pub fn mode(&self) -> ChainMode {
        self.executor.mode()
    }

    /// One turn, structured.
    pub async fn execute(&self, input: &str) -> TurnOutcome {
        self.executor
            .execute(&self.assistant, input, &self.documents)
            .await
    }

    /// One turn, as the host string.
    pub async fn run(&self, input: &str) -> String {
        self.execute(input).await.into_reply()
    }

    /// Options for the host's assistant picker. Never fails; a broken
    /// catalog yields the static `ContractComparer` option.
    pub async fn load_assistants(catalog: &dyn AssistantCatalog) -> Vec<AssistantOption> {
        match catalog.list().await {
            Ok(options) => options,
            Err(e) => {
                warn!(
                    catalog = catalog.name(),
                    error = %e,
                    "Assistant listing unavailable, offering static option"
                );
                StaticCatalog::contract_comparer().options().to_vec()
            }
        }
    }
}

/// Stands in for the assistant service when local mode runs without one.
struct DetachedTransport(String);

#[async_trait]
impl AssistantTransport for DetachedTransport {
    fn name(&self) -> &str {
        "detached"
    }

    async fn chat(
        &self,
        _request: &OutboundRequest,
    ) -> std::result::Result<AssistantExchange, AssistantError> {
        Err(AssistantError::NotConfigured(self.0.clone()))
    }
}
