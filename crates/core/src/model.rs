//! Chat model trait: the abstraction over the locally-held LLM client.
//!
//! The chain binds one of these at assembly time. In the default (remote)
//! mode it is never called; local mode sends the rendered prompt through it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::message::Message;

/// Construction parameters for a chat-completion client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatModelSettings {
    /// The model to use (e.g. "gpt-3.5-turbo-16k")
    pub model_name: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Whether to request a streamed completion
    pub streaming: bool,
}

impl Default for ChatModelSettings {
    fn default() -> Self {
        Self {
            model_name: "gpt-3.5-turbo-16k".into(),
            temperature: 0.5,
            streaming: true,
        }
    }
}

/// A complete (aggregated) response from the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletion {
    /// The generated message
    pub message: Message,

    /// Which model actually responded
    pub model: String,
}

/// The core chat model trait.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// A human-readable name for this client (e.g. "saia-proxy").
    fn name(&self) -> &str;

    /// The settings this client was built with.
    fn settings(&self) -> &ChatModelSettings;

    /// Send the rendered messages and return the full reply.
    async fn complete(&self, messages: &[Message]) -> Result<ChatCompletion, ModelError>;
}
