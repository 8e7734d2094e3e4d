//! Turn executor: runs one user turn against the selected assistant.
//!
//! Each turn walks a fixed sequence of states:
//!
//! ```text
//! Start → DocumentsNormalized → RequestBuilt → AwaitingResponse → Resolved
//!                                                               ↘ Failed
//! ```
//!
//! Failures never escape a turn. [`TurnExecutor::execute`] reports them as
//! [`TurnOutcome::Failed`]; [`TurnExecutor::run`] collapses them to `""`.

use saiachain_config::ChainMode;
use saiachain_core::assistant::{AssistantId, AssistantReply, AssistantTransport, OutboundRequest};
use saiachain_core::document::DocumentInput;
use saiachain_core::Error;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::chain::ConversationChain;
use crate::documents::normalize_documents;

/// Where a turn currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Start,
    DocumentsNormalized,
    RequestBuilt,
    AwaitingResponse,
    Resolved,
    Failed,
}

/// The result of one turn.
#[derive(Debug)]
pub enum TurnOutcome {
    /// The assistant answered; the text is verbatim.
    Answered(String),
    /// The assistant declined; the text is the service's error message.
    Rejected(String),
    /// The call could not be completed.
    Failed(Error),
}

impl TurnOutcome {
    /// The string handed back to the host.
    pub fn into_reply(self) -> String {
        match self {
            Self::Answered(text) | Self::Rejected(text) => text,
            Self::Failed(_) => String::new(),
        }
    }

    pub fn is_answered(&self) -> bool {
        matches!(self, Self::Answered(_))
    }

    pub fn state(&self) -> TurnState {
        match self {
            Self::Answered(_) | Self::Rejected(_) => TurnState::Resolved,
            Self::Failed(_) => TurnState::Failed,
        }
    }
}

impl From<AssistantReply> for TurnOutcome {
    fn from(reply: AssistantReply) -> Self {
        match reply {
            AssistantReply::Answer(text) => Self::Answered(text),
            AssistantReply::Rejected(message) => Self::Rejected(message),
        }
    }
}

/// Runs turns for one assembled chain.
pub struct TurnExecutor {
    chain: ConversationChain,
    transport: Arc<dyn AssistantTransport>,
    mode: ChainMode,
}

impl TurnExecutor {
    pub fn new(chain: ConversationChain, transport: Arc<dyn AssistantTransport>) -> Self {
        Self {
            chain,
            transport,
            mode: ChainMode::Remote,
        }
    }

    pub fn with_mode(mut self, mode: ChainMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn chain(&self) -> &ConversationChain {
        &self.chain
    }

    pub fn mode(&self) -> ChainMode {
        self.mode
    }

    /// Build the outbound request for one turn.
    pub fn build_request(
        assistant: &AssistantId,
        input: &str,
        documents: &[DocumentInput],
    ) -> OutboundRequest {
        let variables = normalize_documents(documents);
        trace_state(TurnState::DocumentsNormalized);
        debug!(variables = variables.len(), "Documents normalized");

        OutboundRequest::user_turn(assistant.clone(), input, variables)
    }

    /// Execute one turn and return its tagged outcome.
    pub async fn execute(
        &self,
        assistant: &AssistantId,
        input: &str,
        documents: &[DocumentInput],
    ) -> TurnOutcome {
        trace_state(TurnState::Start);

        let outcome = match self.mode {
            ChainMode::Remote => self.execute_remote(assistant, input, documents).await,
            ChainMode::Local => self.execute_local(input).await,
        };

        trace_state(outcome.state());
        outcome
    }

    /// Execute one turn and return the host-facing string.
    pub async fn run(
        &self,
        assistant: &AssistantId,
        input: &str,
        documents: &[DocumentInput],
    ) -> String {
        self.execute(assistant, input, documents).await.into_reply()
    }

    async fn execute_remote(
        &self,
        assistant: &AssistantId,
        input: &str,
        documents: &[DocumentInput],
    ) -> TurnOutcome {
        let request = Self::build_request(assistant, input, documents);
        trace_state(TurnState::RequestBuilt);

        if self.chain.is_verbose() {
            match serde_json::to_string(&request) {
                Ok(body) => debug!(body = %body, "Outbound assistant request"),
                Err(e) => debug!(error = %e, "Outbound request not serializable"),
            }
        }

        trace_state(TurnState::AwaitingResponse);
        let exchange = match self.transport.chat(&request).await {
            Ok(exchange) => exchange,
            Err(e) => {
                error!(transport = self.transport.name(), error = %e, "Assistant call failed");
                return TurnOutcome::Failed(e.into());
            }
        };

        let outcome = match exchange.response.into_reply(exchange.status_code) {
            Ok(reply) => TurnOutcome::from(reply),
            Err(e) => {
                error!(status = exchange.status_code, error = %e, "Assistant response unreadable");
                return TurnOutcome::Failed(e.into());
            }
        };

        if let TurnOutcome::Answered(text) = &outcome {
            if let Err(e) = self.chain.record_turn(input, text).await {
                warn!(error = %e, "Failed to record turn in memory");
            }
        }

        outcome
    }

    async fn execute_local(&self, input: &str) -> TurnOutcome {
        trace_state(TurnState::AwaitingResponse);
        match self.chain.predict(input).await {
            Ok(text) => TurnOutcome::Answered(text),
            Err(e) => {
                error!(model = self.chain.model().name(), error = %e, "Local chain failed");
                TurnOutcome::Failed(e)
            }
        }
    }
}

fn trace_state(state: TurnState) {
    debug!(state = ?state, "Turn state");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::ChainAssembler;
    use crate::test_helpers::{FailingTransport, ScriptedModel, ScriptedTransport};
    use saiachain_core::assistant::AssistantResponse;
    use saiachain_core::document::SupportingDocument;
    use saiachain_core::error::AssistantError;
    use saiachain_core::memory::ConversationMemory;
    use saiachain_memory::BufferMemory;

    fn executor(
        transport: Arc<dyn AssistantTransport>,
        memory: Arc<BufferMemory>,
    ) -> TurnExecutor {
        let chain = ChainAssembler::bind(
            Arc::new(ScriptedModel::text("local reply")),
            memory,
            None,
            false,
        );
        TurnExecutor::new(chain, transport)
    }

    fn assistant() -> AssistantId {
        AssistantId::new("ContractComparer")
    }

    #[tokio::test]
    async fn success_returns_text_verbatim() {
        let transport = Arc::new(ScriptedTransport::new(200, AssistantResponse::answer("hello")));
        let memory = Arc::new(BufferMemory::new());
        let exec = executor(transport, memory.clone());

        let reply = exec.run(&assistant(), "hi", &[]).await;
        assert_eq!(reply, "hello");

        let history = memory.load_history().await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "hi");
        assert_eq!(history[1].content, "hello");
    }

    #[tokio::test]
    async fn business_failure_returns_error_message() {
        let transport = Arc::new(ScriptedTransport::new(
            200,
            AssistantResponse::failure("bad assistant"),
        ));
        let memory = Arc::new(BufferMemory::new());
        let exec = executor(transport, memory.clone());

        let outcome = exec.execute(&assistant(), "hi", &[]).await;
        assert!(matches!(&outcome, TurnOutcome::Rejected(m) if m == "bad assistant"));
        assert_eq!(outcome.into_reply(), "bad assistant");
        assert!(memory.is_empty().await);
    }

    #[tokio::test]
    async fn transport_failure_returns_empty_string() {
        let transport = Arc::new(FailingTransport(AssistantError::Network(
            "connection refused".into(),
        )));
        let exec = executor(transport, Arc::new(BufferMemory::new()));

        let outcome = exec.execute(&assistant(), "hi", &[]).await;
        assert_eq!(outcome.state(), TurnState::Failed);
        assert!(matches!(outcome, TurnOutcome::Failed(Error::Assistant(_))));

        assert_eq!(exec.run(&assistant(), "hi", &[]).await, "");
    }

    #[tokio::test]
    async fn non_200_with_readable_body_resolves() {
        let transport = Arc::new(ScriptedTransport::new(
            400,
            AssistantResponse::failure("assistant not found"),
        ));
        let exec = executor(transport, Arc::new(BufferMemory::new()));
        assert_eq!(exec.run(&assistant(), "hi", &[]).await, "assistant not found");
    }

    #[tokio::test]
    async fn success_without_text_fails() {
        let transport = Arc::new(ScriptedTransport::new(
            200,
            AssistantResponse {
                success: true,
                text: None,
                error: None,
            },
        ));
        let exec = executor(transport, Arc::new(BufferMemory::new()));
        assert_eq!(exec.run(&assistant(), "hi", &[]).await, "");
    }

    #[tokio::test]
    async fn request_carries_normalized_documents() {
        let transport = Arc::new(ScriptedTransport::new(200, AssistantResponse::answer("ok")));
        let exec = executor(transport.clone(), Arc::new(BufferMemory::new()));

        let documents = vec![
            SupportingDocument::new("a{b}c").into(),
            DocumentInput::null(),
            SupportingDocument::new("").into(),
            SupportingDocument::new("d").into(),
        ];
        exec.run(&assistant(), "compare", &documents).await;

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.assistant.as_str(), "ContractComparer");
        assert_eq!(sent.revision, 0);
        assert_eq!(sent.messages.len(), 1);
        assert_eq!(sent.messages[0].content, "compare");
        assert_eq!(sent.variables.len(), 2);
        assert_eq!(sent.variables[0].key, "document1");
        assert_eq!(sent.variables[0].value, "abc");
        assert_eq!(sent.variables[1].key, "document2");
        assert_eq!(sent.variables[1].value, "d");
    }

    #[tokio::test]
    async fn local_mode_uses_chat_model() {
        let transport = Arc::new(ScriptedTransport::new(200, AssistantResponse::answer("remote")));
        let memory = Arc::new(BufferMemory::new());
        let exec = executor(transport.clone(), memory.clone()).with_mode(ChainMode::Local);

        let reply = exec.run(&assistant(), "hi", &[]).await;
        assert_eq!(reply, "local reply");
        assert!(transport.last_request().is_none());
        assert_eq!(memory.len().await, 2);
    }

    #[tokio::test]
    async fn local_mode_model_failure_is_empty() {
        let chain = ChainAssembler::bind(
            Arc::new(ScriptedModel::failing()),
            Arc::new(BufferMemory::new()),
            None,
            false,
        );
        let transport = Arc::new(ScriptedTransport::new(200, AssistantResponse::answer("remote")));
        let exec = TurnExecutor::new(chain, transport).with_mode(ChainMode::Local);

        let outcome = exec.execute(&assistant(), "hi", &[]).await;
        assert!(matches!(outcome, TurnOutcome::Failed(Error::Model(_))));
    }
}
