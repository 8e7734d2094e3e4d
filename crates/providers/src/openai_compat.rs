//! OpenAI-compatible chat model, pointed at the SAIA model proxy.
//!
//! Supports:
//! - Chat completions, non-streaming and streamed (SSE)
//! - Aggregation of streamed deltas into one reply; callers never see
//!   partial tokens

use async_trait::async_trait;
use futures::StreamExt;
use saiachain_config::SaiaConfig;
use saiachain_core::error::ModelError;
use saiachain_core::message::{Message, Role};
use saiachain_core::model::{ChatCompletion, ChatModel, ChatModelSettings};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// A chat-completion client for any `/chat/completions` endpoint.
pub struct OpenAiChatModel {
    name: String,
    base_url: String,
    api_key: String,
    settings: ChatModelSettings,
    client: reqwest::Client,
}

impl OpenAiChatModel {
    /// Create a new client. Fails only if the HTTP client cannot be built.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        settings: ChatModelSettings,
        timeout: Duration,
    ) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ModelError::NotConfigured(format!("HTTP client: {e}")))?;

        Ok(Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            settings,
            client,
        })
    }

    /// The SAIA proxy client described by `config`.
    ///
    /// Missing credentials surface as a configuration error.
    pub fn saia_proxy(config: &SaiaConfig) -> saiachain_core::Result<Self> {
        let api_key = config.require_api_key()?;
        Self::new(
            "saia-proxy",
            &config.proxy_uri,
            api_key,
            config.model.settings(),
            Duration::from_secs(config.http.timeout_secs),
        )
        .map_err(|e| saiachain_core::Error::config(e.to_string()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Convert our Message types to OpenAI API format.
    fn to_api_messages(messages: &[Message]) -> Vec<ApiMessage> {
        messages
            .iter()
            .map(|m| ApiMessage {
                role: m.role.as_str().into(),
                content: m.content.clone(),
            })
            .collect()
    }

    fn request_body(&self, messages: &[Message]) -> serde_json::Value {
        serde_json::json!({
            "model": self.settings.model_name,
            "messages": Self::to_api_messages(messages),
            "temperature": self.settings.temperature,
            "stream": self.settings.streaming,
        })
    }

    async fn send(&self, messages: &[Message]) -> Result<reqwest::Response, ModelError> {
        let url = format!("{}/chat/completions", self.base_url);

        debug!(
            model_client = %self.name,
            model = %self.settings.model_name,
            streaming = self.settings.streaming,
            messages = messages.len(),
            "Sending completion request"
        );

        let mut builder = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json");
        if self.settings.streaming {
            builder = builder.header("Accept", "text/event-stream");
        }

        let response = builder
            .json(&self.request_body(messages))
            .send()
            .await
            .map_err(|e| ModelError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(ModelError::RateLimited {
                retry_after_secs: 5,
            });
        }

        if status == 401 || status == 403 {
            return Err(ModelError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Model proxy returned error");
            return Err(ModelError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        Ok(response)
    }

    async fn read_completion(
        &self,
        response: reqwest::Response,
    ) -> Result<ChatCompletion, ModelError> {
        let api_response: ApiResponse =
            response.json().await.map_err(|e| ModelError::ApiError {
                status_code: 200,
                message: format!("Failed to parse response: {e}"),
            })?;

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::ApiError {
                status_code: 200,
                message: "No choices in response".into(),
            })?;

        Ok(ChatCompletion {
            message: Message::assistant(choice.message.content.unwrap_or_default()),
            model: api_response.model,
        })
    }

    async fn read_stream(&self, response: reqwest::Response) -> Result<ChatCompletion, ModelError> {
        let mut byte_stream = response.bytes_stream();
        let mut acc = SseAccumulator::default();

        while let Some(chunk) = byte_stream.next().await {
            let bytes = chunk.map_err(|e| ModelError::StreamInterrupted(e.to_string()))?;
            acc.push(&bytes);
            if acc.done {
                break;
            }
        }
        acc.finish();

        trace!(model_client = %self.name, chars = acc.content.len(), "Stream aggregated");

        Ok(ChatCompletion {
            message: Message::assistant(acc.content),
            model: acc.model.unwrap_or_else(|| self.settings.model_name.clone()),
        })
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn settings(&self) -> &ChatModelSettings {
        &self.settings
    }

    async fn complete(&self, messages: &[Message]) -> Result<ChatCompletion, ModelError> {
        let response = self.send(messages).await?;
        if self.settings.streaming {
            self.read_stream(response).await
        } else {
            self.read_completion(response).await
        }
    }
}

/// Collects `data:` lines of a chat-completion SSE stream into one reply.
///
/// Bytes are buffered until a full line arrives, so a multi-byte character
/// split across network chunks is decoded intact.
#[derive(Debug, Default)]
struct SseAccumulator {
    buffer: Vec<u8>,
    content: String,
    model: Option<String>,
    done: bool,
}

impl SseAccumulator {
    /// Feed raw bytes; complete lines are consumed, a partial tail is kept.
    fn push(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);

        while let Some(line_end) = self.buffer.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=line_end).collect();
            let line = String::from_utf8_lossy(&raw[..line_end]);
            self.line(line.trim_end_matches('\r'));
            if self.done {
                return;
            }
        }
    }

    /// Flush a trailing line that arrived without a newline.
    fn finish(&mut self) {
        if !self.done && !self.buffer.is_empty() {
            let raw = std::mem::take(&mut self.buffer);
            let line = String::from_utf8_lossy(&raw);
            self.line(line.trim_end_matches('\r'));
        }
    }

    fn line(&mut self, line: &str) {
        // Skip empty lines and SSE comments
        if line.is_empty() || line.starts_with(':') {
            return;
        }

        let Some(data) = line.strip_prefix("data:") else {
            return;
        };
        let data = data.trim();

        if data == "[DONE]" {
            self.done = true;
            return;
        }

        match serde_json::from_str::<StreamResponse>(data) {
            Ok(chunk) => {
                if self.model.is_none() {
                    self.model = chunk.model;
                }
                if let Some(delta) = chunk.choices.into_iter().next().and_then(|c| c.delta.content)
                {
                    self.content.push_str(&delta);
                }
            }
            Err(e) => {
                trace!(data = %data, error = %e, "Ignoring unparseable SSE chunk");
            }
        }
    }
}

// --- OpenAI API types (internal) ---

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    model: String,
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ApiReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

/// A single SSE `data: {...}` chunk from a streaming response.
#[derive(Debug, Deserialize)]
struct StreamResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}
