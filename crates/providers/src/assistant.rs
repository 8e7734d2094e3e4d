//! HTTP transport for the SAIA assistant service.
//!
//! One `POST {base}/assistant/chat` per call. The credential goes into the
//! `Authorization` header as-is (no `Bearer` prefix). The body is decoded
//! regardless of status: the service reports business failures with a
//! non-2xx status but a well-formed `{success: false, ...}` body.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use saiachain_config::SaiaConfig;
use saiachain_core::assistant::{
    AssistantExchange, AssistantResponse, AssistantTransport, OutboundRequest,
};
use saiachain_core::error::AssistantError;
use std::time::Duration;
use tracing::{debug, warn};

pub struct HttpAssistantTransport {
    chat_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl HttpAssistantTransport {
    pub fn new(
        chat_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AssistantError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AssistantError::NotConfigured(format!("HTTP client: {e}")))?;

        Ok(Self {
            chat_url: chat_url.into(),
            api_key: api_key.into(),
            client,
        })
    }

    /// The transport described by `config`: endpoint from
    /// `SAIA_API_ASSISTANT`, credential from `SAIA_API_KEY`.
    pub fn from_config(config: &SaiaConfig) -> saiachain_core::Result<Self> {
        let chat_url = config.assistant_chat_url()?;
        let api_key = config.require_api_key()?;
        Self::new(
            chat_url,
            api_key,
            Duration::from_secs(config.http.timeout_secs),
        )
        .map_err(|e| saiachain_core::Error::config(e.to_string()))
    }

    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }
}

#[async_trait]
impl AssistantTransport for HttpAssistantTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn chat(&self, request: &OutboundRequest) -> Result<AssistantExchange, AssistantError> {
        debug!(
            url = %self.chat_url,
            assistant = %request.assistant,
            variables = request.variables.len(),
            "Sending assistant chat request"
        );

        let response = self
            .client
            .post(&self.chat_url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, self.api_key.as_str())
            .json(request)
            .send()
            .await
            .map_err(|e| AssistantError::Network(e.to_string()))?;

        let status_code = response.status().as_u16();
        if status_code != 200 {
            warn!(status = status_code, assistant = %request.assistant, "Assistant service returned non-200 status");
        }

        let body = response
            .text()
            .await
            .map_err(|e| AssistantError::Network(e.to_string()))?;

        let decoded: AssistantResponse =
            serde_json::from_str(&body).map_err(|e| AssistantError::Decode {
                status_code,
                message: e.to_string(),
            })?;

        Ok(AssistantExchange {
            status_code,
            response: decoded,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use saiachain_core::assistant::{AssistantId, ContextVariable};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport(server: &MockServer) -> HttpAssistantTransport {
        HttpAssistantTransport::new(
            format!("{}/assistant/chat", server.uri()),
            "saia-key",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn request() -> OutboundRequest {
        OutboundRequest::user_turn(
            AssistantId::new("ContractComparer"),
            "What changed?",
            vec![ContextVariable {
                key: "document1".into(),
                value: "clause 1".into(),
            }],
        )
    }

    #[tokio::test]
    async fn posts_request_with_raw_authorization() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/assistant/chat"))
            .and(header("Authorization", "saia-key"))
            .and(header("Content-Type", "application/json"))
            .and(body_json(json!({
                "assistant": "ContractComparer",
                "messages": [{"role": "user", "content": "What changed?"}],
                "variables": [{"key": "document1", "value": "clause 1"}],
                "revision": 0
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"success": true, "text": "Nothing."})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let exchange = transport(&server).chat(&request()).await.unwrap();
        assert_eq!(exchange.status_code, 200);
        assert_eq!(exchange.response, AssistantResponse::answer("Nothing."));
    }

    #[tokio::test]
    async fn error_status_with_json_body_is_decoded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"success": false, "error": {"message": "bad assistant"}})),
            )
            .mount(&server)
            .await;

        let exchange = transport(&server).chat(&request()).await.unwrap();
        assert_eq!(exchange.status_code, 400);
        assert_eq!(exchange.response, AssistantResponse::failure("bad assistant"));
    }

    #[tokio::test]
    async fn non_json_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = transport(&server).chat(&request()).await.unwrap_err();
        assert!(matches!(err, AssistantError::Decode { status_code: 500, .. }));
    }

    #[tokio::test]
    async fn unreachable_service_is_network_error() {
        let t = HttpAssistantTransport::new(
            "http://127.0.0.1:9/assistant/chat",
            "k",
            Duration::from_secs(2),
        )
        .unwrap();
        let err = t.chat(&request()).await.unwrap_err();
        assert!(matches!(err, AssistantError::Network(_)));
    }

    #[test]
    fn from_config_builds_chat_url() {
        let config = SaiaConfig {
            api_key: Some("k".into()),
            assistant_api_url: Some("https://assistants.example.com/".into()),
            ..SaiaConfig::default()
        };
        let t = HttpAssistantTransport::from_config(&config).unwrap();
        assert_eq!(t.chat_url(), "https://assistants.example.com/assistant/chat");
    }

    #[test]
    fn from_config_without_endpoint_is_config_error() {
        let config = SaiaConfig {
            api_key: Some("k".into()),
            ..SaiaConfig::default()
        };
        assert!(matches!(
            HttpAssistantTransport::from_config(&config),
            Err(saiachain_core::Error::Config { .. })
        ));
    }
}
