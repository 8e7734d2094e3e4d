//! Assistant service contract: the wire types of `POST /assistant/chat`
//! and the transport trait that carries them.
//!
//! Request body:
//!
//! ```json
//! { "assistant": "...", "messages": [{"role": "user", "content": "..."}],
//!   "variables": [{"key": "document1", "value": "..."}], "revision": 0 }
//! ```
//!
//! Response body is either `{"success": true, "text": "..."}` or
//! `{"success": false, "error": {"message": "..."}}`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AssistantError;
use crate::message::Role;

/// Protocol version marker sent with every request. Never incremented here.
pub const REQUEST_REVISION: u32 = 0;

/// Identifier of the remote assistant persona to address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssistantId(pub String);

impl AssistantId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AssistantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AssistantId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A named text fragment made available to the assistant alongside the
/// user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextVariable {
    pub key: String,
    pub value: String,
}

/// A message inside the outbound request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub role: Role,
    pub content: String,
}

/// The body of one `assistant/chat` call. Built fresh for every turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundRequest {
    pub assistant: AssistantId,
    pub messages: Vec<OutboundMessage>,
    pub variables: Vec<ContextVariable>,
    pub revision: u32,
}

impl OutboundRequest {
    /// A request carrying a single user message.
    pub fn user_turn(
        assistant: AssistantId,
        content: impl Into<String>,
        variables: Vec<ContextVariable>,
    ) -> Self {
        Self {
            assistant,
            messages: vec![OutboundMessage {
                role: Role::User,
                content: content.into(),
            }],
            variables,
            revision: REQUEST_REVISION,
        }
    }
}

/// The `error` object of a failed assistant response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantFailure {
    pub message: String,
}

/// Raw assistant response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantResponse {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<AssistantFailure>,
}

impl AssistantResponse {
    pub fn answer(text: impl Into<String>) -> Self {
        Self {
            success: true,
            text: Some(text.into()),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            text: None,
            error: Some(AssistantFailure {
                message: message.into(),
            }),
        }
    }

    /// Interpret the body. A body missing the field its `success` flag
    /// promises is treated like any other unreadable response.
    pub fn into_reply(self, status_code: u16) -> Result<AssistantReply, AssistantError> {
        match (self.success, self.text, self.error) {
            (true, Some(text), _) => Ok(AssistantReply::Answer(text)),
            (false, _, Some(failure)) => Ok(AssistantReply::Rejected(failure.message)),
            (true, None, _) => Err(AssistantError::Decode {
                status_code,
                message: "successful response without `text`".into(),
            }),
            (false, _, None) => Err(AssistantError::Decode {
                status_code,
                message: "failed response without `error.message`".into(),
            }),
        }
    }
}

/// What the assistant said, once the body has been interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantReply {
    /// `success: true`: the answer text, verbatim.
    Answer(String),
    /// `success: false`: the service's error message.
    Rejected(String),
}

/// A transport result: the decoded body plus the HTTP status it came with.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantExchange {
    pub status_code: u16,
    pub response: AssistantResponse,
}

/// Carries an `OutboundRequest` to the assistant service.
///
/// Implementations perform exactly one call per invocation and never retry.
#[async_trait]
pub trait AssistantTransport: Send + Sync {
    /// A human-readable name for this transport.
    fn name(&self) -> &str;

    /// Send the request and decode the response body.
    async fn chat(&self, request: &OutboundRequest) -> Result<AssistantExchange, AssistantError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn outbound_request_wire_shape() {
        let request = OutboundRequest::user_turn(
            AssistantId::new("ContractComparer"),
            "compare these",
            vec![ContextVariable {
                key: "document1".into(),
                value: "abc".into(),
            }],
        );
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "assistant": "ContractComparer",
                "messages": [{"role": "user", "content": "compare these"}],
                "variables": [{"key": "document1", "value": "abc"}],
                "revision": 0
            })
        );
    }

    #[test]
    fn success_body_becomes_answer() {
        let body: AssistantResponse =
            serde_json::from_value(json!({"success": true, "text": "hello"})).unwrap();
        assert_eq!(
            body.into_reply(200).unwrap(),
            AssistantReply::Answer("hello".into())
        );
    }

    #[test]
    fn failure_body_becomes_rejection() {
        let body: AssistantResponse = serde_json::from_value(
            json!({"success": false, "error": {"message": "bad assistant"}}),
        )
        .unwrap();
        assert_eq!(
            body.into_reply(200).unwrap(),
            AssistantReply::Rejected("bad assistant".into())
        );
    }

    #[test]
    fn inconsistent_bodies_are_decode_errors() {
        let missing_text = AssistantResponse {
            success: true,
            text: None,
            error: None,
        };
        assert!(matches!(
            missing_text.into_reply(200),
            Err(AssistantError::Decode { status_code: 200, .. })
        ));

        let missing_error: AssistantResponse =
            serde_json::from_value(json!({"success": false})).unwrap();
        assert!(missing_error.into_reply(500).is_err());
    }

    #[test]
    fn answer_text_is_not_trimmed() {
        let reply = AssistantResponse::answer("  spaced \n").into_reply(200).unwrap();
        assert_eq!(reply, AssistantReply::Answer("  spaced \n".into()));
    }
}
