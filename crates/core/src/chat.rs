//! Chat-mode types.
//!
//! Chat requests bypass the pattern pipeline entirely: messages are relayed
//! to the generation service and the reply is reshaped into an
//! OpenAI-style `chat.completion` object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::request::{InboundRequest, MISSING_INPUT_MESSAGE};
use crate::types::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};

/// A single chat turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// OpenAI-style chat completion request body (`POST /v1/chat/completions`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Requested model. The relay always uses its configured model; this is
    /// accepted for client compatibility only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub messages: Vec<ChatMessage>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

impl ChatRequest {
    /// Build a chat request from an inbound job mapping.
    ///
    /// Uses `messages` when present and non-empty, otherwise wraps the user
    /// text as a single `user` message.
    pub fn from_inbound(inbound: &InboundRequest) -> Result<Self, CoreError> {
        let messages = match &inbound.messages {
            Some(messages) if !messages.is_empty() => messages.clone(),
            _ => {
                let text = inbound
                    .user_text()
                    .ok_or_else(|| CoreError::Validation(MISSING_INPUT_MESSAGE.to_string()))?;
                vec![ChatMessage::user(text)]
            }
        };

        Ok(Self {
            model: inbound.model.clone(),
            messages,
            max_tokens: inbound.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: inbound.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        })
    }

    /// Reject requests the chat endpoint cannot relay.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.messages.is_empty() {
            return Err(CoreError::Validation("messages must not be empty".into()));
        }
        if self.messages.iter().any(|m| m.role.trim().is_empty()) {
            return Err(CoreError::Validation("message role must not be empty".into()));
        }
        Ok(())
    }
}

/// A reply from the chat backend before reshaping.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    /// Model that produced the reply.
    pub model: String,
    pub content: String,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// OpenAI-style `chat.completion` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletion {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChatChoice>,
    pub usage: ChatUsage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatChoice {
    pub index: u32,
    pub message: ChatMessage,
    pub finish_reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl ChatCompletion {
    /// Reshape a backend reply into a single-choice completion.
    pub fn from_reply(reply: ChatReply, created: DateTime<Utc>) -> Self {
        Self {
            id: format!("chatcmpl-{}", created.timestamp_millis()),
            object: "chat.completion".to_string(),
            created: created.timestamp(),
            model: reply.model,
            choices: vec![ChatChoice {
                index: 0,
                message: ChatMessage::assistant(reply.content),
                finish_reason: "stop".to_string(),
            }],
            usage: ChatUsage {
                prompt_tokens: reply.prompt_tokens,
                completion_tokens: reply.completion_tokens,
                total_tokens: reply.prompt_tokens.saturating_add(reply.completion_tokens),
            },
        }
    }
}

/// OpenAI-style model listing (`GET /v1/models`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelList {
    pub object: String,
    pub data: Vec<ModelInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub owned_by: String,
}

impl ModelList {
    pub fn from_names<I, S>(names: I, created: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            object: "list".to_string(),
            data: names
                .into_iter()
                .map(|name| ModelInfo {
                    id: name.into(),
                    object: "model".to_string(),
                    created: created.timestamp(),
                    owned_by: "nala-ai".to_string(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn from_inbound_wraps_user_text() {
        let inbound = InboundRequest {
            request_type: Some("chat".into()),
            prompt: Some("hello there".into()),
            ..InboundRequest::default()
        };
        let req = ChatRequest::from_inbound(&inbound).unwrap();
        assert_eq!(req.messages, vec![ChatMessage::user("hello there")]);
        assert_eq!(req.max_tokens, 800);
    }

    #[test]
    fn from_inbound_keeps_messages_unchanged() {
        let messages = vec![
            ChatMessage {
                role: "system".into(),
                content: "be brief".into(),
            },
            ChatMessage::user("hi"),
        ];
        let inbound = InboundRequest {
            messages: Some(messages.clone()),
            temperature: Some(0.2),
            ..InboundRequest::default()
        };
        let req = ChatRequest::from_inbound(&inbound).unwrap();
        assert_eq!(req.messages, messages);
        assert!((req.temperature - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn validate_rejects_empty_conversation() {
        let mut req = ChatRequest::from_inbound(&InboundRequest::from_text("hi")).unwrap();
        assert!(req.validate().is_ok());

        req.messages[0].role = " ".into();
        assert!(req.validate().unwrap_err().to_string().contains("role"));

        req.messages.clear();
        assert_eq!(
            req.validate().unwrap_err().detail(),
            "messages must not be empty"
        );
    }

    #[test]
    fn from_inbound_without_anything_fails() {
        let inbound = InboundRequest {
            request_type: Some("chat".into()),
            ..InboundRequest::default()
        };
        assert!(ChatRequest::from_inbound(&inbound).is_err());
    }

    #[test]
    fn chat_request_defaults_when_parsing() {
        let req: ChatRequest =
            serde_json::from_str(r#"{"model":"x","messages":[{"role":"user","content":"hi"}]}"#)
                .unwrap();
        assert_eq!(req.max_tokens, 800);
        assert!((req.temperature - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn completion_reshapes_reply() {
        let created = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let completion = ChatCompletion::from_reply(
            ChatReply {
                model: "deepseek-r1:8b".into(),
                content: "sure".into(),
                prompt_tokens: 12,
                completion_tokens: 30,
            },
            created,
        );
        assert_eq!(completion.object, "chat.completion");
        assert_eq!(completion.created, created.timestamp());
        assert!(completion.id.starts_with("chatcmpl-"));
        assert_eq!(completion.model, "deepseek-r1:8b");
        assert_eq!(completion.choices[0].message.role, "assistant");
        assert_eq!(completion.choices[0].message.content, "sure");
        assert_eq!(completion.usage.total_tokens, 42);
    }

    #[test]
    fn model_list_shape() {
        let created = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let list = ModelList::from_names(["a", "b"], created);
        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(json["object"], "list");
        assert_eq!(json["data"][1]["id"], "b");
        assert_eq!(json["data"][0]["owned_by"], "nala-ai");
    }
}
