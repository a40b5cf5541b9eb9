use serde::{Deserialize, Serialize};

use super::message::{ConversationId, MessageRole};

/// Body of `POST /chat`.
///
/// Serializes to
/// `{"input":{"messages":[{"role":"user","content":..}]},"config":{"configurable":{"thread_id":..}}}`.
/// Only the newest user message is sent; the server keeps history per thread.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    pub input: ChatInput,
    pub config: RequestConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatInput {
    pub messages: Vec<InputMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputMessage {
    pub role: MessageRole,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestConfig {
    pub configurable: Configurable,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Configurable {
    pub thread_id: ConversationId,
}

impl ChatRequest {
    /// Request carrying one user message for the given conversation.
    pub fn user_message(content: impl Into<String>, thread_id: ConversationId) -> Self {
        Self {
            input: ChatInput {
                messages: vec![InputMessage {
                    role: MessageRole::User,
                    content: content.into(),
                }],
            },
            config: RequestConfig {
                configurable: Configurable { thread_id },
            },
        }
    }

    pub fn thread_id(&self) -> &ConversationId {
        &self.config.configurable.thread_id
    }
}
