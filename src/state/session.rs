//! Conversation session state
//!
//! The session is plain data. It is only mutated through
//! [`ConversationStore`](super::ConversationStore), which keeps its
//! invariants and notifies observers.

use serde::Serialize;

use crate::models::{ConversationId, Message, MessageId};

/// Whether a turn is currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Idle,
    Streaming,
}

/// Everything an observer needs to render the conversation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationSession {
    pub conversation_id: ConversationId,
    /// Append-only log in submission order
    pub messages: Vec<Message>,
    /// The assistant message currently receiving streamed text
    pub live_message_id: Option<MessageId>,
    pub status: SessionStatus,
    /// Progress text shown while waiting for the first text delta
    pub transient_status: Option<String>,
}

impl ConversationSession {
    pub fn new(conversation_id: ConversationId) -> Self {
        Self {
            conversation_id,
            messages: Vec::new(),
            live_message_id: None,
            status: SessionStatus::Idle,
            transient_status: None,
        }
    }

    pub fn is_streaming(&self) -> bool {
        self.status == SessionStatus::Streaming
    }

    pub fn message(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn live_message(&self) -> Option<&Message> {
        self.live_message_id.and_then(|id| self.message(id))
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub(super) fn live_message_mut(&mut self, id: MessageId) -> Option<&mut Message> {
        if self.live_message_id != Some(id) {
            return None;
        }
        self.messages.iter_mut().rev().find(|m| m.id == id)
    }
}
