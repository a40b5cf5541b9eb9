//! Single-writer conversation store.
//!
//! The session lives inside a `tokio::sync::watch` channel. Mutating methods
//! take `&mut self`, so exactly one writer can exist at a time, and every
//! mutation publishes a new snapshot to subscribers.

use tokio::sync::watch;

use super::session::{ConversationSession, SessionStatus};
use crate::models::{ConversationId, Message, MessageId};

/// Owner of the conversation log and live-message pointer.
#[derive(Debug)]
pub struct ConversationStore {
    tx: watch::Sender<ConversationSession>,
}

impl ConversationStore {
    /// Create a store with an empty log for `conversation_id`.
    pub fn new(conversation_id: ConversationId) -> Self {
        let (tx, _rx) = watch::channel(ConversationSession::new(conversation_id));
        Self { tx }
    }

    /// Borrow the current session.
    ///
    /// Hold the guard briefly; it blocks publication of the next change.
    pub fn session(&self) -> watch::Ref<'_, ConversationSession> {
        self.tx.borrow()
    }

    /// Clone the current session.
    pub fn snapshot(&self) -> ConversationSession {
        self.tx.borrow().clone()
    }

    /// Observe future changes. The receiver starts at the current snapshot.
    pub fn subscribe(&self) -> watch::Receiver<ConversationSession> {
        self.tx.subscribe()
    }

    pub fn conversation_id(&self) -> ConversationId {
        self.tx.borrow().conversation_id.clone()
    }

    pub fn is_streaming(&self) -> bool {
        self.tx.borrow().is_streaming()
    }

    /// Append a user message and return its id.
    pub fn append_user(&mut self, text: impl Into<String>) -> MessageId {
        let message = Message::user(text);
        let id = message.id;
        self.tx.send_modify(|s| s.messages.push(message));
        id
    }

    /// Append an empty assistant message and make it the live message.
    pub fn append_assistant_placeholder(&mut self) -> MessageId {
        let message = Message::assistant_placeholder();
        let id = message.id;
        self.tx.send_modify(|s| {
            s.messages.push(message);
            s.live_message_id = Some(id);
        });
        id
    }

    /// Append `delta` to the live message.
    ///
    /// Landing text also clears the transient status. Returns `false`, and
    /// changes nothing, when `id` is not the live message.
    pub fn append_to_live(&mut self, id: MessageId, delta: &str) -> bool {
        self.tx.send_if_modified(|s| match s.live_message_mut(id) {
            Some(message) => {
                message.text.push_str(delta);
                s.transient_status = None;
                true
            }
            None => false,
        })
    }

    /// Overwrite the live message's text and failure flag.
    ///
    /// Returns `false`, and changes nothing, when `id` is not the live message.
    pub fn replace_live(&mut self, id: MessageId, text: impl Into<String>, failed: bool) -> bool {
        let text = text.into();
        self.tx.send_if_modified(|s| match s.live_message_mut(id) {
            Some(message) => {
                message.text = text;
                message.failed = failed;
                true
            }
            None => false,
        })
    }

    /// Mark a turn as in flight.
    pub fn begin_streaming(&mut self) {
        self.tx.send_modify(|s| s.status = SessionStatus::Streaming);
    }

    /// Replace the transient status.
    ///
    /// Ignored while idle, since a transient status only exists during a turn.
    pub fn set_transient_status(&mut self, status: Option<String>) -> bool {
        self.tx.send_if_modified(|s| {
            if s.status != SessionStatus::Streaming || s.transient_status == status {
                return false;
            }
            s.transient_status = status;
            true
        })
    }

    /// End the current turn: no live message, no transient status, idle.
    pub fn settle(&mut self) {
        self.tx.send_modify(|s| {
            s.live_message_id = None;
            s.transient_status = None;
            s.status = SessionStatus::Idle;
        });
    }

    /// Discard the whole log and start over with a fresh conversation id.
    pub fn reset(&mut self) -> ConversationId {
        let id = ConversationId::generate();
        self.replace_session(id.clone());
        id
    }

    /// Discard the whole log and continue under a known conversation id.
    pub fn reset_to(&mut self, conversation_id: ConversationId) {
        self.replace_session(conversation_id);
    }

    fn replace_session(&mut self, conversation_id: ConversationId) {
        self.tx
            .send_replace(ConversationSession::new(conversation_id));
    }
}
