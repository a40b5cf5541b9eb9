//! Debug event types and channel.
//!
//! Structured events describing what happened during each turn: lifecycle
//! transitions, decoded events, malformed lines and errors. They are
//! broadcast over a tokio broadcast channel; the binary prints them as JSON
//! lines when started with `--debug-events`.

mod events;

pub use events::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Type alias for the debug event sender.
pub type DebugEventSender = broadcast::Sender<DebugEvent>;

/// Create a new debug event channel with the specified capacity.
///
/// The sender can be cloned for multiple producers, and the receiver can be
/// resubscribed for multiple consumers.
pub fn create_debug_channel(capacity: usize) -> (DebugEventSender, broadcast::Receiver<DebugEvent>) {
    broadcast::channel(capacity)
}

/// Send `kind` if a channel is attached. Having no listeners is not an error.
pub fn emit_debug(debug_tx: &Option<DebugEventSender>, kind: DebugEventKind, conversation_id: &str) {
    if let Some(tx) = debug_tx {
        let _ = tx.send(DebugEvent::with_context(kind, conversation_id));
    }
}

/// A debug event with its timestamp and conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugEvent {
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
    /// Conversation the turn belongs to
    pub conversation_id: Option<String>,
    /// The specific event data
    pub event: DebugEventKind,
}

impl DebugEvent {
    /// Create a new debug event with the current timestamp.
    pub fn new(event: DebugEventKind) -> Self {
        Self {
            timestamp: Utc::now(),
            conversation_id: None,
            event,
        }
    }

    pub fn with_context(event: DebugEventKind, conversation_id: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            conversation_id: Some(conversation_id.into()),
            event,
        }
    }
}

/// The specific kind of debug event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DebugEventKind {
    /// Stream lifecycle event
    StreamLifecycle(StreamLifecycleData),
    /// Event applied to the session
    ProcessedEvent(ProcessedEventData),
    /// Line skipped because it did not decode
    MalformedLine(MalformedLineData),
    /// Error that ended a turn
    Error(ErrorData),
}
