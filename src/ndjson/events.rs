//! Stream event types.

/// One decoded line of a chat response stream.
///
/// Events are ephemeral: they drive store mutations and are never kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A fragment of assistant text, appended to the live message.
    Text(String),
    /// Transient progress text such as "Searching...".
    Status(String),
    /// The server finished the reply.
    Done,
    /// A non-blank line that did not decode as a known event.
    Malformed { raw: String },
}

impl StreamEvent {
    /// Short name used in logs and debug events.
    pub fn kind(&self) -> &'static str {
        match self {
            StreamEvent::Text(_) => "text",
            StreamEvent::Status(_) => "status",
            StreamEvent::Done => "done",
            StreamEvent::Malformed { .. } => "malformed",
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, StreamEvent::Malformed { .. })
    }
}
