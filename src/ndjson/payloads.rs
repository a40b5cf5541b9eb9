//! Wire shapes for stream lines.

use serde::Deserialize;

use super::events::StreamEvent;

/// A line exactly as the server sends it, discriminated on `"type"`.
///
/// Unknown fields are ignored so servers can add metadata freely.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum WireEvent {
    Text { content: String },
    Status { content: String },
    Done,
}

impl From<WireEvent> for StreamEvent {
    fn from(wire: WireEvent) -> Self {
        match wire {
            WireEvent::Text { content } => StreamEvent::Text(content),
            WireEvent::Status { content } => StreamEvent::Status(content),
            WireEvent::Done => StreamEvent::Done,
        }
    }
}
