//! Line to event parsing.

use super::events::StreamEvent;
use super::payloads::WireEvent;

/// Parse one complete line into a [`StreamEvent`].
///
/// Returns `None` for lines that are blank after trimming. Every other line
/// yields an event: anything that is not a well-formed `text`, `status` or
/// `done` object comes back as [`StreamEvent::Malformed`] carrying the raw
/// line. This function never fails.
pub fn parse_line(line: &str) -> Option<StreamEvent> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<WireEvent>(trimmed) {
        Ok(wire) => Some(wire.into()),
        Err(e) => {
            tracing::trace!("Undecodable stream line ({}): {}", e, trimmed);
            Some(StreamEvent::Malformed {
                raw: line.to_string(),
            })
        }
    }
}
