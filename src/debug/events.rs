//! Debug event data types.
//!
//! Payloads of the variants of [`DebugEventKind`](super::DebugEventKind).

use serde::{Deserialize, Serialize};

/// Stream lifecycle event data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamLifecycleData {
    /// The lifecycle phase
    pub phase: StreamPhase,
    /// Additional details about the phase
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl StreamLifecycleData {
    pub fn new(phase: StreamPhase) -> Self {
        Self {
            phase,
            details: None,
        }
    }

    pub fn with_details(phase: StreamPhase, details: impl Into<String>) -> Self {
        Self {
            phase,
            details: Some(details.into()),
        }
    }
}

/// Phases of a turn's stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamPhase {
    /// Request sent, no response yet
    Connecting,
    /// 2xx response with a body
    Connected,
    /// Body ended without a fault
    Completed,
    /// Request rejected or stream broken
    Failed,
}

/// An event decoded from the stream and applied to the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedEventData {
    /// `text`, `status` or `done`
    pub event_type: String,
    /// Event payload, truncated
    pub summary: String,
}

impl ProcessedEventData {
    pub fn new(event_type: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            summary: truncate(&summary.into(), SUMMARY_LIMIT),
        }
    }
}

/// A line that could not be decoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MalformedLineData {
    pub raw: String,
}

impl MalformedLineData {
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: truncate(&raw.into(), SUMMARY_LIMIT),
        }
    }
}

/// Error data for debugging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorData {
    /// Error code if available
    pub code: Option<String>,
    /// Error message
    pub message: String,
}

impl ErrorData {
    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

const SUMMARY_LIMIT: usize = 200;

/// Cut `text` to at most `limit` characters, marking the cut with `...`.
fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_untouched() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("ééé", 2), "éé...");
    }

    #[test]
    fn test_long_summaries_are_truncated() {
        let data = ProcessedEventData::new("text", "x".repeat(500));
        assert_eq!(data.summary.len(), SUMMARY_LIMIT + 3);
    }
}
