//! Mid-stream transport faults.
//!
//! Anything in here ends the current turn as failed. Malformed lines are
//! not errors and never show up here; they are recorded on the turn report
//! and the stream keeps going.

use std::fmt;
use std::time::Duration;

/// Faults raised while reading or framing the response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// The connection dropped or the body read failed.
    ConnectionLost { message: String },

    /// The body contained bytes that are not valid UTF-8.
    InvalidUtf8 {
        /// Byte offset into the whole body where decoding failed.
        offset: usize,
    },

    /// A line grew past the configured cap without a separator.
    LineTooLong { len: usize, limit: usize },

    /// No chunk arrived within the configured idle timeout.
    Timeout { after: Duration },
}

impl StreamError {
    /// Check if this error is likely transient and can be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StreamError::ConnectionLost { .. } | StreamError::Timeout { .. }
        )
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            StreamError::ConnectionLost { .. } => {
                "Connection to the server was lost.".to_string()
            }
            StreamError::InvalidUtf8 { .. } => {
                "Received invalid data from server.".to_string()
            }
            StreamError::LineTooLong { limit, .. } => {
                format!("Server sent a message larger than {} bytes.", limit)
            }
            StreamError::Timeout { after } => {
                format!("No response from server for {:?}.", after)
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::ConnectionLost { .. } => "E_STREAM_CONN",
            StreamError::InvalidUtf8 { .. } => "E_STREAM_UTF8",
            StreamError::LineTooLong { .. } => "E_STREAM_LINE",
            StreamError::Timeout { .. } => "E_STREAM_TIMEOUT",
        }
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::ConnectionLost { message } => {
                write!(f, "Stream connection lost: {}", message)
            }
            StreamError::InvalidUtf8 { offset } => {
                write!(f, "Invalid UTF-8 in stream at byte {}", offset)
            }
            StreamError::LineTooLong { len, limit } => {
                write!(f, "Stream line of {} bytes exceeds limit of {}", len, limit)
            }
            StreamError::Timeout { after } => {
                write!(f, "Stream timeout after {:?}", after)
            }
        }
    }
}

impl std::error::Error for StreamError {}
