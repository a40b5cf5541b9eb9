//! Turn-level errors.
//!
//! A [`TurnError`] ends a single request/response turn. It never ends the
//! session: after any of these the session is back to idle and takes the
//! next submission.

use std::fmt;

use super::category::ErrorCategory;
use super::stream::StreamError;

/// Why a turn settled as failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnError {
    /// The request never produced a readable stream: non-2xx status,
    /// empty body, or no response at all.
    RequestRejected {
        /// HTTP status, `None` when the connection itself failed.
        status: Option<u16>,
        message: String,
    },

    /// The stream broke after it was opened.
    Stream(StreamError),
}

impl TurnError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TurnError::RequestRejected { status: None, .. } => ErrorCategory::Network,
            TurnError::RequestRejected {
                status: Some(status),
                ..
            } => {
                if (400..500).contains(status) {
                    ErrorCategory::Client
                } else {
                    ErrorCategory::Server
                }
            }
            TurnError::Stream(StreamError::LineTooLong { .. }) => ErrorCategory::Server,
            TurnError::Stream(_) => ErrorCategory::Network,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            TurnError::RequestRejected { .. } => self.category().is_retryable(),
            TurnError::Stream(err) => err.is_retryable(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            TurnError::RequestRejected { .. } => "E_TURN_REJECTED",
            TurnError::Stream(err) => err.error_code(),
        }
    }

    /// Whether the failure happened before any event was processed.
    pub fn is_rejection(&self) -> bool {
        matches!(self, TurnError::RequestRejected { .. })
    }
}

impl fmt::Display for TurnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnError::RequestRejected {
                status: Some(status),
                message,
            } => write!(f, "Request rejected ({}): {}", status, message),
            TurnError::RequestRejected {
                status: None,
                message,
            } => write!(f, "Request failed: {}", message),
            TurnError::Stream(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for TurnError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TurnError::Stream(err) => Some(err),
            TurnError::RequestRejected { .. } => None,
        }
    }
}

impl From<StreamError> for TurnError {
    fn from(err: StreamError) -> Self {
        TurnError::Stream(err)
    }
}

/// Why a submission was refused before a turn started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    /// Input was empty or whitespace.
    EmptyInput,
    /// A previous turn is still streaming.
    TurnInFlight,
}

impl SubmitError {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::User
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            SubmitError::EmptyInput => "Type a message first.",
            SubmitError::TurnInFlight => {
                "Please wait for the current response to complete before sending another message."
            }
        }
    }
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::EmptyInput => write!(f, "Submission is empty"),
            SubmitError::TurnInFlight => write!(f, "A turn is already in flight"),
        }
    }
}

impl std::error::Error for SubmitError {}
