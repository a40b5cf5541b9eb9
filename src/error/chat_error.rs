//! Unified error type for the application layer.

use std::fmt;

use super::category::ErrorCategory;
use super::turn::{SubmitError, TurnError};
use crate::config::ConfigError;
use crate::traits::StoreError;

/// Unified error type for chatline.
///
/// Turn failures normally stay inside a [`TurnReport`](crate::turn::TurnReport)
/// and are shown to the user as the fixed error text; this type is what the
/// outer layers (`App` construction, `main`) propagate.
#[derive(Debug)]
pub enum ChatError {
    /// A turn failed.
    Turn(TurnError),
    /// A submission was refused.
    Submit(SubmitError),
    /// Persisted state could not be read or written.
    Store(StoreError),
    /// Configuration could not be loaded.
    Config(ConfigError),
}

impl ChatError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ChatError::Turn(err) => err.category(),
            ChatError::Submit(err) => err.category(),
            ChatError::Store(_) => ErrorCategory::System,
            ChatError::Config(_) => ErrorCategory::Configuration,
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            ChatError::Turn(err) => err.is_retryable(),
            _ => false,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            ChatError::Submit(err) => err.user_message().to_string(),
            ChatError::Store(err) => format!("Could not access saved state: {}", err),
            ChatError::Config(err) => err.to_string(),
            ChatError::Turn(_) => self.category().recovery_hint().to_string(),
        }
    }
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::Turn(err) => write!(f, "{}", err),
            ChatError::Submit(err) => write!(f, "{}", err),
            ChatError::Store(err) => write!(f, "{}", err),
            ChatError::Config(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ChatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChatError::Turn(err) => Some(err),
            ChatError::Submit(err) => Some(err),
            ChatError::Store(err) => Some(err),
            ChatError::Config(err) => Some(err),
        }
    }
}

impl From<TurnError> for ChatError {
    fn from(err: TurnError) -> Self {
        ChatError::Turn(err)
    }
}

impl From<SubmitError> for ChatError {
    fn from(err: SubmitError) -> Self {
        ChatError::Submit(err)
    }
}

impl From<StoreError> for ChatError {
    fn from(err: StoreError) -> Self {
        ChatError::Store(err)
    }
}

impl From<ConfigError> for ChatError {
    fn from(err: ConfigError) -> Self {
        ChatError::Config(err)
    }
}

/// Type alias for Results using [`ChatError`].
pub type ChatResult<T> = Result<T, ChatError>;
