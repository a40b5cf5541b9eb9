//! Persisted key-value state.
//!
//! The client only persists one thing, the current conversation id, but the
//! store is a plain string map so the contract stays at "read a key, write a
//! key".

use async_trait::async_trait;

/// Key under which the active conversation id is stored.
pub const CONVERSATION_ID_KEY: &str = "conversation_id";

/// State store errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No location for the store could be determined
    NoLocation,
    /// IO error
    Io(String),
    /// Stored data could not be (de)serialized
    Serialization(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NoLocation => write!(f, "Could not determine state directory"),
            StoreError::Io(msg) => write!(f, "IO error: {}", msg),
            StoreError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// Trait for reading and writing persisted client state.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Read a value. `Ok(None)` when the key was never written.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}
