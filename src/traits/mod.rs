//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - streaming POST to the chat backend
//! - [`StateStore`] - persisted key-value state (conversation id)

pub mod http;
pub mod state_store;

pub use http::{ByteStream, Headers, HttpClient, HttpError};
pub use state_store::{StateStore, StoreError, CONVERSATION_ID_KEY};
