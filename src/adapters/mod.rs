//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`FileStateStore`] - JSON-file state storage
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockHttpClient`] - scripted chunked responses
//! - [`mock::InMemoryStateStore`] - in-memory state

pub mod file_state;
pub mod mock;
pub mod reqwest_http;

pub use file_state::FileStateStore;
pub use mock::{InMemoryStateStore, MockHttpClient, MockResponse};
pub use reqwest_http::ReqwestHttpClient;
