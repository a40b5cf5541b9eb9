//! Mock implementations for testing.
//!
//! - [`MockHttpClient`] - scripted chunked responses and faults
//! - [`InMemoryStateStore`] - in-memory persisted state

pub mod http;
pub mod state;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
pub use state::InMemoryStateStore;
