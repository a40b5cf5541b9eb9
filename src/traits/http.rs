//! HTTP client trait abstraction.
//!
//! The chat endpoint is a single streaming POST, so the trait exposes just
//! that. Production code uses [`ReqwestHttpClient`](crate::adapters::ReqwestHttpClient);
//! tests script chunk sequences with [`MockHttpClient`](crate::adapters::MockHttpClient).

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::collections::HashMap;
use std::pin::Pin;

/// HTTP headers represented as a key-value map.
pub type Headers = HashMap<String, String>;

/// A response body delivered chunk by chunk.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, HttpError>> + Send>>;

/// HTTP client errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpError {
    /// Connection failed
    ConnectionFailed(String),
    /// Request timeout
    Timeout(String),
    /// Server returned a non-2xx status
    ServerError { status: u16, message: String },
    /// Server answered 2xx but with nothing to read
    NoBody { status: u16 },
    /// Body read failed after the response started
    Io(String),
    /// Invalid URL
    InvalidUrl(String),
    /// Other error
    Other(String),
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            HttpError::Timeout(msg) => write!(f, "Request timeout: {}", msg),
            HttpError::ServerError { status, message } => {
                write!(f, "Server error ({}): {}", status, message)
            }
            HttpError::NoBody { status } => write!(f, "Response ({}) has no body", status),
            HttpError::Io(msg) => write!(f, "IO error: {}", msg),
            HttpError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            HttpError::Other(msg) => write!(f, "HTTP error: {}", msg),
        }
    }
}

impl std::error::Error for HttpError {}

/// Trait for HTTP client operations.
///
/// # Example
///
/// ```ignore
/// use chatline::traits::{HttpClient, Headers};
/// use futures::StreamExt;
///
/// async fn dump<C: HttpClient>(client: &C) -> Result<(), HttpError> {
///     let mut body = client.post_stream("http://localhost:8000/chat", "{}", &Headers::new()).await?;
///     while let Some(chunk) = body.next().await {
///         println!("{} bytes", chunk?.len());
///     }
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform a POST request and return the body as a stream of chunks.
    ///
    /// # Returns
    /// - `Ok(stream)` for a 2xx response with a readable body
    /// - `Err(HttpError::ServerError)` for a non-2xx response
    /// - `Err(HttpError::NoBody)` for a 2xx response without a body
    /// - any other `Err` when no response was received
    ///
    /// Errors yielded by the stream itself are mid-body faults.
    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError>;
}
