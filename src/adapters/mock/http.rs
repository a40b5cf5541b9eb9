//! Mock HTTP client for testing.
//!
//! Responses are scripted per URL as chunk sequences, so tests can split a
//! body at any byte, drop the connection part way, or leave it hanging.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::traits::{ByteStream, Headers, HttpClient, HttpError};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method
    pub method: String,
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Request body
    pub body: String,
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Fail before any body is available
    Error(HttpError),
    /// Deliver these chunks, then end the body
    Stream(Vec<Bytes>),
    /// Deliver these chunks, then fail mid-body
    StreamThenError(Vec<Bytes>, HttpError),
    /// Deliver these chunks, then never produce another one
    StreamThenHang(Vec<Bytes>),
    /// Never answer the request at all
    Hang,
}

impl MockResponse {
    /// Body split into the given string chunks.
    pub fn chunks<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Vec<u8>>,
    {
        MockResponse::Stream(
            chunks
                .into_iter()
                .map(|c| {
                    let bytes: Vec<u8> = c.into();
                    Bytes::from(bytes)
                })
                .collect(),
        )
    }

    /// A non-2xx response.
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        MockResponse::Error(HttpError::ServerError {
            status,
            message: message.into(),
        })
    }
}

/// Mock HTTP client for testing.
///
/// # Example
///
/// ```ignore
/// use chatline::adapters::mock::{MockHttpClient, MockResponse};
///
/// let client = MockHttpClient::new();
/// client.set_response(
///     "http://localhost:8000/chat",
///     MockResponse::chunks(["{\"type\":\"te", "xt\",\"content\":\"Hi\"}\n"]),
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    /// Configured responses by URL
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    /// Default response when no specific match
    default_response: Arc<Mutex<Option<MockResponse>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a client that answers every URL with `response`.
    pub fn with_default(response: MockResponse) -> Self {
        let client = Self::new();
        client.set_default_response(response);
        client
    }

    /// Set a response for a specific URL (exact match).
    pub fn set_response(&self, url: &str, response: MockResponse) {
        locked(&self.responses).insert(url.to_string(), response);
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        *locked(&self.default_response) = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        locked(&self.requests).clone()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        locked(&self.requests).clear();
    }

    fn record_request(&self, url: &str, headers: &Headers, body: &str) {
        locked(&self.requests).push(RecordedRequest {
            method: "POST".to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body: body.to_string(),
        });
    }

    fn get_response(&self, url: &str) -> Option<MockResponse> {
        if let Some(response) = locked(&self.responses).get(url) {
            return Some(response.clone());
        }
        locked(&self.default_response).clone()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError> {
        self.record_request(url, headers, body);

        match self.get_response(url) {
            Some(MockResponse::Error(err)) => Err(err),
            Some(MockResponse::Stream(chunks)) => {
                Ok(Box::pin(stream::iter(
                    chunks.into_iter().map(Ok::<Bytes, HttpError>),
                )))
            }
            Some(MockResponse::StreamThenError(chunks, err)) => {
                let items = chunks
                    .into_iter()
                    .map(Ok::<Bytes, HttpError>)
                    .chain(std::iter::once(Err(err)));
                Ok(Box::pin(stream::iter(items)))
            }
            Some(MockResponse::StreamThenHang(chunks)) => Ok(Box::pin(
                stream::iter(chunks.into_iter().map(Ok::<Bytes, HttpError>)).chain(stream::pending()),
            )),
            Some(MockResponse::Hang) => futures::future::pending().await,
            None => Err(HttpError::Other(format!(
                "No mock response for URL: {}",
                url
            ))),
        }
    }
}
