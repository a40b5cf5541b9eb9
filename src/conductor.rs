//! Chat API client.
//!
//! Builds the `POST /chat` request and opens its NDJSON response body as a
//! [`ByteStream`]. Decoding the body is left to the caller so each chunk can
//! be applied to the session as soon as it arrives.

use std::sync::Arc;

use crate::error::TurnError;
use crate::models::ChatRequest;
use crate::traits::{ByteStream, Headers, HttpClient, HttpError};

/// Media type of the streamed response.
pub const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

/// Client for the streaming chat endpoint.
#[derive(Clone)]
pub struct ChatClient {
    chat_url: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("chat_url", &self.chat_url)
            .finish_non_exhaustive()
    }
}

impl ChatClient {
    /// Create a client posting to `chat_url` (already including `/chat`).
    pub fn new(chat_url: impl Into<String>, http: Arc<dyn HttpClient>) -> Self {
        Self {
            chat_url: chat_url.into(),
            http,
        }
    }

    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }

    /// Send `request` and return the response body once the server has
    /// accepted it with a 2xx status.
    ///
    /// Every failure to obtain a readable body is a
    /// [`TurnError::RequestRejected`].
    pub async fn stream_chat(&self, request: &ChatRequest) -> Result<ByteStream, TurnError> {
        let body = serde_json::to_string(request).map_err(|e| TurnError::RequestRejected {
            status: None,
            message: format!("Failed to encode request: {}", e),
        })?;

        tracing::debug!(
            "POST {} for conversation {}",
            self.chat_url,
            request.thread_id()
        );

        self.http
            .post_stream(&self.chat_url, &body, &request_headers())
            .await
            .map_err(rejection)
    }
}

fn request_headers() -> Headers {
    let mut headers = Headers::new();
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    headers.insert("Accept".to_string(), NDJSON_CONTENT_TYPE.to_string());
    headers
}

fn rejection(error: HttpError) -> TurnError {
    let status = match &error {
        HttpError::ServerError { status, .. } | HttpError::NoBody { status } => Some(*status),
        _ => None,
    };
    TurnError::RequestRejected {
        status,
        message: error.to_string(),
    }
}
