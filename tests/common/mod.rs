//! Common test utilities for integration tests.
//!
//! Fixtures for building a controller over a scripted HTTP client and for
//! writing NDJSON bodies.
//!
//! # Example
//!
//! ```ignore
//! let mut harness = TurnHarness::new(MockResponse::chunks([text_line("Hi"), done_line()]));
//! let report = harness.submit("hello").await;
//! ```

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::mpsc;

use chatline::adapters::{MockHttpClient, MockResponse};
use chatline::conductor::ChatClient;
use chatline::config::ClientConfig;
use chatline::models::ConversationId;
use chatline::state::{ConversationSession, ConversationStore};
use chatline::traits::{ByteStream, Headers, HttpClient, HttpError};
use chatline::turn::{TurnController, TurnReport};

pub const TEST_CHAT_URL: &str = "http://localhost:8000/chat";
pub const TEST_CONVERSATION_ID: &str = "conv-test";

/// One `text` event line, newline included.
pub fn text_line(content: &str) -> String {
    format!(
        "{}\n",
        serde_json::json!({ "type": "text", "content": content })
    )
}

/// One `status` event line, newline included.
pub fn status_line(content: &str) -> String {
    format!(
        "{}\n",
        serde_json::json!({ "type": "status", "content": content })
    )
}

/// The `done` event line, newline included.
pub fn done_line() -> String {
    "{\"type\":\"done\"}\n".to_string()
}

/// A controller, its store and the mock behind it.
pub struct TurnHarness {
    pub controller: TurnController,
    pub store: ConversationStore,
    pub http: MockHttpClient,
}

impl TurnHarness {
    pub fn new(response: MockResponse) -> Self {
        Self::with_config(response, ClientConfig::default())
    }

    pub fn with_config(response: MockResponse, config: ClientConfig) -> Self {
        let http = MockHttpClient::with_default(response);
        let client = ChatClient::new(TEST_CHAT_URL, Arc::new(http.clone()));
        Self {
            controller: TurnController::new(client, &config),
            store: ConversationStore::new(ConversationId::from(TEST_CONVERSATION_ID)),
            http,
        }
    }

    /// Submit and unwrap the submission (not the turn outcome).
    pub async fn submit(&mut self, text: &str) -> TurnReport {
        self.controller
            .submit(&mut self.store, text)
            .await
            .expect("submission should be accepted")
    }

    pub fn session(&self) -> ConversationSession {
        self.store.snapshot()
    }

    /// Text of the assistant reply to the most recent turn.
    pub fn reply_text(&self) -> String {
        self.session()
            .last_message()
            .map(|m| m.text.clone())
            .unwrap_or_default()
    }
}

/// HTTP client whose single response body is fed chunk by chunk from the
/// test through [`BodySender`].
pub struct ChannelHttpClient {
    body: Mutex<Option<mpsc::UnboundedReceiver<Result<Bytes, HttpError>>>>,
}

/// Test side of a [`ChannelHttpClient`] body. Dropping it ends the body.
pub struct BodySender {
    tx: mpsc::UnboundedSender<Result<Bytes, HttpError>>,
}

impl BodySender {
    pub fn chunk(&self, chunk: impl Into<Vec<u8>>) {
        let bytes: Vec<u8> = chunk.into();
        self.tx
            .send(Ok(Bytes::from(bytes)))
            .expect("body receiver dropped");
    }

    pub fn fail(self, error: HttpError) {
        self.tx.send(Err(error)).expect("body receiver dropped");
    }
}

pub fn channel_http() -> (ChannelHttpClient, BodySender) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        ChannelHttpClient {
            body: Mutex::new(Some(rx)),
        },
        BodySender { tx },
    )
}

#[async_trait]
impl HttpClient for ChannelHttpClient {
    async fn post_stream(
        &self,
        _url: &str,
        _body: &str,
        _headers: &Headers,
    ) -> Result<ByteStream, HttpError> {
        let rx = self
            .body
            .lock()
            .expect("lock poisoned")
            .take()
            .ok_or_else(|| HttpError::Other("body already taken".to_string()))?;

        Ok(Box::pin(futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|item| (item, rx))
        })))
    }
}

/// Controller and store over a [`ChannelHttpClient`].
pub fn channel_harness(config: ClientConfig) -> (TurnController, ConversationStore, BodySender) {
    let (http, body) = channel_http();
    let client = ChatClient::new(TEST_CHAT_URL, Arc::new(http));
    (
        TurnController::new(client, &config),
        ConversationStore::new(ConversationId::from(TEST_CONVERSATION_ID)),
        body,
    )
}
