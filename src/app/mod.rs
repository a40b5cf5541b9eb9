//! Application layer.
//!
//! [`App`] owns the [`ConversationStore`] and the [`TurnController`] and
//! keeps the persisted conversation id in sync with the session. Front ends
//! submit text through it and observe the session via [`App::subscribe`].

mod bootstrap;

pub use bootstrap::IdSource;

use std::sync::Arc;

use tokio::sync::watch;

use crate::adapters::{FileStateStore, ReqwestHttpClient};
use crate::config::ClientConfig;
use crate::conductor::ChatClient;
use crate::debug::DebugEventSender;
use crate::error::{ChatResult, SubmitError};
use crate::models::ConversationId;
use crate::state::{ConversationSession, ConversationStore};
use crate::traits::{HttpClient, StateStore};
use crate::turn::{TurnController, TurnReport};

/// A chat session bound to one backend and one state store.
pub struct App {
    store: ConversationStore,
    controller: TurnController,
    state: Arc<dyn StateStore>,
    id_source: IdSource,
}

impl App {
    /// Build an app from `config` with the production HTTP client and the
    /// file-backed state store.
    pub async fn from_config(config: ClientConfig) -> ChatResult<Self> {
        config.validate()?;

        let state: Arc<dyn StateStore> = match &config.state_path {
            Some(path) => Arc::new(FileStateStore::at(path.clone())),
            None => Arc::new(FileStateStore::new()?),
        };
        let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());

        Ok(Self::bootstrap(config, http, state).await)
    }

    /// Restore (or create) the conversation id and start with an empty log.
    pub async fn bootstrap(
        config: ClientConfig,
        http: Arc<dyn HttpClient>,
        state: Arc<dyn StateStore>,
    ) -> Self {
        let (conversation_id, id_source) = bootstrap::load_conversation_id(state.as_ref()).await;
        tracing::info!(
            "Conversation {} ({:?}), backend {}",
            conversation_id,
            id_source,
            config.chat_url()
        );

        let client = ChatClient::new(config.chat_url(), http);
        Self {
            store: ConversationStore::new(conversation_id),
            controller: TurnController::new(client, &config),
            state,
            id_source,
        }
    }

    /// Attach a debug event channel to every subsequent turn.
    pub fn with_debug(mut self, debug_tx: DebugEventSender) -> Self {
        self.controller = self.controller.with_debug(debug_tx);
        self
    }

    /// Whether the startup id was restored or generated.
    pub fn id_source(&self) -> &IdSource {
        &self.id_source
    }

    pub fn conversation_id(&self) -> ConversationId {
        self.store.conversation_id()
    }

    pub fn subscribe(&self) -> watch::Receiver<ConversationSession> {
        self.store.subscribe()
    }

    pub fn snapshot(&self) -> ConversationSession {
        self.store.snapshot()
    }

    /// Run one turn for `text`.
    pub async fn submit(&mut self, text: &str) -> Result<TurnReport, SubmitError> {
        self.controller.submit(&mut self.store, text).await
    }

    /// Clear the conversation and persist a fresh id.
    pub async fn new_conversation(&mut self) -> ConversationId {
        let id = self.store.reset();
        tracing::info!("Started new conversation {}", id);
        bootstrap::persist_conversation_id(self.state.as_ref(), &id).await;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryStateStore, MockHttpClient, MockResponse};
    use crate::models::ChatRequest;
    use crate::traits::CONVERSATION_ID_KEY;

    fn mock_body() -> MockHttpClient {
        MockHttpClient::with_default(MockResponse::chunks([
            "{\"type\":\"text\",\"content\":\"Hi\"}\n{\"type\":\"done\"}\n",
        ]))
    }

    #[tokio::test]
    async fn test_bootstrap_restores_id_and_uses_it_in_requests() {
        let http = mock_body();
        let state = InMemoryStateStore::with_value(CONVERSATION_ID_KEY, "conv-9");
        let mut app = App::bootstrap(
            ClientConfig::default(),
            Arc::new(http.clone()),
            Arc::new(state),
        )
        .await;
        assert_eq!(app.id_source(), &IdSource::Restored);

        app.submit("hello").await.unwrap();
        let requests = http.get_requests();
        assert_eq!(requests[0].url, "http://localhost:8000/chat");
        let sent: ChatRequest = serde_json::from_str(&requests[0].body).unwrap();
        assert_eq!(sent.thread_id().as_str(), "conv-9");
        assert_eq!(app.snapshot().messages[1].text, "Hi");
    }

    #[tokio::test]
    async fn test_new_conversation_resets_and_persists() {
        let state = InMemoryStateStore::with_value(CONVERSATION_ID_KEY, "old");
        let mut app = App::bootstrap(
            ClientConfig::default(),
            Arc::new(mock_body()),
            Arc::new(state.clone()),
        )
        .await;
        app.submit("hello").await.unwrap();

        let id = app.new_conversation().await;
        assert_ne!(id.as_str(), "old");
        assert_eq!(app.conversation_id(), id);
        assert!(app.snapshot().messages.is_empty());
        assert_eq!(state.value(CONVERSATION_ID_KEY), Some(id.to_string()));
    }

    #[tokio::test]
    async fn test_new_conversation_survives_store_failure() {
        let state = InMemoryStateStore::with_value(CONVERSATION_ID_KEY, "old");
        let mut app = App::bootstrap(
            ClientConfig::default(),
            Arc::new(mock_body()),
            Arc::new(state.clone()),
        )
        .await;

        state.set_set_should_fail(true);
        let id = app.new_conversation().await;
        assert_eq!(app.conversation_id(), id);
        assert_eq!(state.value(CONVERSATION_ID_KEY), Some("old".to_string()));
    }

    #[tokio::test]
    async fn test_from_config_rejects_invalid_config() {
        let config = ClientConfig::default().with_max_line_bytes(0);
        assert!(App::from_config(config).await.is_err());
    }

    #[tokio::test]
    async fn test_from_config_with_explicit_state_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        let config = ClientConfig::default().with_state_path(&path);

        let app = App::from_config(config).await.unwrap();
        assert_eq!(app.id_source(), &IdSource::Generated);
        assert!(path.exists());
    }
}
