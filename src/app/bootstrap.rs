//! Conversation id loading at startup.

use crate::models::ConversationId;
use crate::traits::{StateStore, CONVERSATION_ID_KEY};

/// Where the startup conversation id came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdSource {
    /// Read back from persisted state
    Restored,
    /// Nothing usable was persisted, so a fresh id was generated
    Generated,
}

/// Read the persisted conversation id, generating and saving a new one when
/// none is stored.
///
/// Storage failures never block startup: an unreadable store is treated as
/// empty and a failed write only loses the id for the next run.
pub(crate) async fn load_conversation_id(state: &dyn StateStore) -> (ConversationId, IdSource) {
    match state.get(CONVERSATION_ID_KEY).await {
        Ok(Some(id)) if !id.trim().is_empty() => {
            tracing::debug!("Restored conversation {}", id);
            return (ConversationId::from(id), IdSource::Restored);
        }
        Ok(_) => {}
        Err(e) => tracing::warn!("Could not read persisted conversation id: {}", e),
    }

    let id = ConversationId::generate();
    persist_conversation_id(state, &id).await;
    (id, IdSource::Generated)
}

/// Save `id` as the current conversation, logging failures.
pub(crate) async fn persist_conversation_id(state: &dyn StateStore, id: &ConversationId) {
    if let Err(e) = state.set(CONVERSATION_ID_KEY, id.as_str()).await {
        tracing::warn!("Could not persist conversation id {}: {}", id, e);
    }
}
