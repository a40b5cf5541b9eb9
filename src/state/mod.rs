//! Conversation state
//!
//! - [`ConversationSession`]: the observable snapshot
//! - [`ConversationStore`]: its single writer

pub mod session;
pub mod store;

pub use session::{ConversationSession, SessionStatus};
pub use store::ConversationStore;
