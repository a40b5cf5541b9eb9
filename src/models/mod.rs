mod message;
mod request;

pub use message::{ConversationId, Message, MessageId, MessageRole};
pub use request::{ChatInput, ChatRequest, Configurable, InputMessage, RequestConfig};
