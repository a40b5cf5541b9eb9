//! Error handling for chatline.
//!
//! Three kinds of trouble can happen during a turn:
//!
//! | Kind | Type | Effect |
//! |------|------|--------|
//! | Request rejected | [`TurnError::RequestRejected`] | turn fails before any event |
//! | Malformed line | recorded on the turn report | stream continues |
//! | Transport fault | [`TurnError::Stream`] | turn fails, partial text discarded |
//!
//! None of them is fatal for the session. [`ChatError`] wraps these together
//! with store and config errors for the application layer.

mod category;
mod chat_error;
mod stream;
mod turn;

pub use category::ErrorCategory;
pub use chat_error::{ChatError, ChatResult};
pub use stream::StreamError;
pub use turn::{SubmitError, TurnError};
