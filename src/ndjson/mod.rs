//! Newline-delimited JSON stream decoding.
//!
//! A response body arrives as arbitrary byte chunks. [`FrameDecoder`] turns
//! those chunks into complete text lines, and [`parse_line`] turns each line
//! into a [`StreamEvent`].

pub mod events;
pub mod frame;
pub mod parser;
mod payloads;

pub use events::StreamEvent;
pub use frame::FrameDecoder;
pub use parser::parse_line;
