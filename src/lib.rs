//! chatline - a streaming NDJSON chat client core
//!
//! This library exposes modules for the binary and for integration tests.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod conductor;
pub mod config;
pub mod console;
pub mod debug;
pub mod error;
pub mod models;
pub mod ndjson;
pub mod state;
pub mod traits;
pub mod turn;
