//! # DeskRAG: Document-Grounded Helpdesk Assistant Core
//!
//! Retrieval, answer composition and ticket routing for an internal
//! helpdesk platform. Documents are chunked and embedded, questions are
//! answered from semantically relevant chunks, and the system degrades
//! through multilingual keyword search down to canned answers when the
//! embedding or chat provider is unavailable.

#[cfg(feature = "web-server")]
pub mod api;
pub mod config;
pub mod core;
pub mod models;
pub mod storage;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::Settings;
pub use models::{Document, DocumentChunk, QaResult, RoutingDecision};
pub use utils::{Error, Result};

/// Current version of the DeskRAG core
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the DeskRAG library with default configuration
pub fn init() -> Result<()> {
    utils::logging::init_tracing()
}
