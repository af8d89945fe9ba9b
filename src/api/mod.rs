// API modules
pub mod documents;
pub mod health;
pub mod qa;
pub mod tickets;
pub mod types;

// Re-exports
pub use types::*;

// Core API functionality
pub mod router;
pub use router::{create_api_router, AppState};
