//! Web module for LearnSync.
//!
//! Serves the read-only snapshot API and the chat WebSocket endpoint.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;
pub mod ws;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
