//! LearnSync chat server
//!
//! Online-user roster and a single broadcast chat room for the LearnSync
//! study-group app, served over WebSocket with a read-only HTTP snapshot API.

pub mod chat;
pub mod config;
pub mod datetime;
pub mod error;
pub mod logging;
pub mod web;

pub use chat::{
    ChatConnection, ChatEvent, ChatHub, EventKind, HubEvent, HubStats, JoinRequest,
    MessageRequest, PresenceEntry,
};
pub use config::Config;
pub use error::{LearnSyncError, Result};
pub use web::WebServer;
