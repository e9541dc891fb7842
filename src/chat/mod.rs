//! Chat module for LearnSync.
//!
//! A single global chat room:
//! - Connection registry (online-user roster)
//! - In-memory message log
//! - Broadcast dispatcher that applies join/message/leave events and fans
//!   updates out to every open connection

mod event;
mod hub;
mod log;
mod registry;

pub use event::{ChatEvent, EventKind};
pub use hub::{
    ChatConnection, ChatHub, HubEvent, HubStats, JoinRequest, MessageRequest,
};
pub use log::{EventIdGenerator, MessageLog};
pub use registry::{ConnectionRegistry, PresenceEntry};
