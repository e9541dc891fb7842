//! Response DTOs for the snapshot API.

use serde::Serialize;

use crate::chat::{ChatEvent, PresenceEntry};

/// Health check response (`GET /api/health`).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Always "OK" while the process serves requests.
    pub status: &'static str,
    /// Human-readable status message.
    pub message: &'static str,
    /// Number of joined connections.
    pub online_users: usize,
    /// Number of retained chat events.
    pub total_messages: usize,
    /// RFC 3339 server time.
    pub timestamp: String,
}

/// Message log response (`GET /api/messages`).
#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    /// Always true.
    pub success: bool,
    /// Chat events in log order.
    pub messages: Vec<ChatEvent>,
    /// Number of events.
    pub total: usize,
}

impl MessagesResponse {
    /// Create a response from a log snapshot.
    pub fn new(messages: Vec<ChatEvent>) -> Self {
        Self {
            success: true,
            total: messages.len(),
            messages,
        }
    }
}

/// Roster response (`GET /api/online-users`).
#[derive(Debug, Serialize)]
pub struct OnlineUsersResponse {
    /// Always true.
    pub success: bool,
    /// Joined connections.
    pub users: Vec<PresenceEntry>,
    /// Number of joined connections.
    pub total: usize,
}

impl OnlineUsersResponse {
    /// Create a response from a roster snapshot.
    pub fn new(users: Vec<PresenceEntry>) -> Self {
        Self {
            success: true,
            total: users.len(),
            users,
        }
    }
}
