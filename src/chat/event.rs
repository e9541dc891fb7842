//! Chat events recorded in the message log.

use serde::Serialize;

/// Kind of chat event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Message typed by a joined user.
    User,
    /// Join/leave notice generated by the server.
    System,
}

impl EventKind {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::User => "user",
            EventKind::System => "system",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable chat event.
///
/// Serializes to the `new-message` payload:
/// `{ id, content, sender, time, type }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatEvent {
    /// Millisecond-based identifier, increasing in log order.
    pub id: i64,
    /// Message body.
    pub content: String,
    /// Sender display name, or the system label.
    pub sender: String,
    /// Human-readable time of creation.
    pub time: String,
    /// Event kind.
    #[serde(rename = "type")]
    pub kind: EventKind,
}

impl ChatEvent {
    /// Create a user message.
    pub fn user(
        id: i64,
        sender: impl Into<String>,
        content: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            id,
            content: content.into(),
            sender: sender.into(),
            time: time.into(),
            kind: EventKind::User,
        }
    }

    /// Create a system notice.
    pub fn system(
        id: i64,
        system_sender: impl Into<String>,
        content: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            id,
            content: content.into(),
            sender: system_sender.into(),
            time: time.into(),
            kind: EventKind::System,
        }
    }

    /// Create the welcome notice broadcast when `name` joins.
    pub fn welcome(id: i64, system_sender: &str, name: &str, time: impl Into<String>) -> Self {
        Self::system(id, system_sender, format!("欢迎 {name} 加入聊天！"), time)
    }

    /// Create the notice broadcast when `name` disconnects.
    pub fn farewell(id: i64, system_sender: &str, name: &str, time: impl Into<String>) -> Self {
        Self::system(id, system_sender, format!("{name} 离开了聊天"), time)
    }
}
