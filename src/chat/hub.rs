//! Broadcast dispatcher for the global chat room.
//!
//! `ChatHub` owns the roster and the message log. Every state change is
//! applied and fanned out to all subscribed connections while holding a
//! single lock, so the log order matches the delivery order seen by every
//! connection.

use chrono::Utc;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tokio::sync::{broadcast, Mutex};

use super::event::ChatEvent;
use super::log::{EventIdGenerator, MessageLog};
use super::registry::{ConnectionRegistry, PresenceEntry};
use crate::config::{ChatConfig, Config, MAX_CHANNEL_CAPACITY};
use crate::datetime::format_utc_datetime;

/// Payload of a `join-chat` announcement.
///
/// Fields are read leniently: numbers and booleans are taken as their
/// text form, any other non-string value counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JoinRequest {
    /// Display name (defaults to the anonymous name).
    #[serde(deserialize_with = "lenient_string")]
    pub username: Option<String>,
    /// External user ID (defaults to the connection ID).
    #[serde(deserialize_with = "lenient_string")]
    pub user_id: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

impl JoinRequest {
    /// Create a join request with a display name.
    pub fn named(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            user_id: None,
        }
    }
}

/// Payload of a `send-message` request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MessageRequest {
    /// Message body; whitespace-only bodies are dropped.
    pub content: String,
}

impl MessageRequest {
    /// Create a message request.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Update pushed to every connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HubEvent {
    /// The full roster after a join or leave.
    OnlineUsers(Vec<PresenceEntry>),
    /// A newly logged chat event.
    NewMessage(ChatEvent),
}

/// Counters for the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HubStats {
    /// Number of joined connections.
    pub online_users: usize,
    /// Number of retained chat events.
    pub total_messages: usize,
}

/// An open transport session, subscribed to hub updates.
#[derive(Debug)]
pub struct ChatConnection {
    /// Connection ID.
    pub id: String,
    /// Receiver for hub updates.
    pub events: broadcast::Receiver<HubEvent>,
}

struct HubState {
    registry: ConnectionRegistry,
    log: MessageLog,
    ids: EventIdGenerator,
}

/// The chat room: roster, message log and broadcast fan-out.
pub struct ChatHub {
    state: Mutex<HubState>,
    sender: broadcast::Sender<HubEvent>,
    system_sender: String,
    timezone: String,
    time_format: String,
}

impl ChatHub {
    /// Create a new hub.
    pub fn new(config: &ChatConfig, timezone: impl Into<String>) -> Self {
        let capacity = config.channel_capacity.clamp(1, MAX_CHANNEL_CAPACITY);
        let (sender, _) = broadcast::channel(capacity);
        Self {
            state: Mutex::new(HubState {
                registry: ConnectionRegistry::new(&config.anonymous_name),
                log: MessageLog::with_limit(config.history_limit),
                ids: EventIdGenerator::new(),
            }),
            sender,
            system_sender: config.system_sender.clone(),
            timezone: timezone.into(),
            time_format: config.time_format.clone(),
        }
    }

    /// Create a hub from the application configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.chat, &config.server.timezone)
    }

    /// Open a connection.
    ///
    /// The connection receives every update broadcast from now on, but is
    /// not on the roster until it joins.
    pub fn connect(&self) -> ChatConnection {
        let connection = ChatConnection {
            id: uuid::Uuid::new_v4().to_string(),
            events: self.sender.subscribe(),
        };
        tracing::debug!(connection_id = %connection.id, "Connection opened");
        connection
    }

    /// Handle a `join-chat` announcement.
    ///
    /// Broadcasts the roster first, then logs and broadcasts the welcome
    /// notice.
    pub async fn join(&self, connection_id: &str, request: JoinRequest) -> PresenceEntry {
        let mut state = self.state.lock().await;
        let (id, time) = self.stamp(&mut state);

        let entry = state
            .registry
            .join(connection_id, request.username, request.user_id, time.clone());
        tracing::info!(
            connection_id,
            username = %entry.username,
            user_id = %entry.user_id,
            "User joined chat"
        );

        let roster = state.registry.list_all();
        self.broadcast(HubEvent::OnlineUsers(roster));

        let welcome = ChatEvent::welcome(id, &self.system_sender, &entry.username, time);
        self.record(&mut state, welcome);

        entry
    }

    /// Handle a `send-message` request.
    ///
    /// Returns the logged event, or `None` when the message was dropped
    /// because the connection has not joined or the content is blank.
    pub async fn send_message(
        &self,
        connection_id: &str,
        request: MessageRequest,
    ) -> Option<ChatEvent> {
        let content = request.content.trim();
        let mut state = self.state.lock().await;

        let Some(sender) = state.registry.get(connection_id).map(|e| e.username.clone()) else {
            tracing::debug!(connection_id, "Dropping message from connection that has not joined");
            return None;
        };
        if content.is_empty() {
            tracing::debug!(connection_id, "Dropping blank message");
            return None;
        }

        let (id, time) = self.stamp(&mut state);
        let event = ChatEvent::user(id, &sender, content, time);
        tracing::info!(connection_id, sender = %sender, content, "Chat message");
        self.record(&mut state, event.clone());
        Some(event)
    }

    /// Handle a transport close.
    ///
    /// For a joined connection, broadcasts the roster and then logs and
    /// broadcasts the leave notice. Does nothing for a connection that never
    /// joined.
    pub async fn disconnect(&self, connection_id: &str) -> Option<PresenceEntry> {
        let mut state = self.state.lock().await;

        let Some(entry) = state.registry.remove(connection_id) else {
            tracing::debug!(connection_id, "Connection closed before joining");
            return None;
        };
        tracing::info!(connection_id, username = %entry.username, "User left chat");

        let roster = state.registry.list_all();
        self.broadcast(HubEvent::OnlineUsers(roster));

        let (id, time) = self.stamp(&mut state);
        let farewell = ChatEvent::farewell(id, &self.system_sender, &entry.username, time);
        self.record(&mut state, farewell);

        Some(entry)
    }

    /// Snapshot of the roster.
    pub async fn online_users(&self) -> Vec<PresenceEntry> {
        self.state.lock().await.registry.list_all()
    }

    /// Snapshot of the message log.
    pub async fn messages(&self) -> Vec<ChatEvent> {
        self.state.lock().await.log.all()
    }

    /// Current counters.
    pub async fn stats(&self) -> HubStats {
        let state = self.state.lock().await;
        HubStats {
            online_users: state.registry.len(),
            total_messages: state.log.count(),
        }
    }

    /// Allocate an event ID and a display time for "now".
    fn stamp(&self, state: &mut HubState) -> (i64, String) {
        let now = Utc::now();
        let id = state.ids.next_at(now.timestamp_millis());
        let time = format_utc_datetime(&now, &self.timezone, &self.time_format);
        (id, time)
    }

    /// Append an event to the log and broadcast it.
    fn record(&self, state: &mut HubState, event: ChatEvent) {
        state.log.append(event.clone());
        self.broadcast(HubEvent::NewMessage(event));
    }

    /// Broadcast an update.
    ///
    /// Returns the number of connections that received it.
    fn broadcast(&self, event: HubEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}
