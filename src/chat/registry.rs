//! Connection registry: the online-user roster.

use std::collections::HashMap;

use serde::Serialize;

/// Public roster record for a joined connection.
///
/// Serializes to `{ username, userId, connectionId, joinTime }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceEntry {
    /// Display name.
    pub username: String,
    /// External user ID (the connection ID when the client gave none).
    pub user_id: String,
    /// Connection ID.
    pub connection_id: String,
    /// Human-readable join time.
    pub join_time: String,
}

/// Registry of joined connections keyed by connection ID.
///
/// Not synchronized; the owner serializes access.
#[derive(Debug)]
pub struct ConnectionRegistry {
    /// Display name for clients that join without one.
    anonymous_name: String,
    /// Entries with their join sequence number.
    entries: HashMap<String, (u64, PresenceEntry)>,
    /// Next join sequence number.
    next_seq: u64,
}

impl ConnectionRegistry {
    /// Create an empty registry.
    pub fn new(anonymous_name: impl Into<String>) -> Self {
        Self {
            anonymous_name: anonymous_name.into(),
            entries: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Register presence for a connection.
    ///
    /// A missing or blank `display_name` becomes the anonymous name and a
    /// missing or blank `user_id` becomes the connection ID. An existing entry
    /// for the same connection is replaced.
    pub fn join(
        &mut self,
        connection_id: &str,
        display_name: Option<String>,
        user_id: Option<String>,
        join_time: impl Into<String>,
    ) -> PresenceEntry {
        let entry = PresenceEntry {
            username: non_blank(display_name).unwrap_or_else(|| self.anonymous_name.clone()),
            user_id: non_blank(user_id).unwrap_or_else(|| connection_id.to_string()),
            connection_id: connection_id.to_string(),
            join_time: join_time.into(),
        };

        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries
            .insert(connection_id.to_string(), (seq, entry.clone()));
        entry
    }

    /// Remove a connection's entry, returning it if it existed.
    pub fn remove(&mut self, connection_id: &str) -> Option<PresenceEntry> {
        self.entries.remove(connection_id).map(|(_, entry)| entry)
    }

    /// Get a connection's entry.
    pub fn get(&self, connection_id: &str) -> Option<&PresenceEntry> {
        self.entries.get(connection_id).map(|(_, entry)| entry)
    }

    /// Snapshot of all entries in join order.
    pub fn list_all(&self) -> Vec<PresenceEntry> {
        let mut entries: Vec<_> = self.entries.values().collect();
        entries.sort_by_key(|(seq, _)| *seq);
        entries.into_iter().map(|(_, entry)| entry.clone()).collect()
    }

    /// Number of joined connections.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether nobody is joined.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
