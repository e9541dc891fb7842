//! WebSocket message types for chat communication.
//!
//! Every frame is a JSON envelope `{"event": <name>, "data": <payload>}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::chat::{ChatEvent, HubEvent, JoinRequest, MessageRequest, PresenceEntry};

/// Messages sent from client to server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Announce identity and join the room.
    JoinChat(JoinRequest),
    /// Send a chat message.
    SendMessage(MessageRequest),
}

impl ClientMessage {
    /// Parse a text frame.
    ///
    /// A `data` that is missing or not an object is read as an empty
    /// payload, so optional fields fall back to their defaults.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        let mut frame: Value = serde_json::from_str(text)?;
        if let Some(object) = frame.as_object_mut() {
            let data = object.entry("data").or_insert(Value::Null);
            if !data.is_object() {
                *data = Value::Object(Default::default());
            }
        }
        serde_json::from_value(frame)
    }
}

/// Messages sent from server to every client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// Full roster after a join or leave.
    OnlineUsersUpdate(Vec<PresenceEntry>),
    /// A new chat event.
    NewMessage(ChatEvent),
}

impl From<HubEvent> for ServerMessage {
    fn from(event: HubEvent) -> Self {
        match event {
            HubEvent::OnlineUsers(users) => ServerMessage::OnlineUsersUpdate(users),
            HubEvent::NewMessage(event) => ServerMessage::NewMessage(event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_chat_deserialize() {
        let json = r#"{"event": "join-chat", "data": {"username": "alice", "userId": "7"}}"#;
        let msg = ClientMessage::parse(json).unwrap();
        assert_eq!(
            msg,
            ClientMessage::JoinChat(JoinRequest {
                username: Some("alice".to_string()),
                user_id: Some("7".to_string()),
            })
        );
    }

    #[test]
    fn test_join_chat_empty_payload() {
        let msg = ClientMessage::parse(r#"{"event": "join-chat", "data": {}}"#).unwrap();
        assert_eq!(msg, ClientMessage::JoinChat(JoinRequest::default()));
    }

    #[test]
    fn test_join_chat_missing_payload() {
        let msg = ClientMessage::parse(r#"{"event": "join-chat"}"#).unwrap();
        assert_eq!(msg, ClientMessage::JoinChat(JoinRequest::default()));

        let msg = ClientMessage::parse(r#"{"event": "join-chat", "data": null}"#).unwrap();
        assert_eq!(msg, ClientMessage::JoinChat(JoinRequest::default()));
    }

    #[test]
    fn test_join_chat_non_object_payload() {
        for data in [r#""alice""#, "42", "[1, 2]", "true"] {
            let json = format!(r#"{{"event": "join-chat", "data": {data}}}"#);
            let msg = ClientMessage::parse(&json).unwrap();
            assert_eq!(msg, ClientMessage::JoinChat(JoinRequest::default()));
        }
    }

    #[test]
    fn test_join_chat_scalar_fields_become_text() {
        let json = r#"{"event": "join-chat", "data": {"username": 42, "userId": 7.5}}"#;
        let msg = ClientMessage::parse(json).unwrap();
        assert_eq!(
            msg,
            ClientMessage::JoinChat(JoinRequest {
                username: Some("42".to_string()),
                user_id: Some("7.5".to_string()),
            })
        );

        let json = r#"{"event": "join-chat", "data": {"username": "bob", "userId": true}}"#;
        let msg = ClientMessage::parse(json).unwrap();
        assert_eq!(
            msg,
            ClientMessage::JoinChat(JoinRequest {
                username: Some("bob".to_string()),
                user_id: Some("true".to_string()),
            })
        );
    }

    #[test]
    fn test_join_chat_structured_fields_are_absent() {
        let json = r#"{"event": "join-chat", "data": {"username": ["x"], "userId": {"id": 1}}}"#;
        let msg = ClientMessage::parse(json).unwrap();
        assert_eq!(msg, ClientMessage::JoinChat(JoinRequest::default()));

        let json = r#"{"event": "join-chat", "data": {"username": null, "userId": null}}"#;
        let msg = ClientMessage::parse(json).unwrap();
        assert_eq!(msg, ClientMessage::JoinChat(JoinRequest::default()));
    }

    #[test]
    fn test_send_message_deserialize() {
        let json = r#"{"event": "send-message", "data": {"content": "hi"}}"#;
        let msg = ClientMessage::parse(json).unwrap();
        assert_eq!(msg, ClientMessage::SendMessage(MessageRequest::new("hi")));
    }

    #[test]
    fn test_send_message_missing_content() {
        let msg = ClientMessage::parse(r#"{"event": "send-message", "data": {}}"#).unwrap();
        assert_eq!(msg, ClientMessage::SendMessage(MessageRequest::default()));
    }

    #[test]
    fn test_unknown_event_rejected() {
        assert!(ClientMessage::parse(r#"{"event": "typing", "data": {}}"#).is_err());
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(ClientMessage::parse("not json").is_err());
        assert!(ClientMessage::parse("[1, 2]").is_err());
    }

    #[test]
    fn test_online_users_update_serialize() {
        let msg = ServerMessage::OnlineUsersUpdate(vec![PresenceEntry {
            username: "alice".to_string(),
            user_id: "u1".to_string(),
            connection_id: "c1".to_string(),
            join_time: "10:00:00".to_string(),
        }]);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["event"], "online-users-update");
        assert_eq!(json["data"][0]["username"], "alice");
        assert_eq!(json["data"][0]["connectionId"], "c1");
    }

    #[test]
    fn test_new_message_serialize() {
        let msg = ServerMessage::from(HubEvent::NewMessage(ChatEvent::welcome(
            1, "系统", "alice", "10:00:00",
        )));
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["event"], "new-message");
        assert_eq!(json["data"]["type"], "system");
        assert_eq!(json["data"]["content"], "欢迎 alice 加入聊天！");
    }
}
