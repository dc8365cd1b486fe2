//! Chat backend wire types
//!
//! Request and response bodies for the chat REST API. Responses are decoded
//! into these types; a body that does not match is rejected, never patched up.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-assigned room identifier
pub type RoomId = String;

/// A chat room as listed by `GET /rooms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
}

/// A single chat message as listed by `GET /rooms/{roomId}/messages`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub content: String,
    pub author: String,
    /// Server timestamp, kept verbatim
    pub created_at: String,
}

impl Message {
    /// Parse `created_at` as RFC 3339, if the server sent it in that form
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Body of a successful `POST /login` or `POST /accounts`
#[derive(Debug, Deserialize)]
pub struct SessionResponse {
    pub username: String,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoomListResponse {
    pub rooms: Vec<Room>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageListResponse {
    pub messages: Vec<Message>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_uses_camel_case_timestamp() {
        let json = r#"{"id":"m1","content":"hi","author":"alice","createdAt":"2024-05-01T10:00:00Z"}"#;
        let message: Message = serde_json::from_str(json).unwrap();
        assert_eq!(message.created_at, "2024-05-01T10:00:00Z");
        assert!(message.created_at_utc().is_some());
    }

    #[test]
    fn test_unparseable_timestamp_is_kept_verbatim() {
        let message = Message {
            id: "m1".into(),
            content: "hi".into(),
            author: "alice".into(),
            created_at: "yesterday-ish".into(),
        };
        assert!(message.created_at_utc().is_none());
        assert_eq!(message.created_at, "yesterday-ish");
    }

    #[test]
    fn test_room_list_missing_field_is_rejected() {
        let result: Result<RoomListResponse, _> = serde_json::from_str(r#"{"rooms":[{"id":"r1"}]}"#);
        assert!(result.is_err());
    }
}
