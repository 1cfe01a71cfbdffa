//! Chat identity, status, and message types.
//!
//! The orchestrator never owns the chat domain; it only reads these values to
//! decide what to fetch and when to renew the user's session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Opaque identifier of an existing chat.
///
/// Persisted under the session key so a reload within the same tab resumes
/// the conversation. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChatId(String);

impl ChatId {
    /// Build a chat id, rejecting empty or whitespace-only input.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == value.len() {
            Some(Self(value))
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ChatId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ChatId::new(value).ok_or_else(|| "chat id must not be empty".to_string())
    }
}

impl From<ChatId> for String {
    fn from(id: ChatId) -> Self {
        id.0
    }
}

/// Whether the chat window is in an open conversation.
///
/// The backend reports ended chats as `ENDED`; both spellings map to `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChatStatus {
    #[default]
    #[serde(alias = "ENDED")]
    Closed,
    Open,
}

impl fmt::Display for ChatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatStatus::Closed => write!(f, "closed"),
            ChatStatus::Open => write!(f, "open"),
        }
    }
}

impl FromStr for ChatStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(ChatStatus::Open),
            "closed" | "ended" => Ok(ChatStatus::Closed),
            other => Err(format!("invalid chat status: '{other}'")),
        }
    }
}

/// In-memory view of the current chat: its id (mirrored from the session
/// store) and its status (owned by chat-domain collaborators).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChatSession {
    pub chat_id: Option<ChatId>,
    pub status: ChatStatus,
}

impl ChatSession {
    pub fn is_open(&self) -> bool {
        self.status == ChatStatus::Open
    }
}

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthorRole {
    EndUser,
    BackofficeUser,
    Chatbot,
    Buerokratt,
}

/// A single chat message as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub chat_id: ChatId,
    pub author_role: AuthorRole,
    #[serde(default)]
    pub content: Option<String>,
    pub created: DateTime<Utc>,
}

/// Chat metadata returned by the fetch-chat call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatInfo {
    pub id: ChatId,
    pub status: ChatStatus,
    #[serde(default)]
    pub customer_support_display_name: Option<String>,
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub ended: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_id_rejects_blank() {
        assert!(ChatId::new("").is_none());
        assert!(ChatId::new("   ").is_none());
        assert_eq!(ChatId::new(" abc123 ").unwrap().as_str(), "abc123");
    }

    #[test]
    fn chat_status_accepts_ended_alias() {
        let status: ChatStatus = serde_json::from_str("\"ENDED\"").unwrap();
        assert_eq!(status, ChatStatus::Closed);
        let status: ChatStatus = serde_json::from_str("\"OPEN\"").unwrap();
        assert_eq!(status, ChatStatus::Open);
        assert_eq!("Ended".parse::<ChatStatus>().unwrap(), ChatStatus::Closed);
        assert!("paused".parse::<ChatStatus>().is_err());
    }

    #[test]
    fn message_deserializes_from_camel_case() {
        let json = r#"{
            "id": "m-1",
            "chatId": "abc123",
            "authorRole": "end-user",
            "content": "tere",
            "created": "2024-03-04T10:00:00Z"
        }"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.chat_id.as_str(), "abc123");
        assert_eq!(msg.author_role, AuthorRole::EndUser);
        assert_eq!(msg.content.as_deref(), Some("tere"));
    }

    #[test]
    fn chat_info_rejects_empty_id() {
        let json = r#"{"id": "", "status": "OPEN", "created": "2024-03-04T10:00:00Z"}"#;
        assert!(serde_json::from_str::<ChatInfo>(json).is_err());
    }
}
