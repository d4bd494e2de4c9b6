//! WebSocket event DTOs.
//!
//! Every frame is a JSON object tagged by `type`. Field names follow the
//! reference web client (`name`, `message`, `timestamp`, `isTyping`).

use serde::{Deserialize, Serialize};

/// Client → server events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Bind a display name to the connection (or rename it).
    Join { name: String },

    /// Post a message. `name` and `timestamp` are accepted for compatibility
    /// but the server uses its own session name and clock.
    #[serde(rename_all = "camelCase")]
    CreateMessage {
        #[serde(default)]
        name: Option<String>,
        message: String,
        #[serde(default)]
        timestamp: Option<String>,
    },

    #[serde(rename_all = "camelCase")]
    Typing { is_typing: bool },

    /// Request the full history. `ack` is echoed in the `messages` reply.
    FindAllMessages {
        #[serde(default)]
        ack: Option<u64>,
    },
}

/// Message as seen on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDto {
    pub sequence: u64,
    pub name: String,
    pub message: String,
    /// RFC 3339, UTC, millisecond precision
    pub timestamp: String,
}

/// Server → client events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerEvent {
    /// A message was appended to the history (broadcast).
    Created(MessageDto),

    /// The full set of names currently typing (broadcast).
    UserTyping { names: Vec<String> },

    /// Reply to `findAllMessages` (caller only).
    Messages {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ack: Option<u64>,
        messages: Vec<MessageDto>,
    },

    /// A request was rejected (caller only).
    Error { code: String, message: String },
}

impl ServerEvent {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
