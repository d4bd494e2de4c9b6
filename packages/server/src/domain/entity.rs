//! Entities.

use super::{
    typing::TypingTimer,
    value_object::{ConnectionId, DisplayName, MessageBody, Sequence, Timestamp},
};

/// Chat message. Immutable once created.
///
/// `created_at` is stamped by the server; sequencing comes from the history
/// log, never from this field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub sender: DisplayName,
    pub body: MessageBody,
    pub created_at: Timestamp,
}

impl Message {
    pub fn new(sender: DisplayName, body: MessageBody, created_at: Timestamp) -> Self {
        Self {
            sender,
            body,
            created_at,
        }
    }
}

/// A message together with the sequence the history log assigned to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedMessage {
    pub sequence: Sequence,
    pub message: Message,
}

/// Server-side record binding one connection to a display name and typing state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub connection_id: ConnectionId,
    pub name: DisplayName,
    pub is_typing: bool,
    pub last_typing_signal_at: Option<Timestamp>,
    pub joined_at: Timestamp,
}

impl Session {
    pub fn new(connection_id: ConnectionId, name: DisplayName, joined_at: Timestamp) -> Self {
        Self {
            connection_id,
            name,
            is_typing: false,
            last_typing_signal_at: None,
            joined_at,
        }
    }
}

/// Result of a `join` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// A new session was created for the connection.
    Joined,
    /// The connection already had a session; only its name changed.
    Renamed { previous: DisplayName },
}

/// A session taken out of the registry, with the expiry timer it still owned.
///
/// The caller is responsible for cancelling the timer.
#[derive(Debug)]
pub struct RemovedSession {
    pub session: Session,
    pub typing_timer: Option<TypingTimer>,
}
