//! Conversion logic between DTOs and domain entities.

use crate::domain::{BroadcastEvent, LoggedMessage, Session, TypingSet};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// Domain Entity → DTO
// ========================================

impl From<LoggedMessage> for dto::MessageDto {
    fn from(entry: LoggedMessage) -> Self {
        Self {
            sequence: entry.sequence.value(),
            name: entry.message.sender.into_string(),
            message: entry.message.body.into_string(),
            timestamp: entry.message.created_at.to_rfc3339(),
        }
    }
}

impl From<&TypingSet> for dto::ServerEvent {
    fn from(set: &TypingSet) -> Self {
        Self::UserTyping {
            names: set.to_names(),
        }
    }
}

impl From<&BroadcastEvent> for dto::ServerEvent {
    fn from(event: &BroadcastEvent) -> Self {
        match event {
            BroadcastEvent::MessageCreated(entry) => Self::Created(entry.clone().into()),
            BroadcastEvent::TypingChanged(set) => set.into(),
        }
    }
}

impl From<Session> for http::SessionDto {
    fn from(session: Session) -> Self {
        Self {
            connection_id: session.connection_id.to_string(),
            name: session.name.into_string(),
            is_typing: session.is_typing,
            last_typing_signal_at: session.last_typing_signal_at.map(|at| at.to_rfc3339()),
            joined_at: session.joined_at.to_rfc3339(),
        }
    }
}
