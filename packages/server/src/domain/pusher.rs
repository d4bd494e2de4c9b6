//! Broadcast Bus interface.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, LoggedMessage, MessagePushError, TypingSet};

/// Outbound queue of one connection. Bounded; a full queue marks a slow consumer.
pub type PusherChannel = mpsc::Sender<String>;

/// Events fanned out to every registered connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastEvent {
    MessageCreated(LoggedMessage),
    TypingChanged(TypingSet),
}

/// Delivers content to connections.
///
/// Implementations must deliver published events to each recipient in publish
/// order and must never let one recipient delay the others.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// Queue `content` for a single connection.
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: String,
    ) -> Result<(), MessagePushError>;

    /// Fan `event` out to every registered connection.
    ///
    /// Returns the number of connections the event was queued for.
    async fn publish(&self, event: &BroadcastEvent) -> usize;

    async fn count_clients(&self) -> usize;
}
