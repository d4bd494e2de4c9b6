//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{
    ConnectionId, DisplayName, JoinOutcome, LoggedMessage, Message, RemovedSession,
    RepositoryError, Session, Timestamp, TypingSet, TypingTimer,
};

/// Session Registry
///
/// One session per connection. Every operation on a single connection is
/// applied atomically; iteration sees a consistent view of all sessions.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Create the session for `connection_id`, or rename it if it already exists.
    async fn join(
        &self,
        connection_id: ConnectionId,
        name: DisplayName,
        joined_at: Timestamp,
    ) -> JoinOutcome;

    /// Remove the session. Returns `None` when there was nothing to remove.
    async fn remove(&self, connection_id: &ConnectionId) -> Option<RemovedSession>;

    async fn get(&self, connection_id: &ConnectionId) -> Result<Session, RepositoryError>;

    /// Mark the session as typing and store `timer` as its pending expiry.
    ///
    /// A previously stored timer is cancelled. If the session does not exist the
    /// given timer is cancelled and `SessionNotFound` is returned.
    async fn start_typing(
        &self,
        connection_id: &ConnectionId,
        signaled_at: Timestamp,
        timer: TypingTimer,
    ) -> Result<(), RepositoryError>;

    /// Explicit `typing=false`: clear the flag and cancel the pending expiry.
    async fn stop_typing(&self, connection_id: &ConnectionId) -> Result<(), RepositoryError>;

    /// Expire the typing flag if `generation` is still the current timer.
    ///
    /// Returns `true` when the flag was flipped.
    async fn expire_typing(&self, connection_id: &ConnectionId, generation: u64) -> bool;

    async fn typing_set(&self) -> TypingSet;

    /// All sessions ordered by join time.
    async fn sessions(&self) -> Vec<Session>;

    async fn count(&self) -> usize;
}

/// History Log
///
/// Append-only; entries are never updated, reordered or removed.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Append a message and return it with its assigned sequence.
    async fn append(&self, message: Message) -> LoggedMessage;

    /// Every entry in append order.
    async fn snapshot(&self) -> Vec<LoggedMessage>;

    async fn len(&self) -> usize;
}
