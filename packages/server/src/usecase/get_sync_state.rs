//! UseCase: 同期状態の取得（デバッグ用）

use std::sync::Arc;

use crate::domain::{HistoryRepository, MessagePusher, Session, SessionRepository, TypingSet};

use super::typing_presence::TypingPresence;

/// Point-in-time view of the synchronization core
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncState {
    pub connections: usize,
    pub sessions: Vec<Session>,
    pub typing: TypingSet,
    pub message_count: usize,
}

/// 同期状態取得のユースケース
pub struct GetSyncStateUseCase {
    sessions: Arc<dyn SessionRepository>,
    history: Arc<dyn HistoryRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    typing_presence: Arc<TypingPresence>,
}

impl GetSyncStateUseCase {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        history: Arc<dyn HistoryRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        typing_presence: Arc<TypingPresence>,
    ) -> Self {
        Self {
            sessions,
            history,
            message_pusher,
            typing_presence,
        }
    }

    pub async fn execute(&self) -> SyncState {
        SyncState {
            connections: self.message_pusher.count_clients().await,
            sessions: self.sessions.sessions().await,
            typing: self.typing_presence.current().await,
            message_count: self.history.len().await,
        }
    }
}
