//! InMemory Session Registry 実装
//!
//! ドメイン層が定義する SessionRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用し、各セッションの入力中タイマーも
//! セッションのレコードと一緒に保持します。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, DisplayName, JoinOutcome, RemovedSession, RepositoryError, Session,
    SessionRepository, Timestamp, TypingSet, TypingTimer,
};

/// Registry entry: the session and its pending typing-expiry timer.
#[derive(Debug)]
struct SessionRecord {
    session: Session,
    typing_timer: Option<TypingTimer>,
}

/// インメモリ Session Registry 実装
#[derive(Debug, Default)]
pub struct InMemorySessionRepository {
    records: Mutex<HashMap<ConnectionId, SessionRecord>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn join(
        &self,
        connection_id: ConnectionId,
        name: DisplayName,
        joined_at: Timestamp,
    ) -> JoinOutcome {
        let mut records = self.records.lock().await;

        if let Some(record) = records.get_mut(&connection_id) {
            let previous = std::mem::replace(&mut record.session.name, name);
            return JoinOutcome::Renamed { previous };
        }

        records.insert(
            connection_id,
            SessionRecord {
                session: Session::new(connection_id, name, joined_at),
                typing_timer: None,
            },
        );
        JoinOutcome::Joined
    }

    async fn remove(&self, connection_id: &ConnectionId) -> Option<RemovedSession> {
        let mut records = self.records.lock().await;
        records.remove(connection_id).map(|record| RemovedSession {
            session: record.session,
            typing_timer: record.typing_timer,
        })
    }

    async fn get(&self, connection_id: &ConnectionId) -> Result<Session, RepositoryError> {
        let records = self.records.lock().await;
        records
            .get(connection_id)
            .map(|record| record.session.clone())
            .ok_or(RepositoryError::SessionNotFound(*connection_id))
    }

    async fn start_typing(
        &self,
        connection_id: &ConnectionId,
        signaled_at: Timestamp,
        timer: TypingTimer,
    ) -> Result<(), RepositoryError> {
        let mut records = self.records.lock().await;

        let Some(record) = records.get_mut(connection_id) else {
            timer.cancel();
            return Err(RepositoryError::SessionNotFound(*connection_id));
        };

        record.session.is_typing = true;
        record.session.last_typing_signal_at = Some(signaled_at);
        if let Some(superseded) = record.typing_timer.replace(timer) {
            superseded.cancel();
        }
        Ok(())
    }

    async fn stop_typing(&self, connection_id: &ConnectionId) -> Result<(), RepositoryError> {
        let mut records = self.records.lock().await;

        let record = records
            .get_mut(connection_id)
            .ok_or(RepositoryError::SessionNotFound(*connection_id))?;

        record.session.is_typing = false;
        if let Some(timer) = record.typing_timer.take() {
            timer.cancel();
        }
        Ok(())
    }

    async fn expire_typing(&self, connection_id: &ConnectionId, generation: u64) -> bool {
        let mut records = self.records.lock().await;

        let Some(record) = records.get_mut(connection_id) else {
            return false;
        };
        let is_current = record
            .typing_timer
            .as_ref()
            .is_some_and(|timer| timer.generation() == generation);
        if !is_current {
            return false;
        }

        // The expiring task is the caller; dropping its handle must not abort it.
        record.typing_timer = None;
        record.session.is_typing = false;
        true
    }

    async fn typing_set(&self) -> TypingSet {
        let records = self.records.lock().await;
        TypingSet::from_sessions(records.values().map(|record| &record.session))
    }

    async fn sessions(&self) -> Vec<Session> {
        let records = self.records.lock().await;
        let mut sessions: Vec<Session> = records
            .values()
            .map(|record| record.session.clone())
            .collect();
        sessions.sort_by(|a, b| {
            a.joined_at
                .cmp(&b.joined_at)
                .then_with(|| a.connection_id.cmp(&b.connection_id))
        });
        sessions
    }

    async fn count(&self) -> usize {
        self.records.lock().await.len()
    }
}
