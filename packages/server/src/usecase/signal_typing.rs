//! UseCase: 入力中シグナル処理
//!
//! 呼び出し元自身のセッションに対してのみ作用します。
//! クライアントが申告する名前は使わず、セッションの現在の名前が TypingSet に入ります。

use std::sync::Arc;

use crate::domain::{ConnectionId, SessionRepository};

use super::{error::SyncError, typing_presence::TypingPresence};

/// 入力中シグナルのユースケース
pub struct SignalTypingUseCase {
    sessions: Arc<dyn SessionRepository>,
    typing_presence: Arc<TypingPresence>,
}

impl SignalTypingUseCase {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        typing_presence: Arc<TypingPresence>,
    ) -> Self {
        Self {
            sessions,
            typing_presence,
        }
    }

    /// # Errors
    ///
    /// `NotJoined` before `join`; `SessionNotFound` if the session vanished
    /// between the check and the update.
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        is_typing: bool,
    ) -> Result<(), SyncError> {
        self.sessions
            .get(&connection_id)
            .await
            .map_err(|_| SyncError::NotJoined)?;

        self.typing_presence.signal(connection_id, is_typing).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{DisplayName, MockMessagePusher, Timestamp},
        infrastructure::repository::InMemorySessionRepository,
    };
    use natter_shared::time::{Clock, SystemClock};
    use std::time::Duration;

    fn create_usecase(
        pusher: MockMessagePusher,
    ) -> (SignalTypingUseCase, Arc<InMemorySessionRepository>) {
        let sessions = Arc::new(InMemorySessionRepository::new());
        let presence = Arc::new(TypingPresence::new(
            sessions.clone(),
            Arc::new(pusher),
            Arc::new(SystemClock),
            Duration::from_millis(1250),
        ));
        (SignalTypingUseCase::new(sessions.clone(), presence), sessions)
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_before_join_is_rejected() {
        // テスト項目: join 前の typing は NotJoined になり、ブロードキャストされない
        // given (前提条件):
        let mut pusher = MockMessagePusher::new();
        pusher.expect_publish().times(0);
        let (usecase, _sessions) = create_usecase(pusher);

        // when (操作):
        let result = usecase.execute(ConnectionId::generate(), true).await;

        // then (期待する結果):
        assert_eq!(result, Err(SyncError::NotJoined));
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_after_join_publishes_once() {
        // テスト項目: join 後の typing=true の連打でブロードキャストは 1 回だけ
        // given (前提条件):
        let mut pusher = MockMessagePusher::new();
        pusher.expect_publish().times(1).return_const(1usize);
        let (usecase, sessions) = create_usecase(pusher);
        let connection_id = ConnectionId::generate();
        sessions
            .join(
                connection_id,
                DisplayName::new("alice").unwrap(),
                Timestamp::new(SystemClock.now()),
            )
            .await;

        // when (操作):
        for _ in 0..5 {
            usecase.execute(connection_id, true).await.unwrap();
        }

        // then (期待する結果):
        assert!(sessions.get(&connection_id).await.unwrap().is_typing);
    }
}
