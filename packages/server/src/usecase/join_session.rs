//! UseCase: join 処理
//!
//! 接続に表示名を結びつけます。同じ接続での再 join は改名として扱い、
//! セッションを重複させません。join 自体は何もブロードキャストしませんが、
//! 入力中のセッションが改名された場合は TypingSet が変わるため再計算します。

use std::sync::Arc;

use natter_shared::time::Clock;

use crate::domain::{ConnectionId, DisplayName, JoinOutcome, SessionRepository, Timestamp};

use super::{error::SyncError, typing_presence::TypingPresence};

/// join のユースケース
pub struct JoinSessionUseCase {
    sessions: Arc<dyn SessionRepository>,
    typing_presence: Arc<TypingPresence>,
    clock: Arc<dyn Clock>,
}

impl JoinSessionUseCase {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        typing_presence: Arc<TypingPresence>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sessions,
            typing_presence,
            clock,
        }
    }

    /// join を実行
    ///
    /// # Errors
    ///
    /// `InvalidName` if the name is empty or whitespace after trimming, or too long.
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        name: &str,
    ) -> Result<JoinOutcome, SyncError> {
        let name = DisplayName::new(name).map_err(SyncError::InvalidName)?;

        let outcome = self
            .sessions
            .join(connection_id, name, Timestamp::new(self.clock.now()))
            .await;

        if let JoinOutcome::Renamed { previous } = &outcome {
            tracing::debug!("Connection '{}' renamed from '{}'", connection_id, previous);
            self.typing_presence.refresh().await;
        }

        Ok(outcome)
    }
}
