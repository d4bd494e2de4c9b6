//! UseCase: 切断処理
//!
//! 以降のブロードキャスト対象から外し、セッションを削除します。
//! 入力中だった場合は保留中のタイマーをキャンセルし、TypingSet を再計算します。
//! 何度呼んでも安全です。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, Session};

use super::typing_presence::TypingPresence;

/// 切断のユースケース
pub struct DisconnectClientUseCase {
    message_pusher: Arc<dyn MessagePusher>,
    typing_presence: Arc<TypingPresence>,
}

impl DisconnectClientUseCase {
    pub fn new(
        message_pusher: Arc<dyn MessagePusher>,
        typing_presence: Arc<TypingPresence>,
    ) -> Self {
        Self {
            message_pusher,
            typing_presence,
        }
    }

    /// Returns the removed session, or `None` if the connection never joined.
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<Session> {
        self.message_pusher.unregister_client(connection_id).await;
        self.typing_presence.forget(connection_id).await
    }
}
