//! UseCase: クライアント接続処理
//!
//! 接続直後（join 前）のクライアントの送信キューを Broadcast Bus に登録します。
//! join 前でもブロードキャストは受け取れます。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel};

/// クライアント接続のユースケース
pub struct ConnectClientUseCase {
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectClientUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// Register the connection's outbound queue.
    pub async fn execute(&self, connection_id: ConnectionId, sender: PusherChannel) {
        self.message_pusher
            .register_client(connection_id, sender)
            .await;
    }

    /// Send a reply (snapshot, error notice) to this connection only.
    ///
    /// Goes through the same queue as broadcasts, so it is ordered with them.
    pub async fn reply(
        &self,
        connection_id: &ConnectionId,
        content: String,
    ) -> Result<(), MessagePushError> {
        self.message_pusher.push_to(connection_id, content).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::message_pusher::WebSocketMessagePusher;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_connect_registers_outbound_queue() {
        // テスト項目: 接続すると送信キューが登録され、返信を受け取れる
        // given (前提条件):
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = ConnectClientUseCase::new(pusher.clone());
        let connection_id = ConnectionId::generate();
        let (tx, mut rx) = mpsc::channel(4);

        // when (操作):
        usecase.execute(connection_id, tx).await;
        let result = usecase.reply(&connection_id, "pong".to_string()).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(pusher.count_clients().await, 1);
        assert_eq!(rx.recv().await, Some("pong".to_string()));
    }

    #[tokio::test]
    async fn test_reply_to_unknown_connection_fails() {
        // テスト項目: 登録されていない接続への返信はエラーになる
        // given (前提条件):
        let usecase = ConnectClientUseCase::new(Arc::new(WebSocketMessagePusher::new()));
        let connection_id = ConnectionId::generate();

        // when (操作):
        let result = usecase.reply(&connection_id, "pong".to_string()).await;

        // then (期待する結果):
        assert_eq!(result, Err(MessagePushError::ClientNotFound(connection_id)));
    }
}
