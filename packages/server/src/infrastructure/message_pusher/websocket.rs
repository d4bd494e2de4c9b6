//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの送信キュー（有界 `mpsc::Sender`）を管理
//! - 単一接続への送信（push_to）と全接続へのブロードキャスト（publish）
//!
//! ## 設計ノート
//!
//! WebSocket の生成と送信ループは UI 層（`ui/handler/websocket.rs`）が担当します。
//! この実装はキューへの投入のみを行い、決して await で待ちません。
//! キューが満杯の接続は遅いコンシューマとみなして登録を解除します。
//! 送信側が破棄されるとその接続の送信ループが終了し、接続が閉じられます。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc::error::TrySendError};

use crate::{
    domain::{BroadcastEvent, ConnectionId, MessagePushError, MessagePusher, PusherChannel},
    infrastructure::dto::websocket::ServerEvent,
};

/// WebSocket を使った MessagePusher 実装
///
/// The client map lock is held for the whole fan-out, so concurrent publishes
/// are serialized and every connection receives events in publish order.
#[derive(Debug, Default)]
pub struct WebSocketMessagePusher {
    /// Key: connection id, Value: outbound queue of that connection
    clients: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Queue `content` without waiting. On failure the caller drops the connection.
fn offer(
    connection_id: &ConnectionId,
    sender: &PusherChannel,
    content: String,
) -> Result<(), MessagePushError> {
    sender.try_send(content).map_err(|e| {
        let reason = match e {
            TrySendError::Full(_) => "outbound queue is full",
            TrySendError::Closed(_) => "connection is closed",
        };
        MessagePushError::PushFailed(*connection_id, reason.to_string())
    })
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(connection_id, sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        if clients.remove(connection_id).is_some() {
            tracing::debug!("Connection '{}' unregistered from MessagePusher", connection_id);
        }
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: String,
    ) -> Result<(), MessagePushError> {
        let mut clients = self.clients.lock().await;

        let sender = clients
            .get(connection_id)
            .ok_or(MessagePushError::ClientNotFound(*connection_id))?;

        if let Err(e) = offer(connection_id, sender, content) {
            clients.remove(connection_id);
            tracing::warn!("Dropping connection: {}", e);
            return Err(e);
        }
        tracing::debug!("Pushed content to connection '{}'", connection_id);
        Ok(())
    }

    async fn publish(&self, event: &BroadcastEvent) -> usize {
        let content = match ServerEvent::from(event).to_json() {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize broadcast event: {}", e);
                return 0;
            }
        };

        let mut clients = self.clients.lock().await;

        let mut dropped = Vec::new();
        for (connection_id, sender) in clients.iter() {
            // ブロードキャストでは一部の送信失敗を許容
            if let Err(e) = offer(connection_id, sender, content.clone()) {
                tracing::warn!("Dropping connection during broadcast: {}", e);
                dropped.push(*connection_id);
            }
        }
        for connection_id in &dropped {
            clients.remove(connection_id);
        }

        let delivered = clients.len();
        tracing::debug!(
            "Broadcasted event to {} connection(s) ({} dropped)",
            delivered,
            dropped.len()
        );
        delivered
    }

    async fn count_clients(&self) -> usize {
        self.clients.lock().await.len()
    }
}
