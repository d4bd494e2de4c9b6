//! UseCase: メッセージ作成処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CreateMessageUseCase::execute() メソッド
//! - 履歴への追記と全接続へのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 送信者名はクライアントの申告ではなくセッションの名前でなければならない
//! - join 前の送信や空の本文は履歴にもブロードキャストにも影響してはならない
//! - 並行な送信でもブロードキャスト順が履歴の順と一致しなければならない

use std::sync::Arc;

use natter_shared::time::Clock;
use tokio::sync::Mutex;

use crate::domain::{
    BroadcastEvent, ConnectionId, HistoryRepository, LoggedMessage, Message, MessageBody,
    MessagePusher, SessionRepository, Timestamp,
};

use super::error::SyncError;

/// メッセージ作成のユースケース
pub struct CreateMessageUseCase {
    sessions: Arc<dyn SessionRepository>,
    history: Arc<dyn HistoryRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    /// Serializes append + publish so broadcast order equals log order
    ordering: Arc<Mutex<()>>,
}

impl CreateMessageUseCase {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        history: Arc<dyn HistoryRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sessions,
            history,
            message_pusher,
            clock,
            ordering: Arc::new(Mutex::new(())),
        }
    }

    /// メッセージ作成を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 送信元の接続
    /// * `body` - メッセージ本文（未検証）
    /// * `claimed_name` - クライアントが申告した送信者名（記録には使わない）
    ///
    /// # Errors
    ///
    /// `NotJoined` before `join`, `InvalidMessage` for an empty or oversized body.
    /// In both cases nothing is appended or broadcast. `Internal` if the
    /// append/publish task panicked.
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        body: &str,
        claimed_name: Option<&str>,
    ) -> Result<LoggedMessage, SyncError> {
        let session = self
            .sessions
            .get(&connection_id)
            .await
            .map_err(|_| SyncError::NotJoined)?;
        let body = MessageBody::new(body).map_err(SyncError::InvalidMessage)?;

        if let Some(claimed) = claimed_name
            && claimed.trim() != session.name.as_str()
        {
            tracing::warn!(
                "Connection '{}' claimed sender '{}' but is joined as '{}'; using session name",
                connection_id,
                claimed,
                session.name
            );
        }

        // Append and publish run in their own task: aborting the caller after
        // the append must not drop the broadcast.
        let history = self.history.clone();
        let message_pusher = self.message_pusher.clone();
        let clock = self.clock.clone();
        let ordering = self.ordering.clone();
        let sender = session.name;
        let (entry, delivered) = tokio::spawn(async move {
            let _ordering = ordering.lock().await;

            let message = Message::new(sender, body, Timestamp::new(clock.now()));
            let entry = history.append(message).await;
            let delivered = message_pusher
                .publish(&BroadcastEvent::MessageCreated(entry.clone()))
                .await;
            (entry, delivered)
        })
        .await
        .map_err(|e| SyncError::Internal(e.to_string()))?;

        tracing::info!(
            "Message #{} from '{}' broadcast to {} connection(s)",
            entry.sequence.value(),
            entry.message.sender,
            delivered
        );
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            DisplayName, MessagePushError, MockMessagePusher, PusherChannel, ValueObjectError,
        },
        infrastructure::{
            message_pusher::WebSocketMessagePusher,
            repository::{InMemoryHistoryRepository, InMemorySessionRepository},
        },
    };
    use natter_shared::time::{FixedClock, SystemClock};
    use std::time::Duration;
    use tokio::sync::mpsc;

    /// Holds every `publish` until the test releases `gate`.
    struct GatedPusher {
        gate: Arc<Mutex<()>>,
        inner: WebSocketMessagePusher,
    }

    #[async_trait::async_trait]
    impl MessagePusher for GatedPusher {
        async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
            self.inner.register_client(connection_id, sender).await;
        }

        async fn unregister_client(&self, connection_id: &ConnectionId) {
            self.inner.unregister_client(connection_id).await;
        }

        async fn push_to(
            &self,
            connection_id: &ConnectionId,
            content: String,
        ) -> Result<(), MessagePushError> {
            self.inner.push_to(connection_id, content).await
        }

        async fn publish(&self, event: &BroadcastEvent) -> usize {
            let _gate = self.gate.lock().await;
            self.inner.publish(event).await
        }

        async fn count_clients(&self) -> usize {
            self.inner.count_clients().await
        }
    }

    struct Fixture {
        usecase: Arc<CreateMessageUseCase>,
        sessions: Arc<InMemorySessionRepository>,
        history: Arc<InMemoryHistoryRepository>,
    }

    fn fixture(pusher: Arc<dyn MessagePusher>) -> Fixture {
        let sessions = Arc::new(InMemorySessionRepository::new());
        let history = Arc::new(InMemoryHistoryRepository::new());
        let usecase = Arc::new(CreateMessageUseCase::new(
            sessions.clone(),
            history.clone(),
            pusher,
            Arc::new(FixedClock::from_millis(1_700_000_000_000)),
        ));
        Fixture {
            usecase,
            sessions,
            history,
        }
    }

    async fn join(sessions: &InMemorySessionRepository, name: &str) -> ConnectionId {
        let connection_id = ConnectionId::generate();
        sessions
            .join(
                connection_id,
                DisplayName::new(name).unwrap(),
                Timestamp::new(SystemClock.now()),
            )
            .await;
        connection_id
    }

    #[tokio::test]
    async fn test_create_message_appends_and_broadcasts() {
        // テスト項目: メッセージが履歴に追記され、全接続にブロードキャストされる
        // given (前提条件):
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let (tx, mut rx) = mpsc::channel(8);
        pusher.register_client(ConnectionId::generate(), tx).await;
        let f = fixture(pusher);
        let alice = join(&f.sessions, "alice").await;

        // when (操作):
        let result = f.usecase.execute(alice, " hi ", Some("alice")).await;

        // then (期待する結果):
        let entry = result.unwrap();
        assert_eq!(entry.sequence.value(), 1);
        assert_eq!(entry.message.sender.as_str(), "alice");
        assert_eq!(entry.message.body.as_str(), "hi");
        assert_eq!(f.history.snapshot().await, vec![entry]);

        let value: serde_json::Value =
            serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        assert_eq!(value["type"], "created");
        assert_eq!(value["name"], "alice");
        assert_eq!(value["message"], "hi");
        assert_eq!(value["timestamp"], "2023-11-14T22:13:20.000Z");
    }

    #[tokio::test]
    async fn test_sender_is_bound_to_session_name() {
        // テスト項目: クライアントが申告した名前ではなくセッションの名前が送信者になる
        // given (前提条件):
        let f = fixture(Arc::new(WebSocketMessagePusher::new()));
        let alice = join(&f.sessions, "alice").await;

        // when (操作): bob になりすまそうとする
        let entry = f.usecase.execute(alice, "hi", Some("bob")).await.unwrap();

        // then (期待する結果):
        assert_eq!(entry.message.sender.as_str(), "alice");
    }

    #[tokio::test]
    async fn test_create_message_before_join_is_rejected() {
        // テスト項目: join 前の送信は NotJoined になり、追記もブロードキャストも起きない
        // given (前提条件):
        let mut pusher = MockMessagePusher::new();
        pusher.expect_publish().times(0);
        let f = fixture(Arc::new(pusher));
        let stranger = ConnectionId::generate();

        // when (操作):
        let result = f.usecase.execute(stranger, "hi", Some("alice")).await;

        // then (期待する結果):
        assert_eq!(result, Err(SyncError::NotJoined));
        assert_eq!(f.history.len().await, 0);
    }

    #[tokio::test]
    async fn test_empty_body_is_rejected() {
        // テスト項目: 空の本文は InvalidMessage になり、追記もブロードキャストも起きない
        // given (前提条件):
        let mut pusher = MockMessagePusher::new();
        pusher.expect_publish().times(0);
        let f = fixture(Arc::new(pusher));
        let alice = join(&f.sessions, "alice").await;

        // when (操作):
        let result = f.usecase.execute(alice, "   ", None).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(SyncError::InvalidMessage(ValueObjectError::EmptyMessageBody))
        );
        assert_eq!(f.history.len().await, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_messages_broadcast_in_log_order() {
        // テスト項目: 並行送信でも各接続が受け取る順序は履歴の順序と一致する
        // given (前提条件):
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let (tx1, mut rx1) = mpsc::channel(256);
        let (tx2, mut rx2) = mpsc::channel(256);
        pusher.register_client(ConnectionId::generate(), tx1).await;
        pusher.register_client(ConnectionId::generate(), tx2).await;
        let f = fixture(pusher);
        let alice = join(&f.sessions, "alice").await;
        let bob = join(&f.sessions, "bob").await;

        // when (操作):
        let tasks: Vec<_> = (0..50)
            .map(|i| {
                let usecase = f.usecase.clone();
                let sender = if i % 2 == 0 { alice } else { bob };
                tokio::spawn(async move { usecase.execute(sender, &format!("m{i}"), None).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        // then (期待する結果):
        let logged: Vec<u64> = f
            .history
            .snapshot()
            .await
            .iter()
            .map(|entry| entry.sequence.value())
            .collect();
        assert_eq!(logged, (1..=50).collect::<Vec<u64>>());
        for rx in [&mut rx1, &mut rx2] {
            let mut received = Vec::new();
            while let Ok(json) = rx.try_recv() {
                let value: serde_json::Value = serde_json::from_str(&json).unwrap();
                received.push(value["sequence"].as_u64().unwrap());
            }
            assert_eq!(received, logged);
        }
    }

    #[tokio::test]
    async fn test_aborted_caller_after_append_still_broadcasts() {
        // テスト項目: 追記後・ブロードキャスト前に呼び出し元が中断されても、メッセージは配信される
        // given (前提条件): ブロードキャストを止めておく
        let gate = Arc::new(Mutex::new(()));
        let pusher = Arc::new(GatedPusher {
            gate: gate.clone(),
            inner: WebSocketMessagePusher::new(),
        });
        let (tx, mut rx) = mpsc::channel(8);
        pusher.register_client(ConnectionId::generate(), tx).await;
        let f = fixture(pusher);
        let alice = join(&f.sessions, "alice").await;
        let held = gate.lock().await;

        // when (操作): 追記されたのを確認してから呼び出し元のタスクを中断する
        let usecase = f.usecase.clone();
        let caller = tokio::spawn(async move { usecase.execute(alice, "hi", None).await });
        while f.history.len().await == 0 {
            tokio::task::yield_now().await;
        }
        caller.abort();
        drop(held);

        // then (期待する結果): 中断された呼び出しでも created は配信される
        let json = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("appended message was never broadcast")
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "created");
        assert_eq!(value["sequence"], 1);
        assert_eq!(value["message"], "hi");
        assert!(caller.await.unwrap_err().is_cancelled());
        assert_eq!(f.history.len().await, 1);
    }
}
