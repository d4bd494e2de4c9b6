//! InMemory History Log 実装
//!
//! 追記専用のメッセージ履歴。Vec の位置がそのままシーケンス番号になるため、
//! 削除や並べ替えの操作は提供しません。

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{HistoryRepository, LoggedMessage, Message, Sequence};

/// インメモリ History Log 実装
///
/// Appends take the write lock, snapshots the read lock, so a snapshot always
/// sees whole appends only.
#[derive(Debug, Default)]
pub struct InMemoryHistoryRepository {
    messages: RwLock<Vec<Message>>,
}

impl InMemoryHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryRepository for InMemoryHistoryRepository {
    async fn append(&self, message: Message) -> LoggedMessage {
        let mut messages = self.messages.write().await;
        messages.push(message.clone());
        LoggedMessage {
            sequence: Sequence::from_index(messages.len() - 1),
            message,
        }
    }

    async fn snapshot(&self) -> Vec<LoggedMessage> {
        let messages = self.messages.read().await;
        messages
            .iter()
            .enumerate()
            .map(|(index, message)| LoggedMessage {
                sequence: Sequence::from_index(index),
                message: message.clone(),
            })
            .collect()
    }

    async fn len(&self) -> usize {
        self.messages.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::{DisplayName, MessageBody, Timestamp};
    use chrono::Utc;

    fn message(sender: &str, body: &str) -> Message {
        Message::new(
            DisplayName::new(sender).unwrap(),
            MessageBody::new(body).unwrap(),
            Timestamp::new(Utc::now()),
        )
    }

    #[tokio::test]
    async fn test_snapshot_of_empty_log() {
        // テスト項目: 空のログのスナップショットは空になる
        // given (前提条件):
        let repo = InMemoryHistoryRepository::new();

        // when (操作):
        let snapshot = repo.snapshot().await;

        // then (期待する結果):
        assert!(snapshot.is_empty());
        assert_eq!(repo.len().await, 0);
    }

    #[tokio::test]
    async fn test_append_assigns_increasing_sequences() {
        // テスト項目: 追記ごとに 1 から連番が振られる
        // given (前提条件):
        let repo = InMemoryHistoryRepository::new();

        // when (操作):
        let first = repo.append(message("alice", "hi")).await;
        let second = repo.append(message("bob", "hello")).await;

        // then (期待する結果):
        assert_eq!(first.sequence.value(), 1);
        assert_eq!(second.sequence.value(), 2);
        let snapshot = repo.snapshot().await;
        assert_eq!(snapshot, vec![first, second]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_have_no_gaps_or_duplicates() {
        // テスト項目: 並行な追記でも欠番・重複なく全件が記録される
        // given (前提条件):
        let repo = Arc::new(InMemoryHistoryRepository::new());

        // when (操作):
        let tasks: Vec<_> = (0..64)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.append(message("alice", &format!("m{i}"))).await })
            })
            .collect();
        let mut sequences = Vec::new();
        for task in tasks {
            sequences.push(task.await.unwrap().sequence.value());
        }

        // then (期待する結果):
        sequences.sort_unstable();
        assert_eq!(sequences, (1..=64).collect::<Vec<u64>>());
        let snapshot = repo.snapshot().await;
        for (index, entry) in snapshot.iter().enumerate() {
            assert_eq!(entry.sequence.value(), index as u64 + 1);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_snapshot_is_never_torn() {
        // テスト項目: 追記と並行して取得したスナップショットは常に連続した先頭部分になる
        // given (前提条件):
        let repo = Arc::new(InMemoryHistoryRepository::new());
        let writer = {
            let repo = repo.clone();
            tokio::spawn(async move {
                for i in 0..200 {
                    repo.append(message("alice", &format!("m{i}"))).await;
                }
            })
        };

        // when (操作):
        let mut snapshots = Vec::new();
        while !writer.is_finished() {
            snapshots.push(repo.snapshot().await);
            tokio::task::yield_now().await;
        }
        writer.await.unwrap();
        snapshots.push(repo.snapshot().await);

        // then (期待する結果):
        for snapshot in snapshots {
            for (index, entry) in snapshot.iter().enumerate() {
                assert_eq!(entry.sequence.value(), index as u64 + 1);
                assert_eq!(entry.message.body.as_str(), format!("m{index}"));
            }
        }
        assert_eq!(repo.len().await, 200);
    }
}
