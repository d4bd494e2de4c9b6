//! Typing Presence Aggregator
//!
//! 接続ごとの「入力中」シグナル（取りこぼしや重複があり得る）を、全員で共有する
//! 離散的な TypingSet にまとめます。
//!
//! - `typing=true` を受けるたびに期限切れタイマーを張り直す（デバウンス）
//! - `typing=false` は即座に反映し、タイマーをキャンセルする
//! - TypingSet のメンバーが変わったときだけブロードキャストする
//!
//! 状態変更・再計算・ブロードキャストは一つの Mutex の中で行うため、
//! 古い TypingSet が配信されることはありません。

use std::{
    sync::{
        Arc, Weak,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use natter_shared::time::Clock;
use tokio::sync::Mutex;

use crate::domain::{
    BroadcastEvent, ConnectionId, MessagePusher, Session, SessionRepository, Timestamp,
    TypingSet, TypingTimer,
};

use super::error::SyncError;

pub struct TypingPresence {
    sessions: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    /// Silence after which a typing session is flipped back to idle
    expiry: Duration,
    next_generation: AtomicU64,
    /// Last TypingSet that was broadcast
    announced: Mutex<TypingSet>,
}

impl TypingPresence {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        expiry: Duration,
    ) -> Self {
        Self {
            sessions,
            message_pusher,
            clock,
            expiry,
            next_generation: AtomicU64::new(0),
            announced: Mutex::new(TypingSet::default()),
        }
    }

    /// Apply a typing signal from the session bound to `connection_id`.
    ///
    /// # Errors
    ///
    /// `SessionNotFound` when the session disappeared (disconnect race).
    pub async fn signal(
        self: &Arc<Self>,
        connection_id: ConnectionId,
        is_typing: bool,
    ) -> Result<(), SyncError> {
        let mut announced = self.announced.lock().await;

        if is_typing {
            let generation = self.next_generation.fetch_add(1, Ordering::Relaxed) + 1;
            let timer = self.schedule_expiry(connection_id, generation);
            self.sessions
                .start_typing(&connection_id, Timestamp::new(self.clock.now()), timer)
                .await?;
        } else {
            self.sessions.stop_typing(&connection_id).await?;
        }

        self.announce_if_changed(&mut announced).await;
        Ok(())
    }

    /// Recompute after a change the aggregator did not drive itself (a rename).
    pub async fn refresh(&self) {
        let mut announced = self.announced.lock().await;
        self.announce_if_changed(&mut announced).await;
    }

    /// Remove the session of a closed connection and cancel its pending expiry.
    pub async fn forget(&self, connection_id: &ConnectionId) -> Option<Session> {
        let mut announced = self.announced.lock().await;

        let removed = self.sessions.remove(connection_id).await?;
        if let Some(timer) = removed.typing_timer {
            timer.cancel();
        }
        if removed.session.is_typing {
            self.announce_if_changed(&mut announced).await;
        }
        Some(removed.session)
    }

    /// The TypingSet most recently broadcast.
    pub async fn current(&self) -> TypingSet {
        self.announced.lock().await.clone()
    }

    fn schedule_expiry(self: &Arc<Self>, connection_id: ConnectionId, generation: u64) -> TypingTimer {
        let presence: Weak<Self> = Arc::downgrade(self);
        let expiry = self.expiry;
        let task = tokio::spawn(async move {
            tokio::time::sleep(expiry).await;
            if let Some(presence) = presence.upgrade() {
                presence.expire(connection_id, generation).await;
            }
        });
        TypingTimer::new(generation, task.abort_handle())
    }

    async fn expire(&self, connection_id: ConnectionId, generation: u64) {
        // Taking the lock first also orders this after the `signal` that
        // scheduled the timer, so the timer is stored before it can be matched.
        let mut announced = self.announced.lock().await;

        if self.sessions.expire_typing(&connection_id, generation).await {
            tracing::debug!("Typing signal of '{}' expired", connection_id);
            self.announce_if_changed(&mut announced).await;
        }
    }

    async fn announce_if_changed(&self, announced: &mut TypingSet) {
        let current = self.sessions.typing_set().await;
        if current == *announced {
            return;
        }

        *announced = current.clone();
        let names = current.to_names();
        let delivered = self
            .message_pusher
            .publish(&BroadcastEvent::TypingChanged(current))
            .await;
        tracing::debug!(
            "Broadcasted typing set {:?} to {} connection(s)",
            names,
            delivered
        );
    }
}
