//! UseCase: 履歴スナップショット取得
//!
//! 差分ではなく、常にその時点の履歴全体を返します。join 前でも呼び出せます。

use std::sync::Arc;

use crate::domain::{HistoryRepository, LoggedMessage};

/// 履歴取得のユースケース
pub struct FindAllMessagesUseCase {
    history: Arc<dyn HistoryRepository>,
}

impl FindAllMessagesUseCase {
    pub fn new(history: Arc<dyn HistoryRepository>) -> Self {
        Self { history }
    }

    pub async fn execute(&self) -> Vec<LoggedMessage> {
        self.history.snapshot().await
    }
}
