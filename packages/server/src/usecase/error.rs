//! UseCase 層のエラー型
//!
//! プロトコル上のエラー分類。どれも接続を切断する理由にはならず、
//! 発生元の接続にのみ通知されます。

use thiserror::Error;

use crate::domain::{ConnectionId, RepositoryError, ValueObjectError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// `join` with an empty, whitespace-only or oversized name
    #[error("invalid name: {0}")]
    InvalidName(ValueObjectError),

    /// `createMessage` with an empty or oversized body
    #[error("invalid message: {0}")]
    InvalidMessage(ValueObjectError),

    /// `createMessage` or `typing` before `join`
    #[error("join the chat before sending messages or typing signals")]
    NotJoined,

    /// The session vanished underneath an in-flight request (disconnect race)
    #[error("session for connection '{0}' not found")]
    SessionNotFound(ConnectionId),

    /// The server failed while recording the request
    #[error("internal error: {0}")]
    Internal(String),
}

impl SyncError {
    /// Stable wire code sent in `error` events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidName(_) => "invalid-name",
            Self::InvalidMessage(_) => "invalid-message",
            Self::NotJoined => "not-joined",
            Self::SessionNotFound(_) => "session-not-found",
            Self::Internal(_) => "internal-error",
        }
    }
}

impl From<RepositoryError> for SyncError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::SessionNotFound(connection_id) => Self::SessionNotFound(connection_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_kebab_case() {
        // テスト項目: 各エラーが固定のワイヤコードを持つ
        // given (前提条件):
        let errors = [
            SyncError::InvalidName(ValueObjectError::EmptyDisplayName),
            SyncError::InvalidMessage(ValueObjectError::EmptyMessageBody),
            SyncError::NotJoined,
            SyncError::SessionNotFound(ConnectionId::generate()),
            SyncError::Internal("task panicked".to_string()),
        ];

        // when (操作):
        let codes: Vec<&str> = errors.iter().map(SyncError::code).collect();

        // then (期待する結果):
        assert_eq!(
            codes,
            vec![
                "invalid-name",
                "invalid-message",
                "not-joined",
                "session-not-found",
                "internal-error",
            ]
        );
    }
}
