//! Domain errors.

use thiserror::Error;

use super::value_object::ConnectionId;

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("display name must not be empty")]
    EmptyDisplayName,

    #[error("display name is too long ({actual} chars, max {max})")]
    DisplayNameTooLong { max: usize, actual: usize },

    #[error("message body must not be empty")]
    EmptyMessageBody,

    #[error("message body is too long ({actual} chars, max {max})")]
    MessageBodyTooLong { max: usize, actual: usize },
}

/// Repository errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("session for connection '{0}' not found")]
    SessionNotFound(ConnectionId),
}

/// Errors raised while pushing content to connections
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection '{0}' is not registered")]
    ClientNotFound(ConnectionId),

    #[error("failed to push to connection '{0}': {1}")]
    PushFailed(ConnectionId, String),
}
