//! Domain layer for the chat synchronization core.
//!
//! Business rules that are independent of transport and storage: value
//! objects, entities, typing-set derivation and the interfaces the use cases
//! depend on.

pub mod entity;
pub mod error;
pub mod pusher;
pub mod repository;
pub mod typing;
pub mod value_object;

pub use entity::{JoinOutcome, LoggedMessage, Message, RemovedSession, Session};
pub use error::{MessagePushError, RepositoryError, ValueObjectError};
pub use pusher::{BroadcastEvent, MessagePusher, PusherChannel};
#[cfg(test)]
pub use pusher::MockMessagePusher;
pub use repository::{HistoryRepository, SessionRepository};
pub use typing::{TypingSet, TypingTimer};
pub use value_object::{ConnectionId, DisplayName, MessageBody, Sequence, Timestamp};
