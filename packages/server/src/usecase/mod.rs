//! UseCase layer.
//!
//! One struct per protocol operation. Each holds its collaborators as
//! `Arc<dyn Trait>` so the wiring decides the concrete implementations.

mod connect_client;
mod create_message;
mod disconnect_client;
mod error;
mod find_all_messages;
mod get_sync_state;
mod join_session;
mod signal_typing;
mod typing_presence;

pub use connect_client::ConnectClientUseCase;
pub use create_message::CreateMessageUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use error::SyncError;
pub use find_all_messages::FindAllMessagesUseCase;
pub use get_sync_state::{GetSyncStateUseCase, SyncState};
pub use join_session::JoinSessionUseCase;
pub use signal_typing::SignalTypingUseCase;
pub use typing_presence::TypingPresence;
