//! Shared application state and dependency wiring.

use std::sync::Arc;

use natter_shared::time::Clock;

use crate::{
    config::ServerConfig,
    domain::{HistoryRepository, MessagePusher, SessionRepository},
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryHistoryRepository, InMemorySessionRepository},
    },
    usecase::{
        ConnectClientUseCase, CreateMessageUseCase, DisconnectClientUseCase,
        FindAllMessagesUseCase, GetSyncStateUseCase, JoinSessionUseCase, SignalTypingUseCase,
        TypingPresence,
    },
};

/// Shared application state
pub struct AppState {
    pub config: ServerConfig,
    /// ConnectClientUseCase（接続・個別返信のユースケース）
    pub connect_client_usecase: ConnectClientUseCase,
    /// JoinSessionUseCase（join のユースケース）
    pub join_session_usecase: JoinSessionUseCase,
    /// CreateMessageUseCase（メッセージ作成のユースケース）
    pub create_message_usecase: CreateMessageUseCase,
    /// SignalTypingUseCase（入力中シグナルのユースケース）
    pub signal_typing_usecase: SignalTypingUseCase,
    /// FindAllMessagesUseCase（履歴取得のユースケース）
    pub find_all_messages_usecase: FindAllMessagesUseCase,
    /// DisconnectClientUseCase（切断のユースケース）
    pub disconnect_client_usecase: DisconnectClientUseCase,
    /// GetSyncStateUseCase（デバッグ用状態取得のユースケース）
    pub get_sync_state_usecase: GetSyncStateUseCase,
}

impl AppState {
    /// Wire the in-memory implementation of every component.
    ///
    /// Each call builds an isolated instance; nothing is global.
    pub fn in_memory(config: ServerConfig, clock: Arc<dyn Clock>) -> Arc<Self> {
        // 1. Repositories (Session Registry, History Log)
        let sessions: Arc<dyn SessionRepository> = Arc::new(InMemorySessionRepository::new());
        let history: Arc<dyn HistoryRepository> = Arc::new(InMemoryHistoryRepository::new());

        // 2. MessagePusher (Broadcast Bus)
        let message_pusher: Arc<dyn MessagePusher> = Arc::new(WebSocketMessagePusher::new());

        // 3. Typing Presence Aggregator
        let typing_presence = Arc::new(TypingPresence::new(
            sessions.clone(),
            message_pusher.clone(),
            clock.clone(),
            config.typing_expiry(),
        ));

        // 4. UseCases
        Arc::new(Self {
            connect_client_usecase: ConnectClientUseCase::new(message_pusher.clone()),
            join_session_usecase: JoinSessionUseCase::new(
                sessions.clone(),
                typing_presence.clone(),
                clock.clone(),
            ),
            create_message_usecase: CreateMessageUseCase::new(
                sessions.clone(),
                history.clone(),
                message_pusher.clone(),
                clock,
            ),
            signal_typing_usecase: SignalTypingUseCase::new(
                sessions.clone(),
                typing_presence.clone(),
            ),
            find_all_messages_usecase: FindAllMessagesUseCase::new(history.clone()),
            disconnect_client_usecase: DisconnectClientUseCase::new(
                message_pusher.clone(),
                typing_presence.clone(),
            ),
            get_sync_state_usecase: GetSyncStateUseCase::new(
                sessions,
                history,
                message_pusher,
                typing_presence,
            ),
            config,
        })
    }
}
