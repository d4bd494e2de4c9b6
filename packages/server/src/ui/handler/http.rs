//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    infrastructure::dto::{
        http::{SessionDto, SyncStateDto},
        websocket::MessageDto,
    },
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Full history snapshot, in log order
pub async fn get_messages(State(state): State<Arc<AppState>>) -> Json<Vec<MessageDto>> {
    let messages = state.find_all_messages_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(messages.into_iter().map(MessageDto::from).collect())
}

/// Debug endpoint to inspect the synchronization core (for testing purposes)
pub async fn debug_sync_state(State(state): State<Arc<AppState>>) -> Json<SyncStateDto> {
    let sync_state = state.get_sync_state_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(SyncStateDto {
        connections: sync_state.connections,
        sessions: sync_state
            .sessions
            .into_iter()
            .map(SessionDto::from)
            .collect(),
        typing: sync_state.typing.to_names(),
        message_count: sync_state.message_count,
    })
}
