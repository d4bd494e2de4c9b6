//! WebSocket connection handlers.
//!
//! Each connection moves through `Connected → Joined → Disconnected`.
//! `createMessage` and `typing` are rejected until the connection has joined;
//! `findAllMessages` is allowed in either live phase.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade, close_code},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, JoinOutcome},
    infrastructure::dto::websocket::{ClientEvent, MessageDto, ServerEvent},
    ui::state::AppState,
    usecase::SyncError,
};

/// Where a connection is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConnectionPhase {
    /// Transport open, no display name yet
    Connected,
    /// Bound to a session in the registry
    Joined,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Drains this connection's outbound queue into the WebSocket.
///
/// The queue closes when the broadcast bus drops this connection's sender
/// (slow consumer); the socket is then closed with "try again later".
fn pusher_loop(
    connection_id: ConnectionId,
    mut rx: mpsc::Receiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                return;
            }
        }

        tracing::warn!(
            "Outbound queue of '{}' closed; closing connection",
            connection_id
        );
        let frame = CloseFrame {
            code: close_code::AGAIN,
            reason: Utf8Bytes::from_static("outbound queue overflow"),
        };
        if let Err(e) = sender.send(Message::Close(Some(frame))).await {
            tracing::debug!("Failed to send close frame to '{}': {}", connection_id, e);
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionId::generate();
    let (tx, rx) = mpsc::channel(state.config.outbound_capacity);

    state.connect_client_usecase.execute(connection_id, tx).await;
    tracing::info!("Connection '{}' opened", connection_id);

    let (sender, mut receiver) = socket.split();
    let mut send_task = pusher_loop(connection_id, rx, sender);

    let state_clone = state.clone();
    let mut recv_task = tokio::spawn(async move {
        let mut phase = ConnectionPhase::Connected;

        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received from '{}': {}", connection_id, text);
                    match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(event) => {
                            phase = dispatch(&state_clone, connection_id, phase, event).await;
                        }
                        Err(e) => {
                            tracing::warn!(
                                "Unparseable frame from '{}': {}",
                                connection_id,
                                e
                            );
                            reply(
                                &state_clone,
                                &connection_id,
                                ServerEvent::Error {
                                    code: "invalid-request".to_string(),
                                    message: e.to_string(),
                                },
                            )
                            .await;
                        }
                    }
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id);
                    break;
                }
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    match state.disconnect_client_usecase.execute(&connection_id).await {
        Some(session) => tracing::info!(
            "Connection '{}' ('{}') closed and session removed",
            connection_id,
            session.name
        ),
        None => tracing::info!("Connection '{}' closed before joining", connection_id),
    }
}

/// Apply one client event and return the connection's next phase.
async fn dispatch(
    state: &AppState,
    connection_id: ConnectionId,
    phase: ConnectionPhase,
    event: ClientEvent,
) -> ConnectionPhase {
    match event {
        ClientEvent::Join { name } => {
            match state.join_session_usecase.execute(connection_id, &name).await {
                Ok(JoinOutcome::Joined) => {
                    tracing::info!("Connection '{}' joined as '{}'", connection_id, name.trim());
                    ConnectionPhase::Joined
                }
                Ok(JoinOutcome::Renamed { previous }) => {
                    tracing::info!(
                        "Connection '{}' renamed from '{}' to '{}'",
                        connection_id,
                        previous,
                        name.trim()
                    );
                    ConnectionPhase::Joined
                }
                Err(e) => {
                    report(state, &connection_id, e).await;
                    phase
                }
            }
        }
        ClientEvent::CreateMessage { name, message, .. } => {
            if phase == ConnectionPhase::Connected {
                report(state, &connection_id, SyncError::NotJoined).await;
                return phase;
            }
            if let Err(e) = state
                .create_message_usecase
                .execute(connection_id, &message, name.as_deref())
                .await
            {
                report(state, &connection_id, e).await;
            }
            phase
        }
        ClientEvent::Typing { is_typing } => {
            if phase == ConnectionPhase::Connected {
                report(state, &connection_id, SyncError::NotJoined).await;
                return phase;
            }
            if let Err(e) = state
                .signal_typing_usecase
                .execute(connection_id, is_typing)
                .await
            {
                report(state, &connection_id, e).await;
            }
            phase
        }
        ClientEvent::FindAllMessages { ack } => {
            let messages: Vec<MessageDto> = state
                .find_all_messages_usecase
                .execute()
                .await
                .into_iter()
                .map(MessageDto::from)
                .collect();
            tracing::debug!(
                "Sending {} message(s) to '{}'",
                messages.len(),
                connection_id
            );
            reply(state, &connection_id, ServerEvent::Messages { ack, messages }).await;
            phase
        }
    }
}

/// Notify the originating connection of a rejected request.
async fn report(state: &AppState, connection_id: &ConnectionId, error: SyncError) {
    if let SyncError::SessionNotFound(_) = error {
        tracing::debug!(
            "Dropping request from '{}' racing its disconnect",
            connection_id
        );
        return;
    }

    tracing::warn!("Rejected request from '{}': {}", connection_id, error);
    reply(
        state,
        connection_id,
        ServerEvent::Error {
            code: error.code().to_string(),
            message: error.to_string(),
        },
    )
    .await;
}

async fn reply(state: &AppState, connection_id: &ConnectionId, event: ServerEvent) {
    let json = match event.to_json() {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to serialize reply for '{}': {}", connection_id, e);
            return;
        }
    };
    if let Err(e) = state.connect_client_usecase.reply(connection_id, json).await {
        tracing::warn!("Failed to reply to '{}': {}", connection_id, e);
    }
}
