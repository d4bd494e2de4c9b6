//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// One session as exposed by the debug endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDto {
    pub connection_id: String,
    pub name: String,
    pub is_typing: bool,
    pub last_typing_signal_at: Option<String>,
    pub joined_at: String,
}

/// Snapshot of the synchronization core for `/debug/state`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStateDto {
    /// Connections registered with the broadcast bus (joined or not)
    pub connections: usize,
    pub sessions: Vec<SessionDto>,
    pub typing: Vec<String>,
    pub message_count: usize,
}
