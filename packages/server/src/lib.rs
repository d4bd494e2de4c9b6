//! Realtime chat synchronization server.
//!
//! Accepts many concurrent WebSocket connections, keeps an ordered shared
//! message history, fans out new messages to every connection and tracks
//! debounced per-user typing presence.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
