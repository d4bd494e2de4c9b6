//! Request handlers.

mod http;
mod websocket;

pub use http::{debug_sync_state, get_messages, health_check};
pub use websocket::websocket_handler;
