//! メッセージ送信（通知）の実装
//!
//! - `websocket`: 接続ごとの有界キューを使った Broadcast Bus 実装

pub mod websocket;

pub use websocket::WebSocketMessagePusher;
