//! Server configuration.

use std::time::Duration;

/// Runtime configuration of the synchronization core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to bind to (0 picks an ephemeral port)
    pub port: u16,
    /// Debounce window after the last `typing=true` signal
    pub typing_window: Duration,
    /// Slack added to the window to absorb network jitter
    pub typing_margin: Duration,
    /// Capacity of each connection's outbound queue
    pub outbound_capacity: usize,
}

impl ServerConfig {
    pub const DEFAULT_TYPING_WINDOW: Duration = Duration::from_millis(1000);
    pub const DEFAULT_TYPING_MARGIN: Duration = Duration::from_millis(250);
    pub const DEFAULT_OUTBOUND_CAPACITY: usize = 256;

    /// Time after which a silent typing session is considered idle.
    pub fn typing_expiry(&self) -> Duration {
        self.typing_window + self.typing_margin
    }

    /// `host:port` string for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            typing_window: Self::DEFAULT_TYPING_WINDOW,
            typing_margin: Self::DEFAULT_TYPING_MARGIN,
            outbound_capacity: Self::DEFAULT_OUTBOUND_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_expiry_adds_margin_to_window() {
        // テスト項目: 期限はウィンドウとマージンの和になる
        // given (前提条件):
        let config = ServerConfig::default();

        // when (操作):
        let expiry = config.typing_expiry();

        // then (期待する結果):
        assert_eq!(expiry, Duration::from_millis(1250));
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }
}
