//! Connection configuration.

/// Where and how to reach the room server.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub host: String,
    pub port: u16,
    /// Connect over TLS (`wss://`) when true.
    pub secure: bool,
    /// Handshake timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8000,
            secure: false,
            connect_timeout_secs: 15,
        }
    }
}

impl SessionConfig {
    /// Build the WebSocket URL for a room. The room id rides as a path
    /// segment; the scheme follows the `secure` flag.
    pub(crate) fn ws_url(&self, room_id: &str) -> String {
        let scheme = if self.secure { "wss" } else { "ws" };
        format!("{scheme}://{}:{}/ws/{room_id}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_defaults_to_plain_ws() {
        let config = SessionConfig::default();
        assert_eq!(
            config.ws_url("7a6f3f4e"),
            "ws://127.0.0.1:8000/ws/7a6f3f4e"
        );
    }

    #[test]
    fn url_switches_scheme_when_secure() {
        let config = SessionConfig {
            host: "poker.example.com".into(),
            port: 443,
            secure: true,
            ..Default::default()
        };
        assert_eq!(
            config.ws_url("abc"),
            "wss://poker.example.com:443/ws/abc"
        );
    }
}
