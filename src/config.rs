use std::time::Duration;

use crate::{DEFAULT_HOST, DEFAULT_PORT};

/// Where and how to connect.
///
/// `SELECT database` is always sent on connect, `AUTH password` only when a
/// password is set. The timeout bounds the TCP connect only; replies are
/// awaited for as long as the server takes, so blocking commands are safe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    pub database: i64,
    pub connect_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            password: None,
            database: 0,
            connect_timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_database(mut self, database: i64) -> Self {
        self.database = database;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// `host:port`, as accepted by `TcpStream::connect`.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.addr(), "127.0.0.1:6379");
        assert_eq!(config.password, None);
        assert_eq!(config.database, 0);
        assert_eq!(config.connect_timeout, None);
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::new("cache.local", 7000)
            .with_password("secret")
            .with_database(3)
            .with_connect_timeout(Duration::from_secs(2));
        assert_eq!(config.addr(), "cache.local:7000");
        assert_eq!(config.password.as_deref(), Some("secret"));
        assert_eq!(config.database, 3);
        assert_eq!(config.connect_timeout, Some(Duration::from_secs(2)));
    }
}
