//! TCP relay configuration.

use std::time::Duration;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 65432;
pub const DEFAULT_ACCEPT_TIMEOUT_MS: u64 = 1000;
pub const DEFAULT_ACCEPT_TIMEOUT: Duration = Duration::from_millis(DEFAULT_ACCEPT_TIMEOUT_MS);
/// Bytes requested per read. Not a message boundary: one client write may
/// arrive split over several reads, and several writes may arrive in one.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
    /// How long one accept may block before the loop checks for shutdown
    pub accept_timeout: Duration,
    pub read_buffer_size: usize,
}

impl RelayConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            accept_timeout: DEFAULT_ACCEPT_TIMEOUT,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }
}
