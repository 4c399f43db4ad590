//! Configuration types for the UDP transport
//!
//! Controls how long a socket waits between datagrams and how many times a
//! silent exchange is repeated before the hub is declared unreachable.

use std::time::Duration;

/// Smallest idle timeout accepted by the socket layer; a zero read timeout
/// is rejected by the OS.
const MIN_IDLE_TIMEOUT: Duration = Duration::from_millis(1);

/// Configuration for a [`UdpTransport`](crate::UdpTransport)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Silence after which the current attempt stops listening
    /// Default: 250 milliseconds
    pub idle_timeout: Duration,

    /// Upper bound on send/receive cycles for one request
    /// Default: 3
    pub max_attempts: u32,

    /// Receive buffer size; datagrams longer than this are truncated
    /// Default: 4096 bytes
    pub recv_buffer_size: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_millis(250),
            max_attempts: 3,
            recv_buffer_size: 4096,
        }
    }
}

impl TransportConfig {
    /// Create a new TransportConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Short idle window, for hubs on the same wired segment
    pub fn fast() -> Self {
        Self {
            idle_timeout: Duration::from_millis(100),
            ..Default::default()
        }
    }

    /// Longer idle window and more attempts, for congested Wi-Fi
    pub fn patient() -> Self {
        Self {
            idle_timeout: Duration::from_secs(1),
            max_attempts: 5,
            ..Default::default()
        }
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Idle timeout clamped to what the socket layer accepts
    pub fn effective_idle_timeout(&self) -> Duration {
        self.idle_timeout.max(MIN_IDLE_TIMEOUT)
    }

    /// At least one attempt is always made
    pub fn effective_max_attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TransportConfig::default();
        assert_eq!(config.idle_timeout, Duration::from_millis(250));
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.recv_buffer_size, 4096);
    }

    #[test]
    fn test_presets_keep_other_defaults() {
        let fast = TransportConfig::fast();
        assert_eq!(fast.idle_timeout, Duration::from_millis(100));
        assert_eq!(fast.max_attempts, 3);

        let patient = TransportConfig::patient();
        assert_eq!(patient.idle_timeout, Duration::from_secs(1));
        assert_eq!(patient.max_attempts, 5);
        assert_eq!(patient.recv_buffer_size, 4096);
    }

    #[test]
    fn test_degenerate_values_are_clamped() {
        let config = TransportConfig::new()
            .with_idle_timeout(Duration::ZERO)
            .with_max_attempts(0);
        assert_eq!(config.effective_idle_timeout(), MIN_IDLE_TIMEOUT);
        assert_eq!(config.effective_max_attempts(), 1);
    }
}
