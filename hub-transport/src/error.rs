//! Error types for the UDP transport

use std::net::SocketAddr;
use thiserror::Error;

/// Errors that can escape a transport exchange
///
/// Socket failures and unparseable datagrams are absorbed by the retry loop;
/// the only terminal outcome is an endpoint that never answered.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Every attempt finished without a single parseable reply
    #[error("hub at {endpoint} unreachable after {attempts} attempt(s)")]
    HubUnreachable {
        endpoint: SocketAddr,
        attempts: u32,
    },
}

/// Convenience Result type alias for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;
