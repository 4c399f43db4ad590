use std::net::SocketAddr;

use hub_transport::TransportError;
use thiserror::Error;

use crate::response::ActionResult;

/// High-level API errors for hub operations
///
/// Transport-level noise (lost packets, garbage datagrams, socket hiccups) is
/// absorbed by retries and never shows up here. What remains are failures the
/// caller has to report: a bad shared secret, a hub that stayed silent, or a
/// hub that answered but refused the command.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The shared secret is not a valid AES-128 key
    ///
    /// Raised at client construction; the connector key is malformed and no
    /// write request could ever authenticate.
    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// The hub nonce cannot be encrypted block-wise without padding
    #[error("invalid hub token length {actual}: must be a non-zero multiple of {block} bytes")]
    InvalidNonceLength { block: usize, actual: usize },

    /// Every attempt ended without a usable reply
    #[error("hub at {endpoint} unreachable after {attempts} attempt(s)")]
    HubUnreachable { endpoint: SocketAddr, attempts: u32 },

    /// The hub replied but refused the command
    #[error("command rejected by hub: {0}")]
    CommandRejected(ActionResult),

    /// A move on a ranged motor was acknowledged without a position
    #[error("hub acknowledged the move of {device} without reporting a position")]
    IncompleteAck { device: String },

    /// Invalid parameter value, such as a position above 100
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A request could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Type alias for results that can return an ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

impl From<TransportError> for ApiError {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::HubUnreachable { endpoint, attempts } => {
                ApiError::HubUnreachable { endpoint, attempts }
            }
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        ApiError::Serialization(error.to_string())
    }
}

impl ApiError {
    /// Whether the failure means the hub could not be reached at all
    pub fn is_communication_failure(&self) -> bool {
        matches!(self, ApiError::HubUnreachable { .. })
    }
}
