use connector_api::ApiError;
use thiserror::Error;

use crate::logging::LoggingError;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Blind not found: {0}")]
    BlindNotFound(String),
}

impl SdkError {
    /// Whether the hub could not be reached, as opposed to refusing a command
    /// or being misconfigured
    pub fn is_communication_failure(&self) -> bool {
        matches!(self, SdkError::Api(e) if e.is_communication_failure())
    }
}

pub type Result<T> = std::result::Result<T, SdkError>;
