//! Request correlation tags
//!
//! The hub echoes nothing useful back, so a message id only helps a human
//! reading packet captures. It is the current UTC time with every non-digit
//! removed, down to milliseconds.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Digits-only timestamp tag sent as `msgID`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// Tag for the current instant
    pub fn generate() -> Self {
        Self::at(Utc::now())
    }

    /// Tag for a given instant, e.g. `2024-01-01T12:00:00.000Z` -> `20240101120000000`
    pub fn at(instant: DateTime<Utc>) -> Self {
        MessageId(instant.format("%Y%m%d%H%M%S%3f").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
