//! Inbound message shapes and the datagram parser
//!
//! Anything a hub sends that does not decode into one of the three ack shapes
//! is reported as [`Unparseable`]; callers drop it and keep listening.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use crate::device::{DeviceIdentity, DeviceState};

/// Reply to a `GetDeviceList` request, one per answering hub
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverAck {
    /// MAC of the hub itself
    pub mac: String,
    pub device_type: String,
    #[serde(default)]
    pub fw_version: Option<String>,
    #[serde(rename = "ProtocolVersion", default)]
    pub protocol_version: Option<String>,
    /// Nonce from which write access tokens are derived
    pub token: String,
    /// Inventory, including an entry for the hub
    #[serde(default)]
    pub data: Vec<DeviceIdentity>,
}

impl DiscoverAck {
    /// Inventory entries that are motors rather than the hub
    pub fn devices(&self) -> impl Iterator<Item = &DeviceIdentity> {
        self.data.iter().filter(|device| !device.is_hub())
    }
}

/// Reply to a `ReadDevice` request
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadAck {
    #[serde(default)]
    pub mac: Option<String>,
    #[serde(default)]
    pub device_type: Option<String>,
    pub data: DeviceState,
}

/// Reply to a `WriteDevice` request
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteAck {
    #[serde(default)]
    pub mac: Option<String>,
    #[serde(default)]
    pub device_type: Option<String>,
    #[serde(default)]
    pub action_result: Option<ActionResult>,
    #[serde(default)]
    pub data: Option<DeviceState>,
}

impl WriteAck {
    /// The hub's refusal, if the command was not accepted
    pub fn rejection(&self) -> Option<&ActionResult> {
        self.action_result.as_ref().filter(|result| result.is_rejection())
    }
}

/// Outcome code of a write; hubs send either a number or a message
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ActionResult {
    Code(i64),
    Message(String),
}

impl ActionResult {
    /// Zero and empty messages mean success
    pub fn is_rejection(&self) -> bool {
        match self {
            ActionResult::Code(code) => *code != 0,
            ActionResult::Message(message) => !message.trim().is_empty(),
        }
    }
}

impl fmt::Display for ActionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionResult::Code(code) => write!(f, "code {}", code),
            ActionResult::Message(message) => f.write_str(message),
        }
    }
}

/// A decoded hub reply
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "msgType")]
pub enum Response {
    #[serde(rename = "GetDeviceListAck")]
    DiscoverAck(DiscoverAck),
    #[serde(rename = "ReadDeviceAck")]
    ReadAck(ReadAck),
    #[serde(rename = "WriteDeviceAck")]
    WriteAck(WriteAck),
}

impl Response {
    pub fn msg_type(&self) -> &'static str {
        match self {
            Response::DiscoverAck(_) => "GetDeviceListAck",
            Response::ReadAck(_) => "ReadDeviceAck",
            Response::WriteAck(_) => "WriteDeviceAck",
        }
    }

    pub fn into_discover_ack(self) -> Option<DiscoverAck> {
        match self {
            Response::DiscoverAck(ack) => Some(ack),
            _ => None,
        }
    }

    pub fn into_read_ack(self) -> Option<ReadAck> {
        match self {
            Response::ReadAck(ack) => Some(ack),
            _ => None,
        }
    }

    pub fn into_write_ack(self) -> Option<WriteAck> {
        match self {
            Response::WriteAck(ack) => Some(ack),
            _ => None,
        }
    }
}

/// A datagram that is not a recognised hub reply
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unparseable datagram: {reason}")]
pub struct Unparseable {
    pub reason: String,
}

/// Decode one datagram. Never panics.
pub fn parse(bytes: &[u8]) -> Result<Response, Unparseable> {
    serde_json::from_slice(bytes).map_err(|e| Unparseable {
        reason: e.to_string(),
    })
}
