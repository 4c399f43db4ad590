//! Outbound message shapes and their builders

use serde::Serialize;

use crate::device::{Command, DeviceIdentity};
use crate::error::Result;
use crate::message_id::MessageId;
use crate::token::AccessToken;

/// A message sent to a hub, tagged on the wire by `msgType`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "msgType")]
pub enum Request {
    /// Ask every hub for its device inventory
    #[serde(rename = "GetDeviceList")]
    Discover {
        #[serde(rename = "msgID")]
        msg_id: MessageId,
    },

    /// Fetch the hub's cached state for one device; unauthenticated
    #[serde(rename = "ReadDevice")]
    ReadState {
        mac: String,
        #[serde(rename = "deviceType")]
        device_type: String,
        #[serde(rename = "msgID")]
        msg_id: MessageId,
    },

    /// Command one device; requires the access token
    #[serde(rename = "WriteDevice")]
    WriteState {
        mac: String,
        #[serde(rename = "deviceType")]
        device_type: String,
        #[serde(rename = "accessToken")]
        access_token: AccessToken,
        #[serde(rename = "msgID")]
        msg_id: MessageId,
        data: Command,
    },
}

impl Request {
    pub fn msg_id(&self) -> &MessageId {
        match self {
            Request::Discover { msg_id }
            | Request::ReadState { msg_id, .. }
            | Request::WriteState { msg_id, .. } => msg_id,
        }
    }

    /// Wire name of the request, for logging
    pub fn msg_type(&self) -> &'static str {
        match self {
            Request::Discover { .. } => "GetDeviceList",
            Request::ReadState { .. } => "ReadDevice",
            Request::WriteState { .. } => "WriteDevice",
        }
    }

    /// Single-line JSON as sent in one datagram
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

pub fn build_discover_request() -> Request {
    Request::Discover {
        msg_id: MessageId::generate(),
    }
}

pub fn build_read_request(device: &DeviceIdentity) -> Request {
    Request::ReadState {
        mac: device.mac.clone(),
        device_type: device.device_type.clone(),
        msg_id: MessageId::generate(),
    }
}

pub fn build_write_request(device: &DeviceIdentity, token: &AccessToken, command: Command) -> Request {
    Request::WriteState {
        mac: device.mac.clone(),
        device_type: device.device_type.clone(),
        access_token: token.clone(),
        msg_id: MessageId::generate(),
        data: command,
    }
}
