//! Device addressing and state records shared by requests and responses

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

/// UDP port hubs listen on
pub const DEFAULT_SEND_PORT: u16 = 32100;

/// Multicast group every hub on the LAN joins
pub const HUB_MULTICAST_GROUP: Ipv4Addr = Ipv4Addr::new(238, 0, 0, 18);

/// Device type reported by the hub (bridge) itself
pub const HUB_DEVICE_TYPE: &str = "02000001";

/// A motor addressed through a hub
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceIdentity {
    /// Hub MAC followed by the device number, e.g. `AABBCCDDEEFF0001`
    pub mac: String,
    /// Protocol device type tag, e.g. `10000000`
    pub device_type: String,
}

impl DeviceIdentity {
    pub fn new(mac: impl Into<String>, device_type: impl Into<String>) -> Self {
        Self {
            mac: mac.into(),
            device_type: device_type.into(),
        }
    }

    /// True for the inventory entry describing the hub rather than a motor
    pub fn is_hub(&self) -> bool {
        self.device_type == HUB_DEVICE_TYPE
    }
}

impl fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.mac, self.device_type)
    }
}

/// Network address a request is sent to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HubEndpoint {
    pub ip: IpAddr,
    pub send_port: u16,
}

impl HubEndpoint {
    pub fn new(ip: IpAddr, send_port: u16) -> Self {
        Self { ip, send_port }
    }

    /// Endpoint on the standard hub port
    pub fn with_default_port(ip: IpAddr) -> Self {
        Self::new(ip, DEFAULT_SEND_PORT)
    }

    /// The multicast group, for discovery without a known hub address
    pub fn multicast() -> Self {
        Self::with_default_port(IpAddr::V4(HUB_MULTICAST_GROUP))
    }

    /// Parse a textual IP as configured by the host
    pub fn parse(ip: &str, send_port: u16) -> Result<Self> {
        let ip = ip
            .trim()
            .parse::<IpAddr>()
            .map_err(|e| ApiError::InvalidParameter(format!("hub ip '{}': {}", ip, e)))?;
        Ok(Self::new(ip, send_port))
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.ip, self.send_port)
    }
}

impl From<SocketAddr> for HubEndpoint {
    fn from(addr: SocketAddr) -> Self {
        Self::new(addr.ip(), addr.port())
    }
}

impl fmt::Display for HubEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.socket_addr())
    }
}

/// Movement opcodes accepted in a write's `operation` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Operation {
    Close,
    Open,
    Stop,
    /// Ask the motor for its live state; the ack carries fresh data
    Status,
}

impl Operation {
    pub fn code(self) -> u8 {
        match self {
            Operation::Close => 0,
            Operation::Open => 1,
            Operation::Stop => 2,
            Operation::Status => 5,
        }
    }
}

impl From<Operation> for u8 {
    fn from(op: Operation) -> u8 {
        op.code()
    }
}

impl TryFrom<u8> for Operation {
    type Error = String;

    fn try_from(code: u8) -> std::result::Result<Self, Self::Error> {
        match code {
            0 => Ok(Operation::Close),
            1 => Ok(Operation::Open),
            2 => Ok(Operation::Stop),
            5 => Ok(Operation::Status),
            other => Err(format!("unknown operation code {}", other)),
        }
    }
}

/// Payload of a write request; exactly one field goes on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Command {
    Operation(Operation),
    /// 0 is fully open, 100 fully closed
    TargetPosition(u8),
    TargetAngle(i32),
}

/// Motor state as cached by the hub
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceState {
    /// Absent on motors that only know open and closed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_position: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_angle: Option<i32>,
    /// 0 closing/closed, 1 opening/open, 2 stopped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<u8>,
    /// Battery voltage in hundredths of a volt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_level: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charging_state: Option<u8>,
    /// Motor sub-type; 0 when the hub does not report one
    #[serde(rename = "type", default)]
    pub device_type: u8,
}

impl DeviceState {
    /// Whether the motor reports only open/closed
    pub fn is_binary(&self) -> bool {
        self.current_position.is_none()
    }

    /// Reported position, or one inferred from the last operation on a
    /// binary motor (open => 0, closed => 100).
    pub fn effective_position(&self) -> Option<u8> {
        self.current_position.or(match self.operation {
            Some(0) => Some(100),
            Some(1) => Some(0),
            _ => None,
        })
    }
}

/// Whether a motor accepts intermediate positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionCapability {
    /// No successful read yet
    #[default]
    Unknown,
    Ranged,
    Binary,
}

impl PositionCapability {
    pub fn from_state(state: &DeviceState) -> Self {
        if state.is_binary() {
            PositionCapability::Binary
        } else {
            PositionCapability::Ranged
        }
    }

    /// Target a motor of this capability can actually reach
    pub fn snap_target(self, position: u8) -> u8 {
        match self {
            PositionCapability::Binary if position >= 50 => 100,
            PositionCapability::Binary => 0,
            _ => position,
        }
    }
}
