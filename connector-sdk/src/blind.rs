//! Blind handle
//!
//! One motor paired with a hub, with its own [`HubClient`].

use connector_api::{
    DeviceIdentity, DeviceState, HubClient, HubEndpoint, Operation, PositionCapability,
    ReadAck, SocketFactory, UdpSocketFactory, UdpTransport, WindowCovering, WriteAck,
};
use connector_discovery::DiscoveredDevice;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info};

use crate::device_info::{battery_percent, device_model, is_low_battery, make_device_name};
use crate::error::Result;

/// Snapshot of a blind derived from one state read
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlindStatus {
    /// 0 fully open, 100 fully closed; inferred from the last operation on
    /// binary motors
    pub position: Option<u8>,
    pub angle: Option<i32>,
    /// The motor only knows open and closed
    pub binary: bool,
    pub battery_percent: Option<u8>,
    pub low_battery: bool,
    pub charging_state: Option<u8>,
}

impl BlindStatus {
    pub fn from_state(state: &DeviceState) -> Self {
        Self {
            position: state.effective_position(),
            angle: state.current_angle,
            binary: state.is_binary(),
            battery_percent: state.battery_level.map(battery_percent),
            low_battery: state.battery_level.is_some_and(is_low_battery),
            charging_state: state.charging_state,
        }
    }
}

pub struct Blind<F: SocketFactory = UdpSocketFactory> {
    name: String,
    hub_mac: String,
    fw_version: Option<String>,
    /// Sub-type from the last read that reported one
    sub_type: Mutex<u8>,
    client: HubClient<F>,
}

impl Blind {
    /// Blind for a discovered device, talking through `transport`.
    pub fn from_discovered(
        connector_key: &str,
        device: DiscoveredDevice,
        transport: UdpTransport,
    ) -> Result<Self> {
        Self::with_transport(connector_key, device, transport)
    }
}

impl<F: SocketFactory> Blind<F> {
    pub fn with_transport(
        connector_key: &str,
        device: DiscoveredDevice,
        transport: UdpTransport<F>,
    ) -> Result<Self> {
        let name = make_device_name(device.mac(), device.device_type(), 0);
        let client = HubClient::with_transport(
            connector_key,
            device.identity,
            device.endpoint,
            &device.hub_token,
            transport,
        )?;

        Ok(Self {
            name,
            hub_mac: device.hub_mac,
            fw_version: device.fw_version,
            sub_type: Mutex::new(0),
            client,
        })
    }

    /// Display name fixed at discovery, e.g. `433Mhz Radio Motor 01:AABBCCDDEEFF`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Model name; refined once a read reports the motor's sub-type
    pub fn model(&self) -> &'static str {
        device_model(&self.identity().device_type, *self.sub_type.lock())
    }

    pub fn identity(&self) -> &DeviceIdentity {
        self.client.device()
    }

    pub fn mac(&self) -> &str {
        &self.identity().mac
    }

    pub fn hub_mac(&self) -> &str {
        &self.hub_mac
    }

    pub fn fw_version(&self) -> Option<&str> {
        self.fw_version.as_deref()
    }

    pub fn endpoint(&self) -> HubEndpoint {
        self.client.endpoint()
    }

    pub fn capability(&self) -> PositionCapability {
        self.client.capability()
    }

    pub fn client(&self) -> &HubClient<F> {
        &self.client
    }

    /// Read the motor and summarise its state.
    pub fn status(&self) -> Result<BlindStatus> {
        let ack = self.client.read_state()?;
        self.remember_sub_type(&ack.data);
        let status = BlindStatus::from_state(&ack.data);
        debug!(blind = %self.name, ?status, "status read");
        Ok(status)
    }

    /// Move to `position` (0 open, 100 closed). Binary motors go to whichever
    /// end is nearer.
    ///
    /// A ranged motor whose hub acknowledges the move without reporting a
    /// position counts as a failed move.
    pub fn set_position(&self, position: u8) -> Result<()> {
        info!(blind = %self.name, position, "moving");
        self.client.set_position(position)?;
        Ok(())
    }

    pub fn set_angle(&self, angle: i32) -> Result<()> {
        info!(blind = %self.name, angle, "tilting");
        self.client.set_angle(angle)?;
        Ok(())
    }

    pub fn open(&self) -> Result<()> {
        self.operate(Operation::Open)
    }

    pub fn close(&self) -> Result<()> {
        self.operate(Operation::Close)
    }

    pub fn stop(&self) -> Result<()> {
        self.operate(Operation::Stop)
    }

    fn operate(&self, operation: Operation) -> Result<()> {
        info!(blind = %self.name, ?operation, "operating");
        self.client.set_operation(operation)?;
        Ok(())
    }

    fn remember_sub_type(&self, state: &DeviceState) {
        if state.device_type != 0 {
            *self.sub_type.lock() = state.device_type;
        }
    }
}

impl<F: SocketFactory> WindowCovering for Blind<F> {
    fn get_device_state(&self) -> connector_api::Result<ReadAck> {
        let ack = self.client.get_device_state()?;
        self.remember_sub_type(&ack.data);
        Ok(ack)
    }

    fn set_target_position(&self, position: u8) -> connector_api::Result<WriteAck> {
        self.client.set_target_position(position)
    }

    fn set_target_angle(&self, angle: i32) -> connector_api::Result<WriteAck> {
        self.client.set_target_angle(angle)
    }

    fn set_open_close_state(&self, operation: Operation) -> connector_api::Result<WriteAck> {
        self.client.set_open_close_state(operation)
    }
}

impl<F: SocketFactory> std::fmt::Debug for Blind<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Blind")
            .field("name", &self.name)
            .field("mac", &self.mac())
            .field("hub_mac", &self.hub_mac)
            .field("endpoint", &self.endpoint())
            .finish()
    }
}
