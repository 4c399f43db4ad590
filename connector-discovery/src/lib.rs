//! Connector hub discovery library
//!
//! Finds the hubs on the local network and the motors paired with each of
//! them, flattening every hub's inventory into one list of blinds that can be
//! driven through [`connector_api::HubClient`].
//!
//! # Quick Start
//!
//! ```no_run
//! use connector_discovery::get;
//!
//! for device in get() {
//!     println!("{} ({}) via hub {}", device.mac(), device.device_type(), device.hub_mac);
//! }
//! ```
//!
//! # Iterator-based Discovery
//!
//! ```no_run
//! use connector_discovery::{get_iter, DeviceEvent};
//!
//! for event in get_iter() {
//!     match event {
//!         DeviceEvent::HubAnswered(hub) => println!("hub {}", hub.mac),
//!         DeviceEvent::Found(device) => println!("  motor {}", device.mac()),
//!     }
//! }
//! ```

mod device;
mod discovery;

use std::net::IpAddr;

use connector_api::{DeviceIdentity, HubEndpoint, Result, SocketFactory, UdpTransport};
use serde::{Serialize, Serializer};
use tracing::warn;

pub use discovery::DiscoveryIterator;

/// A motor listed in some hub's inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredDevice {
    #[serde(flatten)]
    pub identity: DeviceIdentity,
    /// MAC of the hub the motor is paired with
    pub hub_mac: String,
    /// Nonce from the hub's ack, needed to derive write access tokens
    pub hub_token: String,
    pub fw_version: Option<String>,
    /// Where requests for this motor should be sent
    #[serde(serialize_with = "serialize_endpoint")]
    pub endpoint: HubEndpoint,
}

impl DiscoveredDevice {
    pub fn mac(&self) -> &str {
        &self.identity.mac
    }

    pub fn device_type(&self) -> &str {
        &self.identity.device_type
    }

    pub fn hub_ip(&self) -> IpAddr {
        self.endpoint.ip
    }
}

fn serialize_endpoint<S: Serializer>(endpoint: &HubEndpoint, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(endpoint)
}

/// Summary of one hub's discovery ack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HubInfo {
    pub mac: String,
    pub device_type: String,
    pub fw_version: Option<String>,
    pub protocol_version: Option<String>,
    pub token: String,
}

/// Events emitted during discovery.
///
/// Each hub's `HubAnswered` event precedes the `Found` events for its motors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    HubAnswered(HubInfo),
    Found(DiscoveredDevice),
}

impl DeviceEvent {
    pub fn into_device(self) -> Option<DiscoveredDevice> {
        match self {
            DeviceEvent::Found(device) => Some(device),
            DeviceEvent::HubAnswered(_) => None,
        }
    }
}

/// Discover every motor answering on the hub multicast group.
///
/// Failures are logged and yield an empty list. Use [`discover`] to see them.
pub fn get() -> Vec<DiscoveredDevice> {
    get_from(HubEndpoint::multicast())
}

/// Like [`get`], but asks a specific hub (or group) instead of the default
/// multicast group.
pub fn get_from(endpoint: HubEndpoint) -> Vec<DiscoveredDevice> {
    match discover(endpoint) {
        Ok(devices) => devices,
        Err(e) => {
            warn!(%endpoint, error = %e, "no devices discovered");
            Vec::new()
        }
    }
}

/// Iterator over the hubs and motors answering on the multicast group.
pub fn get_iter() -> DiscoveryIterator {
    DiscoveryIterator::new(HubEndpoint::multicast())
}

pub fn get_iter_from(endpoint: HubEndpoint) -> DiscoveryIterator {
    DiscoveryIterator::new(endpoint)
}

/// Discover motors at `endpoint`, reporting an unreachable hub as an error.
///
/// # Errors
///
/// Returns [`connector_api::ApiError::HubUnreachable`] when no hub answers
/// within the transport's retry budget.
pub fn discover(endpoint: HubEndpoint) -> Result<Vec<DiscoveredDevice>> {
    discover_with(&UdpTransport::new(), endpoint)
}

/// [`discover`] over a caller-supplied transport.
pub fn discover_with<F: SocketFactory>(
    transport: &UdpTransport<F>,
    endpoint: HubEndpoint,
) -> Result<Vec<DiscoveredDevice>> {
    discovery::collect_devices(transport, endpoint)
}

/// [`discover`] on the hub multicast group.
pub fn discover_default() -> Result<Vec<DiscoveredDevice>> {
    discover(HubEndpoint::multicast())
}
