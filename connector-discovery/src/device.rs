//! Flattening of hub inventories into per-device records.

use std::collections::HashSet;

use connector_api::{DiscoverAck, HubEndpoint};

use crate::{DeviceEvent, DiscoveredDevice, HubInfo};

/// Turn the acks of one discovery burst into events.
///
/// Each ack yields a `HubAnswered` event followed by a `Found` event per motor
/// it lists. The hub's own inventory entry is skipped, and a motor listed by
/// more than one ack (a duplicated reply) is reported only the first time.
pub(crate) fn events_from_acks(acks: Vec<DiscoverAck>, endpoint: HubEndpoint) -> Vec<DeviceEvent> {
    let mut seen_hubs = HashSet::new();
    let mut seen_devices = HashSet::new();
    let mut events = Vec::new();

    for ack in acks {
        if seen_hubs.insert(ack.mac.clone()) {
            events.push(DeviceEvent::HubAnswered(HubInfo {
                mac: ack.mac.clone(),
                device_type: ack.device_type.clone(),
                fw_version: ack.fw_version.clone(),
                protocol_version: ack.protocol_version.clone(),
                token: ack.token.clone(),
            }));
        }

        for identity in ack.devices() {
            if !seen_devices.insert(identity.mac.clone()) {
                continue;
            }
            events.push(DeviceEvent::Found(DiscoveredDevice {
                identity: identity.clone(),
                hub_mac: ack.mac.clone(),
                hub_token: ack.token.clone(),
                fw_version: ack.fw_version.clone(),
                endpoint,
            }));
        }
    }

    events
}
