//! Discovery iterator.
//!
//! A single `GetDeviceList` burst is sent on the first call to `next()`; the
//! acks collected within the idle window are flattened into events and handed
//! out one at a time.

use std::collections::VecDeque;

use connector_api::{discover_devices_with, HubEndpoint, Result, SocketFactory, UdpSocketFactory, UdpTransport};
use tracing::{debug, warn};

use crate::device::events_from_acks;
use crate::{DeviceEvent, DiscoveredDevice};

/// Iterator over the hubs and motors answering one discovery request.
///
/// Nothing is sent until the iterator is first polled. A hub that cannot be
/// reached ends the iteration without yielding anything; use
/// [`crate::discover_with`] when the failure itself matters.
///
/// # Examples
///
/// ```no_run
/// use connector_discovery::{get_iter, DeviceEvent};
///
/// for event in get_iter() {
///     if let DeviceEvent::Found(device) = event {
///         println!("{} behind hub {}", device.mac(), device.hub_mac);
///         break;
///     }
/// }
/// ```
pub struct DiscoveryIterator<F: SocketFactory = UdpSocketFactory> {
    transport: Option<UdpTransport<F>>,
    endpoint: HubEndpoint,
    events: VecDeque<DeviceEvent>,
}

impl DiscoveryIterator {
    /// Iterator over real UDP sockets with default transport timing
    pub fn new(endpoint: HubEndpoint) -> Self {
        Self::with_transport(UdpTransport::new(), endpoint)
    }
}

impl<F: SocketFactory> DiscoveryIterator<F> {
    pub fn with_transport(transport: UdpTransport<F>, endpoint: HubEndpoint) -> Self {
        Self {
            transport: Some(transport),
            endpoint,
            events: VecDeque::new(),
        }
    }

    pub fn endpoint(&self) -> HubEndpoint {
        self.endpoint
    }

    fn fill_buffer(&mut self) {
        let Some(transport) = self.transport.take() else {
            return;
        };

        match discover_devices_with(&transport, self.endpoint) {
            Ok(acks) => {
                self.events = events_from_acks(acks, self.endpoint).into();
                debug!(endpoint = %self.endpoint, events = self.events.len(), "discovery buffered");
            }
            Err(e) => {
                warn!(endpoint = %self.endpoint, error = %e, "discovery failed");
            }
        }
    }
}

impl<F: SocketFactory> Iterator for DiscoveryIterator<F> {
    type Item = DeviceEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.fill_buffer();
        self.events.pop_front()
    }
}

/// Flatten every hub's inventory into one deduplicated device list.
///
/// Unlike the iterator, an unreachable hub is reported as an error.
pub(crate) fn collect_devices<F: SocketFactory>(
    transport: &UdpTransport<F>,
    endpoint: HubEndpoint,
) -> Result<Vec<DiscoveredDevice>> {
    let acks = discover_devices_with(transport, endpoint)?;
    Ok(events_from_acks(acks, endpoint)
        .into_iter()
        .filter_map(DeviceEvent::into_device)
        .collect())
}
