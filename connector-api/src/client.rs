use std::fmt;

use hub_transport::{ReplyMode, SocketFactory, UdpSocketFactory, UdpTransport};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::device::{Command, DeviceIdentity, HubEndpoint, Operation, PositionCapability};
use crate::error::{ApiError, Result};
use crate::exchange::exchange;
use crate::request::{build_discover_request, build_read_request, build_write_request, Request};
use crate::response::{DiscoverAck, ReadAck, Response, WriteAck};
use crate::token::{compute_access_token, AccessToken};

/// Client for one motor behind one hub
///
/// Holds the device identity, the hub address and the access token derived
/// from the connector key and the hub's nonce. Every call is a complete
/// send/retry cycle; calls on the same client are serialized, so at most one
/// request per device is in flight. The cached getters do not wait for it.
///
/// ```rust,no_run
/// use connector_api::{DeviceIdentity, HubClient, HubEndpoint, Operation};
///
/// let device = DeviceIdentity::new("AABBCCDDEEFF0001", "10000000");
/// let endpoint = HubEndpoint::parse("192.168.1.20", 32100)?;
/// let client = HubClient::new("12345678-1234-12", device, endpoint, "A1B2C3D4E5F6A7B8")?;
///
/// let state = client.read_state()?;
/// println!("position: {:?}", state.data.current_position);
///
/// client.set_position(25)?;
/// client.set_operation(Operation::Stop)?;
/// # Ok::<(), connector_api::ApiError>(())
/// ```
pub struct HubClient<F = UdpSocketFactory> {
    device: DeviceIdentity,
    endpoint: HubEndpoint,
    shared_secret: String,
    transport: UdpTransport<F>,
    /// Held for the duration of each exchange
    in_flight: Mutex<()>,
    /// Cached values; only ever locked briefly
    session: Mutex<Session>,
}

#[derive(Debug)]
struct Session {
    token: AccessToken,
    capability: PositionCapability,
}

impl<F: SocketFactory> fmt::Debug for HubClient<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HubClient")
            .field("device", &self.device)
            .field("endpoint", &self.endpoint)
            .field("capability", &self.capability())
            .finish_non_exhaustive()
    }
}

impl HubClient {
    /// Create a client using real UDP sockets and default timing.
    ///
    /// # Errors
    ///
    /// Fails if the connector key or hub token cannot produce an access token.
    pub fn new(
        shared_secret: &str,
        device: DeviceIdentity,
        endpoint: HubEndpoint,
        hub_token: &str,
    ) -> Result<Self> {
        Self::with_transport(shared_secret, device, endpoint, hub_token, UdpTransport::new())
    }

    /// Ask every hub reachable at `endpoint` for its inventory.
    ///
    /// Sent to a unicast address this normally draws one ack; sent to the
    /// multicast group, each hub on the network answers.
    pub fn discover_devices(endpoint: HubEndpoint) -> Result<Vec<DiscoverAck>> {
        discover_devices_with(&UdpTransport::new(), endpoint)
    }
}

/// [`HubClient::discover_devices`] over a caller-supplied transport
pub fn discover_devices_with<F: SocketFactory>(
    transport: &UdpTransport<F>,
    endpoint: HubEndpoint,
) -> Result<Vec<DiscoverAck>> {
    let request = build_discover_request();
    let acks = exchange(
        transport,
        &request,
        endpoint,
        ReplyMode::Burst,
        Response::into_discover_ack,
    )?;
    info!(%endpoint, hubs = acks.len(), "device list received");
    Ok(acks)
}

impl<F: SocketFactory> HubClient<F> {
    /// Create a client over a configured transport
    pub fn with_transport(
        shared_secret: &str,
        device: DeviceIdentity,
        endpoint: HubEndpoint,
        hub_token: &str,
        transport: UdpTransport<F>,
    ) -> Result<Self> {
        let token = compute_access_token(shared_secret, hub_token)?;

        Ok(Self {
            device,
            endpoint,
            shared_secret: shared_secret.to_string(),
            transport,
            in_flight: Mutex::new(()),
            session: Mutex::new(Session {
                token,
                capability: PositionCapability::Unknown,
            }),
        })
    }

    pub fn device(&self) -> &DeviceIdentity {
        &self.device
    }

    pub fn endpoint(&self) -> HubEndpoint {
        self.endpoint
    }

    /// Current access token. Never waits on a request in flight.
    pub fn access_token(&self) -> AccessToken {
        self.session.lock().token.clone()
    }

    /// Position capability learned from the first successful read. Never
    /// waits on a request in flight.
    pub fn capability(&self) -> PositionCapability {
        self.session.lock().capability
    }

    /// Re-derive the access token after the hub issued a new nonce
    pub fn update_hub_token(&self, hub_token: &str) -> Result<()> {
        let token = compute_access_token(&self.shared_secret, hub_token)?;
        self.session.lock().token = token;
        debug!(device = %self.device, "access token refreshed");
        Ok(())
    }

    /// Read the hub's cached state for this device
    pub fn read_state(&self) -> Result<ReadAck> {
        let _in_flight = self.in_flight.lock();
        let request = build_read_request(&self.device);
        let ack = self.exchange_single(&request, Response::into_read_ack)?;

        let mut session = self.session.lock();
        if session.capability == PositionCapability::Unknown {
            session.capability = PositionCapability::from_state(&ack.data);
            info!(device = %self.device, capability = ?session.capability, "position capability detected");
        }

        Ok(ack)
    }

    /// Send one command.
    ///
    /// # Errors
    ///
    /// [`ApiError::CommandRejected`] when the hub answers with a non-zero
    /// `actionResult`, in addition to the transport failures.
    pub fn write_command(&self, command: Command) -> Result<WriteAck> {
        let _in_flight = self.in_flight.lock();
        self.write(command)
    }

    /// Move to a position between 0 (open) and 100 (closed).
    ///
    /// On a motor known to be binary the target is snapped to the nearer end.
    ///
    /// # Errors
    ///
    /// [`ApiError::IncompleteAck`] when a motor known to be ranged
    /// acknowledges the move without reporting its position.
    pub fn set_position(&self, position: u8) -> Result<WriteAck> {
        if position > 100 {
            return Err(ApiError::InvalidParameter(format!(
                "position {} is out of range [0, 100]",
                position
            )));
        }

        let _in_flight = self.in_flight.lock();
        let capability = self.capability();
        let target = capability.snap_target(position);
        if target != position {
            debug!(device = %self.device, requested = position, target, "binary motor, snapping target");
        }

        let ack = self.write(Command::TargetPosition(target))?;
        let reported = ack.data.as_ref().and_then(|state| state.current_position);
        if capability == PositionCapability::Ranged && reported.is_none() {
            warn!(device = %self.device, target, "move acknowledged without a position");
            return Err(ApiError::IncompleteAck {
                device: self.device.mac.clone(),
            });
        }

        Ok(ack)
    }

    pub fn set_angle(&self, angle: i32) -> Result<WriteAck> {
        self.write_command(Command::TargetAngle(angle))
    }

    pub fn set_operation(&self, operation: Operation) -> Result<WriteAck> {
        self.write_command(Command::Operation(operation))
    }

    /// Caller holds `in_flight`
    fn write(&self, command: Command) -> Result<WriteAck> {
        let request = build_write_request(&self.device, &self.access_token(), command);
        let ack = self.exchange_single(&request, Response::into_write_ack)?;

        if let Some(result) = ack.rejection() {
            warn!(device = %self.device, ?command, %result, "command rejected");
            return Err(ApiError::CommandRejected(result.clone()));
        }

        Ok(ack)
    }

    fn exchange_single<R>(&self, request: &Request, narrow: fn(Response) -> Option<R>) -> Result<R> {
        let replies = exchange(&self.transport, request, self.endpoint, ReplyMode::Single, narrow)?;
        // The transport reports an empty exchange as an error, so this only
        // guards the invariant.
        replies.into_iter().next().ok_or_else(|| ApiError::HubUnreachable {
            endpoint: self.endpoint.socket_addr(),
            attempts: self.transport.config().effective_max_attempts(),
        })
    }
}
