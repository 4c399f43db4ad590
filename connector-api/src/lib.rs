//! Type-safe API for Connector motorized-blind hubs
//!
//! Hubs accept single-datagram JSON requests over UDP:
//!
//! - `GetDeviceList` returns each hub's inventory and the nonce used to
//!   authenticate writes,
//! - `ReadDevice` returns the hub's cached state for one motor,
//! - `WriteDevice` moves a motor, authenticated by an AES-derived token.
//!
//! [`HubClient`] wraps all three for one device. The lower-level pieces
//! (request builders, the reply parser, token derivation) are public so that
//! tools can speak the protocol directly.
//!
//! ```rust,no_run
//! use connector_api::{HubClient, HubEndpoint};
//!
//! for ack in HubClient::discover_devices(HubEndpoint::multicast())? {
//!     println!("hub {} (token {})", ack.mac, ack.token);
//!     for device in ack.devices() {
//!         println!("  {}", device);
//!     }
//! }
//! # Ok::<(), connector_api::ApiError>(())
//! ```

pub mod device;
pub mod request;
pub mod response;
pub mod token;

mod client;
mod covering;
mod error;
mod exchange;
mod message_id;

pub use client::{discover_devices_with, HubClient};
pub use covering::WindowCovering;
pub use device::{
    Command, DeviceIdentity, DeviceState, HubEndpoint, Operation, PositionCapability,
    DEFAULT_SEND_PORT, HUB_DEVICE_TYPE, HUB_MULTICAST_GROUP,
};
pub use error::{ApiError, Result};
pub use message_id::MessageId;
pub use request::Request;
pub use response::{parse, ActionResult, DiscoverAck, ReadAck, Response, Unparseable, WriteAck};
pub use token::{compute_access_token, AccessToken};

// Transport knobs are part of this crate's public surface
pub use hub_transport::{ReplyMode, SocketFactory, TransportConfig, UdpSocketFactory, UdpTransport};
