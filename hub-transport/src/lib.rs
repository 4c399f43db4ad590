//! Private UDP transport for connector hub communication
//!
//! This crate exchanges one serialized request for the replies it draws from
//! hubs on the local network. Hubs speak plain UDP, drop packets under load,
//! and several of them may answer a broadcast, so every exchange:
//!
//! - opens a transient socket per attempt and always closes it,
//! - listens until the socket has been idle for a short timeout,
//! - retries a bounded number of times while nothing parseable arrived.
//!
//! Payload encoding and reply decoding belong to the caller; the transport
//! only needs a closure deciding whether a datagram is a usable reply.
//!
//! ```no_run
//! use hub_transport::{ReplyMode, UdpTransport};
//!
//! let transport = UdpTransport::new();
//! let endpoint = "192.168.1.20:32100".parse().unwrap();
//! let replies = transport.send(br#"{"msgType":"GetDeviceList"}"#, endpoint, ReplyMode::Burst, |bytes| {
//!     std::str::from_utf8(bytes).ok().map(str::to_owned)
//! })?;
//! # Ok::<(), hub_transport::TransportError>(())
//! ```

mod config;
mod error;
mod socket;
mod transport;

pub use config::TransportConfig;
pub use error::{Result, TransportError};
pub use socket::{DatagramSocket, SocketFactory, UdpSocketFactory};
pub use transport::{ReplyMode, RetryState, UdpTransport};
