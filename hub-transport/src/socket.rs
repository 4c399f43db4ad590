//! Datagram socket seam used by the transport
//!
//! Production code uses `std::net::UdpSocket`; tests substitute scripted
//! sockets to drive the retry state machine without a network.

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
use std::time::Duration;

/// A socket able to send one datagram and wait for replies
pub trait DatagramSocket {
    /// Send the whole payload as a single datagram
    fn send_to(&mut self, payload: &[u8], endpoint: SocketAddr) -> io::Result<()>;

    /// Wait up to `idle_timeout` for the next datagram.
    ///
    /// Returns `Ok(None)` when the timeout elapses with nothing received.
    fn recv_within(&mut self, buf: &mut [u8], idle_timeout: Duration) -> io::Result<Option<usize>>;
}

/// Opens one fresh socket per attempt
pub trait SocketFactory {
    type Socket: DatagramSocket;

    fn open(&self, endpoint: SocketAddr) -> io::Result<Self::Socket>;
}

/// Binds an ephemeral UDP socket in the endpoint's address family.
///
/// IPv4 sockets are opened with `SO_BROADCAST` set, so hub addresses such as
/// `192.168.1.255` can be targeted as well as unicast and multicast ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct UdpSocketFactory;

impl SocketFactory for UdpSocketFactory {
    type Socket = UdpSocket;

    fn open(&self, endpoint: SocketAddr) -> io::Result<UdpSocket> {
        match endpoint {
            SocketAddr::V4(_) => {
                let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
                socket.set_broadcast(true)?;
                Ok(socket)
            }
            SocketAddr::V6(_) => UdpSocket::bind((Ipv6Addr::UNSPECIFIED, 0)),
        }
    }
}

impl DatagramSocket for UdpSocket {
    fn send_to(&mut self, payload: &[u8], endpoint: SocketAddr) -> io::Result<()> {
        let sent = UdpSocket::send_to(self, payload, endpoint)?;
        if sent != payload.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("short datagram write: {} of {} bytes", sent, payload.len()),
            ));
        }
        Ok(())
    }

    fn recv_within(&mut self, buf: &mut [u8], idle_timeout: Duration) -> io::Result<Option<usize>> {
        self.set_read_timeout(Some(idle_timeout))?;

        match self.recv_from(buf) {
            Ok((len, _)) => Ok(Some(len)),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock || e.kind() == io::ErrorKind::TimedOut => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
