//! Request/reply exchange over UDP with bounded retries
//!
//! One call to [`UdpTransport::send`] runs a small state machine:
//!
//! ```text
//! Attempting(1) -> Attempting(2) -> ... -> Attempting(max) -> Exhausted
//!       |                |                        |
//!       +----------------+------------------------+--> Succeeded(replies)
//! ```
//!
//! Each attempt opens its own socket, sends the payload once and then listens
//! until the socket has been idle for the configured timeout. In
//! [`ReplyMode::Single`] the attempt also stops at the first parsed reply.

use std::io;
use std::net::SocketAddr;

use tracing::{debug, warn};

use crate::config::TransportConfig;
use crate::error::{Result, TransportError};
use crate::socket::{DatagramSocket, SocketFactory, UdpSocketFactory};

/// How many replies a request is expected to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyMode {
    /// A targeted request answered by exactly one hub
    Single,
    /// A broadcast request that any number of hubs may answer
    Burst,
}

/// Progress of one logical request through its attempts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryState<R> {
    /// The given attempt (1-based) is about to run
    Attempting(u32),
    /// An attempt produced at least one reply
    Succeeded(Vec<R>),
    /// All attempts ran without a reply
    Exhausted,
}

impl<R> RetryState<R> {
    /// State after `attempt` finished having collected `replies`
    pub fn after_attempt(attempt: u32, replies: Vec<R>, max_attempts: u32) -> Self {
        if !replies.is_empty() {
            RetryState::Succeeded(replies)
        } else if attempt < max_attempts {
            RetryState::Attempting(attempt + 1)
        } else {
            RetryState::Exhausted
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, RetryState::Attempting(_))
    }
}

/// UDP transport for hub requests
#[derive(Debug, Clone)]
pub struct UdpTransport<F = UdpSocketFactory> {
    config: TransportConfig,
    factory: F,
}

impl UdpTransport {
    /// Create a transport with default timing over real UDP sockets
    pub fn new() -> Self {
        Self::with_config(TransportConfig::default())
    }

    pub fn with_config(config: TransportConfig) -> Self {
        Self {
            config,
            factory: UdpSocketFactory,
        }
    }
}

impl Default for UdpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: SocketFactory> UdpTransport<F> {
    /// Create a transport over a custom socket factory
    pub fn with_factory(config: TransportConfig, factory: F) -> Self {
        Self { config, factory }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Exchange one serialized request for zero or more parsed replies.
    ///
    /// `parse` is applied to every received datagram; `None` drops the
    /// datagram without ending the receive loop. The payload is sent once per
    /// attempt, unchanged.
    ///
    /// # Errors
    ///
    /// [`TransportError::HubUnreachable`] when no attempt yielded a reply.
    pub fn send<R, P>(
        &self,
        payload: &[u8],
        endpoint: SocketAddr,
        mode: ReplyMode,
        mut parse: P,
    ) -> Result<Vec<R>>
    where
        P: FnMut(&[u8]) -> Option<R>,
    {
        let max_attempts = self.config.effective_max_attempts();
        let mut state = RetryState::Attempting(1);

        loop {
            state = match state {
                RetryState::Attempting(attempt) => {
                    let replies = match self.attempt(payload, endpoint, mode, &mut parse) {
                        Ok(replies) => replies,
                        Err(e) => {
                            debug!(%endpoint, attempt, error = %e, "attempt aborted by socket error");
                            Vec::new()
                        }
                    };
                    if replies.is_empty() {
                        debug!(%endpoint, attempt, max_attempts, "no reply");
                    }
                    RetryState::after_attempt(attempt, replies, max_attempts)
                }
                RetryState::Succeeded(replies) => {
                    debug!(%endpoint, count = replies.len(), "exchange complete");
                    return Ok(replies);
                }
                RetryState::Exhausted => {
                    warn!(%endpoint, attempts = max_attempts, "hub did not answer");
                    return Err(TransportError::HubUnreachable {
                        endpoint,
                        attempts: max_attempts,
                    });
                }
            };
        }
    }

    /// One send/receive cycle. The socket is dropped on every return path.
    fn attempt<R, P>(
        &self,
        payload: &[u8],
        endpoint: SocketAddr,
        mode: ReplyMode,
        parse: &mut P,
    ) -> io::Result<Vec<R>>
    where
        P: FnMut(&[u8]) -> Option<R>,
    {
        let mut socket = self.factory.open(endpoint)?;
        socket.send_to(payload, endpoint)?;

        let idle_timeout = self.config.effective_idle_timeout();
        let mut buf = vec![0u8; self.config.recv_buffer_size];
        let mut replies = Vec::new();

        while let Some(len) = socket.recv_within(&mut buf, idle_timeout)? {
            match parse(&buf[..len]) {
                Some(reply) => {
                    replies.push(reply);
                    if mode == ReplyMode::Single {
                        break;
                    }
                }
                None => debug!(%endpoint, len, "dropping unparseable datagram"),
            }
        }

        Ok(replies)
    }
}
