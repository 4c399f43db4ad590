//! Loopback stand-in for a hub, for exercising real sockets

use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Replies a fixture sends for one received request
#[derive(Debug, Clone, Default)]
pub struct Burst {
    /// Each datagram is sent after its delay
    pub datagrams: Vec<(Duration, String)>,
}

impl Burst {
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn immediate(payload: &str) -> Self {
        Self {
            datagrams: vec![(Duration::ZERO, payload.to_string())],
        }
    }

    pub fn spaced(payloads: &[&str], gap: Duration) -> Self {
        Self {
            datagrams: payloads.iter().map(|p| (gap, p.to_string())).collect(),
        }
    }
}

/// A UDP responder that answers the n-th request with the n-th burst
pub struct FixtureHub {
    pub addr: SocketAddr,
    requests: Arc<AtomicUsize>,
    handle: Option<JoinHandle<()>>,
}

impl FixtureHub {
    /// Requests past the end of `bursts` are ignored; the thread exits after
    /// one second without traffic.
    pub fn spawn(bursts: Vec<Burst>) -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").expect("bind fixture hub");
        socket
            .set_read_timeout(Some(Duration::from_secs(1)))
            .expect("set fixture timeout");
        let addr = socket.local_addr().expect("fixture address");
        let requests = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&requests);

        let handle = thread::spawn(move || {
            let mut buf = [0u8; 4096];
            while let Ok((_, from)) = socket.recv_from(&mut buf) {
                let index = counter.fetch_add(1, Ordering::SeqCst);
                if let Some(burst) = bursts.get(index) {
                    for (delay, payload) in &burst.datagrams {
                        thread::sleep(*delay);
                        let _ = socket.send_to(payload.as_bytes(), from);
                    }
                }
            }
        });

        Self {
            addr,
            requests,
            handle: Some(handle),
        }
    }

    /// Number of requests received so far
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl Drop for FixtureHub {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
