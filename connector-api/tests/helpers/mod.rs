//! Loopback fixture hub for client integration tests

use std::net::{IpAddr, UdpSocket};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use connector_api::{HubEndpoint, TransportConfig, UdpTransport};

/// A UDP responder that answers the n-th request with the n-th list of replies
pub struct FixtureHub {
    pub endpoint: HubEndpoint,
    received: Arc<Mutex<Vec<serde_json::Value>>>,
    handle: Option<JoinHandle<()>>,
}

impl FixtureHub {
    /// Requests beyond the scripted ones get no answer. The thread exits after
    /// a second without traffic.
    pub fn spawn(replies: Vec<Vec<&str>>) -> Self {
        let replies: Vec<Vec<String>> = replies
            .into_iter()
            .map(|burst| burst.into_iter().map(str::to_owned).collect())
            .collect();

        let socket = UdpSocket::bind("127.0.0.1:0").expect("bind fixture hub");
        socket
            .set_read_timeout(Some(Duration::from_secs(1)))
            .expect("set fixture timeout");
        let addr = socket.local_addr().expect("fixture address");
        let received = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&received);

        let handle = thread::spawn(move || {
            let mut buf = [0u8; 4096];
            while let Ok((len, from)) = socket.recv_from(&mut buf) {
                let request = serde_json::from_slice(&buf[..len]).unwrap_or(serde_json::Value::Null);
                let index = {
                    let mut log = log.lock().unwrap();
                    log.push(request);
                    log.len() - 1
                };
                for payload in replies.get(index).into_iter().flatten() {
                    let _ = socket.send_to(payload.as_bytes(), from);
                    thread::sleep(Duration::from_millis(5));
                }
            }
        });

        Self {
            endpoint: HubEndpoint::new(IpAddr::from([127, 0, 0, 1]), addr.port()),
            received,
            handle: Some(handle),
        }
    }

    /// Requests received so far, decoded as JSON
    pub fn received(&self) -> Vec<serde_json::Value> {
        self.received.lock().unwrap().clone()
    }
}

impl Drop for FixtureHub {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Transport with a short idle window so silent-hub tests finish quickly
pub fn quick_transport() -> UdpTransport {
    UdpTransport::with_config(TransportConfig::default().with_idle_timeout(Duration::from_millis(100)))
}
