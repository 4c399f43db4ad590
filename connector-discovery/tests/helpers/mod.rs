//! Loopback hub that answers discovery requests

use std::net::{IpAddr, UdpSocket};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use connector_api::{HubEndpoint, TransportConfig, UdpTransport};

pub const HUB_A: &str = r#"{"msgType":"GetDeviceListAck","mac":"AABBCCDDEEFF","deviceType":"02000001","fwVersion":"A1.0.1_B0.1.2","ProtocolVersion":"0.9","token":"A1B2C3D4E5F6A7B8","data":[{"mac":"AABBCCDDEEFF","deviceType":"02000001"},{"mac":"AABBCCDDEEFF0001","deviceType":"10000000"},{"mac":"AABBCCDDEEFF0002","deviceType":"10000000"}]}"#;
pub const HUB_B: &str = r#"{"msgType":"GetDeviceListAck","mac":"112233445566","deviceType":"02000001","token":"0123456789ABCDEF","data":[{"mac":"112233445566","deviceType":"02000001"},{"mac":"1122334455660001","deviceType":"10000000"}]}"#;

/// Answers every request with the same burst of datagrams
pub struct FixtureHub {
    pub endpoint: HubEndpoint,
    requests: Arc<AtomicUsize>,
    handle: Option<JoinHandle<()>>,
}

impl FixtureHub {
    /// Exits after half a second without traffic.
    pub fn spawn(burst: Vec<&str>) -> Self {
        let burst: Vec<String> = burst.into_iter().map(str::to_owned).collect();
        let socket = UdpSocket::bind("127.0.0.1:0").expect("bind fixture hub");
        socket
            .set_read_timeout(Some(Duration::from_millis(500)))
            .expect("set fixture timeout");
        let port = socket.local_addr().expect("fixture address").port();
        let requests = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&requests);

        let handle = thread::spawn(move || {
            let mut buf = [0u8; 4096];
            while let Ok((_, from)) = socket.recv_from(&mut buf) {
                counter.fetch_add(1, Ordering::SeqCst);
                for payload in &burst {
                    let _ = socket.send_to(payload.as_bytes(), from);
                    thread::sleep(Duration::from_millis(5));
                }
            }
        });

        Self {
            endpoint: HubEndpoint::new(IpAddr::from([127, 0, 0, 1]), port),
            requests,
            handle: Some(handle),
        }
    }

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

pub fn quick_transport() -> UdpTransport {
    UdpTransport::with_config(
        TransportConfig::default()
            .with_idle_timeout(Duration::from_millis(100))
            .with_max_attempts(2),
    )
}
