//! Loopback hub serving a discovery inventory and per-device state

use std::net::UdpSocket;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use serde_json::{json, Value};

pub const KEY: &str = "12345678-1234-12";
pub const HUB_MAC: &str = "AABBCCDDEEFF";
pub const HUB_TOKEN: &str = "A1B2C3D4E5F6A7B8";

/// Answers `GetDeviceList` with its inventory, `ReadDevice` with the state
/// registered for the MAC, and `WriteDevice` with an ack echoing any target
/// position.
pub struct FixtureHub {
    pub port: u16,
    received: Arc<Mutex<Vec<Value>>>,
    handle: Option<JoinHandle<()>>,
}

impl FixtureHub {
    pub fn spawn(devices: Vec<(&str, Value)>) -> Self {
        let devices: Vec<(String, Value)> = devices
            .into_iter()
            .map(|(mac, state)| (mac.to_string(), state))
            .collect();
        let socket = UdpSocket::bind("127.0.0.1:0").expect("bind fixture hub");
        socket
            .set_read_timeout(Some(Duration::from_millis(500)))
            .expect("set fixture timeout");
        let port = socket.local_addr().expect("fixture address").port();
        let received = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&received);

        let handle = thread::spawn(move || {
            let mut buf = [0u8; 4096];
            while let Ok((len, from)) = socket.recv_from(&mut buf) {
                let request: Value = serde_json::from_slice(&buf[..len]).unwrap_or(Value::Null);
                log.lock().unwrap().push(request.clone());
                if let Some(reply) = answer(&request, &devices) {
                    let _ = socket.send_to(reply.to_string().as_bytes(), from);
                }
            }
        });

        Self {
            port,
            received,
            handle: Some(handle),
        }
    }

    pub fn received(&self) -> Vec<Value> {
        self.received.lock().unwrap().clone()
    }
}

fn answer(request: &Value, devices: &[(String, Value)]) -> Option<Value> {
    match request["msgType"].as_str()? {
        "GetDeviceList" => {
            let mut inventory = vec![json!({"mac": HUB_MAC, "deviceType": "02000001"})];
            inventory.extend(
                devices
                    .iter()
                    .map(|(mac, _)| json!({"mac": mac, "deviceType": "10000000"})),
            );
            Some(json!({
                "msgType": "GetDeviceListAck",
                "mac": HUB_MAC,
                "deviceType": "02000001",
                "fwVersion": "A1.0.1_B0.1.2",
                "token": HUB_TOKEN,
                "data": inventory,
            }))
        }
        "ReadDevice" => {
            let mac = request["mac"].as_str()?;
            let (_, state) = devices.iter().find(|(m, _)| m == mac)?;
            Some(json!({
                "msgType": "ReadDeviceAck",
                "mac": mac,
                "deviceType": "10000000",
                "data": state,
            }))
        }
        "WriteDevice" => Some(json!({
            "msgType": "WriteDeviceAck",
            "mac": request["mac"],
            "deviceType": "10000000",
            "data": {"operation": 2, "currentPosition": request["data"]["targetPosition"]},
        })),
        _ => None,
    }
}

impl Drop for FixtureHub {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
