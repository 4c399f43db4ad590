//! Blind discovery that outputs JSON for scripting
//!
//! Usage: cargo run -p connector-hub-discovery --example discover_json [hub-ip]
//!
//! Without an argument the request goes to the hub multicast group.

use connector_api::{HubEndpoint, DEFAULT_SEND_PORT};
use connector_discovery::{get_from, DiscoveredDevice};

fn main() {
    let endpoint = std::env::args()
        .nth(1)
        .and_then(|ip| HubEndpoint::parse(&ip, DEFAULT_SEND_PORT).ok())
        .unwrap_or_else(HubEndpoint::multicast);

    let devices: Vec<DiscoveredDevice> = get_from(endpoint);

    println!("{}", serde_json::to_string_pretty(&devices).unwrap());
}
