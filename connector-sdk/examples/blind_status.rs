//! Print the status of every blind as JSON
//!
//! Usage: cargo run -p connector-hub-sdk --example blind_status -- <connector-key> [hub-ip]
//!
//! Set `CONNECTOR_LOG_MODE=development` to see the exchanges with the hub.

use connector_sdk::{ConnectorConfig, ConnectorSystem, SdkError};
use serde_json::json;

fn main() -> Result<(), SdkError> {
    connector_sdk::logging::init_logging_from_env()?;

    let mut args = std::env::args().skip(1);
    let key = args
        .next()
        .ok_or_else(|| SdkError::InvalidConfig("usage: blind_status <connector-key> [hub-ip]".into()))?;
    let mut config = ConnectorConfig::new(key)?;
    if let Some(ip) = args.next() {
        config = config.with_hub_ip(ip);
    }

    let system = ConnectorSystem::discover(config)?;

    let report: Vec<_> = system
        .blinds()
        .iter()
        .map(|blind| match blind.status() {
            Ok(status) => json!({"name": blind.name(), "model": blind.model(), "status": status}),
            Err(e) => json!({"name": blind.name(), "error": e.to_string()}),
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&report).unwrap_or_default());
    Ok(())
}
