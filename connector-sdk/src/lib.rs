//! # Connector SDK
//!
//! Synchronous handles for Connector motorized blinds:
//!
//! ```rust,no_run
//! use connector_sdk::{ConnectorConfig, ConnectorSystem};
//!
//! fn main() -> Result<(), connector_sdk::SdkError> {
//!     connector_sdk::logging::init_logging_from_env()?;
//!
//!     let config = ConnectorConfig::from_json(r#"{"connectorKey":"12345678-1234-12"}"#)?;
//!     let system = ConnectorSystem::discover(config)?;
//!
//!     for blind in system.blinds() {
//!         let status = blind.status()?;
//!         println!("{} ({}): {:?}", blind.name(), blind.model(), status);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! connector-sdk (ConnectorSystem, Blind)
//!     ↓
//! connector-discovery (hub inventories)
//!     ↓
//! connector-api (HubClient, requests, replies, access tokens)
//!     ↓
//! hub-transport (UDP send/retry)
//! ```

pub use blind::{Blind, BlindStatus};
pub use config::{ConnectorConfig, TransportOverrides, TransportPreset};
pub use device_info::{
    battery_percent, device_model, is_low_battery, make_device_name, LOW_BATTERY_PERCENT,
};
pub use error::{Result, SdkError};
pub use system::ConnectorSystem;

// Re-export commonly used types from the lower layers
pub use connector_api::{Operation, PositionCapability, WindowCovering};
pub use connector_discovery::DiscoveredDevice;

pub mod logging;

mod blind;
mod config;
mod device_info;
mod error;
mod system;
