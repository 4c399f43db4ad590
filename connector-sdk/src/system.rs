//! ConnectorSystem - main entry point for the SDK

use connector_api::UdpTransport;
use connector_discovery::DiscoveredDevice;
use tracing::{info, warn};

use crate::blind::Blind;
use crate::config::ConnectorConfig;
use crate::error::{Result, SdkError};

/// Every blind reachable with one configuration.
///
/// Fully synchronous; each call on a blind is one blocking exchange with its
/// hub.
///
/// # Example
///
/// ```rust,no_run
/// use connector_sdk::{ConnectorConfig, ConnectorSystem};
///
/// fn main() -> Result<(), connector_sdk::SdkError> {
///     let config = ConnectorConfig::new("12345678-1234-12")?.with_hub_ip("192.168.1.20");
///     let system = ConnectorSystem::discover(config)?;
///
///     for blind in system.blinds() {
///         let status = blind.status()?;
///         println!("{}: {:?}% closed", blind.name(), status.position);
///     }
///
///     system.get_blind("Roller Blinds 01:AABBCCDDEEFF")?.set_position(0)?;
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct ConnectorSystem {
    config: ConnectorConfig,
    blinds: Vec<Blind>,
}

impl ConnectorSystem {
    /// Discover the configured hub (or every hub on the multicast group) and
    /// create a handle for each paired motor.
    ///
    /// # Errors
    ///
    /// Fails on an invalid config or when no hub answers discovery.
    pub fn discover(config: ConnectorConfig) -> Result<Self> {
        config.validate()?;
        let endpoint = config.endpoint()?;
        let transport = UdpTransport::with_config(config.transport_config());

        let devices = connector_discovery::discover_with(&transport, endpoint)?;
        Self::from_discovered_devices(config, devices)
    }

    /// Build the system from devices found earlier.
    ///
    /// A device whose hub handed out an unusable token is skipped with a
    /// warning; blinds on other hubs stay available.
    ///
    /// # Errors
    ///
    /// Fails only when the config itself is invalid.
    pub fn from_discovered_devices(
        config: ConnectorConfig,
        devices: Vec<DiscoveredDevice>,
    ) -> Result<Self> {
        config.validate()?;
        let transport = UdpTransport::with_config(config.transport_config());

        let blinds: Vec<Blind> = devices
            .into_iter()
            .filter_map(|device| {
                let mac = device.mac().to_string();
                let hub_mac = device.hub_mac.clone();
                match Blind::from_discovered(&config.connector_key, device, transport.clone()) {
                    Ok(blind) => Some(blind),
                    Err(e) => {
                        warn!(%mac, %hub_mac, error = %e, "skipping device");
                        None
                    }
                }
            })
            .collect();

        info!(blinds = blinds.len(), "connector system ready");
        Ok(Self { config, blinds })
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    pub fn blinds(&self) -> &[Blind] {
        &self.blinds
    }

    pub fn blind_names(&self) -> Vec<&str> {
        self.blinds.iter().map(Blind::name).collect()
    }

    pub fn get_blind_by_name(&self, name: &str) -> Option<&Blind> {
        self.blinds.iter().find(|blind| blind.name() == name)
    }

    pub fn get_blind_by_mac(&self, mac: &str) -> Option<&Blind> {
        self.blinds.iter().find(|blind| blind.mac().eq_ignore_ascii_case(mac))
    }

    /// Like [`get_blind_by_name`](Self::get_blind_by_name), but a missing
    /// blind is an error.
    pub fn get_blind(&self, name: &str) -> Result<&Blind> {
        self.get_blind_by_name(name)
            .ok_or_else(|| SdkError::BlindNotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.blinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blinds.is_empty()
    }
}
