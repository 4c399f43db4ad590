//! Host-supplied configuration
//!
//! Hosts pass their settings as JSON with camelCase keys:
//!
//! ```json
//! {
//!   "connectorKey": "12345678-1234-12",
//!   "hubIp": "192.168.1.20",
//!   "sendPort": 32100,
//!   "transport": { "preset": "patient", "maxAttempts": 4 }
//! }
//! ```
//!
//! Only `connectorKey` is required. Without `hubIp`, discovery and every
//! later request go to the hub multicast group.

use std::fmt;
use std::time::Duration;

use connector_api::token::validate_shared_secret;
use connector_api::{HubEndpoint, TransportConfig, DEFAULT_SEND_PORT};
use serde::Deserialize;

use crate::error::{Result, SdkError};

#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorConfig {
    /// 16-character key shown in the Connector app
    pub connector_key: String,
    #[serde(default)]
    pub hub_ip: Option<String>,
    #[serde(default = "default_send_port")]
    pub send_port: u16,
    #[serde(default)]
    pub transport: TransportOverrides,
}

fn default_send_port() -> u16 {
    DEFAULT_SEND_PORT
}

impl fmt::Debug for ConnectorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectorConfig")
            .field("connector_key", &"<redacted>")
            .field("hub_ip", &self.hub_ip)
            .field("send_port", &self.send_port)
            .field("transport", &self.transport)
            .finish()
    }
}

impl ConnectorConfig {
    /// Config for the multicast group on the default port.
    ///
    /// # Errors
    ///
    /// Fails if `connector_key` is not a 16-byte AES key.
    pub fn new(connector_key: impl Into<String>) -> Result<Self> {
        let config = Self {
            connector_key: connector_key.into(),
            hub_ip: None,
            send_port: DEFAULT_SEND_PORT,
            transport: TransportOverrides::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON config object.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| SdkError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_hub_ip(mut self, hub_ip: impl Into<String>) -> Self {
        self.hub_ip = Some(hub_ip.into());
        self
    }

    pub fn with_send_port(mut self, send_port: u16) -> Self {
        self.send_port = send_port;
        self
    }

    pub fn with_transport(mut self, transport: TransportOverrides) -> Self {
        self.transport = transport;
        self
    }

    /// Check the key and the hub address, if one is set.
    pub fn validate(&self) -> Result<()> {
        validate_shared_secret(&self.connector_key)?;
        self.endpoint()?;
        Ok(())
    }

    /// Where discovery and device requests are sent.
    pub fn endpoint(&self) -> Result<HubEndpoint> {
        match self.hub_ip.as_deref().map(str::trim) {
            Some(ip) if !ip.is_empty() => Ok(HubEndpoint::parse(ip, self.send_port)?),
            _ => Ok(HubEndpoint::new(HubEndpoint::multicast().ip, self.send_port)),
        }
    }

    pub fn transport_config(&self) -> TransportConfig {
        self.transport.resolve()
    }
}

/// Named starting point for transport timing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportPreset {
    #[default]
    Default,
    Fast,
    Patient,
}

/// Transport timing as configured by the host; unset fields keep the
/// preset's value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportOverrides {
    #[serde(default)]
    pub preset: TransportPreset,
    #[serde(default)]
    pub idle_timeout_ms: Option<u64>,
    #[serde(default)]
    pub max_attempts: Option<u32>,
}

impl TransportOverrides {
    pub fn resolve(&self) -> TransportConfig {
        let mut config = match self.preset {
            TransportPreset::Default => TransportConfig::default(),
            TransportPreset::Fast => TransportConfig::fast(),
            TransportPreset::Patient => TransportConfig::patient(),
        };
        if let Some(ms) = self.idle_timeout_ms {
            config = config.with_idle_timeout(Duration::from_millis(ms));
        }
        if let Some(attempts) = self.max_attempts {
            config = config.with_max_attempts(attempts);
        }
        config
    }
}
