//! Session configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::{
    ProtocolError, Result, DEFAULT_BAUD_RATE, DEFAULT_TIMEOUT_MS, NUM_CHANNELS, RESET_SLEEP_MS,
    STORE_TIMEOUT_MS,
};

/// Connection and device settings for one controller session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Serial port name
    pub port_name: String,
    /// Baud rate
    pub baud_rate: u32,
    /// Response timeout in milliseconds
    pub timeout_ms: u64,
    /// Response timeout while the device writes non-volatile memory
    pub store_timeout_ms: u64,
    /// How long `reset(true)` blocks afterwards
    pub reset_sleep_ms: u64,
    /// Number of output channels on the device
    pub num_channels: u8,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            port_name: String::new(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            store_timeout_ms: STORE_TIMEOUT_MS,
            reset_sleep_ms: RESET_SLEEP_MS,
            num_channels: NUM_CHANNELS,
        }
    }
}

impl SessionConfig {
    /// Default configuration for the given port
    pub fn for_port(port_name: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            ..Self::default()
        }
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text).map_err(|e| {
            ProtocolError::invalid("config", path.display(), format!("valid JSON ({})", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no controller can have
    pub fn validate(&self) -> Result<()> {
        if self.num_channels == 0 {
            return Err(ProtocolError::invalid("num_channels", 0, "at least 1"));
        }
        Ok(())
    }

    /// Default read timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Read timeout while `STORE` runs
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    /// How long the device stays off the link after a reset
    pub fn reset_sleep(&self) -> Duration {
        Duration::from_millis(self.reset_sleep_ms)
    }
}
