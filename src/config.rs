//! Device configuration parameters
//!
//! Every tunable for the door-sensor endpoint. Defaults match the shipped
//! board; a JSON file can override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::app::resource::{self, URI_CAPACITY};
use crate::error::{Error, Result};
use crate::pins;

/// Core device configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    // --- Platform bring-up ---
    /// Name advertised by the platform for this device
    pub device_name: String,
    /// Persistent storage file handed to the platform at initialisation
    pub storage_path: String,
    /// Presence advertisement interval (seconds)
    pub presence_interval_secs: u32,

    // --- Resources ---
    /// URI path of the always-present door resource
    pub primary_uri: String,
    /// URI path of the resource created on POST
    pub secondary_uri: String,
    /// Resource type string shared by both resources
    pub resource_type: String,

    // --- Sensor ---
    /// GPIO pin of the infrared obstacle sensor
    pub sensor_gpio: i32,
    /// Door monitor poll period (milliseconds)
    pub monitor_poll_ms: u32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            // Platform
            device_name: "iotcon-test-basic-server".into(),
            storage_path:
                "/home/owner/apps_rw/org.tizen.position-finder-server/data/iotcon-test-svr-db-server.dat"
                    .into(),
            presence_interval_secs: 10,

            // Resources
            primary_uri: "/door/1".into(),
            secondary_uri: "/door/2".into(),
            resource_type: "org.tizen.door".into(),

            // Sensor
            sensor_gpio: pins::INFRARED_SENSOR_GPIO,
            monitor_poll_ms: 500,
        }
    }
}

impl DeviceConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text =
            std::fs::read_to_string(path).map_err(|_| Error::Config("cannot read config file"))?;
        Self::from_json(&text)
    }

    /// Parse and validate a JSON config document.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|_| Error::Config("invalid JSON"))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the service cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.device_name.is_empty() {
            return Err(Error::Config("device_name is empty"));
        }
        if self.presence_interval_secs == 0 {
            return Err(Error::Config("presence_interval_secs must be > 0"));
        }
        if self.monitor_poll_ms == 0 {
            return Err(Error::Config("monitor_poll_ms must be > 0"));
        }
        for uri in [&self.primary_uri, &self.secondary_uri] {
            if !uri.starts_with('/') {
                return Err(Error::Config("uri path must start with '/'"));
            }
            if uri.len() > URI_CAPACITY {
                return Err(Error::Config("uri path too long"));
            }
        }
        if self.primary_uri == self.secondary_uri {
            return Err(Error::Config("primary and secondary uri must differ"));
        }
        if self.resource_type.is_empty() {
            return Err(Error::Config("resource_type is empty"));
        }
        resource::validate_resource_type(&self.resource_type)
            .map_err(|_| Error::Config("resource_type must match [a-z][a-z0-9.-]*, 61 bytes max"))?;
        Ok(())
    }
}
