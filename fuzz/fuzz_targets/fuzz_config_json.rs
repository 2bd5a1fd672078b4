//! Fuzz target: `DeviceConfig::from_json`
//!
//! Any config that parses and validates must be usable as-is: uris are
//! absolute, distinct and fit a resource record.
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use doorsensor::app::resource::{self, URI_CAPACITY};
use doorsensor::config::DeviceConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(config) = DeviceConfig::from_json(text) else {
        return;
    };

    assert!(config.primary_uri.starts_with('/'));
    assert!(config.secondary_uri.starts_with('/'));
    assert_ne!(config.primary_uri, config.secondary_uri);
    assert!(config.primary_uri.len() <= URI_CAPACITY);
    assert!(config.presence_interval_secs > 0);
    assert!(resource::validate_resource_type(&config.resource_type).is_ok());
});
