//! Fuzz target: `LoopbackPlatform::serve_line` into `ResourceService`
//!
//! Splits arbitrary bytes into lines and feeds each one to a live service
//! backed by the simulated infrared sensor.
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - Every non-blank line yields exactly one response
//! - The platform never holds a handle the service has dropped
//!
//! cargo fuzz run fuzz_request_line

#![no_main]

use doorsensor::adapters::loopback::LoopbackPlatform;
use doorsensor::app::service::ResourceService;
use doorsensor::config::DeviceConfig;
use doorsensor::drivers::gpio::SimGpio;
use doorsensor::sensors::InfraredObstacleSensor;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let mut sensor = InfraredObstacleSensor::new(SimGpio, 4);
    if sensor.init().is_err() {
        return;
    }
    let mut platform = LoopbackPlatform::new(Vec::new());
    let mut service = ResourceService::new(DeviceConfig::default(), sensor);
    if service.init(&mut platform, "fuzz-door").is_err() || service.publish(&mut platform).is_err() {
        return;
    }

    for line in text.lines() {
        let before = platform.output().iter().filter(|&&b| b == b'\n').count();
        let _ = platform.serve_line(line, &mut service);
        let after = String::from_utf8_lossy(platform.output());
        let responses = after
            .lines()
            .skip(before)
            .filter(|l| l.contains("\"kind\":\"response\""))
            .count();
        assert_eq!(responses, usize::from(!line.trim().is_empty()));

        let held = usize::from(service.primary().is_some()) + usize::from(service.secondary().is_some());
        assert_eq!(platform.live_resources(), held);
    }

    service.fini(&mut platform);
    assert_eq!(platform.live_resources(), 0);
});
