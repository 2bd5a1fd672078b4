//! Door sensor endpoint: main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  LoopbackPlatform (stdin/stdout JSON lines)   SimGpio/EspGpio│
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ─────────────────      │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │  ResourceService (dispatch)  ·  DoorMonitor (notify)   │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `doorsensor [config.json]`. Requests are read from stdin, one JSON
//! object per line; responses and notifications go to stdout; logs go to
//! stderr.
//!
//! The door monitor runs every `monitor_poll_ms` whether or not requests
//! arrive. On host the sensor reads the simulated GPIO level, which stays
//! HIGH unless something in-process calls `drivers::gpio::sim_set_level`.
#![deny(unused_must_use)]

use std::io::{self, BufRead};
use std::path::Path;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};

use doorsensor::adapters::loopback::LoopbackPlatform;
use doorsensor::app::monitor::DoorMonitor;
use doorsensor::app::service::ResourceService;
use doorsensor::config::DeviceConfig;
use doorsensor::sensors::InfraredObstacleSensor;

#[cfg(not(target_os = "espidf"))]
use doorsensor::drivers::gpio::SimGpio as BoardGpio;
#[cfg(target_os = "espidf")]
use doorsensor::drivers::gpio::EspGpio as BoardGpio;

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }
    #[cfg(not(target_os = "espidf"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("DoorSensor v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    let config = match std::env::args().nth(1) {
        Some(path) => DeviceConfig::load(Path::new(&path))
            .with_context(|| format!("loading config from {path}"))?,
        None => DeviceConfig::default(),
    };

    // ── 3. Sensor ─────────────────────────────────────────────
    let mut sensor = InfraredObstacleSensor::new(BoardGpio::default(), config.sensor_gpio);
    sensor.init().context("infrared sensor init")?;

    // ── 4. Platform bring-up + primary resource ───────────────
    let device_name = config.device_name.clone();
    let mut platform = LoopbackPlatform::new(io::stdout());
    let mut service = ResourceService::new(config, sensor);
    service
        .init(&mut platform, &device_name)
        .context("platform bring-up")?;
    let handle = match service.publish(&mut platform) {
        Ok(h) => h,
        Err(e) => {
            service.fini(&mut platform);
            return Err(e).context("publishing door resource");
        }
    };
    info!("serving door resource on handle {:?}", handle);

    // ── 5. Stdin reader ───────────────────────────────────────
    let (tx, rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(l) => {
                    if tx.send(l).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("stdin read failed: {}", e);
                    break;
                }
            }
        }
    });

    // ── 6. Event loop ─────────────────────────────────────────
    let poll_period = Duration::from_millis(u64::from(service.config().monitor_poll_ms));
    let mut monitor = DoorMonitor::new();
    loop {
        match rx.recv_timeout(poll_period) {
            Ok(line) => {
                if let Err(e) = platform.serve_line(&line, &mut service) {
                    warn!("loopback: {}", e);
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
        if let Err(e) = monitor.poll(&mut service, &mut platform) {
            warn!("door monitor: {}", e);
        }
    }

    // ── 7. Teardown ───────────────────────────────────────────
    service.fini(&mut platform);
    service.sensor_mut().fini();
    info!("bye");
    Ok(())
}
