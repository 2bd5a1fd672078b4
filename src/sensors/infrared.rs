//! Infrared obstacle-avoidance sensor on a single digital input.
//!
//! The module outputs HIGH while its beam is clear and LOW when an obstacle
//! reflects it back. Mounted across the door frame, HIGH means opened.
//!
//! Lifecycle: `init` (open + input direction) → `read`* → `fini`.
//! `fini` is idempotent and also runs on drop.

use embedded_hal::digital::InputPin;
use log::{debug, error, info};

use crate::app::ports::SensorPort;
use crate::drivers::gpio::GpioPort;
use crate::error::SensorError;

pub struct InfraredObstacleSensor<G: GpioPort> {
    gpio: G,
    pin: i32,
    line: Option<G::Line>,
}

impl<G: GpioPort> InfraredObstacleSensor<G> {
    pub fn new(gpio: G, pin: i32) -> Self {
        Self {
            gpio,
            pin,
            line: None,
        }
    }

    /// Open the line and configure it as input. Re-initialising an open
    /// sensor is a no-op.
    pub fn init(&mut self) -> Result<(), SensorError> {
        if self.line.is_some() {
            return Ok(());
        }
        info!("Infrared obstacle sensor is initializing...");

        let mut line = self.gpio.open(self.pin).inspect_err(|e| {
            error!("infrared sensor: {}", e);
        })?;
        let direction = self.gpio.set_input(&mut line);
        self.line = Some(line);

        if let Err(e) = direction {
            error!("infrared sensor: {}", e);
            self.fini();
            return Err(e.into());
        }
        Ok(())
    }

    /// Close the line if open.
    pub fn fini(&mut self) {
        if let Some(line) = self.line.take() {
            info!("Infrared obstacle sensor is finishing...");
            self.gpio.close(line);
        }
    }

    /// Current digital level of the sensor output.
    pub fn read(&mut self) -> Result<bool, SensorError> {
        let line = self.line.as_mut().ok_or(SensorError::NotOpen)?;
        let level = line.is_high().map_err(|_| SensorError::GpioReadFailed)?;
        debug!("Infrared obstacle sensor value : {}", u8::from(level));
        Ok(level)
    }

    pub fn is_open(&self) -> bool {
        self.line.is_some()
    }

    pub fn pin(&self) -> i32 {
        self.pin
    }

    pub fn gpio(&self) -> &G {
        &self.gpio
    }
}

impl<G: GpioPort> Drop for InfraredObstacleSensor<G> {
    fn drop(&mut self) {
        self.fini();
    }
}

impl<G: GpioPort> SensorPort for InfraredObstacleSensor<G> {
    fn read_opened(&mut self) -> Result<bool, SensorError> {
        self.read()
    }
}
