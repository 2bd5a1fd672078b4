//! Door monitor: turns sensor level changes into observer notifications.
//!
//! Polled from the main loop between requests. The first successful read
//! only seeds the last known level; every later change notifies the
//! observers of the primary resource.

use log::{debug, info};

use crate::error::{Error, Result};

use super::ports::{Platform, SensorPort};
use super::service::ResourceService;

#[derive(Debug, Default)]
pub struct DoorMonitor {
    last: Option<bool>,
}

impl DoorMonitor {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Last level seen, `None` before the first successful poll.
    pub fn last(&self) -> Option<bool> {
        self.last
    }

    /// Read the sensor once. Returns `true` when the level changed.
    ///
    /// Nobody observing is not an error here; the change is still recorded.
    pub fn poll<S: SensorPort, P: Platform>(
        &mut self,
        service: &mut ResourceService<S>,
        platform: &mut P,
    ) -> Result<bool> {
        let opened = service.read_door()?;
        let Some(previous) = self.last.replace(opened) else {
            debug!("door monitor seeded: opened={}", opened);
            return Ok(false);
        };
        if previous == opened {
            return Ok(false);
        }

        info!("door {}", if opened { "opened" } else { "closed" });
        match service.notify(platform, opened) {
            Ok(()) | Err(Error::NoObservers) => Ok(true),
            Err(e) => Err(e),
        }
    }
}
