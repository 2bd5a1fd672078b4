//! GPIO line access.
//!
//! [`GpioPort`] covers the line lifecycle (open, direction, close); reads go
//! through `embedded_hal::digital::InputPin` on the returned line.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: [`EspGpio`] drives the pin through raw ESP-IDF sys calls.
//! On host/test: [`SimGpio`] reads a process-wide simulated level that
//! tests and the host binary set with [`sim_set_level`].

use embedded_hal::digital::InputPin;

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, Ordering};

// ── Types ─────────────────────────────────────────────────────

/// Errors from [`GpioPort`] operations. Carries the driver return code.
///
/// Converts into [`SensorError`](crate::error::SensorError) and from there
/// into the crate [`Error`](crate::error::Error).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioError {
    OpenFailed(i32),
    DirectionFailed(i32),
}

impl core::fmt::Display for GpioError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OpenFailed(rc) => write!(f, "GPIO open failed (rc={})", rc),
            Self::DirectionFailed(rc) => write!(f, "GPIO set direction failed (rc={})", rc),
        }
    }
}

impl std::error::Error for GpioError {}

/// Exclusive access to GPIO lines by pin number.
pub trait GpioPort {
    type Line: InputPin;

    fn open(&mut self, pin: i32) -> Result<Self::Line, GpioError>;

    /// Configure the line as a digital input.
    fn set_input(&mut self, line: &mut Self::Line) -> Result<(), GpioError>;

    /// Release the line. Never fails.
    fn close(&mut self, line: Self::Line);
}

// ── Host simulation ───────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
static SIM_LEVEL: AtomicBool = AtomicBool::new(true);

/// Drive the simulated input level seen by every [`SimLine`].
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_level(high: bool) {
    SIM_LEVEL.store(high, Ordering::Relaxed);
}

#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Default)]
pub struct SimGpio;

#[cfg(not(target_os = "espidf"))]
#[derive(Debug)]
pub struct SimLine {
    pin: i32,
}

#[cfg(not(target_os = "espidf"))]
impl SimLine {
    pub fn pin(&self) -> i32 {
        self.pin
    }
}

#[cfg(not(target_os = "espidf"))]
impl embedded_hal::digital::ErrorType for SimLine {
    type Error = core::convert::Infallible;
}

#[cfg(not(target_os = "espidf"))]
impl InputPin for SimLine {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(SIM_LEVEL.load(Ordering::Relaxed))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!SIM_LEVEL.load(Ordering::Relaxed))
    }
}

#[cfg(not(target_os = "espidf"))]
impl GpioPort for SimGpio {
    type Line = SimLine;

    fn open(&mut self, pin: i32) -> Result<SimLine, GpioError> {
        log::info!("gpio(sim): open pin {}", pin);
        Ok(SimLine { pin })
    }

    fn set_input(&mut self, line: &mut SimLine) -> Result<(), GpioError> {
        log::debug!("gpio(sim): pin {} input", line.pin);
        Ok(())
    }

    fn close(&mut self, line: SimLine) {
        log::info!("gpio(sim): close pin {}", line.pin);
    }
}

// ── ESP-IDF ───────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use esp::{EspGpio, EspLine};

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_svc::sys::*;

    use super::{GpioError, GpioPort};

    #[derive(Debug, Default)]
    pub struct EspGpio;

    #[derive(Debug)]
    pub struct EspLine {
        pin: i32,
    }

    impl embedded_hal::digital::ErrorType for EspLine {
        type Error = core::convert::Infallible;
    }

    impl embedded_hal::digital::InputPin for EspLine {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            // SAFETY: gpio_get_level is a read-only register access on a
            // line this driver opened; main-loop only.
            Ok((unsafe { gpio_get_level(self.pin) }) != 0)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            self.is_high().map(|high| !high)
        }
    }

    impl GpioPort for EspGpio {
        type Line = EspLine;

        fn open(&mut self, pin: i32) -> Result<EspLine, GpioError> {
            // SAFETY: resets the pin to its default state; the line is
            // owned exclusively by the returned EspLine.
            let ret = unsafe { gpio_reset_pin(pin) };
            if ret != ESP_OK as i32 {
                return Err(GpioError::OpenFailed(ret));
            }
            Ok(EspLine { pin })
        }

        fn set_input(&mut self, line: &mut EspLine) -> Result<(), GpioError> {
            // SAFETY: pin was reset by open(); single-threaded init path.
            let ret = unsafe { gpio_set_direction(line.pin, gpio_mode_t_GPIO_MODE_INPUT) };
            if ret != ESP_OK as i32 {
                return Err(GpioError::DirectionFailed(ret));
            }
            Ok(())
        }

        fn close(&mut self, line: EspLine) {
            // SAFETY: the line is consumed; nothing reads the pin afterwards.
            unsafe {
                gpio_reset_pin(line.pin);
            }
        }
    }
}
