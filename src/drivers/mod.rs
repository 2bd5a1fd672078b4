//! Peripheral drivers.

pub mod gpio;
