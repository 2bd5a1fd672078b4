//! Sensor drivers.
//!
//! The board carries a single sensor: the infrared obstacle detector that
//! reports whether the door is opened.

pub mod infrared;

pub use infrared::InfraredObstacleSensor;
