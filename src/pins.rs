//! GPIO pin assignments for the door-sensor board.
//!
//! Single source of truth: drivers and the default configuration reference
//! this module rather than hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Sensors: Digital
// ---------------------------------------------------------------------------

/// Infrared obstacle-avoidance sensor output.
/// HIGH = beam clear (door opened), LOW = obstacle (door closed).
pub const INFRARED_SENSOR_GPIO: i32 = 4;
