//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter    | Implements | Connects to                          |
//! |------------|------------|--------------------------------------|
//! | `loopback` | Platform   | Newline-delimited JSON over any `Write` |
//!
//! GPIO access lives in [`crate::drivers::gpio`]; the sensor built on it
//! implements `SensorPort` in [`crate::sensors`].

pub mod loopback;
