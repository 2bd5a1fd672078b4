//! Door sensor endpoint library.
//!
//! A door resource served over a resource platform, backed by an infrared
//! obstacle sensor. The domain core in [`app`] is hardware- and
//! SDK-agnostic; ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod pins;

pub mod adapters;
pub mod drivers;
pub mod sensors;
