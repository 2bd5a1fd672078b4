//! Application core: resource dispatch and lifecycle, zero I/O.
//!
//! Everything the endpoint decides lives here: which response a request
//! gets, when observers are notified, when resources are created and
//! destroyed. The platform SDK and the sensor are reached only through the
//! port traits in [`ports`], so this layer runs on host with mock adapters.

pub mod monitor;
pub mod observers;
pub mod ports;
pub mod representation;
pub mod request;
pub mod resource;
pub mod service;
