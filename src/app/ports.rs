//! Port traits: the boundary between the resource service and the outside world.
//!
//! ```text
//!   Platform SDK ──▶ RequestHandler ──▶ ResourceService ──▶ Platform (responses,
//!                                              │                      notifications)
//!                                              ▼
//!                                         SensorPort
//! ```
//!
//! The resource platform (discovery, security, wire format, delivery) is
//! reached only through [`Platform`]. It calls back into application code
//! through [`RequestHandler`], one call per incoming request. Sensors are
//! read through [`SensorPort`], so the service never touches GPIO directly.

use serde::{Deserialize, Serialize};

use crate::error::{PlatformError, SensorError};

use super::observers::ObserverSet;
use super::representation::Representation;
use super::request::{Request, Response};

// ───────────────────────────────────────────────────────────────
// Platform value types
// ───────────────────────────────────────────────────────────────

/// Opaque handle of a resource registered with the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceHandle(pub u32);

/// Interfaces a resource can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interface {
    /// Baseline interface: full representation of one resource.
    #[serde(rename = "oic.if.baseline")]
    Default,
    /// Batch interface: representations of linked resources.
    #[serde(rename = "oic.if.b")]
    Batch,
}

/// Resource policy bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Policies(u8);

impl Policies {
    pub const DISCOVERABLE: Self = Self(0b0000_0001);
    pub const OBSERVABLE: Self = Self(0b0000_0010);
    pub const SECURE: Self = Self(0b0001_0000);

    /// Return the raw bitmask.
    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Delivery quality for notifications. Door state changes always go out
/// at high QoS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Qos {
    High,
}

/// Everything the platform needs to register a resource.
#[derive(Debug, Clone, Copy)]
pub struct ResourceSpec<'a> {
    pub uri_path: &'a str,
    pub resource_type: &'a str,
    pub interface: Interface,
    pub policies: Policies,
}

// ───────────────────────────────────────────────────────────────
// Platform port (driven adapter: domain → resource SDK)
// ───────────────────────────────────────────────────────────────

/// The resource platform SDK.
///
/// Every call is synchronous. Handles returned by
/// [`create_resource`](Platform::create_resource) stay allocated until
/// [`destroy_resource`](Platform::destroy_resource) or
/// [`deinitialize`](Platform::deinitialize).
pub trait Platform {
    /// Bring up the stack with its persistent storage file.
    fn initialize(&mut self, storage_path: &str) -> Result<(), PlatformError>;

    /// Tear down the stack, releasing every handle. Never fails.
    fn deinitialize(&mut self);

    fn set_device_name(&mut self, name: &str) -> Result<(), PlatformError>;

    /// Start presence advertisement every `interval_secs` seconds.
    fn start_presence(&mut self, interval_secs: u32) -> Result<(), PlatformError>;

    /// Register a resource and route its requests to the installed handler.
    fn create_resource(&mut self, spec: &ResourceSpec<'_>) -> Result<ResourceHandle, PlatformError>;

    /// Expose an additional interface on an existing resource.
    fn bind_interface(
        &mut self,
        handle: ResourceHandle,
        interface: Interface,
    ) -> Result<(), PlatformError>;

    fn destroy_resource(&mut self, handle: ResourceHandle) -> Result<(), PlatformError>;

    /// Send the response for `request`.
    fn send_response(&mut self, request: &Request, response: &Response) -> Result<(), PlatformError>;

    /// Push `representation` to every member of `observers`.
    fn notify(
        &mut self,
        handle: ResourceHandle,
        representation: &Representation,
        observers: &ObserverSet,
        qos: Qos,
    ) -> Result<(), PlatformError>;
}

// ───────────────────────────────────────────────────────────────
// Request handler (driving side: resource SDK → domain)
// ───────────────────────────────────────────────────────────────

/// Implemented by whatever serves requests; the platform calls
/// [`on_request`](RequestHandler::on_request) once per incoming request.
///
/// The handler owns the response: it must send exactly one response
/// through `platform` before returning.
pub trait RequestHandler {
    fn on_request<P: Platform>(&mut self, platform: &mut P, request: &Request);
}

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the service calls this to obtain the door state.
pub trait SensorPort {
    /// `true` when the door reads as opened.
    fn read_opened(&mut self) -> Result<bool, SensorError>;
}
