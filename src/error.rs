//! Unified error types for the door-sensor endpoint.
//!
//! A single `Error` enum that every subsystem converts into, so the request
//! handler can turn any failure into one ERROR response. All variants are
//! `Copy` and carry no heap data.

use core::fmt;

use crate::drivers::gpio::GpioError;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A platform (resource SDK) call returned a non-success status.
    Platform(PlatformError),
    /// The sensor could not be opened or read.
    Sensor(SensorError),
    /// A fixed-capacity buffer could not hold the value.
    Capacity(&'static str),
    /// A uri path or resource type was rejected before reaching the platform.
    InvalidResource(&'static str),
    /// The secondary resource has already been created.
    AlreadyCreated,
    /// The request type is not one of GET/PUT/POST/DELETE.
    UnsupportedRequest,
    /// The request addressed a handle that no live resource owns.
    UnknownResource,
    /// The request is missing a field the handler needs.
    MalformedRequest(&'static str),
    /// The resource has no observer set, or the set is empty.
    NoObservers,
    /// Bring-up failed.
    Init(&'static str),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Platform(e) => write!(f, "platform: {e}"),
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Capacity(what) => write!(f, "capacity exceeded: {what}"),
            Self::InvalidResource(what) => write!(f, "invalid resource: {what}"),
            Self::AlreadyCreated => write!(f, "resource already created"),
            Self::UnsupportedRequest => write!(f, "unsupported request type"),
            Self::UnknownResource => write!(f, "unknown resource handle"),
            Self::MalformedRequest(what) => write!(f, "malformed request: {what}"),
            Self::NoObservers => write!(f, "no observers"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Platform errors
// ---------------------------------------------------------------------------

/// Status codes a resource platform can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformError {
    /// The platform stack has not been initialised.
    NotInitialized,
    /// An argument was rejected by the platform.
    InvalidParameter,
    /// The handle does not refer to a live platform object.
    NoSuchHandle,
    /// The platform ran out of memory or handle slots.
    OutOfMemory,
    /// The underlying transport failed.
    Io,
    /// Any other non-success status code.
    Status(i32),
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "not initialized"),
            Self::InvalidParameter => write!(f, "invalid parameter"),
            Self::NoSuchHandle => write!(f, "no such handle"),
            Self::OutOfMemory => write!(f, "out of memory"),
            Self::Io => write!(f, "I/O error"),
            Self::Status(rc) => write!(f, "status {rc}"),
        }
    }
}

impl std::error::Error for PlatformError {}

impl From<PlatformError> for Error {
    fn from(e: PlatformError) -> Self {
        Self::Platform(e)
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The GPIO line could not be opened.
    GpioOpenFailed,
    /// The GPIO direction could not be set.
    GpioDirectionFailed,
    /// GPIO read returned an error.
    GpioReadFailed,
    /// The sensor was read before `init` or after `fini`.
    NotOpen,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioOpenFailed => write!(f, "GPIO open failed"),
            Self::GpioDirectionFailed => write!(f, "GPIO set direction failed"),
            Self::GpioReadFailed => write!(f, "GPIO read failed"),
            Self::NotOpen => write!(f, "sensor not open"),
        }
    }
}

impl std::error::Error for SensorError {}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

impl From<GpioError> for SensorError {
    fn from(e: GpioError) -> Self {
        match e {
            GpioError::OpenFailed(_) => Self::GpioOpenFailed,
            GpioError::DirectionFailed(_) => Self::GpioDirectionFailed,
        }
    }
}

impl From<GpioError> for Error {
    fn from(e: GpioError) -> Self {
        Self::Sensor(e.into())
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
