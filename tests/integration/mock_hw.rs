//! Mock platform and sensor for integration tests.
//!
//! Records every platform call so tests can assert on the full history, and
//! can fail any chosen step to exercise the error paths without a real SDK.

use doorsensor::app::observers::{ObserverId, ObserverSet};
use doorsensor::app::ports::{
    Interface, Platform, Qos, ResourceHandle, ResourceSpec, SensorPort,
};
use doorsensor::app::representation::Representation;
use doorsensor::app::request::{Request, Response, ResponseResult};
use doorsensor::error::{PlatformError, SensorError};
use std::collections::BTreeSet;

// ── Platform call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Initialize,
    SetDeviceName,
    StartPresence,
    CreateResource,
    BindInterface,
    DestroyResource,
    SendResponse,
    Notify,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlatformCall {
    Initialize(String),
    Deinitialize,
    SetDeviceName(String),
    StartPresence(u32),
    CreateResource {
        uri: String,
        resource_type: String,
        interface: Interface,
        policies: u8,
    },
    BindInterface(ResourceHandle, Interface),
    DestroyResource(ResourceHandle),
    SendResponse {
        resource: ResourceHandle,
        response: Response,
    },
    Notify {
        resource: ResourceHandle,
        representation: Representation,
        observers: Vec<ObserverId>,
        qos: Qos,
    },
}

impl PlatformCall {
    fn step(&self) -> Option<Step> {
        Some(match self {
            Self::Initialize(_) => Step::Initialize,
            Self::Deinitialize => return None,
            Self::SetDeviceName(_) => Step::SetDeviceName,
            Self::StartPresence(_) => Step::StartPresence,
            Self::CreateResource { .. } => Step::CreateResource,
            Self::BindInterface(..) => Step::BindInterface,
            Self::DestroyResource(_) => Step::DestroyResource,
            Self::SendResponse { .. } => Step::SendResponse,
            Self::Notify { .. } => Step::Notify,
        })
    }
}

// ── MockPlatform ──────────────────────────────────────────────

pub struct MockPlatform {
    pub calls: Vec<PlatformCall>,
    /// Handles created and not yet destroyed.
    pub live: BTreeSet<ResourceHandle>,
    /// Every call of this step fails with `PlatformError::Status(-1)`.
    pub fail_on: Option<Step>,
    next_handle: u32,
}

#[allow(dead_code)]
impl MockPlatform {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            live: BTreeSet::new(),
            fail_on: None,
            next_handle: 1,
        }
    }

    pub fn failing(step: Step) -> Self {
        Self {
            fail_on: Some(step),
            ..Self::new()
        }
    }

    pub fn count(&self, step: Step) -> usize {
        self.calls.iter().filter(|c| c.step() == Some(step)).count()
    }

    pub fn responses(&self) -> Vec<&Response> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                PlatformCall::SendResponse { response, .. } => Some(response),
                _ => None,
            })
            .collect()
    }

    pub fn results(&self) -> Vec<ResponseResult> {
        self.responses().iter().map(|r| r.result).collect()
    }

    pub fn last_response(&self) -> Option<&Response> {
        self.responses().last().copied()
    }

    /// `(value, sorted observer ids)` of every notification pushed.
    pub fn notifications(&self) -> Vec<(bool, Vec<ObserverId>)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                PlatformCall::Notify {
                    representation,
                    observers,
                    ..
                } => {
                    let mut ids = observers.clone();
                    ids.sort_unstable();
                    Some((representation.get_bool("opened")?, ids))
                }
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, call: PlatformCall) -> Result<(), PlatformError> {
        let step = call.step();
        self.calls.push(call);
        if step.is_some() && step == self.fail_on {
            Err(PlatformError::Status(-1))
        } else {
            Ok(())
        }
    }
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for MockPlatform {
    fn initialize(&mut self, storage_path: &str) -> Result<(), PlatformError> {
        self.record(PlatformCall::Initialize(storage_path.to_owned()))
    }

    fn deinitialize(&mut self) {
        self.live.clear();
        self.calls.push(PlatformCall::Deinitialize);
    }

    fn set_device_name(&mut self, name: &str) -> Result<(), PlatformError> {
        self.record(PlatformCall::SetDeviceName(name.to_owned()))
    }

    fn start_presence(&mut self, interval_secs: u32) -> Result<(), PlatformError> {
        self.record(PlatformCall::StartPresence(interval_secs))
    }

    fn create_resource(&mut self, spec: &ResourceSpec<'_>) -> Result<ResourceHandle, PlatformError> {
        self.record(PlatformCall::CreateResource {
            uri: spec.uri_path.to_owned(),
            resource_type: spec.resource_type.to_owned(),
            interface: spec.interface,
            policies: spec.policies.bits(),
        })?;
        let handle = ResourceHandle(self.next_handle);
        self.next_handle += 1;
        self.live.insert(handle);
        Ok(handle)
    }

    fn bind_interface(
        &mut self,
        handle: ResourceHandle,
        interface: Interface,
    ) -> Result<(), PlatformError> {
        self.record(PlatformCall::BindInterface(handle, interface))?;
        if self.live.contains(&handle) {
            Ok(())
        } else {
            Err(PlatformError::NoSuchHandle)
        }
    }

    fn destroy_resource(&mut self, handle: ResourceHandle) -> Result<(), PlatformError> {
        self.record(PlatformCall::DestroyResource(handle))?;
        if self.live.remove(&handle) {
            Ok(())
        } else {
            Err(PlatformError::NoSuchHandle)
        }
    }

    fn send_response(&mut self, request: &Request, response: &Response) -> Result<(), PlatformError> {
        self.record(PlatformCall::SendResponse {
            resource: request.resource,
            response: response.clone(),
        })
    }

    fn notify(
        &mut self,
        handle: ResourceHandle,
        representation: &Representation,
        observers: &ObserverSet,
        qos: Qos,
    ) -> Result<(), PlatformError> {
        self.record(PlatformCall::Notify {
            resource: handle,
            representation: representation.clone(),
            observers: observers.iter().collect(),
            qos,
        })
    }
}

// ── MockSensor ────────────────────────────────────────────────

pub struct MockSensor {
    pub opened: bool,
    pub fail: bool,
    pub reads: u32,
}

#[allow(dead_code)]
impl MockSensor {
    pub fn new(opened: bool) -> Self {
        Self {
            opened,
            fail: false,
            reads: 0,
        }
    }
}

impl SensorPort for MockSensor {
    fn read_opened(&mut self) -> Result<bool, SensorError> {
        self.reads += 1;
        if self.fail {
            Err(SensorError::GpioReadFailed)
        } else {
            Ok(self.opened)
        }
    }
}
