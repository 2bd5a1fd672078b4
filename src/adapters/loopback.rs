//! Loopback platform: the resource platform over newline-delimited JSON.
//!
//! Stands in for the vendor resource SDK on hosts that do not have it.
//! Requests arrive one JSON object per line (see
//! [`Request`](crate::app::request::Request)); responses and notifications
//! leave one JSON object per line on the writer:
//!
//! ```text
//! → {"id":1,"resource":1,"host":"10.0.0.7","method":"GET"}
//! ← {"kind":"response","id":1,"resource":1,"result":"ok",
//!    "representation":{"uri_path":"/door/1","attributes":{"opened":true}}}
//! ← {"kind":"notification","resource":1,"observers":[5],"qos":"high",
//!    "representation":{...}}
//! ```
//!
//! The adapter keeps the platform's bookkeeping (live handles, device name,
//! presence interval) so the service sees the same contract it would get
//! from the real SDK, including rejection of unknown handles.

use std::collections::BTreeMap;
use std::io::Write;

use log::{debug, info, warn};
use serde::Serialize;

use crate::app::observers::{ObserverId, ObserverSet};
use crate::app::ports::{
    Interface, Platform, Policies, Qos, RequestHandler, ResourceHandle, ResourceSpec,
};
use crate::app::representation::Representation;
use crate::app::request::{Request, Response, ResponseResult};
use crate::error::PlatformError;

/// Upper bound on simultaneously registered resources.
const MAX_RESOURCES: usize = 8;

// ── Wire messages ─────────────────────────────────────────────

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Outbound<'a> {
    Response {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<u64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        resource: Option<ResourceHandle>,
        result: ResponseResult,
        #[serde(skip_serializing_if = "Option::is_none")]
        representation: Option<&'a Representation>,
    },
    Notification {
        resource: ResourceHandle,
        observers: Vec<ObserverId>,
        qos: Qos,
        representation: &'a Representation,
    },
}

// ── Platform state ────────────────────────────────────────────

/// A resource the platform has registered.
#[derive(Debug, Clone)]
pub struct LiveResource {
    pub uri_path: String,
    pub resource_type: String,
    pub interfaces: Vec<Interface>,
    pub policies: Policies,
}

pub struct LoopbackPlatform<W: Write> {
    out: W,
    initialized: bool,
    storage_path: Option<String>,
    device_name: Option<String>,
    presence_interval_secs: Option<u32>,
    next_handle: u32,
    resources: BTreeMap<ResourceHandle, LiveResource>,
}

impl<W: Write> LoopbackPlatform<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            initialized: false,
            storage_path: None,
            device_name: None,
            presence_interval_secs: None,
            next_handle: 1,
            resources: BTreeMap::new(),
        }
    }

    // ── Event pump ────────────────────────────────────────────

    /// Parse one request line and deliver it to `handler`.
    ///
    /// Lines that do not parse, or that address a handle this platform
    /// does not hold, are answered with an error response directly.
    /// Blank lines are ignored.
    pub fn serve_line<H: RequestHandler>(
        &mut self,
        line: &str,
        handler: &mut H,
    ) -> Result<(), PlatformError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }

        let request: Request = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                warn!("loopback: unparseable request: {}", e);
                return self.write(&Outbound::Response {
                    id: None,
                    resource: None,
                    result: ResponseResult::Error,
                    representation: None,
                });
            }
        };

        if !self.resources.contains_key(&request.resource) {
            warn!("loopback: request for unknown {:?}", request.resource);
            return self.send_response(&request, &Response::error());
        }

        handler.on_request(self, &request);
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn storage_path(&self) -> Option<&str> {
        self.storage_path.as_deref()
    }

    pub fn device_name(&self) -> Option<&str> {
        self.device_name.as_deref()
    }

    pub fn presence_interval_secs(&self) -> Option<u32> {
        self.presence_interval_secs
    }

    pub fn live_resources(&self) -> usize {
        self.resources.len()
    }

    pub fn live_resource(&self, handle: ResourceHandle) -> Option<&LiveResource> {
        self.resources.get(&handle)
    }

    /// Everything written so far.
    pub fn output(&self) -> &W {
        &self.out
    }

    // ── Internal ──────────────────────────────────────────────

    fn ensure_initialized(&self) -> Result<(), PlatformError> {
        if self.initialized {
            Ok(())
        } else {
            Err(PlatformError::NotInitialized)
        }
    }

    fn write(&mut self, message: &Outbound<'_>) -> Result<(), PlatformError> {
        serde_json::to_writer(&mut self.out, message).map_err(|_| PlatformError::Io)?;
        self.out.write_all(b"\n").map_err(|_| PlatformError::Io)?;
        self.out.flush().map_err(|_| PlatformError::Io)
    }
}

impl<W: Write> Platform for LoopbackPlatform<W> {
    fn initialize(&mut self, storage_path: &str) -> Result<(), PlatformError> {
        if storage_path.is_empty() {
            return Err(PlatformError::InvalidParameter);
        }
        self.initialized = true;
        self.storage_path = Some(storage_path.to_owned());
        info!("loopback: initialized (storage {})", storage_path);
        Ok(())
    }

    fn deinitialize(&mut self) {
        if !self.resources.is_empty() {
            debug!("loopback: releasing {} resource(s)", self.resources.len());
        }
        self.resources.clear();
        self.initialized = false;
        self.presence_interval_secs = None;
        info!("loopback: deinitialized");
    }

    fn set_device_name(&mut self, name: &str) -> Result<(), PlatformError> {
        self.ensure_initialized()?;
        if name.is_empty() {
            return Err(PlatformError::InvalidParameter);
        }
        self.device_name = Some(name.to_owned());
        Ok(())
    }

    fn start_presence(&mut self, interval_secs: u32) -> Result<(), PlatformError> {
        self.ensure_initialized()?;
        if interval_secs == 0 {
            return Err(PlatformError::InvalidParameter);
        }
        self.presence_interval_secs = Some(interval_secs);
        info!("loopback: presence every {}s", interval_secs);
        Ok(())
    }

    fn create_resource(&mut self, spec: &ResourceSpec<'_>) -> Result<ResourceHandle, PlatformError> {
        self.ensure_initialized()?;
        if self.resources.values().any(|r| r.uri_path == spec.uri_path) {
            return Err(PlatformError::InvalidParameter);
        }
        if self.resources.len() >= MAX_RESOURCES {
            return Err(PlatformError::OutOfMemory);
        }

        let handle = ResourceHandle(self.next_handle);
        self.next_handle += 1;
        self.resources.insert(
            handle,
            LiveResource {
                uri_path: spec.uri_path.to_owned(),
                resource_type: spec.resource_type.to_owned(),
                interfaces: vec![spec.interface],
                policies: spec.policies,
            },
        );
        debug!("loopback: {} -> {:?}", spec.uri_path, handle);
        Ok(handle)
    }

    fn bind_interface(
        &mut self,
        handle: ResourceHandle,
        interface: Interface,
    ) -> Result<(), PlatformError> {
        let resource = self
            .resources
            .get_mut(&handle)
            .ok_or(PlatformError::NoSuchHandle)?;
        if !resource.interfaces.contains(&interface) {
            resource.interfaces.push(interface);
        }
        Ok(())
    }

    fn destroy_resource(&mut self, handle: ResourceHandle) -> Result<(), PlatformError> {
        self.resources
            .remove(&handle)
            .map(|_| ())
            .ok_or(PlatformError::NoSuchHandle)
    }

    fn send_response(&mut self, request: &Request, response: &Response) -> Result<(), PlatformError> {
        self.write(&Outbound::Response {
            id: request.id,
            resource: Some(request.resource),
            result: response.result,
            representation: response.representation.as_ref(),
        })
    }

    fn notify(
        &mut self,
        handle: ResourceHandle,
        representation: &Representation,
        observers: &ObserverSet,
        qos: Qos,
    ) -> Result<(), PlatformError> {
        if !self.resources.contains_key(&handle) {
            return Err(PlatformError::NoSuchHandle);
        }
        self.write(&Outbound::Notification {
            resource: handle,
            observers: observers.iter().collect(),
            qos,
            representation,
        })
    }
}
