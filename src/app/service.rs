//! Resource service: the request dispatcher.
//!
//! [`ResourceService`] owns the door resources and the sensor. The platform
//! delivers every incoming request through [`RequestHandler::on_request`];
//! the service maps the CRUD verb onto the `opened` attribute, updates the
//! observer set, and sends exactly one response.
//!
//! ```text
//!   Platform ──▶ on_request ──▶ ┌──────────────────────────┐ ──▶ send_response
//!                               │     ResourceService      │ ──▶ notify
//!                 SensorPort ◀──│ primary · secondary slot │
//!                               └──────────────────────────┘
//! ```

use log::{debug, error, info, warn};

use crate::config::DeviceConfig;
use crate::error::{Error, Result};

use super::ports::{Platform, Qos, RequestHandler, ResourceHandle, SensorPort};
use super::representation::{OPENED_KEY, Representation};
use super::request::{ObserveType, Request, RequestType, Response};
use super::resource::{self, Resource};

// ───────────────────────────────────────────────────────────────
// Reply
// ───────────────────────────────────────────────────────────────

/// Outcome of a successfully handled request.
struct Reply {
    response: Response,
    /// Value to push to the observers once the response is out.
    notify: Option<bool>,
}

impl Reply {
    fn respond(response: Response) -> Self {
        Self {
            response,
            notify: None,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// ResourceService
// ───────────────────────────────────────────────────────────────

pub struct ResourceService<S: SensorPort> {
    config: DeviceConfig,
    sensor: S,
    primary: Option<Resource>,
    /// The one resource POST may create. `Some` blocks further creation.
    secondary: Option<Resource>,
    initialized: bool,
}

impl<S: SensorPort> ResourceService<S> {
    /// Construct the service. Does **not** touch the platform. Call
    /// [`init`](Self::init) and [`publish`](Self::publish) next.
    pub fn new(config: DeviceConfig, sensor: S) -> Self {
        Self {
            config,
            sensor,
            primary: None,
            secondary: None,
            initialized: false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Bring up the platform: storage, device name, presence.
    ///
    /// If any step after initialisation fails the platform is
    /// deinitialised again before the error is returned.
    pub fn init<P: Platform>(&mut self, platform: &mut P, device_name: &str) -> Result<()> {
        platform.initialize(&self.config.storage_path).map_err(|e| {
            error!("platform initialize failed: {}", e);
            Error::Init("platform initialize")
        })?;

        if let Err(e) = self.bring_up(platform, device_name) {
            platform.deinitialize();
            return Err(e);
        }

        self.initialized = true;
        info!(
            "platform up as '{}' (presence every {}s)",
            device_name, self.config.presence_interval_secs
        );
        Ok(())
    }

    fn bring_up<P: Platform>(&self, platform: &mut P, device_name: &str) -> Result<()> {
        platform.set_device_name(device_name).map_err(|e| {
            error!("set device name failed: {}", e);
            Error::Init("set device name")
        })?;
        platform
            .start_presence(self.config.presence_interval_secs)
            .map_err(|e| {
                error!("start presence failed: {}", e);
                Error::Init("start presence")
            })?;
        Ok(())
    }

    /// Unset every resource and tear the platform down.
    pub fn fini<P: Platform>(&mut self, platform: &mut P) {
        resource::unset_resource(platform, self.secondary.take());
        resource::unset_resource(platform, self.primary.take());
        platform.deinitialize();
        self.initialized = false;
        info!("platform down");
    }

    /// Register the primary door resource.
    pub fn publish<P: Platform>(&mut self, platform: &mut P) -> Result<ResourceHandle> {
        if self.primary.is_some() {
            return Err(Error::AlreadyCreated);
        }
        let resource = resource::set_resource(
            platform,
            &self.config.primary_uri,
            &self.config.resource_type,
        )?;
        let handle = resource.handle().ok_or(Error::UnknownResource)?;
        self.primary = Some(resource);
        Ok(handle)
    }

    /// Push `value` to the observers of the primary resource.
    pub fn notify<P: Platform>(&mut self, platform: &mut P, value: bool) -> Result<()> {
        resource::notify(platform, self.primary.as_ref(), value)
    }

    /// Read the door state from the sensor.
    pub fn read_door(&mut self) -> Result<bool> {
        Ok(self.sensor.read_opened()?)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn primary(&self) -> Option<&Resource> {
        self.primary.as_ref()
    }

    pub fn secondary(&self) -> Option<&Resource> {
        self.secondary.as_ref()
    }

    /// Live resource owning `handle`.
    pub fn resource(&self, handle: ResourceHandle) -> Option<&Resource> {
        [self.primary.as_ref(), self.secondary.as_ref()]
            .into_iter()
            .flatten()
            .find(|r| r.handle() == Some(handle))
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    // ── Dispatch ──────────────────────────────────────────────

    /// Run every step of a request. Nothing is sent from here.
    fn process<P: Platform>(&mut self, platform: &mut P, request: &Request) -> Result<Reply> {
        let host = request
            .host
            .as_deref()
            .ok_or(Error::MalformedRequest("host address"))?;
        debug!("Host address : {}", host);

        for (key, value) in &request.query {
            debug!("Key : [{}], Value : [{}]", key, value);
        }

        // Vet the observe block before the verb mutates any resource.
        self.check_observer(request)?;
        let reply = self.handle_by_crud_type(platform, request)?;
        self.handle_observer(request)?;
        Ok(reply)
    }

    fn check_observer(&self, request: &Request) -> Result<()> {
        let Some(observe) = request.observe else {
            return Ok(());
        };
        let id = observe.id.ok_or(Error::MalformedRequest("observe id"))?;
        if observe.kind != ObserveType::Register {
            return Ok(());
        }
        let observers = self
            .resource(request.resource)
            .ok_or(Error::UnknownResource)?
            .observers()
            .ok_or(Error::NoObservers)?;
        if observers.can_add(id) {
            Ok(())
        } else {
            Err(Error::Capacity("observer set"))
        }
    }

    fn handle_by_crud_type<P: Platform>(
        &mut self,
        platform: &mut P,
        request: &Request,
    ) -> Result<Reply> {
        match request.method {
            RequestType::Get => self.handle_get(request.resource),
            RequestType::Put => self.handle_put(request),
            RequestType::Post => self.handle_post(platform),
            RequestType::Delete => self.handle_delete(platform, request.resource),
            RequestType::Unsupported => {
                error!("unsupported request type on {:?}", request.resource);
                Err(Error::UnsupportedRequest)
            }
        }
    }

    fn handle_get(&mut self, handle: ResourceHandle) -> Result<Reply> {
        let uri_path = self
            .resource(handle)
            .ok_or(Error::UnknownResource)?
            .uri_path()
            .to_owned();
        let opened = self.sensor.read_opened()?;
        Ok(Reply::respond(Response::ok(Representation::door(
            &uri_path, opened,
        ))))
    }

    fn handle_put(&mut self, request: &Request) -> Result<Reply> {
        debug!("PUT request");
        let value = request
            .body
            .as_ref()
            .and_then(|body| body.get_bool(OPENED_KEY))
            .ok_or(Error::MalformedRequest("opened attribute"))?;

        apply_to_device(value)?;

        let resource = self
            .resource(request.resource)
            .ok_or(Error::UnknownResource)?;
        Ok(Reply {
            response: Response::ok(Representation::door(resource.uri_path(), value)),
            notify: Some(value),
        })
    }

    fn handle_post<P: Platform>(&mut self, platform: &mut P) -> Result<Reply> {
        debug!("POST request");
        if let Some(existing) = &self.secondary {
            error!("Resource({}) is already created", existing.uri_path());
            return Err(Error::AlreadyCreated);
        }

        let created = resource::set_resource(
            platform,
            &self.config.secondary_uri,
            &self.config.resource_type,
        )?;
        let representation = Representation::created(created.uri_path());
        self.secondary = Some(created);
        Ok(Reply::respond(Response::created(representation)))
    }

    fn handle_delete<P: Platform>(
        &mut self,
        platform: &mut P,
        handle: ResourceHandle,
    ) -> Result<Reply> {
        debug!("DELETE request");
        let slot = if self.primary.as_ref().and_then(Resource::handle) == Some(handle) {
            &mut self.primary
        } else if self.secondary.as_ref().and_then(Resource::handle) == Some(handle) {
            &mut self.secondary
        } else {
            return Err(Error::UnknownResource);
        };

        if let Some(resource) = slot.as_mut() {
            resource.destroy(platform)?;
        }
        if let Some(deleted) = slot.take() {
            info!("resource {} deleted", deleted.uri_path());
        }
        Ok(Reply::respond(Response::deleted()))
    }

    fn handle_observer(&mut self, request: &Request) -> Result<()> {
        let Some(observe) = request.observe else {
            return Ok(());
        };
        let id = observe.id.ok_or(Error::MalformedRequest("observe id"))?;

        let Some(resource) = [self.primary.as_mut(), self.secondary.as_mut()]
            .into_iter()
            .flatten()
            .find(|r| r.handle() == Some(request.resource))
        else {
            // The verb itself removed the resource (DELETE + observe).
            warn!("observe {:?} for {} on a removed resource", observe.kind, id);
            return Ok(());
        };
        let observers = resource.observers_mut().ok_or(Error::NoObservers)?;

        match observe.kind {
            ObserveType::Register => {
                observers.add(id)?;
                debug!("observer {} registered ({} total)", id, observers.len());
            }
            ObserveType::Deregister => {
                if !observers.remove(id) {
                    debug!("observer {} was not registered", id);
                }
            }
        }
        Ok(())
    }

    /// Fan a PUT value out to the observers of the addressed resource.
    ///
    /// The response has already been sent, so failures are only logged.
    fn push_notification<P: Platform>(&self, platform: &mut P, handle: ResourceHandle, value: bool) {
        let Some(resource) = self.resource(handle) else {
            return;
        };
        let Some(observers) = resource.observers() else {
            return;
        };
        if observers.is_empty() {
            debug!("no observers on {}, skipping notification", resource.uri_path());
            return;
        }
        let representation = Representation::door(resource.uri_path(), value);
        if let Err(e) = platform.notify(handle, &representation, observers, Qos::High) {
            warn!("notification on {} failed: {}", resource.uri_path(), e);
        }
    }
}

impl<S: SensorPort> RequestHandler for ResourceService<S> {
    fn on_request<P: Platform>(&mut self, platform: &mut P, request: &Request) {
        match self.process(platform, request) {
            Ok(reply) => {
                if let Err(e) = platform.send_response(request, &reply.response) {
                    warn!("response to {:?} failed: {}", request.resource, e);
                    return;
                }
                if let Some(value) = reply.notify {
                    self.push_notification(platform, request.resource, value);
                }
            }
            Err(e) => {
                warn!(
                    "{:?} on {:?} failed: {}",
                    request.method, request.resource, e
                );
                if let Err(e) = platform.send_response(request, &Response::error()) {
                    error!("error response to {:?} failed: {}", request.resource, e);
                }
            }
        }
    }
}

/// Drive the physical door to `value`. The sensor board has no actuator,
/// so this only records the request.
fn apply_to_device(value: bool) -> Result<()> {
    debug!("device actuation requested: opened={}", value);
    Ok(())
}
