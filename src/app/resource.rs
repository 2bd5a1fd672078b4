//! Resource records and their lifecycle.
//!
//! A [`Resource`] pairs a platform handle with its observer set. Both are
//! released together by [`unset_resource`], and [`set_resource`] guarantees
//! that a failure at any step leaves no platform handle allocated.

use log::{debug, info, warn};

use crate::error::{Error, Result};

use super::observers::ObserverSet;
use super::ports::{Interface, Platform, Policies, Qos, ResourceHandle, ResourceSpec};
use super::representation::Representation;

/// Longest uri path a resource record can hold.
pub const URI_CAPACITY: usize = 64;
/// Longest resource type string the platform accepts.
pub const TYPE_CAPACITY: usize = 61;

pub type UriPath = heapless::String<URI_CAPACITY>;
pub type ResourceType = heapless::String<TYPE_CAPACITY>;

/// Policies every door resource is registered with.
pub const DOOR_POLICIES: Policies = Policies::DISCOVERABLE
    .union(Policies::OBSERVABLE)
    .union(Policies::SECURE);

// ───────────────────────────────────────────────────────────────
// Resource record
// ───────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct Resource {
    uri_path: UriPath,
    resource_type: ResourceType,
    handle: Option<ResourceHandle>,
    observers: Option<ObserverSet>,
}

impl Resource {
    pub fn uri_path(&self) -> &str {
        &self.uri_path
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Platform handle, `None` once destroyed.
    pub fn handle(&self) -> Option<ResourceHandle> {
        self.handle
    }

    pub fn observers(&self) -> Option<&ObserverSet> {
        self.observers.as_ref()
    }

    pub fn observers_mut(&mut self) -> Option<&mut ObserverSet> {
        self.observers.as_mut()
    }

    /// Destroy the platform handle and drop the observer set with it.
    ///
    /// On platform failure the record is left untouched.
    pub(crate) fn destroy(&mut self, platform: &mut impl Platform) -> Result<()> {
        let handle = self.handle.ok_or(Error::UnknownResource)?;
        platform.destroy_resource(handle)?;
        self.handle = None;
        self.observers = None;
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Rollback guard
// ───────────────────────────────────────────────────────────────

/// Destroys a freshly created platform handle unless committed.
struct HandleGuard<'p, P: Platform> {
    platform: &'p mut P,
    handle: ResourceHandle,
    armed: bool,
}

impl<'p, P: Platform> HandleGuard<'p, P> {
    fn new(platform: &'p mut P, handle: ResourceHandle) -> Self {
        Self {
            platform,
            handle,
            armed: true,
        }
    }

    fn platform(&mut self) -> &mut P {
        &mut *self.platform
    }

    /// Keep the handle alive past the guard.
    fn commit(mut self) -> ResourceHandle {
        self.armed = false;
        self.handle
    }
}

impl<P: Platform> Drop for HandleGuard<'_, P> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        debug!("rolling back resource handle {:?}", self.handle);
        if let Err(e) = self.platform.destroy_resource(self.handle) {
            warn!("rollback of handle {:?} failed: {}", self.handle, e);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Lifecycle
// ───────────────────────────────────────────────────────────────

/// Register a door resource at `uri_path` with `resource_type`.
///
/// The resource exposes the default and batch interfaces, is discoverable,
/// observable and secure, and starts with an empty observer set.
pub fn set_resource<P: Platform>(
    platform: &mut P,
    uri_path: &str,
    resource_type: &str,
) -> Result<Resource> {
    if !uri_path.starts_with('/') {
        return Err(Error::InvalidResource("uri path must start with '/'"));
    }
    let uri = UriPath::try_from(uri_path).map_err(|()| Error::Capacity("uri path"))?;
    let rtype = parse_resource_type(resource_type)?;

    let spec = ResourceSpec {
        uri_path,
        resource_type,
        interface: Interface::Default,
        policies: DOOR_POLICIES,
    };
    let handle = platform.create_resource(&spec)?;

    let mut guard = HandleGuard::new(platform, handle);
    guard.platform().bind_interface(handle, Interface::Batch)?;
    let handle = guard.commit();

    info!("resource {} ({}) registered as {:?}", uri, rtype, handle);
    Ok(Resource {
        uri_path: uri,
        resource_type: rtype,
        handle: Some(handle),
        observers: Some(ObserverSet::new()),
    })
}

/// Release a resource record: observer set first, then the platform handle.
/// `None` is a no-op.
pub fn unset_resource<P: Platform>(platform: &mut P, resource: Option<Resource>) {
    let Some(mut resource) = resource else {
        return;
    };
    if let Some(observers) = resource.observers.take() {
        debug!(
            "dropping {} observer(s) of {}",
            observers.len(),
            resource.uri_path
        );
    }
    if let Some(handle) = resource.handle.take() {
        if let Err(e) = platform.destroy_resource(handle) {
            warn!("destroying {} ({:?}) failed: {}", resource.uri_path, handle, e);
        }
    }
    info!("resource {} unset", resource.uri_path);
}

/// Push `opened = value` to every observer of `resource` at high QoS.
///
/// Fails without touching the platform when the resource, its handle, or
/// its observers are absent, or when nobody is observing.
pub fn notify<P: Platform>(platform: &mut P, resource: Option<&Resource>, value: bool) -> Result<()> {
    let resource = resource.ok_or(Error::UnknownResource)?;
    let handle = resource.handle.ok_or(Error::UnknownResource)?;
    let observers = resource.observers.as_ref().ok_or(Error::NoObservers)?;
    if observers.is_empty() {
        return Err(Error::NoObservers);
    }

    debug!("Notify the value[{}]", value);
    let representation = Representation::door(&resource.uri_path, value);
    platform.notify(handle, &representation, observers, Qos::High)?;
    Ok(())
}

/// Check `resource_type` against the rule [`set_resource`] enforces.
pub fn validate_resource_type(resource_type: &str) -> Result<()> {
    parse_resource_type(resource_type).map(|_| ())
}

/// Resource types are lowercase dotted names: `[a-z][a-z0-9.-]*`, at most
/// [`TYPE_CAPACITY`] bytes.
fn parse_resource_type(resource_type: &str) -> Result<ResourceType> {
    let mut chars = resource_type.chars();
    let valid_head = chars.next().is_some_and(|c| c.is_ascii_lowercase());
    let valid_tail =
        chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-');
    if !valid_head || !valid_tail {
        return Err(Error::InvalidResource("resource type"));
    }
    ResourceType::try_from(resource_type).map_err(|()| Error::Capacity("resource type"))
}
