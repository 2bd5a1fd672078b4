//! Inbound requests and outbound responses.
//!
//! These mirror what the resource platform hands to the request handler:
//! the CRUD verb, the requester address, query parameters, an optional
//! observe-control block and an optional body representation.

use serde::{Deserialize, Serialize};

use super::observers::ObserverId;
use super::ports::ResourceHandle;
use super::representation::Representation;

/// CRUD verb of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestType {
    Get,
    Put,
    Post,
    Delete,
    /// Any verb the endpoint does not serve.
    #[serde(other)]
    Unsupported,
}

/// Subscription-control subtype of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObserveType {
    Register,
    Deregister,
}

/// Observe-control block. The id is only consulted for register/deregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObserveRequest {
    #[serde(rename = "type")]
    pub kind: ObserveType,
    #[serde(default)]
    pub id: Option<ObserverId>,
}

/// One incoming request, addressed to a resource handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Correlation id echoed back in the response, if the client sent one.
    #[serde(default)]
    pub id: Option<u64>,
    pub resource: ResourceHandle,
    #[serde(default)]
    pub host: Option<String>,
    pub method: RequestType,
    #[serde(default)]
    pub query: Vec<(String, String)>,
    #[serde(default)]
    pub observe: Option<ObserveRequest>,
    #[serde(default)]
    pub body: Option<Representation>,
}

impl Request {
    /// Minimal request with a host address and no query, observe or body.
    pub fn new(resource: ResourceHandle, method: RequestType) -> Self {
        Self {
            id: None,
            resource,
            host: Some("127.0.0.1".into()),
            method,
            query: Vec::new(),
            observe: None,
            body: None,
        }
    }

    pub fn with_body(mut self, body: Representation) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_observe(mut self, kind: ObserveType, id: ObserverId) -> Self {
        self.observe = Some(ObserveRequest { kind, id: Some(id) });
        self
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_owned(), value.to_owned()));
        self
    }
}

/// Result code of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseResult {
    Ok,
    ResourceCreated,
    ResourceDeleted,
    Error,
}

/// The single response sent back for a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub result: ResponseResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub representation: Option<Representation>,
}

impl Response {
    pub fn ok(representation: Representation) -> Self {
        Self {
            result: ResponseResult::Ok,
            representation: Some(representation),
        }
    }

    pub fn created(representation: Representation) -> Self {
        Self {
            result: ResponseResult::ResourceCreated,
            representation: Some(representation),
        }
    }

    pub fn deleted() -> Self {
        Self {
            result: ResponseResult::ResourceDeleted,
            representation: None,
        }
    }

    pub fn error() -> Self {
        Self {
            result: ResponseResult::Error,
            representation: None,
        }
    }
}
