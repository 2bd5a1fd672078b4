//! Resource representations: the attribute payload exchanged in requests,
//! responses and notifications.
//!
//! A representation is built fresh for every response and dropped once the
//! platform has consumed it; nothing here is cached.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Boolean attribute carrying the door state.
pub const OPENED_KEY: &str = "opened";
/// String attribute carrying the uri path of a freshly created resource.
pub const CREATED_URI_KEY: &str = "createduripath";

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Str(String),
}

/// Attribute set attached to an optional uri path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Representation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri_path: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl Representation {
    /// Door-state representation: `opened` on the resource's uri path.
    pub fn door(uri_path: &str, opened: bool) -> Self {
        let mut repr = Self {
            uri_path: Some(uri_path.to_owned()),
            ..Self::default()
        };
        repr.set_bool(OPENED_KEY, opened);
        repr
    }

    /// Create-response representation: `createduripath` and no uri path.
    pub fn created(uri_path: &str) -> Self {
        let mut repr = Self::default();
        repr.attributes.insert(
            CREATED_URI_KEY.to_owned(),
            AttributeValue::Str(uri_path.to_owned()),
        );
        repr
    }

    pub fn set_bool(&mut self, key: &str, value: bool) {
        self.attributes
            .insert(key.to_owned(), AttributeValue::Bool(value));
    }

    /// Boolean attribute lookup. A missing key or a non-boolean value yields `None`.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.attributes.get(key) {
            Some(AttributeValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.attributes.get(key) {
            Some(AttributeValue::Str(s)) => Some(s),
            _ => None,
        }
    }
}
