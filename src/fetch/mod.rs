//! Remote configuration fetching (in-cluster ConfigMaps)

use std::collections::BTreeMap;
use std::fmt;

use crate::error::Result;

pub mod cluster;
pub mod context;

pub use cluster::InClusterFetcher;
pub use context::ExecutionContext;

pub const DEFAULT_CONFIGMAP_NAME: &str = "bootstrap-olm-config";
pub const DEFAULT_CONFIGMAP_NAMESPACE: &str = "olm";

/// Flat string-to-string payload of a ConfigMap.
pub type ConfigData = BTreeMap<String, String>;

/// Identifies the ConfigMap to read configuration from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceId {
    pub name: String,
    pub namespace: String,
}

impl ResourceId {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self { name: name.into(), namespace: namespace.into() }
    }
}

impl Default for ResourceId {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIGMAP_NAME, DEFAULT_CONFIGMAP_NAMESPACE)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Source of the remote key/value payload merged over the defaults.
///
/// Implementations resolve whatever context they need, fetch the named
/// resource, and return its data. A resource with no body yields an empty map;
/// a missing or forbidden resource is an error.
pub trait ResourceFetcher {
    fn fetch(&self, id: &ResourceId) -> Result<ConfigData>;
}
