//! Bootstrap error taxonomy
//!
//! Resolution, client and retrieval failures abort before any subcommand runs.
//! Serialization failures abort only the `show-config` invocation.

use thiserror::Error;

use crate::fetch::ResourceId;

pub type Result<T> = std::result::Result<T, BootstrapError>;

#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The process is not running inside a discoverable cluster context.
    #[error("failed to resolve in-cluster configuration: {0}")]
    EnvironmentResolution(String),

    /// A client for the cluster API could not be built from the resolved context.
    #[error("failed to create kubernetes client: {0}")]
    ClientConstruction(String),

    /// The named ConfigMap could not be retrieved.
    #[error("failed to get ConfigMap {id}: {reason}")]
    ResourceRetrieval { id: ResourceId, reason: RetrievalFailure },

    /// The resolved configuration could not be rendered for display.
    #[error("failed to serialize configuration: {0}")]
    Serialization(String),
}

/// Why a ConfigMap fetch failed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RetrievalFailure {
    #[error("not found")]
    NotFound,

    #[error("access denied (HTTP {0})")]
    Denied(u16),

    #[error("unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid response body: {0}")]
    Decode(String),
}

impl BootstrapError {
    pub fn retrieval(id: &ResourceId, reason: RetrievalFailure) -> Self {
        Self::ResourceRetrieval { id: id.clone(), reason }
    }
}
