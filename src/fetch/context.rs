//! In-cluster execution context discovery

use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{BootstrapError, Result};

pub const SERVICE_ACCOUNT_DIR: &str = "/var/run/secrets/kubernetes.io/serviceaccount";

const HOST_VAR: &str = "KUBERNETES_SERVICE_HOST";
const PORT_VAR: &str = "KUBERNETES_SERVICE_PORT";

/// Connection parameters for the API server of the cluster this pod runs in.
#[derive(Clone)]
pub struct ExecutionContext {
    api_server: String,
    token: String,
    ca_pem: Option<Vec<u8>>,
}

impl ExecutionContext {
    /// Resolve the context from the process environment and the mounted
    /// service account.
    pub fn in_cluster() -> Result<Self> {
        Self::resolve(|key| std::env::var(key).ok(), Path::new(SERVICE_ACCOUNT_DIR))
    }

    /// Resolve the context using `lookup` for environment variables and
    /// `service_account_dir` for the token and CA bundle.
    pub fn resolve<F>(lookup: F, service_account_dir: &Path) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup(HOST_VAR).filter(|v| !v.trim().is_empty());
        let port = lookup(PORT_VAR).filter(|v| !v.trim().is_empty());
        let (Some(host), Some(port)) = (host, port) else {
            return Err(BootstrapError::EnvironmentResolution(format!(
                "{HOST_VAR} and {PORT_VAR} must be defined; not running inside a cluster?"
            )));
        };

        let token_path = service_account_dir.join("token");
        let token = fs::read_to_string(&token_path).map_err(|e| {
            BootstrapError::EnvironmentResolution(format!(
                "failed reading service account token {}: {e}",
                token_path.display()
            ))
        })?;
        let token = token.trim().to_string();
        if token.is_empty() {
            return Err(BootstrapError::EnvironmentResolution(format!(
                "service account token {} is empty",
                token_path.display()
            )));
        }

        // A missing CA bundle is not fatal; the client falls back to its built-in roots.
        let ca_path = service_account_dir.join("ca.crt");
        let ca_pem = match fs::read(&ca_path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::warn!("Expected to load root CA from {}: {}", ca_path.display(), e);
                None
            }
        };

        let ctx = Self { api_server: api_server_url(host.trim(), port.trim()), token, ca_pem };
        tracing::debug!(api_server = %ctx.api_server, "resolved in-cluster context");
        Ok(ctx)
    }

    pub fn api_server(&self) -> &str {
        &self.api_server
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn ca_pem(&self) -> Option<&[u8]> {
        self.ca_pem.as_deref()
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("api_server", &self.api_server)
            .field("token", &"<redacted>")
            .field("ca_pem", &self.ca_pem.as_ref().map(Vec::len))
            .finish()
    }
}

fn api_server_url(host: &str, port: &str) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("https://[{host}]:{port}")
    } else {
        format!("https://{host}:{port}")
    }
}
