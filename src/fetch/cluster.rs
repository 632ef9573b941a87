//! ConfigMap retrieval from the Kubernetes API server

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use reqwest::blocking::{Client, ClientBuilder};
use reqwest::header::ACCEPT;
use reqwest::{Certificate, Url};
use serde::Deserialize;

use crate::error::{BootstrapError, Result, RetrievalFailure};
use crate::fetch::context::{ExecutionContext, SERVICE_ACCOUNT_DIR};
use crate::fetch::{ConfigData, ResourceFetcher, ResourceId};

const USER_AGENT: &str = concat!("bootstrap-olm/", env!("CARGO_PKG_VERSION"));

/// Longest slice of an error response body kept in diagnostics.
const MAX_ERROR_BODY: usize = 512;

/// Fetches ConfigMaps from the cluster the process is running in.
///
/// The execution context is resolved on each `fetch`, which the bootstrap
/// sequence calls exactly once. By default it reads the process environment
/// and the mounted service account.
#[derive(Debug)]
pub struct InClusterFetcher {
    service_account_dir: PathBuf,
    env: Option<HashMap<String, String>>,
}

impl Default for InClusterFetcher {
    fn default() -> Self {
        Self { service_account_dir: PathBuf::from(SERVICE_ACCOUNT_DIR), env: None }
    }
}

impl InClusterFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the token and CA bundle from `dir` instead of the mounted service account.
    pub fn service_account_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.service_account_dir = dir.into();
        self
    }

    /// Resolve `KUBERNETES_SERVICE_*` from `vars` instead of the process environment.
    pub fn env(mut self, vars: HashMap<String, String>) -> Self {
        self.env = Some(vars);
        self
    }

    fn context(&self) -> Result<ExecutionContext> {
        let dir: &Path = &self.service_account_dir;
        match &self.env {
            Some(vars) => ExecutionContext::resolve(|k| vars.get(k).cloned(), dir),
            None => ExecutionContext::resolve(|k| std::env::var(k).ok(), dir),
        }
    }
}

impl ResourceFetcher for ClusterClient {
    fn fetch(&self, id: &ResourceId) -> Result<ConfigData> {
        self.get_config_map(id)
    }
}

impl ResourceFetcher for InClusterFetcher {
    fn fetch(&self, id: &ResourceId) -> Result<ConfigData> {
        let ctx = self.context()?;
        let client = ClusterClient::new(&ctx)?;
        client.get_config_map(id)
    }
}

/// Which certificates the API server's TLS chain may terminate in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrustRoots {
    /// Only the cluster CA bundle; public roots are disabled.
    ClusterCa,
    /// No CA bundle was mounted; the client's built-in roots apply.
    BuiltIn,
}

impl TrustRoots {
    fn for_bundle(ca_pem: Option<&[u8]>) -> Self {
        if ca_pem.is_some() {
            Self::ClusterCa
        } else {
            Self::BuiltIn
        }
    }
}

/// Blocking HTTP client bound to one API server and bearer token.
pub struct ClusterClient {
    http: Client,
    base: Url,
    token: String,
}

#[derive(Debug, Deserialize)]
struct ConfigMapBody {
    #[serde(default)]
    data: Option<ConfigData>,
}

impl ClusterClient {
    pub fn new(ctx: &ExecutionContext) -> Result<Self> {
        Self::connect(ctx.api_server(), ctx.token(), ctx.ca_pem())
    }

    /// Build a client for `api_server`, trusting only `ca_pem` when it is given.
    pub fn connect(api_server: &str, token: &str, ca_pem: Option<&[u8]>) -> Result<Self> {
        let base = Url::parse(api_server).map_err(|e| {
            BootstrapError::ClientConstruction(format!("invalid API server URL {api_server}: {e}"))
        })?;

        let builder = trust(Client::builder().user_agent(USER_AGENT), ca_pem)?;
        let http = builder
            .build()
            .map_err(|e| BootstrapError::ClientConstruction(e.to_string()))?;

        Ok(Self { http, base, token: token.to_string() })
    }

    pub fn get_config_map(&self, id: &ResourceId) -> Result<ConfigData> {
        let url = config_map_url(&self.base, id)?;
        tracing::debug!(%url, "fetching ConfigMap");

        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|e| BootstrapError::retrieval(id, RetrievalFailure::Transport(e.to_string())))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .map_err(|e| BootstrapError::retrieval(id, RetrievalFailure::Transport(e.to_string())))?;

        decode_config_map(id, status, &body)
    }
}

fn trust(builder: ClientBuilder, ca_pem: Option<&[u8]>) -> Result<ClientBuilder> {
    match (TrustRoots::for_bundle(ca_pem), ca_pem) {
        (TrustRoots::ClusterCa, Some(pem)) => {
            let cert = Certificate::from_pem(pem).map_err(|e| {
                BootstrapError::ClientConstruction(format!("invalid cluster CA bundle: {e}"))
            })?;
            Ok(builder.tls_built_in_root_certs(false).add_root_certificate(cert))
        }
        _ => Ok(builder),
    }
}

/// `{base}/api/v1/namespaces/{namespace}/configmaps/{name}`, with each segment escaped.
fn config_map_url(base: &Url, id: &ResourceId) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| {
            BootstrapError::ClientConstruction(format!("API server URL cannot be a base: {base}"))
        })?
        .pop_if_empty()
        .extend(["api", "v1", "namespaces", id.namespace.as_str(), "configmaps", id.name.as_str()]);
    Ok(url)
}

fn decode_config_map(id: &ResourceId, status: u16, body: &str) -> Result<ConfigData> {
    match status {
        200..=299 => {
            let parsed: ConfigMapBody = serde_json::from_str(body).map_err(|e| {
                BootstrapError::retrieval(id, RetrievalFailure::Decode(e.to_string()))
            })?;
            Ok(parsed.data.unwrap_or_default())
        }
        404 => Err(BootstrapError::retrieval(id, RetrievalFailure::NotFound)),
        401 | 403 => Err(BootstrapError::retrieval(id, RetrievalFailure::Denied(status))),
        _ => {
            let body: String = body.trim().chars().take(MAX_ERROR_BODY).collect();
            Err(BootstrapError::retrieval(id, RetrievalFailure::Status { status, body }))
        }
    }
}
