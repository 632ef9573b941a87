//! bootstrap-olm: resolve in-cluster configuration for bootstrapping OLM
//!
//! Merges built-in defaults, a Kubernetes ConfigMap and `BOOTSTRAP_OLM_*`
//! environment overrides into one read-only configuration before any
//! subcommand runs.

pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;

pub use config::ResolvedConfig;
pub use error::BootstrapError;
