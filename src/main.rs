//! bootstrap-olm: resolve in-cluster configuration for bootstrapping OLM
//!
//! Reads a ConfigMap from the cluster this pod runs in, layers it over
//! built-in defaults and environment overrides, then runs a subcommand
//! against the result.

use anyhow::Result;

fn main() -> Result<()> {
    bootstrap_olm::cli::run()
}
