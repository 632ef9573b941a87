//! `show-config` command implementation

use anyhow::{Context, Result};

use crate::config::ResolvedConfig;
use crate::error::BootstrapError;

/// Render the resolved configuration as YAML, keys in sorted order.
pub fn render_yaml(config: &ResolvedConfig) -> Result<String, BootstrapError> {
    serde_yaml::to_string(config).map_err(|e| BootstrapError::Serialization(e.to_string()))
}

pub fn run(config: &ResolvedConfig) -> Result<()> {
    let yaml = render_yaml(config).context("Error marshaling config to YAML")?;
    print!("{yaml}");
    Ok(())
}
