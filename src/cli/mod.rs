//! Command-line interface for bootstrap-olm
//!
//! Resolves the in-cluster configuration once, then hands it to the
//! `version` or `show-config` subcommand.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::load_config;
use crate::fetch::{InClusterFetcher, ResourceId, DEFAULT_CONFIGMAP_NAME, DEFAULT_CONFIGMAP_NAMESPACE};

mod show_config;
mod version;

pub use show_config::render_yaml;

/// Bootstrap OLM
#[derive(Parser)]
#[command(name = "bootstrap-olm")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Name of the ConfigMap containing configuration
    #[arg(
        long = "configmap",
        global = true,
        value_name = "NAME",
        env = "BOOTSTRAP_OLM_CONFIGMAP",
        default_value = DEFAULT_CONFIGMAP_NAME
    )]
    configmap: String,

    /// Namespace of the ConfigMap
    #[arg(
        long = "configmap-namespace",
        global = true,
        value_name = "NAMESPACE",
        env = "BOOTSTRAP_OLM_CONFIGMAP_NAMESPACE",
        default_value = DEFAULT_CONFIGMAP_NAMESPACE
    )]
    configmap_namespace: String,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the version of the bootstrap-olm CLI
    Version,

    /// Show the configuration resolved from defaults, the ConfigMap and the environment
    ShowConfig,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    let id = ResourceId::new(cli.configmap, cli.configmap_namespace);
    let config = load_config(&InClusterFetcher::new(), id)?;

    match cli.command {
        Commands::Version => version::run(),
        Commands::ShowConfig => show_config::run(&config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn configmap_flags_default_to_olm() {
        let cli = Cli::try_parse_from(["bootstrap-olm", "version"]).expect("parse");
        assert_eq!(cli.configmap, "bootstrap-olm-config");
        assert_eq!(cli.configmap_namespace, "olm");
    }

    #[test]
    fn configmap_flags_are_global() {
        let cli = Cli::try_parse_from([
            "bootstrap-olm",
            "show-config",
            "--configmap",
            "custom",
            "--configmap-namespace",
            "operators",
        ])
        .expect("parse");
        assert!(matches!(cli.command, Commands::ShowConfig));
        assert_eq!(cli.configmap, "custom");
        assert_eq!(cli.configmap_namespace, "operators");
    }
}
