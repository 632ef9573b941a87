//! Built-in configuration defaults

use crate::fetch::ConfigData;

pub const DEFAULT_OLM_REPOSITORY: &str =
    "https://github.com/operator-framework/operator-lifecycle-manager";
pub const DEFAULT_VERSION: &str = "latest";
pub const DEFAULT_NAMESPACE: &str = "olm";

/// The lowest-precedence layer of the resolved configuration.
pub fn defaults() -> ConfigData {
    [
        ("olmGitHubRepository", DEFAULT_OLM_REPOSITORY),
        ("version", DEFAULT_VERSION),
        ("namespace", DEFAULT_NAMESPACE),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}
