//! Layer merging: defaults < ConfigMap data < environment overrides

use std::collections::HashMap;

use crate::fetch::ConfigData;

/// Prefix every environment override must carry.
pub const ENV_PREFIX: &str = "BOOTSTRAP_OLM_";

/// Variables the CLI reads for `--configmap` and `--configmap-namespace`.
/// They select the ConfigMap and never override its keys.
pub const RESERVED_ENV_VARS: [&str; 2] =
    ["BOOTSTRAP_OLM_CONFIGMAP", "BOOTSTRAP_OLM_CONFIGMAP_NAMESPACE"];

/// Environment variable consulted for `key`: the prefix followed by the key
/// upper-cased, with every non-alphanumeric character mapped to `_`.
///
/// `olmGitHubRepository` -> `BOOTSTRAP_OLM_OLMGITHUBREPOSITORY`
///
/// The mapping is not injective: `a.b` and `a_b` share `BOOTSTRAP_OLM_A_B`,
/// and one variable overrides both keys.
pub fn env_var_name(key: &str) -> String {
    let suffix: String = key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect();
    format!("{ENV_PREFIX}{suffix}")
}

/// Snapshot of the prefixed environment variables, taken once before merging.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    vars: HashMap<String, String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::vars_os().filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
        )
    }

    /// Build a snapshot from explicit pairs; unprefixed and reserved names are dropped.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| k.starts_with(ENV_PREFIX) && !RESERVED_ENV_VARS.contains(&k.as_str()))
            .collect();
        Self { vars }
    }

    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.vars.get(&env_var_name(key)).map(String::as_str)
    }
}

/// Merge the three layers into one flat mapping.
///
/// ConfigMap values replace defaults of the same key. Every key present after
/// that step may then be replaced by its environment override; overrides for
/// keys that appear in neither layer are ignored.
pub fn merge(defaults: ConfigData, remote: ConfigData, env: &EnvOverrides) -> ConfigData {
    let mut merged = defaults;
    merged.extend(remote);

    for (key, value) in merged.iter_mut() {
        if let Some(over) = env.lookup(key) {
            tracing::debug!(key = %key, var = %env_var_name(key), "environment override applied");
            *value = over.to_string();
        }
    }

    merged
}
