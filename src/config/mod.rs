//! Configuration resolution
//!
//! Builds the read-only configuration every subcommand consumes, with
//! precedence Env > ConfigMap > Defaults.

use serde::Serialize;

use crate::fetch::ConfigData;

pub mod defaults;
pub mod loader;
pub mod merge;

pub use loader::{load_config, Loader};
pub use merge::{env_var_name, EnvOverrides, ENV_PREFIX, RESERVED_ENV_VARS};

/// The merged configuration. Immutable once built; share it by reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResolvedConfig {
    values: ConfigData,
}

impl ResolvedConfig {
    pub(crate) fn freeze(values: ConfigData) -> Self {
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn all(&self) -> &ConfigData {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_none_for_unknown_key() {
        let cfg = ResolvedConfig::freeze(ConfigData::from([("a".to_string(), "1".to_string())]));
        assert_eq!(cfg.get("a"), Some("1"));
        assert_eq!(cfg.get("b"), None);
    }

    #[test]
    fn serializes_as_flat_map() {
        let cfg = ResolvedConfig::freeze(ConfigData::from([
            ("b".to_string(), "2".to_string()),
            ("a".to_string(), "1".to_string()),
        ]));
        assert_eq!(serde_json::to_string(&cfg).expect("json"), r#"{"a":"1","b":"2"}"#);
    }
}
