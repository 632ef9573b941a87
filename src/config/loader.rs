//! One-shot bootstrap: defaults -> ConfigMap fetch -> merge -> freeze

use crate::config::defaults::defaults;
use crate::config::merge::{merge, EnvOverrides};
use crate::config::ResolvedConfig;
use crate::error::Result;
use crate::fetch::{ResourceFetcher, ResourceId};

/// Progress of the bootstrap sequence, logged at each transition.
/// There is no way back from `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Uninitialized,
    Seeding,
    Fetching,
    Merging,
    Ready,
}

/// Drives the bootstrap sequence for a single ConfigMap.
///
/// `run` consumes the loader, so a given loader resolves at most once.
pub struct Loader<'a> {
    fetcher: &'a dyn ResourceFetcher,
    id: ResourceId,
    env: EnvOverrides,
    stage: Stage,
}

impl<'a> Loader<'a> {
    pub fn new(fetcher: &'a dyn ResourceFetcher, id: ResourceId, env: EnvOverrides) -> Self {
        Self { fetcher, id, env, stage: Stage::Uninitialized }
    }

    pub fn run(mut self) -> Result<ResolvedConfig> {
        self.advance(Stage::Seeding);
        let seeded = defaults();

        self.advance(Stage::Fetching);
        let remote = self.fetcher.fetch(&self.id).inspect_err(|e| {
            tracing::debug!(stage = ?self.stage, configmap = %self.id, error = %e, "bootstrap aborted");
        })?;
        eprintln!("Using ConfigMap: {}", self.id);

        self.advance(Stage::Merging);
        let merged = merge(seeded, remote, &self.env);

        self.advance(Stage::Ready);
        Ok(ResolvedConfig::freeze(merged))
    }

    fn advance(&mut self, next: Stage) {
        tracing::debug!(from = ?self.stage, to = ?next, "bootstrap stage");
        self.stage = next;
    }
}

/// Resolve the configuration from the ConfigMap `id`, reading overrides from
/// the process environment.
pub fn load_config(fetcher: &dyn ResourceFetcher, id: ResourceId) -> Result<ResolvedConfig> {
    Loader::new(fetcher, id, EnvOverrides::from_env()).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BootstrapError, RetrievalFailure};
    use crate::fetch::ConfigData;
    use std::cell::Cell;

    struct StaticFetcher {
        data: ConfigData,
        calls: Cell<usize>,
    }

    impl StaticFetcher {
        fn new(pairs: &[(&str, &str)]) -> Self {
            let data = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
            Self { data, calls: Cell::new(0) }
        }
    }

    impl ResourceFetcher for StaticFetcher {
        fn fetch(&self, _id: &ResourceId) -> Result<ConfigData> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.data.clone())
        }
    }

    struct MissingFetcher;

    impl ResourceFetcher for MissingFetcher {
        fn fetch(&self, id: &ResourceId) -> Result<ConfigData> {
            Err(BootstrapError::retrieval(id, RetrievalFailure::NotFound))
        }
    }

    #[test]
    fn remote_version_overrides_default() {
        let fetcher = StaticFetcher::new(&[("version", "0.9.0")]);
        let cfg = Loader::new(&fetcher, ResourceId::default(), EnvOverrides::default())
            .run()
            .expect("bootstrap");

        assert_eq!(cfg.get("version"), Some("0.9.0"));
        assert_eq!(cfg.get("namespace"), Some("olm"));
        assert_eq!(
            cfg.get("olmGitHubRepository"),
            Some("https://github.com/operator-framework/operator-lifecycle-manager")
        );
        assert_eq!(fetcher.calls.get(), 1);
    }

    #[test]
    fn empty_configmap_yields_defaults() {
        let fetcher = StaticFetcher::new(&[]);
        let cfg = Loader::new(&fetcher, ResourceId::default(), EnvOverrides::default())
            .run()
            .expect("bootstrap");
        assert_eq!(cfg.all(), &defaults());
    }

    #[test]
    fn environment_wins_over_configmap() {
        let fetcher = StaticFetcher::new(&[("version", "0.9.0")]);
        let env = EnvOverrides::from_vars([("BOOTSTRAP_OLM_VERSION", "0.11.0")]);
        let cfg = Loader::new(&fetcher, ResourceId::default(), env).run().expect("bootstrap");
        assert_eq!(cfg.get("version"), Some("0.11.0"));
    }

    #[test]
    fn missing_configmap_is_fatal() {
        let err = Loader::new(&MissingFetcher, ResourceId::new("absent", "olm"), EnvOverrides::default())
            .run()
            .expect_err("should fail");
        assert!(matches!(
            err,
            BootstrapError::ResourceRetrieval { reason: RetrievalFailure::NotFound, .. }
        ));
        assert!(err.to_string().contains("olm/absent"));
    }
}
