//! Layered configuration: defaults, `arbor.toml`, `ARBOR_*` variables, flags.

use std::path::Path;

use anyhow::Context;
use arbor_application::{FailurePolicy, SyncConfig};
use serde::Deserialize;

/// Optional settings file inside the collection directory.
pub const CONFIG_FILE: &str = "arbor.toml";

/// Prefix of environment variables, e.g. `ARBOR_SYNC__ON_FAILURE=resync`.
pub const ENV_PREFIX: &str = "ARBOR";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sync: SyncConfig,
}

/// Values given on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub persistence_timeout_ms: Option<u64>,
    pub on_failure: Option<FailurePolicy>,
}

impl Settings {
    pub fn load(collection_dir: &Path, overrides: &Overrides) -> anyhow::Result<Self> {
        let settings: Self = config::Config::builder()
            .add_source(config::File::from(collection_dir.join(CONFIG_FILE)).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("sync.persistence_timeout_ms", overrides.persistence_timeout_ms)?
            .set_override_option("sync.on_failure", overrides.on_failure.map(policy_name))?
            .build()
            .context("failed to build configuration")?
            .try_deserialize()
            .context("failed to deserialize configuration")?;

        settings.sync.validate()?;
        Ok(settings)
    }
}

const fn policy_name(policy: FailurePolicy) -> &'static str {
    match policy {
        FailurePolicy::KeepOptimistic => "keep_optimistic",
        FailurePolicy::Resync => "resync",
    }
}
