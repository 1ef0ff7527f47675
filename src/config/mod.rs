//! Configuration for the repair engine.
//!
//! Loading priority, lowest to highest:
//! 1. Default values (hardcoded)
//! 2. Optional config file supplied by the operator
//! 3. Environment variables with the `REPAIR` prefix
//!
//! Plugin-id resolution for delete requests follows the hosting system's
//! convention: explicit request argument first, sharding-specific override
//! second, general persistence plugin last.


use config::Config;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::RequestError;
use crate::Result;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RepairSettings {
    /// Sharding-specific plugin overrides
    #[serde(default)]
    pub sharding: ShardingConfig,

    /// General persistence plugin defaults
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// Response streaming parameters
    #[serde(default)]
    pub stream: StreamConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ShardingConfig {
    /// Journal plugin used by the sharding layer, when it differs from the
    /// general persistence journal
    #[serde(default)]
    pub journal_plugin_id: Option<String>,

    /// Snapshot plugin used by the sharding layer, when it differs from the
    /// general persistence snapshot store
    #[serde(default)]
    pub snapshot_plugin_id: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct PersistenceConfig {
    /// Default journal plugin id
    #[serde(default)]
    pub journal_plugin: Option<String>,

    /// Default snapshot store plugin id
    #[serde(default)]
    pub snapshot_plugin: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StreamConfig {
    /// Bound of the per-invocation response channel
    #[serde(default = "default_response_buffer")]
    pub response_buffer: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            response_buffer: default_response_buffer(),
        }
    }
}

fn default_response_buffer() -> usize {
    crate::DEFAULT_RESPONSE_BUFFER
}

impl RepairSettings {
    /// Load configuration from an optional file plus environment overrides.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = Config::builder();

        if let Some(path) = config_path {
            config = config.add_source(File::with_name(path).required(true));
        }

        config = config.add_source(
            Environment::with_prefix("REPAIR")
                .separator("__")
                .ignore_empty(true)
                .try_parsing(true),
        );

        let settings: Self = config.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Startup check: a repair run with no resolvable plugins would only
    /// fail later and messier, so reject the configuration up front.
    pub fn validate(&self) -> Result<()> {
        self.resolve_journal_plugin(None)?;
        self.resolve_snapshot_plugin(None)?;
        if self.stream.response_buffer == 0 {
            return Err(ConfigError::Message(
                "stream.response_buffer must be at least 1".to_string(),
            )
            .into());
        }
        Ok(())
    }

    /// Journal plugin id: request argument, then sharding override, then
    /// general persistence default.
    pub fn resolve_journal_plugin(
        &self,
        requested: Option<&str>,
    ) -> Result<String> {
        first_non_blank(&[
            requested,
            self.sharding.journal_plugin_id.as_deref(),
            self.persistence.journal_plugin.as_deref(),
        ])
        .ok_or_else(|| RequestError::NoJournalPlugin.into())
    }

    /// Snapshot plugin id, same resolution order as the journal side.
    pub fn resolve_snapshot_plugin(
        &self,
        requested: Option<&str>,
    ) -> Result<String> {
        first_non_blank(&[
            requested,
            self.sharding.snapshot_plugin_id.as_deref(),
            self.persistence.snapshot_plugin.as_deref(),
        ])
        .ok_or_else(|| RequestError::NoSnapshotPlugin.into())
    }
}

pub(crate) fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn first_non_blank(candidates: &[Option<&str>]) -> Option<String> {
    candidates
        .iter()
        .flatten()
        .find(|s| !is_blank(s))
        .map(|s| s.to_string())
}
