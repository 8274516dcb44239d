//! Broker configuration
//!
//! Configuration is snapshotted from the process environment once at
//! startup into a [`BrokerConfig`], which is then shared read-only by
//! every component. Missing values are reported at the point of use, so
//! a broker deployed without, say, a security configuration only fails
//! when a submission actually needs one.

use std::collections::HashMap;

use strum::IntoEnumIterator;
use thiserror::Error;

/// Named configuration entries for the broker.
///
/// Each key maps to an environment variable of the same name in
/// SCREAMING_SNAKE_CASE (e.g. `ConfigKey::AmiSearchPattern` reads
/// `AMI_SEARCH_PATTERN`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfigKey {
    /// Name pattern used to look up the cluster machine image
    AmiSearchPattern,
    /// EMR release label applied to created clusters
    EmrReleaseLabel,
    /// S3 location for cluster logs
    S3LogUri,
    /// Default service role when the caller supplies none
    ServiceRole,
    /// Default job flow role when the caller supplies none
    JobFlowRole,
    /// Default auto scaling role when the caller supplies none
    AutoScalingRole,
    /// Default hosted zone id when the caller supplies none
    HostedZoneId,
    /// Security configuration id applied to every created cluster
    SecurityConfiguration,
    /// Comma-separated role names disallowed as the job flow role
    JobFlowRoleBlacklist,
    /// AWS region the broker operates in
    AwsRegion,
}

impl ConfigKey {
    /// The environment variable this key is read from
    pub fn env_var(&self) -> &'static str {
        (*self).into()
    }
}

/// Configuration lookup errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required key has no value (or a blank one) and no fallback
    #[error("required configuration value '{0}' is missing or blank")]
    Missing(ConfigKey),
}

/// Read-only snapshot of the broker's configuration.
///
/// Built once in `main` and injected into each component; nothing reads
/// the environment after startup.
#[derive(Debug, Clone, Default)]
pub struct BrokerConfig {
    values: HashMap<ConfigKey, String>,
}

impl BrokerConfig {
    /// Snapshot every [`ConfigKey`]'s environment variable.
    ///
    /// Absent variables are simply not recorded; they surface as
    /// [`ConfigError::Missing`] when first used.
    pub fn from_env() -> Self {
        let values = ConfigKey::iter()
            .filter_map(|key| std::env::var(key.env_var()).ok().map(|value| (key, value)))
            .collect();

        Self { values }
    }

    /// Build a config from explicit key/value pairs (tests, embedding)
    pub fn from_pairs(pairs: impl IntoIterator<Item = (ConfigKey, String)>) -> Self {
        Self {
            values: pairs.into_iter().collect(),
        }
    }

    /// The value for `key`, erroring when absent or blank
    pub fn get(&self, key: ConfigKey) -> Result<&str, ConfigError> {
        match self.values.get(&key) {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(ConfigError::Missing(key)),
        }
    }

    /// The value for `key` split on commas, trimmed, order preserved
    pub fn get_list(&self, key: ConfigKey) -> Result<Vec<String>, ConfigError> {
        Ok(self
            .get(key)?
            .split(',')
            .map(|entry| entry.trim().to_string())
            .filter(|entry| !entry.is_empty())
            .collect())
    }

    /// `candidate` when non-blank, otherwise the configured value for `key`
    pub fn if_empty(&self, candidate: &str, key: ConfigKey) -> Result<String, ConfigError> {
        if candidate.trim().is_empty() {
            self.get(key).map(str::to_string)
        } else {
            Ok(candidate.to_string())
        }
    }
}
