//! Snapshot configuration

use crate::density::DEFAULT_INFRA_MARKER;
use crate::error::ConfigError;
use crate::models::ContainerPolicy;
use crate::source::SERVICE_LABEL_KEY;
use serde::Deserialize;
use tracing::warn;

/// Snapshot configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SnapshotConfig {
    /// Cluster name stamped on every summary
    #[serde(default)]
    pub cluster_name: String,

    /// Pods whose name contains this substring are left out of host density
    #[serde(default = "default_infra_marker")]
    pub infra_marker: String,

    /// Which containers feed mounts, limits and environment
    #[serde(default)]
    pub container_policy: ContainerPolicy,

    /// Label key used for service-scoped listing
    #[serde(default = "default_selector_key")]
    pub selector_key: String,
}

fn default_infra_marker() -> String {
    DEFAULT_INFRA_MARKER.to_string()
}

fn default_selector_key() -> String {
    SERVICE_LABEL_KEY.to_string()
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            cluster_name: String::new(),
            infra_marker: default_infra_marker(),
            container_policy: ContainerPolicy::default(),
            selector_key: default_selector_key(),
        }
    }
}

impl SnapshotConfig {
    /// Load configuration from `PODVIEW_*` environment variables
    ///
    /// Values that fail to deserialize fall back to defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("PODVIEW"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_else(|e| {
            warn!(error = %e, "Invalid PODVIEW configuration, using defaults");
            SnapshotConfig::default()
        }))
    }

    pub fn with_cluster_name(mut self, cluster_name: impl Into<String>) -> Self {
        self.cluster_name = cluster_name.into();
        self
    }

    pub fn with_container_policy(mut self, policy: ContainerPolicy) -> Self {
        self.container_policy = policy;
        self
    }
}
