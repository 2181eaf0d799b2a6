//! Pod record sources
//!
//! A [`RecordSource`] answers list, count and delete requests for pods in a
//! namespace. Its results distinguish an empty namespace from a failed
//! query; [`FailOpen`] wraps any source to fold read failures back into
//! empty results for consumers that cannot tell the two apart.

mod kubernetes;

pub use self::kubernetes::{connect, KubeRecordSource};

use crate::error::{ConfigError, SourceError};
use crate::observability::{SnapshotMetrics, StructuredLogger};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use std::fmt;
use std::str::FromStr;

/// Label key used to narrow pods to a single service
pub const SERVICE_LABEL_KEY: &str = "name";

/// A single `key=value` label selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSelector {
    pub key: String,
    pub value: String,
}

impl LabelSelector {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Selector matching the pods of one service
    pub fn service(name: impl Into<String>) -> Self {
        Self::new(SERVICE_LABEL_KEY, name)
    }
}

impl fmt::Display for LabelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

impl FromStr for LabelSelector {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() && !value.contains('=') => {
                Ok(Self::new(key.trim(), value.trim()))
            }
            _ => Err(ConfigError::InvalidSelector(s.to_string())),
        }
    }
}

/// Source of pod records for a namespace
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// List pods in a namespace, optionally narrowed by a label selector
    async fn list_pods(
        &self,
        namespace: &str,
        selector: Option<&LabelSelector>,
    ) -> Result<Vec<Pod>, SourceError>;

    /// Count pods in a namespace
    async fn count_pods(&self, namespace: &str) -> Result<usize, SourceError> {
        Ok(self.list_pods(namespace, None).await?.len())
    }

    /// Delete a named pod; the underlying error is returned unchanged
    async fn delete_pod(&self, namespace: &str, name: &str) -> Result<(), SourceError>;
}

/// Adapter that turns read failures into empty results
///
/// `list_pods` yields an empty list and `count_pods` yields zero when the
/// inner source fails, after logging the cause. `delete_pod` is never
/// softened.
pub struct FailOpen<S> {
    inner: S,
    logger: StructuredLogger,
    metrics: SnapshotMetrics,
}

impl<S: RecordSource> FailOpen<S> {
    pub fn new(inner: S, logger: StructuredLogger) -> Self {
        Self {
            inner,
            logger,
            metrics: SnapshotMetrics::new(),
        }
    }
}

#[async_trait]
impl<S: RecordSource> RecordSource for FailOpen<S> {
    async fn list_pods(
        &self,
        namespace: &str,
        selector: Option<&LabelSelector>,
    ) -> Result<Vec<Pod>, SourceError> {
        match self.inner.list_pods(namespace, selector).await {
            Ok(pods) => Ok(pods),
            Err(e) => {
                self.metrics.inc_list_failures();
                self.logger
                    .log_query_failed(namespace, "list_pods", &e.to_string());
                Ok(Vec::new())
            }
        }
    }

    async fn count_pods(&self, namespace: &str) -> Result<usize, SourceError> {
        match self.inner.count_pods(namespace).await {
            Ok(count) => Ok(count),
            Err(e) => {
                self.metrics.inc_list_failures();
                self.logger
                    .log_query_failed(namespace, "count_pods", &e.to_string());
                Ok(0)
            }
        }
    }

    async fn delete_pod(&self, namespace: &str, name: &str) -> Result<(), SourceError> {
        self.inner.delete_pod(namespace, name).await
    }
}
