//! Pod summary building
//!
//! Lists pods from a [`RecordSource`] and flattens each record into one of
//! two shapes:
//! - [`PodHealthSummary`]: emitted for every pod, with zero-value defaults
//!   when the pod has no container status yet
//! - [`PodResourceSummary`]: emitted only for pods with at least one
//!   container status; other pods are skipped


use crate::classify::classify;
use crate::config::SnapshotConfig;
use crate::density::count_on_host;
use crate::error::SourceError;
use crate::models::{ContainerPolicy, PodHealthSummary, PodResourceSummary};
use crate::mounts::storage_data;
use crate::observability::{SnapshotMetrics, StructuredLogger};
use crate::quantity::{bytes_to_mib, cpu_limit_cores, memory_limit_bytes};
use crate::source::{LabelSelector, RecordSource};
use crate::timefmt::{ChronoFormatter, TimePrecision, TimestampFormatter};
use k8s_openapi::api::core::v1::{Container, Pod, PodCondition};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Builds health and resource summaries from a record source
pub struct PodSummaryBuilder {
    source: Arc<dyn RecordSource>,
    config: SnapshotConfig,
    formatter: Arc<dyn TimestampFormatter>,
    logger: StructuredLogger,
    metrics: SnapshotMetrics,
}

impl PodSummaryBuilder {
    pub fn new(source: Arc<dyn RecordSource>, config: SnapshotConfig) -> Self {
        let logger = StructuredLogger::new(config.cluster_name.clone());
        Self {
            source,
            config,
            formatter: Arc::new(ChronoFormatter),
            logger,
            metrics: SnapshotMetrics::new(),
        }
    }

    /// Replace the timestamp formatter
    pub fn with_formatter(mut self, formatter: Arc<dyn TimestampFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    fn service_selector(&self, service: &str) -> LabelSelector {
        LabelSelector::new(self.config.selector_key.clone(), service)
    }

    /// List pods, recording latency and volume
    pub async fn fetch(
        &self,
        namespace: &str,
        selector: Option<&LabelSelector>,
    ) -> Result<Vec<Pod>, SourceError> {
        let start = Instant::now();
        let pods = self.source.list_pods(namespace, selector).await?;
        self.metrics
            .observe_list_latency(start.elapsed().as_secs_f64());
        self.metrics.add_pods_listed(pods.len());

        let selector = selector.map(|s| s.to_string());
        self.logger
            .log_pods_listed(namespace, selector.as_deref(), pods.len());
        Ok(pods)
    }

    /// One health summary per pod in the namespace
    pub async fn build_health_summaries(
        &self,
        namespace: &str,
    ) -> Result<Vec<PodHealthSummary>, SourceError> {
        let pods = self.fetch(namespace, None).await?;
        Ok(self.health_summaries(namespace, &pods))
    }

    /// Health summaries for the pods of one service
    pub async fn build_service_health_summaries(
        &self,
        namespace: &str,
        service: &str,
    ) -> Result<Vec<PodHealthSummary>, SourceError> {
        self.build_selected_health_summaries(namespace, &self.service_selector(service))
            .await
    }

    /// Health summaries for pods matching a label selector
    pub async fn build_selected_health_summaries(
        &self,
        namespace: &str,
        selector: &LabelSelector,
    ) -> Result<Vec<PodHealthSummary>, SourceError> {
        let pods = self.fetch(namespace, Some(selector)).await?;
        Ok(self.health_summaries(namespace, &pods))
    }

    /// Resource summaries for every pod that has a container status
    pub async fn build_resource_summaries(
        &self,
        namespace: &str,
    ) -> Result<Vec<PodResourceSummary>, SourceError> {
        let pods = self.fetch(namespace, None).await?;
        Ok(self.resource_summaries(namespace, &pods))
    }

    /// Resource summaries for the pods of one service
    pub async fn build_service_resource_summaries(
        &self,
        namespace: &str,
        service: &str,
    ) -> Result<Vec<PodResourceSummary>, SourceError> {
        self.build_selected_resource_summaries(namespace, &self.service_selector(service))
            .await
    }

    pub async fn build_selected_resource_summaries(
        &self,
        namespace: &str,
        selector: &LabelSelector,
    ) -> Result<Vec<PodResourceSummary>, SourceError> {
        let pods = self.fetch(namespace, Some(selector)).await?;
        Ok(self.resource_summaries(namespace, &pods))
    }

    pub async fn count_pods(&self, namespace: &str) -> Result<usize, SourceError> {
        self.source.count_pods(namespace).await
    }

    /// Number of non-infrastructure pods in the namespace placed on `host_ip`
    pub async fn count_pods_on_host(
        &self,
        namespace: &str,
        host_ip: &str,
    ) -> Result<usize, SourceError> {
        let pods = self.fetch(namespace, None).await?;
        Ok(count_on_host(&pods, host_ip, &self.config.infra_marker))
    }

    /// Delete a pod; failures are returned to the caller unchanged
    pub async fn delete_pod(&self, namespace: &str, name: &str) -> Result<(), SourceError> {
        match self.source.delete_pod(namespace, name).await {
            Ok(()) => {
                self.metrics.inc_deletes(true);
                self.logger.log_pod_deleted(namespace, name);
                Ok(())
            }
            Err(e) => {
                self.metrics.inc_deletes(false);
                self.logger
                    .log_pod_delete_failed(namespace, name, &e.to_string());
                Err(e)
            }
        }
    }

    pub fn health_summaries(&self, namespace: &str, pods: &[Pod]) -> Vec<PodHealthSummary> {
        let summaries: Vec<_> = pods
            .iter()
            .map(|pod| self.health_summary(namespace, pod))
            .collect();
        self.logger
            .log_snapshot_built(namespace, "health", summaries.len(), 0);
        summaries
    }

    pub fn resource_summaries(&self, namespace: &str, pods: &[Pod]) -> Vec<PodResourceSummary> {
        let summaries: Vec<_> = pods
            .iter()
            .filter_map(|pod| self.resource_summary(namespace, pod))
            .collect();
        self.logger.log_snapshot_built(
            namespace,
            "resource",
            summaries.len(),
            pods.len() - summaries.len(),
        );
        summaries
    }

    /// Health view of one pod; never fails
    pub fn health_summary(&self, namespace: &str, pod: &Pod) -> PodHealthSummary {
        let status = pod.status.as_ref();
        let mut summary = PodHealthSummary {
            host_ip: status.and_then(|s| s.host_ip.clone()).unwrap_or_default(),
            pod_ip: status.and_then(|s| s.pod_ip.clone()).unwrap_or_default(),
            resource_name: namespace.to_string(),
            cluster_name: self.config.cluster_name.clone(),
            create_time: self.formatter.display(
                pod.metadata.creation_timestamp.as_ref(),
                TimePrecision::Minutes,
            ),
            container_name: pod.metadata.name.clone().unwrap_or_default(),
            ..Default::default()
        };

        if let Some(first) = status
            .and_then(|s| s.container_statuses.as_ref())
            .and_then(|statuses| statuses.first())
        {
            summary.app_name = first.name.clone();
            summary.image = first.image.clone();
            summary.ready = first.ready;
            summary.restart_count = first.restart_count;
        }

        summary
    }

    /// Resource view of one pod, or `None` when it has no container status
    pub fn resource_summary(&self, namespace: &str, pod: &Pod) -> Option<PodResourceSummary> {
        let pod_name = pod.metadata.name.clone().unwrap_or_default();
        let status = pod.status.as_ref();

        let Some(first) = status
            .and_then(|s| s.container_statuses.as_ref())
            .and_then(|statuses| statuses.first())
        else {
            debug!(namespace = %namespace, pod = %pod_name, "Skipping pod without container status");
            self.metrics.inc_pods_skipped();
            return None;
        };

        let prior = PodResourceSummary {
            host_ip: status.and_then(|s| s.host_ip.clone()).unwrap_or_default(),
            pod_ip: status.and_then(|s| s.pod_ip.clone()).unwrap_or_default(),
            ready: first.ready,
            restart_count: first.restart_count,
            resource_name: namespace.to_string(),
            cluster_name: self.config.cluster_name.clone(),
            ..Default::default()
        };
        let mut summary = classify(prior, first);

        if summary.waiting_message.is_empty() {
            let conditions = status.and_then(|s| s.conditions.as_deref()).unwrap_or(&[]);
            if let Some(failed) = first_failed_condition(conditions) {
                summary.waiting_message = failed.message.clone().unwrap_or_default();
                summary.waiting_reason = failed.reason.clone().unwrap_or_default();
            }
        }

        let containers = self.selected_containers(pod);
        summary.cpu = containers.iter().map(cpu_limit_cores).sum();
        summary.memory = bytes_to_mib(containers.iter().map(memory_limit_bytes).sum());
        summary.env = env_string(containers);
        summary.storage_data = storage_data(pod, self.config.container_policy);
        summary.phase = status
            .and_then(|s| s.phase.as_deref())
            .unwrap_or_default()
            .replace('"', "");
        summary.container_name = pod_name;
        summary.create_time = self.formatter.display(
            pod.metadata.creation_timestamp.as_ref(),
            TimePrecision::Seconds,
        );

        Some(summary)
    }

    fn selected_containers<'a>(&self, pod: &'a Pod) -> &'a [Container] {
        let containers = pod
            .spec
            .as_ref()
            .map(|spec| spec.containers.as_slice())
            .unwrap_or(&[]);

        match self.config.container_policy {
            ContainerPolicy::FirstContainer => containers.get(..1).unwrap_or(&[]),
            ContainerPolicy::AllContainers => containers,
        }
    }
}

/// First condition reporting status "False"
fn first_failed_condition(conditions: &[PodCondition]) -> Option<&PodCondition> {
    conditions.iter().find(|c| c.status == "False")
}

/// `NAME=VALUE\n` for every declared variable, joined by a single space
pub fn env_string(containers: &[Container]) -> String {
    containers
        .iter()
        .flat_map(|c| c.env.iter().flatten())
        .map(|var| format!("{}={}\n", var.name, var.value.as_deref().unwrap_or_default()))
        .collect::<Vec<_>>()
        .join(" ")
}
