//! Observability infrastructure for pod snapshots
//!
//! Provides:
//! - Prometheus metrics (list latency, pods listed/skipped, list failures, deletes)
//! - Structured logging of snapshot events with tracing

use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Histogram, IntCounter,
    IntCounterVec,
};
use std::sync::OnceLock;
use tracing::{error, info};

/// Histogram buckets for orchestrator query latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<SnapshotMetricsInner> = OnceLock::new();

struct SnapshotMetricsInner {
    list_latency_seconds: Histogram,
    pods_listed: IntCounter,
    pods_skipped: IntCounter,
    list_failures: IntCounter,
    deletes: IntCounterVec,
}

impl SnapshotMetricsInner {
    fn new() -> Self {
        Self {
            list_latency_seconds: register_histogram!(
                "podview_list_latency_seconds",
                "Time spent listing pods from the orchestrator",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register list_latency_seconds"),

            pods_listed: register_int_counter!(
                "podview_pods_listed_total",
                "Total number of pod records returned by list queries"
            )
            .expect("Failed to register pods_listed"),

            pods_skipped: register_int_counter!(
                "podview_pods_skipped_total",
                "Pods left out of resource summaries for lack of container statuses"
            )
            .expect("Failed to register pods_skipped"),

            list_failures: register_int_counter!(
                "podview_list_failures_total",
                "List or count queries converted to an empty result"
            )
            .expect("Failed to register list_failures"),

            deletes: register_int_counter_vec!(
                "podview_pod_deletes_total",
                "Pod delete requests by outcome",
                &["outcome"]
            )
            .expect("Failed to register pod_deletes"),
        }
    }
}

/// Snapshot metrics for Prometheus exposition
///
/// Lightweight handle to the global metrics instance; clones share it.
#[derive(Clone)]
pub struct SnapshotMetrics {
    _private: (),
}

impl Default for SnapshotMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(SnapshotMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &SnapshotMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    pub fn observe_list_latency(&self, duration_secs: f64) {
        self.inner().list_latency_seconds.observe(duration_secs);
    }

    pub fn add_pods_listed(&self, count: usize) {
        self.inner().pods_listed.inc_by(count as u64);
    }

    pub fn inc_pods_skipped(&self) {
        self.inner().pods_skipped.inc();
    }

    pub fn inc_list_failures(&self) {
        self.inner().list_failures.inc();
    }

    pub fn inc_deletes(&self, success: bool) {
        let outcome = if success { "success" } else { "failure" };
        self.inner().deletes.with_label_values(&[outcome]).inc();
    }

    /// Render all registered metrics in the Prometheus text format
    pub fn render() -> String {
        use prometheus::{Encoder, TextEncoder};

        let mut buffer = Vec::new();
        if let Err(e) = TextEncoder::new().encode(&prometheus::gather(), &mut buffer) {
            error!(error = %e, "Failed to encode metrics");
            return String::new();
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

/// Structured logger for snapshot events
#[derive(Clone)]
pub struct StructuredLogger {
    cluster_name: String,
}

impl StructuredLogger {
    pub fn new(cluster_name: impl Into<String>) -> Self {
        Self {
            cluster_name: cluster_name.into(),
        }
    }

    pub fn log_pods_listed(&self, namespace: &str, selector: Option<&str>, count: usize) {
        info!(
            event = "pods_listed",
            cluster = %self.cluster_name,
            namespace = %namespace,
            selector = ?selector,
            count = count,
            "Listed pods"
        );
    }

    pub fn log_snapshot_built(&self, namespace: &str, kind: &str, emitted: usize, skipped: usize) {
        info!(
            event = "snapshot_built",
            cluster = %self.cluster_name,
            namespace = %namespace,
            kind = %kind,
            emitted = emitted,
            skipped = skipped,
            "Built pod snapshot"
        );
    }

    pub fn log_pod_deleted(&self, namespace: &str, pod: &str) {
        info!(
            event = "pod_deleted",
            cluster = %self.cluster_name,
            namespace = %namespace,
            pod = %pod,
            "Pod delete accepted"
        );
    }

    pub fn log_pod_delete_failed(&self, namespace: &str, pod: &str, error: &str) {
        error!(
            event = "pod_delete_failed",
            cluster = %self.cluster_name,
            namespace = %namespace,
            pod = %pod,
            error = %error,
            "Pod delete failed"
        );
    }

    pub fn log_query_failed(&self, namespace: &str, operation: &str, error: &str) {
        error!(
            event = "query_failed",
            cluster = %self.cluster_name,
            namespace = %namespace,
            operation = %operation,
            error = %error,
            "Pod query failed, returning empty result"
        );
    }
}
