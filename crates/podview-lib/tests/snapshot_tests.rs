//! End-to-end snapshot tests over an in-memory record source

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use podview_lib::{
    classify::classify, density::count_on_host, FailOpen, LabelSelector, MountEntry,
    PodResourceSummary, PodSummaryBuilder, RecordSource, SnapshotConfig, SourceError,
    StructuredLogger,
};
use serde_json::json;
use std::sync::Arc;

struct StaticSource(Vec<Pod>);

#[async_trait]
impl RecordSource for StaticSource {
    async fn list_pods(
        &self,
        _namespace: &str,
        _selector: Option<&LabelSelector>,
    ) -> Result<Vec<Pod>, SourceError> {
        Ok(self.0.clone())
    }

    async fn delete_pod(&self, _namespace: &str, name: &str) -> Result<(), SourceError> {
        Err(SourceError::Unavailable(format!("forbidden: {name}")))
    }
}

fn namespace_pods() -> Vec<Pod> {
    serde_json::from_value(json!([
        {
            "metadata": { "name": "web-7f9c", "creationTimestamp": "2018-01-16T12:25:07Z" },
            "spec": {
                "containers": [{
                    "name": "web",
                    "resources": { "limits": { "cpu": "1", "memory": "2147483648" } },
                    "volumeMounts": [
                        { "name": "data", "mountPath": "/var/data" },
                        { "name": "config", "mountPath": "/etc/web" }
                    ]
                }],
                "volumes": [
                    { "name": "data", "hostPath": { "path": "/host/data" } },
                    { "name": "config", "configMap": { "name": "web-config" } }
                ]
            },
            "status": {
                "phase": "Running",
                "hostIP": "10.0.0.1",
                "podIP": "172.16.0.4",
                "containerStatuses": [{
                    "name": "web", "image": "nginx:1.25", "imageID": "",
                    "ready": true, "restartCount": 0,
                    "state": { "running": {} }
                }]
            }
        },
        {
            "metadata": { "name": "batch-unscheduled" },
            "spec": { "containers": [{ "name": "batch" }] },
            "status": { "phase": "Pending" }
        }
    ]))
    .unwrap()
}

#[tokio::test]
async fn test_end_to_end_snapshot() {
    let builder = PodSummaryBuilder::new(
        Arc::new(StaticSource(namespace_pods())),
        SnapshotConfig::default(),
    );

    let health = builder.build_health_summaries("default").await.unwrap();
    let resources = builder.build_resource_summaries("default").await.unwrap();

    assert_eq!(health.len(), 2);
    assert_eq!(resources.len(), 1);

    assert_eq!(health[0].create_time, "2018-01-16 12:25");
    assert!(!health[1].ready);

    let web = &resources[0];
    assert_eq!(web.memory, 2048);
    assert_eq!(web.cpu, 1);
    assert_eq!(web.create_time, "2018-01-16 12:25:07");

    let mounts: Vec<MountEntry> = serde_json::from_str(&web.storage_data).unwrap();
    assert_eq!(mounts[0].host_path, "/host/data");
    assert_eq!(mounts[1].volume, "config");
    assert_eq!(mounts[1].host_path, "");
}

#[tokio::test]
async fn test_summaries_serialize_flat() {
    let builder = PodSummaryBuilder::new(
        Arc::new(StaticSource(namespace_pods())),
        SnapshotConfig::default(),
    );

    let resources = builder.build_resource_summaries("default").await.unwrap();
    let value = serde_json::to_value(&resources[0]).unwrap();
    let object = value.as_object().unwrap();

    assert!(object.values().all(|v| !v.is_object() && !v.is_array()));
    assert_eq!(object["hostIp"], "10.0.0.1");
    assert_eq!(object["waitingReason"], "0");
}

#[tokio::test]
async fn test_delete_error_is_not_softened() {
    let source = FailOpen::new(
        StaticSource(Vec::new()),
        StructuredLogger::new("integration"),
    );
    let builder = PodSummaryBuilder::new(Arc::new(source), SnapshotConfig::default());

    let err = builder.delete_pod("default", "web-7f9c").await.unwrap_err();
    assert!(err.to_string().contains("forbidden: web-7f9c"));
}

#[test]
fn test_density_over_fetched_pods() {
    let pods = namespace_pods();
    let fetched = tokio_test::block_on(async {
        StaticSource(pods).list_pods("default", None).await.unwrap()
    });

    assert_eq!(count_on_host(&fetched, "10.0.0.1", "kubernetes"), 1);
    assert_eq!(count_on_host(&[], "10.0.0.1", "kubernetes"), 0);
}

#[test]
fn test_classify_twice_is_stable() {
    let pods = namespace_pods();
    let status = &pods[0].status.as_ref().unwrap().container_statuses.as_ref().unwrap()[0];

    let once = classify(PodResourceSummary::default(), status);
    let twice = classify(once.clone(), status);
    assert_eq!(
        (
            &once.waiting_message,
            &once.waiting_reason,
            &once.terminated_message,
            &once.terminated_reason
        ),
        (
            &twice.waiting_message,
            &twice.waiting_reason,
            &twice.terminated_message,
            &twice.terminated_reason
        )
    );
    assert_eq!(once.waiting_message, "0");
}
