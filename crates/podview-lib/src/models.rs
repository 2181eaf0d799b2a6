//! Flat, always-populated views of pod state

use serde::{Deserialize, Serialize};

/// Placeholder written to every message/reason field before classification
pub const STATUS_SENTINEL: &str = "0";

/// Lightweight health and restart view of a single pod
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodHealthSummary {
    /// Container status name of the first container
    pub app_name: String,
    pub image: String,
    pub host_ip: String,
    pub pod_ip: String,
    /// Readiness of the first container
    pub ready: bool,
    pub restart_count: i32,
    /// Namespace the pod was listed from
    pub resource_name: String,
    pub cluster_name: String,
    /// Creation time, minute precision
    pub create_time: String,
    /// Pod name
    pub container_name: String,
}

/// Resource, environment and storage view of a single pod
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodResourceSummary {
    pub app_name: String,
    pub service_name: String,
    pub image: String,
    pub host_ip: String,
    pub pod_ip: String,
    pub ready: bool,
    pub restart_count: i32,
    pub resource_name: String,
    pub cluster_name: String,
    /// Creation time, second precision
    pub create_time: String,
    pub container_name: String,
    pub waiting_message: String,
    pub waiting_reason: String,
    pub terminated_message: String,
    pub terminated_reason: String,
    /// CPU limit in whole cores
    pub cpu: i64,
    /// Memory limit in MiB
    pub memory: i64,
    /// `NAME=VALUE\n` entries joined by a single space
    pub env: String,
    /// JSON-encoded list of [`MountEntry`]
    pub storage_data: String,
    /// Pod phase with quote characters stripped
    pub phase: String,
}

/// One container mount point and the host path backing it, if any
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MountEntry {
    /// Owning container, set only when resolving across all containers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    pub volume: String,
    pub container_path: String,
    pub host_path: String,
}

/// Which containers of a pod feed mounts, limits and environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerPolicy {
    /// Only the first declared container
    #[default]
    FirstContainer,
    /// Every declared container, in declaration order
    AllContainers,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_entry_json_shape() {
        let entry = MountEntry {
            container: None,
            volume: "data".to_string(),
            container_path: "/var/data".to_string(),
            host_path: "/host/data".to_string(),
        };

        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(
            json,
            r#"{"volume":"data","containerPath":"/var/data","hostPath":"/host/data"}"#
        );
    }

    #[test]
    fn test_mount_entry_tagged_with_container() {
        let entry = MountEntry {
            container: Some("sidecar".to_string()),
            volume: "logs".to_string(),
            container_path: "/logs".to_string(),
            host_path: String::new(),
        };

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["container"], "sidecar");
        assert_eq!(value["hostPath"], "");
    }

    #[test]
    fn test_resource_summary_is_flat() {
        let summary = PodResourceSummary {
            storage_data: "[]".to_string(),
            ..Default::default()
        };

        let value = serde_json::to_value(&summary).unwrap();
        assert!(value["storageData"].is_string());
        assert!(value.get("waitingMessage").is_some());
        assert!(value.get("terminatedReason").is_some());
    }

    #[test]
    fn test_container_policy_deserialize() {
        let policy: ContainerPolicy = serde_json::from_str(r#""all_containers""#).unwrap();
        assert_eq!(policy, ContainerPolicy::AllContainers);
        assert_eq!(ContainerPolicy::default(), ContainerPolicy::FirstContainer);
    }
}
