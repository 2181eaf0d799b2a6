//! Mount resolution
//!
//! Maps each container mount point to the host path backing it. Only
//! host-path volumes contribute a host path; config, secret, emptyDir and
//! other volume types resolve to an empty host path.

use crate::models::{ContainerPolicy, MountEntry};
use k8s_openapi::api::core::v1::{Container, Pod};
use std::collections::HashMap;
use tracing::warn;

/// Resolve the mount entries of a pod under the given container policy
///
/// Entries keep the declaration order of the containers' mount points.
pub fn resolve_mounts(pod: &Pod, policy: ContainerPolicy) -> Vec<MountEntry> {
    let Some(spec) = pod.spec.as_ref() else {
        return Vec::new();
    };

    let host_paths: HashMap<&str, &str> = spec
        .volumes
        .iter()
        .flatten()
        .filter_map(|volume| {
            volume
                .host_path
                .as_ref()
                .map(|hp| (volume.name.as_str(), hp.path.as_str()))
        })
        .collect();

    let containers: &[Container] = match policy {
        ContainerPolicy::FirstContainer => spec.containers.get(..1).unwrap_or(&[]),
        ContainerPolicy::AllContainers => &spec.containers,
    };

    containers
        .iter()
        .flat_map(|container| {
            let owner = match policy {
                ContainerPolicy::FirstContainer => None,
                ContainerPolicy::AllContainers => Some(container.name.clone()),
            };
            let host_paths = &host_paths;
            container
                .volume_mounts
                .iter()
                .flatten()
                .map(move |mount| MountEntry {
                    container: owner.clone(),
                    volume: mount.name.clone(),
                    container_path: mount.mount_path.clone(),
                    host_path: host_paths
                        .get(mount.name.as_str())
                        .map(|p| p.to_string())
                        .unwrap_or_default(),
                })
        })
        .collect()
}

/// Serialize mount entries to JSON text; an empty string on failure
pub fn mounts_to_json(entries: &[MountEntry]) -> String {
    serde_json::to_string(entries).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to serialize mount entries");
        String::new()
    })
}

/// Resolve and serialize in one step
pub fn storage_data(pod: &Pod, policy: ContainerPolicy) -> String {
    mounts_to_json(&resolve_mounts(pod, policy))
}
