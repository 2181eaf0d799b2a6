//! Per-host pod density

use k8s_openapi::api::core::v1::Pod;

/// Name substring marking infrastructure/system pods
pub const DEFAULT_INFRA_MARKER: &str = "kubernetes";

/// Count pods placed on `host_ip`, excluding pods whose name contains `infra_marker`
pub fn count_on_host(pods: &[Pod], host_ip: &str, infra_marker: &str) -> usize {
    pods.iter()
        .filter(|pod| {
            pod.status
                .as_ref()
                .and_then(|s| s.host_ip.as_deref())
                .is_some_and(|ip| ip == host_ip)
        })
        .filter(|pod| {
            !pod.metadata
                .name
                .as_deref()
                .unwrap_or_default()
                .contains(infra_marker)
        })
        .count()
}
