//! Kubernetes-backed record source

use super::{LabelSelector, RecordSource};
use crate::error::SourceError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use kube::api::{DeleteParams, ListParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client, Config};
use std::path::PathBuf;
use tracing::{debug, info};

/// Build a client from an explicit kubeconfig, or the default inference chain
/// (in-cluster service account, then `~/.kube/config`)
pub async fn connect(kubeconfig: Option<PathBuf>) -> Result<Client> {
    match kubeconfig {
        Some(path) => {
            let kubeconfig = Kubeconfig::read_from(&path)
                .with_context(|| format!("Failed to read kubeconfig {}", path.display()))?;
            let config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
                .await
                .with_context(|| {
                    format!("Failed to build client config from {}", path.display())
                })?;
            info!(kubeconfig = %path.display(), "Using custom kubeconfig");
            Client::try_from(config).context("Failed to create Kubernetes client")
        }
        None => Client::try_default()
            .await
            .context("Failed to create Kubernetes client"),
    }
}

/// Record source over the Kubernetes API
#[derive(Clone)]
pub struct KubeRecordSource {
    client: Client,
}

impl KubeRecordSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn pods(&self, namespace: &str) -> Api<Pod> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait]
impl RecordSource for KubeRecordSource {
    async fn list_pods(
        &self,
        namespace: &str,
        selector: Option<&LabelSelector>,
    ) -> Result<Vec<Pod>, SourceError> {
        let mut params = ListParams::default();
        if let Some(selector) = selector {
            params = params.labels(&selector.to_string());
        }

        let pods = self.pods(namespace).list(&params).await?;
        debug!(namespace = %namespace, count = pods.items.len(), "Listed pods from API server");
        Ok(pods.items)
    }

    async fn delete_pod(&self, namespace: &str, name: &str) -> Result<(), SourceError> {
        self.pods(namespace)
            .delete(name, &DeleteParams::default())
            .await?;
        Ok(())
    }
}
