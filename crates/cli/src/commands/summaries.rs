//! Health and resource summary commands

use anyhow::{Context, Result};
use podview_lib::{
    LabelSelector, MountEntry, PodHealthSummary, PodResourceSummary, PodSummaryBuilder,
};
use tabled::Tabled;

use crate::output::{
    color_phase, color_ready, color_restarts, format_cpu, format_env, format_mib, format_reason,
    print_rows, OutputFormat,
};

/// Row for the health table
#[derive(Tabled)]
struct HealthRow {
    #[tabled(rename = "Pod")]
    pod: String,
    #[tabled(rename = "App")]
    app: String,
    #[tabled(rename = "Ready")]
    ready: String,
    #[tabled(rename = "Restarts")]
    restarts: String,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Pod IP")]
    pod_ip: String,
    #[tabled(rename = "Image")]
    image: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&PodHealthSummary> for HealthRow {
    fn from(s: &PodHealthSummary) -> Self {
        Self {
            pod: s.container_name.clone(),
            app: s.app_name.clone(),
            ready: color_ready(s.ready),
            restarts: color_restarts(s.restart_count),
            host: s.host_ip.clone(),
            pod_ip: s.pod_ip.clone(),
            image: s.image.clone(),
            created: s.create_time.clone(),
        }
    }
}

/// Row for the resource table
#[derive(Tabled)]
struct ResourceRow {
    #[tabled(rename = "Pod")]
    pod: String,
    #[tabled(rename = "Phase")]
    phase: String,
    #[tabled(rename = "CPU")]
    cpu: String,
    #[tabled(rename = "Memory")]
    memory: String,
    #[tabled(rename = "Waiting")]
    waiting: String,
    #[tabled(rename = "Terminated")]
    terminated: String,
    #[tabled(rename = "Env")]
    env: String,
    #[tabled(rename = "Mounts")]
    mounts: String,
}

impl From<&PodResourceSummary> for ResourceRow {
    fn from(s: &PodResourceSummary) -> Self {
        Self {
            pod: s.container_name.clone(),
            phase: color_phase(&s.phase),
            cpu: format_cpu(s.cpu),
            memory: format_mib(s.memory),
            waiting: format_reason(&s.waiting_reason),
            terminated: format_reason(&s.terminated_reason),
            env: format_env(&s.env),
            mounts: format_mounts(&s.storage_data),
        }
    }
}

/// Render the serialized mount blob as `containerPath <- hostPath` lines
fn format_mounts(storage_data: &str) -> String {
    let entries: Vec<MountEntry> = serde_json::from_str(storage_data).unwrap_or_default();
    entries
        .iter()
        .map(|m| {
            let host = if m.host_path.is_empty() {
                m.volume.as_str()
            } else {
                m.host_path.as_str()
            };
            match &m.container {
                Some(container) => format!("{}:{} <- {}", container, m.container_path, host),
                None => format!("{} <- {}", m.container_path, host),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Which pods of a namespace a summary command covers
#[derive(Debug, PartialEq, Eq)]
pub enum PodFilter {
    All,
    Service(String),
    Selector(LabelSelector),
}

impl PodFilter {
    /// A service name takes precedence; clap already rejects both at once
    pub fn new(service: Option<String>, selector: Option<LabelSelector>) -> Self {
        match (service, selector) {
            (Some(service), _) => Self::Service(service),
            (None, Some(selector)) => Self::Selector(selector),
            (None, None) => Self::All,
        }
    }
}

/// Show health summaries for a namespace
pub async fn show_health(
    builder: &PodSummaryBuilder,
    namespace: &str,
    filter: &PodFilter,
    format: OutputFormat,
) -> Result<()> {
    let summaries = match filter {
        PodFilter::All => builder.build_health_summaries(namespace).await,
        PodFilter::Service(service) => {
            builder
                .build_service_health_summaries(namespace, service)
                .await
        }
        PodFilter::Selector(selector) => {
            builder
                .build_selected_health_summaries(namespace, selector)
                .await
        }
    }
    .with_context(|| format!("Failed to list pods in namespace {}", namespace))?;

    let rows: Vec<HealthRow> = summaries.iter().map(HealthRow::from).collect();
    print_rows(&summaries, rows, format);
    Ok(())
}

/// Show resource summaries for a namespace
pub async fn show_resources(
    builder: &PodSummaryBuilder,
    namespace: &str,
    filter: &PodFilter,
    format: OutputFormat,
) -> Result<()> {
    let summaries = match filter {
        PodFilter::All => builder.build_resource_summaries(namespace).await,
        PodFilter::Service(service) => {
            builder
                .build_service_resource_summaries(namespace, service)
                .await
        }
        PodFilter::Selector(selector) => {
            builder
                .build_selected_resource_summaries(namespace, selector)
                .await
        }
    }
    .with_context(|| format!("Failed to list pods in namespace {}", namespace))?;

    let rows: Vec<ResourceRow> = summaries.iter().map(ResourceRow::from).collect();
    print_rows(&summaries, rows, format);
    Ok(())
}
