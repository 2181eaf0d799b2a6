//! Pod count and delete commands

use anyhow::{Context, Result};
use colored::Colorize;
use podview_lib::PodSummaryBuilder;
use serde::Serialize;

use crate::output::{print_success, OutputFormat};

#[derive(Serialize)]
struct CountResult<'a> {
    namespace: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    host: Option<&'a str>,
    count: usize,
}

/// Show the number of pods in a namespace, or on one host
pub async fn show_count(
    builder: &PodSummaryBuilder,
    namespace: &str,
    host: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let count = match host {
        Some(host) => builder.count_pods_on_host(namespace, host).await,
        None => builder.count_pods(namespace).await,
    }
    .with_context(|| format!("Failed to count pods in namespace {}", namespace))?;

    match format {
        OutputFormat::Json => {
            let result = CountResult {
                namespace,
                host,
                count,
            };
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Table => match host {
            Some(host) => println!(
                "{} pods on {} in {}",
                count.to_string().bold(),
                host.cyan(),
                namespace.cyan()
            ),
            None => println!("{} pods in {}", count.to_string().bold(), namespace.cyan()),
        },
    }

    Ok(())
}

/// Delete a pod; any failure is returned to the caller
pub async fn delete_pod(
    builder: &PodSummaryBuilder,
    namespace: &str,
    name: &str,
    format: OutputFormat,
) -> Result<()> {
    builder
        .delete_pod(namespace, name)
        .await
        .with_context(|| format!("Failed to delete pod {}/{}", namespace, name))?;

    match format {
        OutputFormat::Json => {
            let result = serde_json::json!({ "namespace": namespace, "pod": name, "deleted": true });
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Table => print_success(&format!("Deleted pod {}/{}", namespace, name)),
    }

    Ok(())
}
