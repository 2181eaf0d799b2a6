//! Podview CLI
//!
//! A command-line tool for printing pod health and resource snapshots
//! of a Kubernetes namespace and deleting individual pods.

mod commands;
mod config;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::{pods, summaries};
use podview_lib::{
    models::ContainerPolicy,
    source::{connect, FailOpen, KubeRecordSource, LabelSelector, RecordSource},
    PodSummaryBuilder, SnapshotConfig, SnapshotMetrics, StructuredLogger,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Namespace used when neither the command line nor the config file names one
const FALLBACK_NAMESPACE: &str = "default";

/// Podview CLI
#[derive(Parser)]
#[command(name = "podview")]
#[command(author, version, about = "Pod health and resource snapshots for Kubernetes", long_about = None)]
pub struct Cli {
    /// Path to kubeconfig file (uses in-cluster or default config if not specified)
    #[arg(long, env = "KUBECONFIG")]
    pub kubeconfig: Option<PathBuf>,

    /// Output format (defaults to the config file setting, then table)
    #[arg(long, short)]
    pub format: Option<output::OutputFormat>,

    /// Report failed list/count queries as empty results instead of errors
    #[arg(long)]
    pub fail_open: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,

    /// Print Prometheus metrics after the command completes
    #[arg(long)]
    pub metrics: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show readiness, restarts and placement of every pod
    Health {
        /// Namespace to query
        #[arg(long, short)]
        namespace: Option<String>,

        /// Only pods of this service
        #[arg(long, short)]
        service: Option<String>,

        /// Only pods matching a `key=value` label selector
        #[arg(long, short = 'l', conflicts_with = "service")]
        selector: Option<LabelSelector>,
    },

    /// Show limits, status reasons, environment and mounts of started pods
    Resources {
        /// Namespace to query
        #[arg(long, short)]
        namespace: Option<String>,

        /// Only pods of this service
        #[arg(long, short)]
        service: Option<String>,

        /// Only pods matching a `key=value` label selector
        #[arg(long, short = 'l', conflicts_with = "service")]
        selector: Option<LabelSelector>,

        /// Include every container instead of only the first
        #[arg(long)]
        all_containers: bool,
    },

    /// Count pods in a namespace, optionally on a single host
    Count {
        /// Namespace to query
        #[arg(long, short)]
        namespace: Option<String>,

        /// Host IP to count pods on
        #[arg(long)]
        host: Option<String>,
    },

    /// Delete a pod
    Delete {
        /// Pod name
        name: String,

        /// Namespace of the pod
        #[arg(long, short)]
        namespace: Option<String>,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let file_config = config::Config::load()?;
    let format = cli
        .format
        .or_else(|| file_config.output_format())
        .unwrap_or_default();
    let namespace_or_default = |namespace: Option<String>| {
        namespace
            .or_else(|| file_config.default_namespace.clone())
            .unwrap_or_else(|| FALLBACK_NAMESPACE.to_string())
    };

    let mut snapshot_config = SnapshotConfig::load().context("Failed to load snapshot config")?;
    if let Commands::Resources {
        all_containers: true,
        ..
    } = cli.command
    {
        snapshot_config = snapshot_config.with_container_policy(ContainerPolicy::AllContainers);
    }

    let client = connect(cli.kubeconfig.clone()).await?;
    let kube_source = KubeRecordSource::new(client);
    let source: Arc<dyn RecordSource> = if cli.fail_open {
        let logger = StructuredLogger::new(snapshot_config.cluster_name.clone());
        Arc::new(FailOpen::new(kube_source, logger))
    } else {
        Arc::new(kube_source)
    };
    let builder = PodSummaryBuilder::new(source, snapshot_config);

    match cli.command {
        Commands::Health {
            namespace,
            service,
            selector,
        } => {
            let namespace = namespace_or_default(namespace);
            let filter = summaries::PodFilter::new(service, selector);
            summaries::show_health(&builder, &namespace, &filter, format).await?;
        }
        Commands::Resources {
            namespace,
            service,
            selector,
            ..
        } => {
            let namespace = namespace_or_default(namespace);
            let filter = summaries::PodFilter::new(service, selector);
            summaries::show_resources(&builder, &namespace, &filter, format).await?;
        }
        Commands::Count { namespace, host } => {
            let namespace = namespace_or_default(namespace);
            pods::show_count(&builder, &namespace, host.as_deref(), format).await?;
        }
        Commands::Delete { name, namespace } => {
            let namespace = namespace_or_default(namespace);
            pods::delete_pod(&builder, &namespace, &name, format).await?;
        }
    }

    if cli.metrics {
        print!("{}", SnapshotMetrics::render());
    }

    Ok(())
}
