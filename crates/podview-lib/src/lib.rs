//! Pod snapshot library
//!
//! This crate turns live pod records into flat, always-populated summaries:
//! - Container status classification into message/reason fields
//! - Resource limit normalization (whole cores, MiB)
//! - Host-path mount resolution
//! - Per-host pod density
//! - Record sources with strict and fail-open error policies

pub mod builder;
pub mod classify;
pub mod config;
pub mod density;
pub mod error;
pub mod models;
pub mod mounts;
pub mod observability;
pub mod quantity;
pub mod source;
pub mod timefmt;

pub use builder::PodSummaryBuilder;
pub use config::SnapshotConfig;
pub use error::{ConfigError, QuantityError, SourceError};
pub use models::*;
pub use observability::{SnapshotMetrics, StructuredLogger};
pub use source::{FailOpen, KubeRecordSource, LabelSelector, RecordSource};
