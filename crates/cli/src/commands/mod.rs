//! CLI command implementations

pub mod pods;
pub mod summaries;
