//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print rows as a table, or the underlying items as JSON
pub fn print_rows<T: Serialize, R: Tabled>(items: &[T], rows: Vec<R>, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("{}", "No pods found".yellow());
                return;
            }
            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{}", table);
        }
        OutputFormat::Json => match serde_json::to_string_pretty(items) {
            Ok(json) => println!("{}", json),
            Err(e) => print_error(&format!("Failed to encode output: {}", e)),
        },
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Format MiB as human-readable string
pub fn format_mib(mib: i64) -> String {
    match mib {
        0 => "-".to_string(),
        m if m >= 1024 && m % 1024 == 0 => format!("{}Gi", m / 1024),
        m => format!("{}Mi", m),
    }
}

/// Format whole cores, with a dash for "no limit"
pub fn format_cpu(cores: i64) -> String {
    if cores == 0 {
        "-".to_string()
    } else {
        cores.to_string()
    }
}

/// Render a sentinel message/reason field for display
pub fn format_reason(value: &str) -> String {
    match value {
        podview_lib::STATUS_SENTINEL | "" => "-".to_string(),
        v => v.to_string(),
    }
}

/// Color readiness
pub fn color_ready(ready: bool) -> String {
    if ready {
        "true".green().to_string()
    } else {
        "false".red().to_string()
    }
}

/// Color pod phase
pub fn color_phase(phase: &str) -> String {
    match phase.to_lowercase().as_str() {
        "running" | "succeeded" => phase.green().to_string(),
        "pending" => phase.yellow().to_string(),
        "failed" | "unknown" => phase.red().to_string(),
        _ => phase.to_string(),
    }
}

/// Color restart count, highlighting crash-looping pods
pub fn color_restarts(count: i32) -> String {
    match count {
        0 => count.to_string(),
        1..=4 => count.to_string().yellow().to_string(),
        _ => count.to_string().red().to_string(),
    }
}

/// Collapse the `NAME=VALUE\n` environment string onto one line
pub fn format_env(env: &str) -> String {
    env.split('\n')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_mib() {
        assert_eq!(format_mib(0), "-");
        assert_eq!(format_mib(512), "512Mi");
        assert_eq!(format_mib(2048), "2Gi");
        assert_eq!(format_mib(1280), "1280Mi");
    }

    #[test]
    fn test_format_cpu() {
        assert_eq!(format_cpu(0), "-");
        assert_eq!(format_cpu(2), "2");
    }

    #[test]
    fn test_format_reason_hides_sentinel() {
        assert_eq!(format_reason("0"), "-");
        assert_eq!(format_reason(""), "-");
        assert_eq!(format_reason("CrashLoopBackOff"), "CrashLoopBackOff");
    }

    #[test]
    fn test_format_env() {
        assert_eq!(format_env("A=1\n B=2\n"), "A=1, B=2");
        assert_eq!(format_env(""), "");
    }
}
