//! Display formatting for pod timestamps

use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;

/// Granularity of a rendered timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimePrecision {
    /// `2018-01-16 12:25`
    Minutes,
    /// `2018-01-16 12:25:07`
    Seconds,
}

/// Renders a raw pod timestamp as a display string
pub trait TimestampFormatter: Send + Sync {
    fn display(&self, timestamp: Option<&Time>, precision: TimePrecision) -> String;
}

/// Default formatter: UTC, `YYYY-MM-DD HH:MM[:SS]`, empty when absent
#[derive(Debug, Clone, Copy, Default)]
pub struct ChronoFormatter;

impl TimestampFormatter for ChronoFormatter {
    fn display(&self, timestamp: Option<&Time>, precision: TimePrecision) -> String {
        let Some(Time(ts)) = timestamp else {
            return String::new();
        };

        let pattern = match precision {
            TimePrecision::Minutes => "%Y-%m-%d %H:%M",
            TimePrecision::Seconds => "%Y-%m-%d %H:%M:%S",
        };
        ts.format(pattern).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_chrono_formatter_precisions() {
        let ts = Time(Utc.with_ymd_and_hms(2017, 12, 8, 2, 11, 54).unwrap());

        assert_eq!(
            ChronoFormatter.display(Some(&ts), TimePrecision::Minutes),
            "2017-12-08 02:11"
        );
        assert_eq!(
            ChronoFormatter.display(Some(&ts), TimePrecision::Seconds),
            "2017-12-08 02:11:54"
        );
    }

    #[test]
    fn test_missing_timestamp_is_empty() {
        assert_eq!(ChronoFormatter.display(None, TimePrecision::Seconds), "");
    }
}
