//! Wire representation of a detailed health report.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use super::format_duration;
use crate::health::{HealthReport, HealthReportEntry, HealthStatus};

/// Detailed health report written by a health check endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckReport {
    /// The endpoint path that produced this report
    #[schema(example = "/healthz")]
    pub endpoint: String,
    /// The worst status reported by any check
    pub status: HealthStatus,
    /// Time taken to run every check
    #[schema(example = "00:00:00.0012345")]
    pub duration: String,
    /// Individual check results, in evaluation order
    pub checks: Vec<HealthCheckEntry>,
}

/// Result of a single named check inside a [`HealthCheckReport`].
///
/// Absent values serialize as `null`; the report formatter decides whether they are written.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckEntry {
    /// Name of the check
    pub name: String,
    /// Human readable description of the outcome
    pub description: Option<String>,
    /// Time taken to run the check
    #[schema(example = "00:00:00.0001234")]
    pub duration: String,
    /// Outcome of the check
    pub status: HealthStatus,
    /// Message of the error raised by the check, if any
    pub error: Option<String>,
    /// Diagnostic values reported by the check; absent when there are none
    #[schema(value_type = Option<Object>)]
    pub data: Option<IndexMap<String, Value>>,
}

impl HealthCheckReport {
    /// Map a runner report to the wire shape for the request made to `endpoint`.
    pub fn from_health_report(endpoint: impl Into<String>, report: &HealthReport) -> Self {
        Self {
            endpoint: endpoint.into(),
            status: report.status,
            duration: format_duration(report.total_duration),
            checks: report
                .entries
                .iter()
                .map(|(name, entry)| HealthCheckEntry::from_report_entry(name, entry))
                .collect(),
        }
    }
}

impl HealthCheckEntry {
    /// Only the top-level error message is kept; causes and backtraces stay internal.
    pub fn from_report_entry(name: &str, entry: &HealthReportEntry) -> Self {
        Self {
            name: name.to_string(),
            description: entry.description.clone(),
            duration: format_duration(entry.duration),
            status: entry.status,
            error: entry.error.as_ref().map(ToString::to_string),
            data: (!entry.data.is_empty()).then(|| entry.data.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use anyhow::Context;
    use serde_json::json;

    use super::*;

    fn entry(status: HealthStatus) -> HealthReportEntry {
        HealthReportEntry {
            status,
            description: None,
            duration: Duration::from_millis(2),
            error: None,
            data: IndexMap::new(),
        }
    }

    #[test]
    fn keeps_entry_order_and_copies_fields() {
        let mut entries = IndexMap::new();
        entries.insert("zeta".to_string(), entry(HealthStatus::Healthy));
        entries.insert("alpha".to_string(), entry(HealthStatus::Degraded));
        let report = HealthReport::new(entries, Duration::from_millis(5));

        let dto = HealthCheckReport::from_health_report("/healthz", &report);

        assert_eq!(dto.endpoint, "/healthz");
        assert_eq!(dto.status, HealthStatus::Degraded);
        assert_eq!(dto.duration, "00:00:00.0050000");
        let names: Vec<_> = dto.checks.iter().map(|check| check.name.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha"]);
        assert_eq!(dto.checks[1].status, HealthStatus::Degraded);
        assert_eq!(dto.checks[0].duration, "00:00:00.0020000");
    }

    #[test]
    fn empty_data_is_absent() {
        let dto = HealthCheckEntry::from_report_entry("sample", &entry(HealthStatus::Healthy));
        assert!(dto.data.is_none());

        let value = serde_json::to_value(&dto).unwrap();
        assert_eq!(value["data"], Value::Null);
        assert_eq!(value["error"], Value::Null);
        assert_eq!(value["description"], Value::Null);
    }

    #[test]
    fn data_is_copied_when_present() {
        let mut source = entry(HealthStatus::Healthy);
        source.data.insert("Key1".into(), json!("Value1"));
        source.data.insert("Key2".into(), json!(2));

        let value = serde_json::to_value(HealthCheckEntry::from_report_entry("s", &source)).unwrap();

        assert_eq!(value["data"], json!({ "Key1": "Value1", "Key2": 2 }));
    }

    #[test]
    fn error_keeps_only_the_outer_message() {
        let mut source = entry(HealthStatus::Unhealthy);
        let failure: anyhow::Result<()> = Err(anyhow::anyhow!("socket closed"));
        source.error = failure.context("boom").err();

        let dto = HealthCheckEntry::from_report_entry("s", &source);

        assert_eq!(dto.error.as_deref(), Some("boom"));
    }
}
