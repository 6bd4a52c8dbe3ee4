//! Serializes health reports with the JSON option set selected for the host.

use serde::Deserialize;
use serde_json::Value;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::trace;

use crate::{
    dto::health::HealthCheckReport,
    error::DocsError,
    health::{HealthReport, HealthStatus},
    services::json_options::{JsonOptionsSet, JsonOptionsSource, JsonSerializerOptions},
};

const STATUS_PROPERTY: &str = "status";
const DATA_PROPERTY: &str = "data";

/// Options controlling [`HealthCheckReportFormatter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HealthCheckReportFormatOptions {
    /// JSON option set used to write the report.
    pub json_options_source: JsonOptionsSource,
}

/// Writes detailed health reports as JSON.
#[derive(Debug, Clone, Default)]
pub struct HealthCheckReportFormatter {
    options: HealthCheckReportFormatOptions,
}

impl HealthCheckReportFormatter {
    /// Create a formatter with the given options.
    pub fn new(options: HealthCheckReportFormatOptions) -> Self {
        Self { options }
    }

    /// Options this formatter was created with.
    pub fn options(&self) -> &HealthCheckReportFormatOptions {
        &self.options
    }

    /// Map the runner report for a request to `endpoint` onto the wire shape.
    pub fn report(&self, endpoint: &str, report: &HealthReport) -> HealthCheckReport {
        HealthCheckReport::from_health_report(endpoint, report)
    }

    /// Serialize the report with the selected JSON option set.
    pub fn render(
        &self,
        endpoint: &str,
        report: &HealthReport,
        json: &JsonOptionsSet,
    ) -> Result<Vec<u8>, DocsError> {
        let options = json.select(self.options.json_options_source);
        let value = serde_json::to_value(self.report(endpoint, report))?;
        Ok(options.to_vec(&apply_json_options(value, options))?)
    }

    /// Write the serialized report to `writer`. Errors are returned as-is, without retry.
    pub async fn write_detailed_report<W>(
        &self,
        writer: &mut W,
        endpoint: &str,
        report: &HealthReport,
        json: &JsonOptionsSet,
    ) -> Result<(), DocsError>
    where
        W: AsyncWrite + Unpin,
    {
        let body = self.render(endpoint, report, json)?;
        trace!(endpoint, bytes = body.len(), "writing health report");
        writer.write_all(&body).await?;
        writer.flush().await?;
        Ok(())
    }
}

/// Rewrite a serialized report with `options`: property names, status values and absent fields.
/// The contents of `data` pass through unchanged.
pub fn apply_json_options(value: Value, options: &JsonSerializerOptions) -> Value {
    match value {
        Value::Object(object) => Value::Object(
            object
                .into_iter()
                .filter_map(|(key, value)| {
                    let value = match key.as_str() {
                        DATA_PROPERTY => value,
                        STATUS_PROPERTY => status_value(value, options),
                        _ => apply_json_options(value, options),
                    };
                    if value.is_null() && options.ignore_null_values {
                        return None;
                    }
                    Some((options.property_name(&key), value))
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| apply_json_options(item, options))
                .collect(),
        ),
        other => other,
    }
}

fn status_value(value: Value, options: &JsonSerializerOptions) -> Value {
    match HealthStatus::deserialize(&value) {
        Ok(status) => options.status_value(status),
        Err(_) => value,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use indexmap::IndexMap;
    use serde_json::json;

    use super::*;
    use crate::{
        health::{HealthReportEntry, HealthStatus},
        services::json_options::{EnumFormat, NamingPolicy},
    };

    fn sample_report() -> HealthReport {
        let mut data = IndexMap::new();
        data.insert("queueDepth".to_string(), json!(3));
        let mut entries = IndexMap::new();
        entries.insert(
            "Sample".to_string(),
            HealthReportEntry {
                status: HealthStatus::Degraded,
                description: Some("test_description".into()),
                duration: Duration::from_millis(1),
                error: Some(anyhow::anyhow!("slow")),
                data,
            },
        );
        HealthReport::new(entries, Duration::from_millis(2))
    }

    fn pascal_numbers() -> JsonSerializerOptions {
        JsonSerializerOptions {
            property_naming: NamingPolicy::PascalCase,
            enum_format: EnumFormat::Number,
            ..JsonSerializerOptions::default()
        }
    }

    #[test]
    fn default_options_drop_absent_fields_only() {
        let dto = HealthCheckReport::from_health_report("/healthz", &sample_report());
        let mut expected = serde_json::to_value(&dto).unwrap();

        assert_eq!(
            apply_json_options(expected.clone(), &JsonSerializerOptions::default()),
            expected
        );

        expected["checks"][0]["error"] = Value::Null;
        let value = apply_json_options(expected, &JsonSerializerOptions::default());
        assert!(value["checks"][0].get("error").is_none());
        assert_eq!(value["checks"][0]["description"], "test_description");
    }

    #[test]
    fn data_contents_are_left_untouched() {
        let mut entries = IndexMap::new();
        let mut data = IndexMap::new();
        data.insert("status".to_string(), json!("Up"));
        data.insert("last_error".to_string(), Value::Null);
        entries.insert(
            "db".to_string(),
            HealthReportEntry {
                status: HealthStatus::Healthy,
                description: None,
                duration: Duration::ZERO,
                error: None,
                data,
            },
        );
        let dto = HealthCheckReport::from_health_report("/h", &HealthReport::new(entries, Duration::ZERO));

        let value = apply_json_options(serde_json::to_value(&dto).unwrap(), &pascal_numbers());

        assert_eq!(value["Checks"][0]["Status"], 2);
        assert_eq!(
            value["Checks"][0]["Data"],
            json!({ "status": "Up", "last_error": null })
        );
    }

    #[test]
    fn selected_source_changes_casing_but_not_fields() {
        let json = JsonOptionsSet {
            http: pascal_numbers(),
            controller: JsonSerializerOptions::default(),
        };
        let report = sample_report();

        let http = HealthCheckReportFormatter::new(HealthCheckReportFormatOptions {
            json_options_source: JsonOptionsSource::Http,
        });
        let controller = HealthCheckReportFormatter::default();

        let http: Value = serde_json::from_slice(&http.render("/h", &report, &json).unwrap()).unwrap();
        let controller: Value =
            serde_json::from_slice(&controller.render("/h", &report, &json).unwrap()).unwrap();

        assert_eq!(http["Status"], 1);
        assert_eq!(http["Checks"][0]["Status"], 1);
        assert_eq!(http["Checks"][0]["Error"], "slow");
        assert_eq!(http["Checks"][0]["Data"]["queueDepth"], 3);
        assert_eq!(controller["status"], "degraded");
        assert_eq!(controller["checks"][0]["data"]["queueDepth"], 3);

        let http_check = http["Checks"][0].as_object().unwrap();
        let controller_check = controller["checks"][0].as_object().unwrap();
        assert_eq!(http_check.len(), controller_check.len());
        assert_eq!(
            http.as_object().unwrap().len(),
            controller.as_object().unwrap().len()
        );
    }

    #[test]
    fn null_fields_are_written_when_not_ignored() {
        let mut entries = IndexMap::new();
        entries.insert(
            "plain".to_string(),
            HealthReportEntry {
                status: HealthStatus::Healthy,
                description: None,
                duration: Duration::ZERO,
                error: None,
                data: IndexMap::new(),
            },
        );
        let dto = HealthCheckReport::from_health_report("/h", &HealthReport::new(entries, Duration::ZERO));
        let options = JsonSerializerOptions {
            ignore_null_values: false,
            ..JsonSerializerOptions::default()
        };

        let value = apply_json_options(serde_json::to_value(&dto).unwrap(), &options);

        assert_eq!(value["checks"][0]["description"], Value::Null);
        assert_eq!(value["checks"][0]["data"], Value::Null);
        assert!(value["checks"][0].as_object().unwrap().contains_key("error"));
    }

    #[tokio::test]
    async fn writes_the_rendered_report() {
        let formatter = HealthCheckReportFormatter::default();
        let json = JsonOptionsSet::default();
        let report = sample_report();
        let mut body = Vec::new();

        formatter
            .write_detailed_report(&mut body, "/healthz", &report, &json)
            .await
            .unwrap();

        assert_eq!(body, formatter.render("/healthz", &report, &json).unwrap());
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["endpoint"], "/healthz");
    }

    #[tokio::test]
    async fn write_errors_are_propagated() {
        let formatter = HealthCheckReportFormatter::default();
        let mut writer = failing_writer::Failing;

        let result = formatter
            .write_detailed_report(&mut writer, "/healthz", &sample_report(), &JsonOptionsSet::default())
            .await;

        assert!(matches!(result, Err(DocsError::Io(_))));
    }

    mod failing_writer {
        use std::{
            io,
            pin::Pin,
            task::{Context, Poll},
        };

        use tokio::io::AsyncWrite;

        pub struct Failing;

        impl AsyncWrite for Failing {
            fn poll_write(
                self: Pin<&mut Self>,
                _cx: &mut Context<'_>,
                _buf: &[u8],
            ) -> Poll<io::Result<usize>> {
                Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "client gone")))
            }

            fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
                Poll::Ready(Ok(()))
            }

            fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
                Poll::Ready(Ok(()))
            }
        }
    }
}
