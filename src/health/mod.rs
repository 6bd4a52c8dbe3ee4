//! Minimal health check runner producing the results consumed by the report formatter.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use futures::future::{BoxFuture, join_all};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use utoipa::ToSchema;

/// Outcome of a health check, ordered from worst to best.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum HealthStatus {
    /// The component is not operational.
    Unhealthy = 0,
    /// The component works with reduced capability.
    Degraded = 1,
    /// The component is fully operational.
    Healthy = 2,
}

impl HealthStatus {
    /// Numeric representation used when enums are written as numbers.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// PascalCase variant name.
    pub fn name(self) -> &'static str {
        match self {
            HealthStatus::Unhealthy => "Unhealthy",
            HealthStatus::Degraded => "Degraded",
            HealthStatus::Healthy => "Healthy",
        }
    }
}

/// Result returned by a single health check.
#[derive(Debug)]
pub struct HealthCheckResult {
    /// Outcome of the check.
    pub status: HealthStatus,
    /// Human readable description of the outcome.
    pub description: Option<String>,
    /// Error raised by the check, if any.
    pub error: Option<anyhow::Error>,
    /// Diagnostic values.
    pub data: IndexMap<String, Value>,
}

impl HealthCheckResult {
    fn with_status(status: HealthStatus) -> Self {
        Self {
            status,
            description: None,
            error: None,
            data: IndexMap::new(),
        }
    }

    /// A healthy result.
    pub fn healthy() -> Self {
        Self::with_status(HealthStatus::Healthy)
    }

    /// A degraded result.
    pub fn degraded() -> Self {
        Self::with_status(HealthStatus::Degraded)
    }

    /// An unhealthy result.
    pub fn unhealthy() -> Self {
        Self::with_status(HealthStatus::Unhealthy)
    }

    /// Set the human readable description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach the error that caused a non-healthy outcome.
    pub fn with_error(mut self, error: impl Into<anyhow::Error>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Attach a diagnostic key/value pair.
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

/// A named probe executed on every health request.
pub trait HealthCheck: Send + Sync {
    /// Run the probe. An `Err` marks the check with its registration's failure status.
    fn check_health(&self) -> BoxFuture<'_, anyhow::Result<HealthCheckResult>>;
}

/// Adapter running a synchronous closure as a [`HealthCheck`].
pub struct FnHealthCheck<F>(F);

impl<F> HealthCheck for FnHealthCheck<F>
where
    F: Fn() -> anyhow::Result<HealthCheckResult> + Send + Sync,
{
    fn check_health(&self) -> BoxFuture<'_, anyhow::Result<HealthCheckResult>> {
        Box::pin(futures::future::ready((self.0)()))
    }
}

/// Result of a single check inside a [`HealthReport`].
#[derive(Debug)]
pub struct HealthReportEntry {
    /// Outcome of the check.
    pub status: HealthStatus,
    /// Human readable description of the outcome.
    pub description: Option<String>,
    /// Time taken to run the check.
    pub duration: Duration,
    /// Error raised by the check, if any.
    pub error: Option<anyhow::Error>,
    /// Diagnostic values, in insertion order.
    pub data: IndexMap<String, Value>,
}

/// Aggregated outcome of every registered check, in registration order.
#[derive(Debug)]
pub struct HealthReport {
    /// Results keyed by check name, in registration order.
    pub entries: IndexMap<String, HealthReportEntry>,
    /// Worst status of any entry.
    pub status: HealthStatus,
    /// Time taken to run every check.
    pub total_duration: Duration,
}

impl HealthReport {
    /// Build a report whose status is the worst entry status (`Healthy` when empty).
    pub fn new(entries: IndexMap<String, HealthReportEntry>, total_duration: Duration) -> Self {
        let status = entries
            .values()
            .map(|entry| entry.status)
            .min()
            .unwrap_or(HealthStatus::Healthy);
        Self {
            entries,
            status,
            total_duration,
        }
    }
}

/// A check together with its name and the status reported when it fails.
#[derive(Clone)]
pub struct HealthCheckRegistration {
    name: String,
    check: Arc<dyn HealthCheck>,
    failure_status: HealthStatus,
}

impl HealthCheckRegistration {
    /// Register `check` under `name`; errors are reported as `Unhealthy`.
    pub fn new(name: impl Into<String>, check: impl HealthCheck + 'static) -> Self {
        Self {
            name: name.into(),
            check: Arc::new(check),
            failure_status: HealthStatus::Unhealthy,
        }
    }

    /// Register a synchronous closure under `name`.
    pub fn from_fn<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn() -> anyhow::Result<HealthCheckResult> + Send + Sync + 'static,
    {
        Self::new(name, FnHealthCheck(check))
    }

    /// Override the status reported when the check returns an error.
    pub fn with_failure_status(mut self, status: HealthStatus) -> Self {
        self.failure_status = status;
        self
    }

    /// Name of the check, unique within a report.
    pub fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self) -> HealthReportEntry {
        let started = Instant::now();
        let outcome = self.check.check_health().await;
        let duration = started.elapsed();
        match outcome {
            Ok(result) => HealthReportEntry {
                status: result.status,
                description: result.description,
                duration,
                error: result.error,
                data: result.data,
            },
            Err(err) => {
                warn!(check = %self.name, error = %err, "health check failed");
                HealthReportEntry {
                    status: self.failure_status,
                    description: Some(err.to_string()),
                    duration,
                    error: Some(err),
                    data: IndexMap::new(),
                }
            }
        }
    }
}

/// Runs the registered checks and aggregates them into a [`HealthReport`].
#[derive(Clone, Default)]
pub struct HealthCheckService {
    registrations: Vec<HealthCheckRegistration>,
}

impl HealthCheckService {
    /// Service without any checks; it always reports `Healthy`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a check under `name`.
    pub fn add_check(self, name: impl Into<String>, check: impl HealthCheck + 'static) -> Self {
        self.add_registration(HealthCheckRegistration::new(name, check))
    }

    /// Add a synchronous closure check under `name`.
    pub fn add_check_fn<F>(self, name: impl Into<String>, check: F) -> Self
    where
        F: Fn() -> anyhow::Result<HealthCheckResult> + Send + Sync + 'static,
    {
        self.add_registration(HealthCheckRegistration::from_fn(name, check))
    }

    /// Add a prepared registration. A later registration replaces one with the same name.
    pub fn add_registration(mut self, registration: HealthCheckRegistration) -> Self {
        self.registrations
            .retain(|existing| existing.name != registration.name);
        self.registrations.push(registration);
        self
    }

    /// Run every check concurrently and wait for all of them.
    pub async fn check_health(&self) -> HealthReport {
        let started = Instant::now();
        let results = join_all(self.registrations.iter().map(|registration| async move {
            (registration.name.clone(), registration.run().await)
        }))
        .await;
        HealthReport::new(results.into_iter().collect(), started.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(status: HealthStatus) -> HealthReportEntry {
        HealthReportEntry {
            status,
            description: None,
            duration: Duration::ZERO,
            error: None,
            data: IndexMap::new(),
        }
    }

    #[test]
    fn aggregate_status_is_worst_entry() {
        let mut entries = IndexMap::new();
        entries.insert("a".to_string(), entry(HealthStatus::Healthy));
        entries.insert("b".to_string(), entry(HealthStatus::Degraded));
        assert_eq!(
            HealthReport::new(entries, Duration::ZERO).status,
            HealthStatus::Degraded
        );

        let mut entries = IndexMap::new();
        entries.insert("a".to_string(), entry(HealthStatus::Unhealthy));
        entries.insert("b".to_string(), entry(HealthStatus::Degraded));
        assert_eq!(
            HealthReport::new(entries, Duration::ZERO).status,
            HealthStatus::Unhealthy
        );
    }

    #[test]
    fn empty_report_is_healthy() {
        let report = HealthReport::new(IndexMap::new(), Duration::ZERO);
        assert_eq!(report.status, HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn service_keeps_registration_order() {
        let service = HealthCheckService::new()
            .add_check_fn("first", || Ok(HealthCheckResult::healthy()))
            .add_check_fn("second", || Ok(HealthCheckResult::degraded()))
            .add_check_fn("third", || Ok(HealthCheckResult::healthy()));

        let report = service.check_health().await;

        let names: Vec<_> = report.entries.keys().map(String::as_str).collect();
        assert_eq!(names, ["first", "second", "third"]);
        assert_eq!(report.status, HealthStatus::Degraded);
    }

    #[tokio::test]
    async fn failing_check_uses_failure_status_and_keeps_error() {
        let service = HealthCheckService::new().add_registration(
            HealthCheckRegistration::from_fn("db", || Err(anyhow::anyhow!("connection refused")))
                .with_failure_status(HealthStatus::Degraded),
        );

        let report = service.check_health().await;

        let entry = &report.entries["db"];
        assert_eq!(entry.status, HealthStatus::Degraded);
        assert_eq!(
            entry.error.as_ref().map(ToString::to_string).as_deref(),
            Some("connection refused")
        );
    }

    #[test]
    fn status_codes_follow_declaration_order() {
        assert_eq!(HealthStatus::Unhealthy.code(), 0);
        assert_eq!(HealthStatus::Degraded.code(), 1);
        assert_eq!(HealthStatus::Healthy.code(), 2);
    }
}
