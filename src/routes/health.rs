use std::sync::Arc;

use axum::{
    extract::{OriginalUri, State},
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};

use crate::{
    error::AppError,
    health::{HealthCheckService, HealthStatus},
    openapi::{
        descriptor::JSON_MEDIA_TYPE,
        endpoints::{EndpointConventionBuilder, EndpointRouteBuilder},
    },
    services::{json_options::JsonOptionsSet, report_formatter::HealthCheckReportFormatter},
};

/// Everything a health endpoint needs to answer a request.
#[derive(Clone)]
pub struct HealthCheckOptions {
    /// Runs the registered checks.
    pub service: Arc<HealthCheckService>,
    /// Writes the report.
    pub formatter: Arc<HealthCheckReportFormatter>,
    /// Option sets the formatter selects from.
    pub json_options: Arc<JsonOptionsSet>,
}

impl<S> EndpointRouteBuilder<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Map a GET endpoint at `path` answering with the detailed health report.
    pub fn map_health_checks(
        &mut self,
        path: &str,
        options: HealthCheckOptions,
    ) -> EndpointConventionBuilder<'_> {
        self.map(path, &[Method::GET], get(health_report).with_state(options))
    }
}

/// Run every check and write the report; 200 when healthy, 503 otherwise.
async fn health_report(
    State(options): State<HealthCheckOptions>,
    OriginalUri(uri): OriginalUri,
) -> Result<Response, AppError> {
    let report = options.service.check_health().await;
    let status = if report.status == HealthStatus::Healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let mut body = Vec::new();
    options
        .formatter
        .write_detailed_report(&mut body, uri.path(), &report, &options.json_options)
        .await?;

    Ok((status, [(header::CONTENT_TYPE, JSON_MEDIA_TYPE)], body).into_response())
}
