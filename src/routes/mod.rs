use std::sync::Arc;

use axum::Router;
use utoipa::{OpenApi, openapi::Info};

use crate::{
    config::AppConfig,
    error::DocsError,
    health::HealthCheckService,
    openapi::{
        EndpointDataSource, EndpointRouteBuilder, SwaggerGen, SwaggerGenerator,
        ui::DEFAULT_DOCUMENT_NAME,
    },
    services::{documentation::ApiDoc, report_formatter::HealthCheckReportFormatter},
    state::AppState,
};

/// Generated documents and Swagger UI.
pub mod docs;
/// Sample forecast route.
pub mod forecast;
/// Health report endpoints.
pub mod health;

use health::HealthCheckOptions;

/// Compose the mapped endpoints, the sample routes and the documentation routes.
///
/// `map_endpoints` receives the endpoint builder and the options health endpoints should use.
pub fn app<F>(
    config: &AppConfig,
    service: HealthCheckService,
    map_endpoints: F,
) -> Result<Router<()>, DocsError>
where
    F: FnOnce(&mut EndpointRouteBuilder, &HealthCheckOptions),
{
    let options = HealthCheckOptions {
        service: Arc::new(service),
        formatter: Arc::new(HealthCheckReportFormatter::new(config.report_format)),
        json_options: Arc::new(config.json.clone()),
    };

    let mut endpoints = EndpointRouteBuilder::new();
    forecast::map(&mut endpoints);
    map_endpoints(&mut endpoints, &options);
    let (router, data_source) = endpoints.into_parts();

    let state = AppState::new(generator(config, Arc::new(data_source))?);
    let docs_router = docs::router(state.clone());

    Ok(router.merge(docs_router.with_state(state)))
}

/// Generator for the default document plus, when configured, the dedicated health document.
pub fn generator(
    config: &AppConfig,
    endpoints: Arc<EndpointDataSource>,
) -> Result<SwaggerGenerator, DocsError> {
    SwaggerGen::new(config.application_name.clone())
        .swagger_doc(
            DEFAULT_DOCUMENT_NAME,
            Info::new(config.application_name.clone(), DEFAULT_DOCUMENT_NAME.to_string()),
        )
        .add_documented_routes(ApiDoc::openapi())
        .add_health_checks(endpoints, Arc::new(config.api_explorer.clone()))
        .build()
}
