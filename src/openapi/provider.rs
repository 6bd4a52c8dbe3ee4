//! Providers turning registered endpoints and annotated routes into descriptions.

use std::sync::Arc;

use axum::http::Method;
use indexmap::IndexMap;
use tracing::debug;
use utoipa::openapi::{Components, OpenApi, PathItem, path::Operation};

use super::{
    api_description::{
        ActionDescriptor, ApiDescription, ApiDescriptionProvider, ApiDescriptionProviderContext,
        ApiResponseFormat, ApiResponseType, DocumentedAction, HealthCheckAction,
    },
    descriptor::HealthCheckDescriptionMetadata,
    endpoints::{EndpointDataSource, RouteEndpoint, RoutePattern, RoutePatternPathSegment},
};
use crate::error::DocsError;

/// Runs after every standard provider.
pub const HEALTH_CHECK_PROVIDER_ORDER: i32 = 9999;
/// Runs before the health check provider.
pub const DOCUMENTED_ROUTE_PROVIDER_ORDER: i32 = -1000;

/// Describes every endpoint carrying [`HealthCheckDescriptionMetadata`].
pub struct HealthCheckApiDescriptionProvider {
    endpoints: Arc<EndpointDataSource>,
}

impl HealthCheckApiDescriptionProvider {
    /// Provider over the endpoints of `endpoints`.
    pub fn new(endpoints: Arc<EndpointDataSource>) -> Self {
        Self { endpoints }
    }

    fn create_api_description(
        endpoint: &RouteEndpoint,
        metadata: &Arc<HealthCheckDescriptionMetadata>,
    ) -> Result<ApiDescription, DocsError> {
        let pattern = endpoint.pattern();
        if pattern.has_parameters() {
            return Err(DocsError::UnsupportedRoute {
                route: pattern.raw_text().to_string(),
            });
        }

        let supported_response_types = metadata
            .response_definitions
            .iter()
            .map(|definition| ApiResponseType {
                status_code: definition.status_code,
                response_type: definition.response_type.clone(),
                formats: definition
                    .supported_media_types
                    .iter()
                    .map(|media_type| ApiResponseFormat {
                        media_type: media_type.clone(),
                    })
                    .collect(),
            })
            .collect();

        Ok(ApiDescription {
            action_descriptor: ActionDescriptor::HealthCheck(HealthCheckAction {
                metadata: Arc::clone(metadata),
                display_name: metadata.display_name.clone(),
            }),
            group_name: metadata.group_name.clone(),
            http_method: Method::GET,
            relative_path: pattern.literal_path(),
            supported_response_types,
        })
    }
}

impl ApiDescriptionProvider for HealthCheckApiDescriptionProvider {
    fn order(&self) -> i32 {
        HEALTH_CHECK_PROVIDER_ORDER
    }

    fn on_providers_executing(
        &self,
        context: &mut ApiDescriptionProviderContext,
    ) -> Result<(), DocsError> {
        for endpoint in self.endpoints.endpoints() {
            let Some(metadata) = endpoint
                .metadata()
                .get::<Arc<HealthCheckDescriptionMetadata>>()
            else {
                continue;
            };
            let description = Self::create_api_description(endpoint, metadata)?;
            debug!(
                endpoint = %endpoint.display_name(),
                path = %description.relative_path,
                group = ?description.group_name,
                "described health check endpoint"
            );
            context.results.push(description);
        }
        Ok(())
    }
}

/// Describes the operations of a `#[derive(OpenApi)]` document.
pub struct DocumentedRouteProvider {
    document: OpenApi,
    components: Option<Arc<Components>>,
}

impl DocumentedRouteProvider {
    /// Provider over the paths of `document`.
    pub fn new(document: OpenApi) -> Self {
        let components = document.components.clone().map(Arc::new);
        Self {
            document,
            components,
        }
    }
}

impl ApiDescriptionProvider for DocumentedRouteProvider {
    fn order(&self) -> i32 {
        DOCUMENTED_ROUTE_PROVIDER_ORDER
    }

    fn on_providers_executing(
        &self,
        context: &mut ApiDescriptionProviderContext,
    ) -> Result<(), DocsError> {
        for (path, item) in &self.document.paths.paths {
            let pattern = RoutePattern::parse(path);
            let mut route_values = IndexMap::new();
            if let Some(controller) = pattern
                .path_segments()
                .first()
                .map(RoutePatternPathSegment::literal_text)
                .filter(|controller| !controller.is_empty())
            {
                route_values.insert("controller".to_string(), controller);
            }

            for (method, operation) in operations(item) {
                context.results.push(ApiDescription {
                    action_descriptor: ActionDescriptor::Documented(DocumentedAction {
                        route_values: route_values.clone(),
                        operation: operation.clone(),
                        components: self.components.clone(),
                    }),
                    group_name: None,
                    http_method: method,
                    relative_path: path.trim_start_matches('/').to_string(),
                    supported_response_types: Vec::new(),
                });
            }
        }
        Ok(())
    }
}

/// Operations of a path item paired with their method.
pub(crate) fn operations(item: &PathItem) -> Vec<(Method, &Operation)> {
    [
        (Method::GET, &item.get),
        (Method::PUT, &item.put),
        (Method::POST, &item.post),
        (Method::DELETE, &item.delete),
        (Method::OPTIONS, &item.options),
        (Method::HEAD, &item.head),
        (Method::PATCH, &item.patch),
        (Method::TRACE, &item.trace),
    ]
    .into_iter()
    .filter_map(|(method, operation)| operation.as_ref().map(|operation| (method, operation)))
    .collect()
}

#[cfg(test)]
mod tests {
    use utoipa::openapi::{
        OpenApiBuilder, PathsBuilder,
        path::{HttpMethod, OperationBuilder},
    };

    use super::*;
    use crate::openapi::{
        descriptor::{JSON_MEDIA_TYPE, ResponseType},
        endpoints::EndpointRouteBuilder,
        registration::HealthCheckDescriptionExt,
    };

    fn run(provider: &dyn ApiDescriptionProvider) -> Result<Vec<ApiDescription>, DocsError> {
        let mut context = ApiDescriptionProviderContext::default();
        provider.on_providers_executing(&mut context)?;
        provider.on_providers_executed(&mut context)?;
        Ok(context.results)
    }

    #[test]
    fn describes_only_endpoints_with_metadata() {
        let mut builder: EndpointRouteBuilder = EndpointRouteBuilder::new();
        builder.map_get("/weatherforecast", || async { "sunny" });
        builder
            .map_get("/healthz", || async { "ok" })
            .with_api_description(|metadata| {
                metadata.group_name = Some("ops".into());
                metadata.display_name = Some("Health Check".into());
            });
        let (_router, source) = builder.into_parts();

        let descriptions = run(&HealthCheckApiDescriptionProvider::new(Arc::new(source))).unwrap();

        assert_eq!(descriptions.len(), 1);
        let description = &descriptions[0];
        assert!(description.is_health_check());
        assert_eq!(description.http_method, Method::GET);
        assert_eq!(description.relative_path, "healthz");
        assert_eq!(description.document_path(), "/healthz");
        assert_eq!(description.group_name.as_deref(), Some("ops"));
        let action = description.action_descriptor.as_health_check().unwrap();
        assert_eq!(action.display_name.as_deref(), Some("Health Check"));
        assert!(format!("{description:?}").contains("HealthCheckReport"));

        let codes: Vec<_> = description
            .supported_response_types
            .iter()
            .map(|response| response.status_code)
            .collect();
        assert_eq!(codes, [200, 503]);
        let first = &description.supported_response_types[0];
        assert_eq!(
            first.formats,
            [ApiResponseFormat {
                media_type: JSON_MEDIA_TYPE.into()
            }]
        );
        assert_eq!(
            first.response_type.as_ref().map(ResponseType::name),
            Some("HealthCheckReport")
        );
    }

    #[test]
    fn rejects_parameterized_health_routes() {
        let mut builder: EndpointRouteBuilder = EndpointRouteBuilder::new();
        builder
            .map_get("/healthz/{component}", || async { "ok" })
            .with_api_description(|_| {});
        let (_router, source) = builder.into_parts();

        let result = run(&HealthCheckApiDescriptionProvider::new(Arc::new(source)));

        assert!(matches!(
            result,
            Err(DocsError::UnsupportedRoute { route }) if route == "/healthz/{component}"
        ));
    }

    #[test]
    fn documented_routes_become_documented_descriptions() {
        let document = OpenApiBuilder::new()
            .paths(
                PathsBuilder::new()
                    .path(
                        "/weatherforecast",
                        PathItem::new(HttpMethod::Get, OperationBuilder::new().build()),
                    )
                    .path(
                        "/orders/{id}",
                        PathItem::new(HttpMethod::Delete, OperationBuilder::new().build()),
                    ),
            )
            .build();

        let descriptions = run(&DocumentedRouteProvider::new(document)).unwrap();

        assert_eq!(descriptions.len(), 2);
        assert!(descriptions.iter().all(|description| !description.is_health_check()));
        let orders = descriptions
            .iter()
            .find(|description| description.relative_path == "orders/{id}")
            .unwrap();
        assert_eq!(orders.http_method, Method::DELETE);
        let ActionDescriptor::Documented(action) = &orders.action_descriptor else {
            panic!("expected a documented action");
        };
        assert_eq!(action.route_values.get("controller").map(String::as_str), Some("orders"));
    }

    #[test]
    fn provider_orders_run_health_checks_last() {
        assert!(DOCUMENTED_ROUTE_PROVIDER_ORDER < HEALTH_CHECK_PROVIDER_ORDER);
    }
}
