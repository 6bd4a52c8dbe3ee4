//! Builds OpenAPI documents from the descriptions of every provider.

use std::{collections::BTreeMap, sync::Arc};

use axum::http::{Method, StatusCode};
use indexmap::IndexMap;
use tracing::debug;
use utoipa::openapi::{
    ComponentsBuilder, Info, OpenApi, OpenApiBuilder, PathItem, Paths, RefOr, Schema,
    content::ContentBuilder,
    path::{Operation, OperationBuilder},
    response::ResponseBuilder,
};

use super::{
    api_description::{
        ActionDescriptor, ApiDescription, ApiDescriptionProvider, ApiDescriptionProviderContext,
        ApiResponseType,
    },
    filter::{OperationFilter, OperationFilterContext},
    ui::SwaggerUiOptions,
};
use crate::error::DocsError;

/// Decides whether an operation belongs to a document.
pub type DocInclusionPredicate = Arc<dyn Fn(&str, &ApiDescription) -> bool + Send + Sync>;
/// Chooses the tags of an operation.
pub type TagsSelector =
    Arc<dyn Fn(&ApiDescription) -> Result<Vec<String>, DocsError> + Send + Sync>;

/// Operations without a group go everywhere; grouped ones only to the document of that name.
pub fn default_doc_inclusion_predicate(document_name: &str, description: &ApiDescription) -> bool {
    description
        .group_name
        .as_deref()
        .is_none_or(|group| group == document_name)
}

/// Annotated tags, otherwise the `controller` route value.
pub fn default_tags_selector(description: &ApiDescription) -> Result<Vec<String>, DocsError> {
    let missing = || DocsError::MissingControllerName {
        method: description.http_method.to_string(),
        path: description.document_path(),
    };
    match &description.action_descriptor {
        ActionDescriptor::Documented(action) => {
            if let Some(tags) = action.operation.tags.as_ref().filter(|tags| !tags.is_empty()) {
                return Ok(tags.clone());
            }
            action
                .route_values
                .get("controller")
                .map(|controller| vec![controller.clone()])
                .ok_or_else(missing)
        }
        ActionDescriptor::HealthCheck(_) => Err(missing()),
    }
}

/// Settings shared by every generated document.
#[derive(Clone)]
pub struct SwaggerGeneratorOptions {
    /// Documents by name, in registration order.
    pub swagger_docs: IndexMap<String, Info>,
    /// Decides which documents list an operation.
    pub doc_inclusion_predicate: DocInclusionPredicate,
    /// Chooses the tags of each operation.
    pub tags_selector: TagsSelector,
    /// Filters run on every operation, in registration order.
    pub operation_filters: Vec<Arc<dyn OperationFilter>>,
}

impl Default for SwaggerGeneratorOptions {
    fn default() -> Self {
        Self {
            swagger_docs: IndexMap::new(),
            doc_inclusion_predicate: Arc::new(default_doc_inclusion_predicate),
            tags_selector: Arc::new(default_tags_selector),
            operation_filters: Vec::new(),
        }
    }
}

/// Generates documents on demand; built by [`super::swagger_gen::SwaggerGen`].
pub struct SwaggerGenerator {
    options: SwaggerGeneratorOptions,
    providers: Vec<Arc<dyn ApiDescriptionProvider>>,
    ui: SwaggerUiOptions,
}

impl SwaggerGenerator {
    pub(crate) fn new(
        options: SwaggerGeneratorOptions,
        mut providers: Vec<Arc<dyn ApiDescriptionProvider>>,
        ui: SwaggerUiOptions,
    ) -> Self {
        providers.sort_by_key(|provider| provider.order());
        Self {
            options,
            providers,
            ui,
        }
    }

    /// Names of the registered documents.
    pub fn document_names(&self) -> impl Iterator<Item = &str> {
        self.options.swagger_docs.keys().map(String::as_str)
    }

    /// Post-configured UI settings.
    pub fn ui_options(&self) -> &SwaggerUiOptions {
        &self.ui
    }

    /// Post-configured generator settings.
    pub fn options(&self) -> &SwaggerGeneratorOptions {
        &self.options
    }

    /// Run every provider and return the descriptions they produced.
    pub fn api_descriptions(&self) -> Result<Vec<ApiDescription>, DocsError> {
        let mut context = ApiDescriptionProviderContext::default();
        for provider in &self.providers {
            provider.on_providers_executing(&mut context)?;
        }
        for provider in self.providers.iter().rev() {
            provider.on_providers_executed(&mut context)?;
        }
        Ok(context.results)
    }

    /// Generate the document registered as `document_name`.
    pub fn get_swagger(&self, document_name: &str) -> Result<OpenApi, DocsError> {
        let info = self
            .options
            .swagger_docs
            .get(document_name)
            .ok_or_else(|| DocsError::UnknownDocument(document_name.to_string()))?;

        let mut paths: BTreeMap<String, PathItem> = BTreeMap::new();
        let mut schemas: BTreeMap<String, RefOr<Schema>> = BTreeMap::new();
        let mut included = 0usize;

        for description in self.api_descriptions()? {
            if !(self.options.doc_inclusion_predicate)(document_name, &description) {
                continue;
            }
            let mut operation = self.generate_operation(&description, &mut schemas)?;
            let context = OperationFilterContext {
                api_description: &description,
                document_name,
            };
            for filter in &self.options.operation_filters {
                filter.apply(&mut operation, &context);
            }

            let path = description.document_path();
            let item = paths.entry(path.clone()).or_default();
            let slot = operation_slot(item, &description.http_method).ok_or_else(|| {
                DocsError::UnsupportedRoute {
                    route: format!("{} {path}", description.http_method),
                }
            })?;
            if slot.is_some() {
                return Err(DocsError::ConflictingOperation {
                    method: description.http_method.to_string(),
                    path,
                });
            }
            *slot = Some(operation);
            included += 1;
        }

        debug!(
            document = document_name,
            operations = included,
            schemas = schemas.len(),
            "generated OpenAPI document"
        );

        let mut document_paths = Paths::new();
        document_paths.paths = paths.into_iter().collect();
        let components = (!schemas.is_empty())
            .then(|| ComponentsBuilder::new().schemas_from_iter(schemas).build());

        Ok(OpenApiBuilder::new()
            .info(info.clone())
            .paths(document_paths)
            .components(components)
            .build())
    }

    fn generate_operation(
        &self,
        description: &ApiDescription,
        schemas: &mut BTreeMap<String, RefOr<Schema>>,
    ) -> Result<Operation, DocsError> {
        let mut operation = match &description.action_descriptor {
            ActionDescriptor::Documented(action) => {
                if let Some(components) = &action.components {
                    schemas.extend(
                        components
                            .schemas
                            .iter()
                            .map(|(name, schema)| (name.clone(), schema.clone())),
                    );
                }
                action.operation.clone()
            }
            ActionDescriptor::HealthCheck(_) => description
                .supported_response_types
                .iter()
                .fold(OperationBuilder::new(), |builder, response| {
                    builder.response(
                        response.status_code.to_string(),
                        generate_response(response, schemas),
                    )
                })
                .build(),
        };
        operation.tags = Some((self.options.tags_selector)(description)?);
        Ok(operation)
    }
}

fn generate_response(
    response: &ApiResponseType,
    schemas: &mut BTreeMap<String, RefOr<Schema>>,
) -> utoipa::openapi::Response {
    let reason = StatusCode::from_u16(response.status_code)
        .ok()
        .and_then(|status| status.canonical_reason())
        .unwrap_or_default();
    if let Some(response_type) = &response.response_type {
        schemas.extend(response_type.component_schemas());
    }

    response
        .formats
        .iter()
        .fold(ResponseBuilder::new().description(reason), |builder, format| {
            let content = ContentBuilder::new()
                .schema(
                    response
                        .response_type
                        .as_ref()
                        .map(|response_type| response_type.schema_reference()),
                )
                .build();
            builder.content(format.media_type.clone(), content)
        })
        .build()
}

fn operation_slot<'a>(item: &'a mut PathItem, method: &Method) -> Option<&'a mut Option<Operation>> {
    [
        (Method::GET, &mut item.get),
        (Method::PUT, &mut item.put),
        (Method::POST, &mut item.post),
        (Method::DELETE, &mut item.delete),
        (Method::OPTIONS, &mut item.options),
        (Method::HEAD, &mut item.head),
        (Method::PATCH, &mut item.patch),
        (Method::TRACE, &mut item.trace),
    ]
    .into_iter()
    .find(|(candidate, _)| candidate == method)
    .map(|(_, slot)| slot)
}
