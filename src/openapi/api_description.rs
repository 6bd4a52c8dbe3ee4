//! Generic endpoint descriptions consumed by the document generator.

use std::sync::Arc;

use axum::http::Method;
use indexmap::IndexMap;
use utoipa::openapi::{Components, path::Operation};

use super::descriptor::{HealthCheckDescriptionMetadata, ResponseType};
use crate::error::DocsError;

/// Operation declared through `#[utoipa::path]` annotations.
#[derive(Debug, Clone)]
pub struct DocumentedAction {
    /// Route values such as `controller`, used by the default tag selection.
    pub route_values: IndexMap<String, String>,
    /// Annotated operation.
    pub operation: Operation,
    /// Components of the document the operation was taken from.
    pub components: Option<Arc<Components>>,
}

/// Synthetic operation describing a health check endpoint.
#[derive(Debug, Clone)]
pub struct HealthCheckAction {
    /// Description attached at registration.
    pub metadata: Arc<HealthCheckDescriptionMetadata>,
    /// Display name of the endpoint.
    pub display_name: Option<String>,
}

/// Origin of an [`ApiDescription`].
#[derive(Debug, Clone)]
pub enum ActionDescriptor {
    /// An operation declared with `#[utoipa::path]`.
    Documented(DocumentedAction),
    /// A described health endpoint.
    HealthCheck(HealthCheckAction),
}

impl ActionDescriptor {
    /// The health check action, when this is one.
    pub fn as_health_check(&self) -> Option<&HealthCheckAction> {
        match self {
            ActionDescriptor::HealthCheck(action) => Some(action),
            ActionDescriptor::Documented(_) => None,
        }
    }
}

/// One documented media type of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponseFormat {
    /// Media type of the response body.
    pub media_type: String,
}

/// One documented response of an operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponseType {
    /// HTTP status code.
    pub status_code: u16,
    /// Body type, if any.
    pub response_type: Option<ResponseType>,
    /// Formats the response is offered in.
    pub formats: Vec<ApiResponseFormat>,
}

/// Description of a single operation, independent of how it was discovered.
#[derive(Debug, Clone)]
pub struct ApiDescription {
    /// Origin of the description.
    pub action_descriptor: ActionDescriptor,
    /// Document group; `None` means the default document.
    pub group_name: Option<String>,
    /// HTTP method of the operation.
    pub http_method: Method,
    /// Path without the leading slash.
    pub relative_path: String,
    /// Documented responses.
    pub supported_response_types: Vec<ApiResponseType>,
}

impl ApiDescription {
    /// Whether this describes a synthetic health check operation.
    pub fn is_health_check(&self) -> bool {
        self.action_descriptor.as_health_check().is_some()
    }

    /// Absolute path used as the document key.
    pub fn document_path(&self) -> String {
        format!("/{}", self.relative_path)
    }
}

/// Collects the descriptions produced by every provider.
#[derive(Debug, Default)]
pub struct ApiDescriptionProviderContext {
    /// Descriptions gathered so far.
    pub results: Vec<ApiDescription>,
}

/// Contributes descriptions to the document generator.
pub trait ApiDescriptionProvider: Send + Sync {
    /// Providers run in ascending order.
    fn order(&self) -> i32;

    /// Add descriptions to `context`.
    fn on_providers_executing(
        &self,
        context: &mut ApiDescriptionProviderContext,
    ) -> Result<(), DocsError>;

    /// Runs after every provider executed, in descending order.
    fn on_providers_executed(
        &self,
        _context: &mut ApiDescriptionProviderContext,
    ) -> Result<(), DocsError> {
        Ok(())
    }
}
