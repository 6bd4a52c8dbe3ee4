//! Post-processing of generated operations.

use utoipa::openapi::path::Operation;

use super::api_description::ApiDescription;

/// What an [`OperationFilter`] knows about the operation being generated.
#[derive(Debug, Clone, Copy)]
pub struct OperationFilterContext<'a> {
    /// Description of the operation being filtered.
    pub api_description: &'a ApiDescription,
    /// Document being generated.
    pub document_name: &'a str,
}

/// Mutates an operation after the generator built it.
pub trait OperationFilter: Send + Sync {
    /// Adjust `operation` before it is added to the document.
    fn apply(&self, operation: &mut Operation, context: &OperationFilterContext<'_>);
}

/// Copies the texts of a health check description onto its operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct HealthCheckOperationFilter;

impl OperationFilter for HealthCheckOperationFilter {
    fn apply(&self, operation: &mut Operation, context: &OperationFilterContext<'_>) {
        let Some(action) = context.api_description.action_descriptor.as_health_check() else {
            return;
        };
        let metadata = &action.metadata;
        operation.summary = metadata.summary.clone();
        operation.description = metadata.description.clone();
        operation.operation_id = metadata.operation_id.clone();
    }
}
