//! Configuration steps wiring health check descriptions into the document generator.

use std::sync::Arc;

use super::{
    api_description::ApiDescription,
    filter::HealthCheckOperationFilter,
    generator::SwaggerGeneratorOptions,
    ui::{SwaggerUiOptions, UrlDescriptor, document_url},
};
use crate::{config::HealthCheckApiExplorerOptions, error::DocsError};

/// Tag given to health operations that declare none.
pub const DEFAULT_HEALTH_CHECK_TAG: &str = "HealthChecks";
/// UI label of the dedicated health document.
pub const HEALTH_CHECKS_UI_NAME: &str = "Health Checks";

/// Runs first, while options are being assembled.
pub trait ConfigureOptions<T>: Send + Sync {
    /// Apply this step to `options`.
    fn configure(&self, options: &mut T) -> Result<(), DocsError>;
}

/// Runs after every [`ConfigureOptions`] step.
pub trait PostConfigureOptions<T>: Send + Sync {
    /// Apply this step to `options`.
    fn post_configure(&self, options: &mut T) -> Result<(), DocsError>;
}

impl<T, F> ConfigureOptions<T> for F
where
    F: Fn(&mut T) -> Result<(), DocsError> + Send + Sync,
{
    fn configure(&self, options: &mut T) -> Result<(), DocsError> {
        self(options)
    }
}

impl<T, F> PostConfigureOptions<T> for F
where
    F: Fn(&mut T) -> Result<(), DocsError> + Send + Sync,
{
    fn post_configure(&self, options: &mut T) -> Result<(), DocsError> {
        self(options)
    }
}

/// Registers the operation filter and health-aware tag selection.
pub struct SwaggerGenOptionsConfiguration {
    explorer: Arc<HealthCheckApiExplorerOptions>,
}

impl SwaggerGenOptionsConfiguration {
    /// Step driven by `explorer`.
    pub fn new(explorer: Arc<HealthCheckApiExplorerOptions>) -> Self {
        Self { explorer }
    }
}

impl ConfigureOptions<SwaggerGeneratorOptions> for SwaggerGenOptionsConfiguration {
    fn configure(&self, options: &mut SwaggerGeneratorOptions) -> Result<(), DocsError> {
        options
            .operation_filters
            .push(Arc::new(HealthCheckOperationFilter));

        // The default selector requires a controller name, which health operations never have.
        let original = Arc::clone(&options.tags_selector);
        options.tags_selector = Arc::new(move |description: &ApiDescription| {
            match description.action_descriptor.as_health_check() {
                Some(action) if action.metadata.tags.is_empty() => {
                    Ok(vec![DEFAULT_HEALTH_CHECK_TAG.to_string()])
                }
                Some(action) => Ok(action.metadata.tags.iter().cloned().collect()),
                None => original(description),
            }
        });

        self.explorer.ensure_valid()
    }
}

/// Registers the dedicated health document and partitions operations between documents.
pub struct SwaggerGeneratorOptionsPostConfiguration {
    explorer: Arc<HealthCheckApiExplorerOptions>,
}

impl SwaggerGeneratorOptionsPostConfiguration {
    /// Step driven by `explorer`.
    pub fn new(explorer: Arc<HealthCheckApiExplorerOptions>) -> Self {
        Self { explorer }
    }
}

impl PostConfigureOptions<SwaggerGeneratorOptions> for SwaggerGeneratorOptionsPostConfiguration {
    fn post_configure(&self, options: &mut SwaggerGeneratorOptions) -> Result<(), DocsError> {
        if !self.explorer.create_dedicated_document {
            return Ok(());
        }
        self.explorer.ensure_valid()?;

        let health_document = self.explorer.dedicated_document_name.clone();
        if options.swagger_docs.contains_key(&health_document) {
            return Err(DocsError::InvalidConfiguration(format!(
                "a document named `{health_document}` is already registered"
            )));
        }
        options.swagger_docs.insert(
            health_document.clone(),
            self.explorer.dedicated_document_info.to_info(),
        );

        let original = Arc::clone(&options.doc_inclusion_predicate);
        options.doc_inclusion_predicate =
            Arc::new(move |document_name: &str, description: &ApiDescription| {
                let is_health_check = description.is_health_check();
                if document_name == health_document {
                    return is_health_check;
                }
                !is_health_check && original(document_name, description)
            });
        Ok(())
    }
}

/// Lists the dedicated health document in the Swagger UI.
pub struct SwaggerUiOptionsPostConfiguration {
    explorer: Arc<HealthCheckApiExplorerOptions>,
}

impl SwaggerUiOptionsPostConfiguration {
    /// Step driven by `explorer`.
    pub fn new(explorer: Arc<HealthCheckApiExplorerOptions>) -> Self {
        Self { explorer }
    }
}

impl PostConfigureOptions<SwaggerUiOptions> for SwaggerUiOptionsPostConfiguration {
    fn post_configure(&self, options: &mut SwaggerUiOptions) -> Result<(), DocsError> {
        if !self.explorer.create_dedicated_document {
            return Ok(());
        }

        let mut urls = match options.urls.take() {
            Some(urls) => urls,
            None => vec![options.default_url()],
        };
        urls.push(UrlDescriptor {
            url: document_url(&self.explorer.dedicated_document_name),
            name: HEALTH_CHECKS_UI_NAME.into(),
        });
        options.urls = Some(urls);
        Ok(())
    }
}
