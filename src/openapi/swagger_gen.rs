//! Builder assembling a [`SwaggerGenerator`] from documents, providers and configuration steps.

use std::sync::Arc;

use tracing::{debug, info};
use utoipa::openapi::{Info, OpenApi};

use super::{
    api_description::{ApiDescription, ApiDescriptionProvider},
    configuration::{
        ConfigureOptions, PostConfigureOptions, SwaggerGenOptionsConfiguration,
        SwaggerGeneratorOptionsPostConfiguration, SwaggerUiOptionsPostConfiguration,
    },
    endpoints::EndpointDataSource,
    filter::OperationFilter,
    generator::{SwaggerGenerator, SwaggerGeneratorOptions},
    provider::{DocumentedRouteProvider, HealthCheckApiDescriptionProvider},
    ui::{SwaggerUiOptions, UrlDescriptor},
};
use crate::{config::HealthCheckApiExplorerOptions, error::DocsError};

/// Collects everything needed to generate documents.
///
/// Configuration steps run in [`SwaggerGen::build`]: every configure step in registration order,
/// then every post-configure step, then the UI post-configure steps.
pub struct SwaggerGen {
    options: SwaggerGeneratorOptions,
    ui: SwaggerUiOptions,
    providers: Vec<Arc<dyn ApiDescriptionProvider>>,
    configurations: Vec<Box<dyn ConfigureOptions<SwaggerGeneratorOptions>>>,
    post_configurations: Vec<Box<dyn PostConfigureOptions<SwaggerGeneratorOptions>>>,
    ui_post_configurations: Vec<Box<dyn PostConfigureOptions<SwaggerUiOptions>>>,
    health_checks_added: bool,
}

impl SwaggerGen {
    /// Empty builder; `application_name` labels the default UI entry.
    pub fn new(application_name: impl Into<String>) -> Self {
        Self {
            options: SwaggerGeneratorOptions::default(),
            ui: SwaggerUiOptions::new(application_name),
            providers: Vec::new(),
            configurations: Vec::new(),
            post_configurations: Vec::new(),
            ui_post_configurations: Vec::new(),
            health_checks_added: false,
        }
    }

    /// Register (or replace) the document `name`.
    pub fn swagger_doc(mut self, name: impl Into<String>, info: Info) -> Self {
        self.options.swagger_docs.insert(name.into(), info);
        self
    }

    /// Replace the document inclusion predicate.
    pub fn doc_inclusion_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str, &ApiDescription) -> bool + Send + Sync + 'static,
    {
        self.options.doc_inclusion_predicate = Arc::new(predicate);
        self
    }

    /// Replace the tags selector.
    pub fn tags_selector<F>(mut self, selector: F) -> Self
    where
        F: Fn(&ApiDescription) -> Result<Vec<String>, DocsError> + Send + Sync + 'static,
    {
        self.options.tags_selector = Arc::new(selector);
        self
    }

    /// Run `filter` on every generated operation.
    pub fn operation_filter(mut self, filter: impl OperationFilter + 'static) -> Self {
        self.options.operation_filters.push(Arc::new(filter));
        self
    }

    /// Replace the UI entry list.
    pub fn ui_urls(mut self, urls: Vec<UrlDescriptor>) -> Self {
        self.ui.urls = Some(urls);
        self
    }

    /// Register a description provider.
    pub fn add_provider(mut self, provider: impl ApiDescriptionProvider + 'static) -> Self {
        self.providers.push(Arc::new(provider));
        self
    }

    /// Describe the operations of an annotated document.
    pub fn add_documented_routes(self, document: OpenApi) -> Self {
        self.add_provider(DocumentedRouteProvider::new(document))
    }

    /// Add a step that runs before every post-configure step.
    pub fn configure(
        mut self,
        configuration: impl ConfigureOptions<SwaggerGeneratorOptions> + 'static,
    ) -> Self {
        self.configurations.push(Box::new(configuration));
        self
    }

    /// Add a step that runs after every configure step.
    pub fn post_configure(
        mut self,
        configuration: impl PostConfigureOptions<SwaggerGeneratorOptions> + 'static,
    ) -> Self {
        self.post_configurations.push(Box::new(configuration));
        self
    }

    /// Add a step adjusting the Swagger UI entries.
    pub fn post_configure_ui(
        mut self,
        configuration: impl PostConfigureOptions<SwaggerUiOptions> + 'static,
    ) -> Self {
        self.ui_post_configurations.push(Box::new(configuration));
        self
    }

    /// Describe the health endpoints of `endpoints`. Only the first call has an effect.
    pub fn add_health_checks(
        mut self,
        endpoints: Arc<EndpointDataSource>,
        explorer: Arc<HealthCheckApiExplorerOptions>,
    ) -> Self {
        if self.health_checks_added {
            debug!("health check descriptions already registered");
            return self;
        }
        self.health_checks_added = true;
        self.add_provider(HealthCheckApiDescriptionProvider::new(endpoints))
            .configure(SwaggerGenOptionsConfiguration::new(Arc::clone(&explorer)))
            .post_configure(SwaggerGeneratorOptionsPostConfiguration::new(Arc::clone(
                &explorer,
            )))
            .post_configure_ui(SwaggerUiOptionsPostConfiguration::new(explorer))
    }

    /// Run the configuration steps and freeze the result.
    pub fn build(self) -> Result<SwaggerGenerator, DocsError> {
        let Self {
            mut options,
            mut ui,
            providers,
            configurations,
            post_configurations,
            ui_post_configurations,
            ..
        } = self;

        for configuration in &configurations {
            configuration.configure(&mut options)?;
        }
        for configuration in &post_configurations {
            configuration.post_configure(&mut options)?;
        }
        for configuration in &ui_post_configurations {
            configuration.post_configure(&mut ui)?;
        }

        info!(
            documents = ?options.swagger_docs.keys().collect::<Vec<_>>(),
            providers = providers.len(),
            "OpenAPI generator ready"
        );
        Ok(SwaggerGenerator::new(options, providers, ui))
    }
}
