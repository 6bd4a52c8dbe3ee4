//! Entries listed by the Swagger UI.

/// Document shown by default when the UI has no explicit entries.
pub const DEFAULT_DOCUMENT_NAME: &str = "v1";

/// URL the generated document `name` is served at.
pub fn document_url(name: &str) -> String {
    format!("/swagger/{name}/swagger.json")
}

/// One selectable document in the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlDescriptor {
    /// Location of the document JSON.
    pub url: String,
    /// Label shown in the UI selector.
    pub name: String,
}

/// Swagger UI settings.
#[derive(Debug, Clone, Default)]
pub struct SwaggerUiOptions {
    /// Used to label the default entry.
    pub application_name: String,
    /// Explicit entries; `None` shows only the default document.
    pub urls: Option<Vec<UrlDescriptor>>,
}

impl SwaggerUiOptions {
    /// Options with no explicit entries.
    pub fn new(application_name: impl Into<String>) -> Self {
        Self {
            application_name: application_name.into(),
            urls: None,
        }
    }

    /// The entry for [`DEFAULT_DOCUMENT_NAME`].
    pub fn default_url(&self) -> UrlDescriptor {
        UrlDescriptor {
            url: document_url(DEFAULT_DOCUMENT_NAME),
            name: format!("{} {DEFAULT_DOCUMENT_NAME}", self.application_name),
        }
    }

    /// Entries the UI should list.
    pub fn resolved_urls(&self) -> Vec<UrlDescriptor> {
        match &self.urls {
            Some(urls) => urls.clone(),
            None => vec![self.default_url()],
        }
    }
}
