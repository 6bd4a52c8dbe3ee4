//! Documentation metadata attached to health check endpoints.

use indexmap::IndexSet;
use utoipa::{
    PartialSchema, ToSchema,
    openapi::{Ref, RefOr, Schema},
};

use crate::dto::health::HealthCheckReport;

/// Media type of every health report response.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Resolved schema metadata of a declared response body type.
#[derive(Debug, Clone)]
pub struct ResponseType {
    name: String,
    schema: RefOr<Schema>,
    dependencies: Vec<(String, RefOr<Schema>)>,
    inline: bool,
}

impl ResponseType {
    /// Describe `T` as a named component referenced from responses.
    pub fn of<T: ToSchema>() -> Self {
        let mut dependencies = Vec::new();
        T::schemas(&mut dependencies);
        Self {
            name: T::name().into_owned(),
            schema: <T as PartialSchema>::schema(),
            dependencies,
            inline: false,
        }
    }

    /// Describe `T` with its schema embedded in each response, as suits primitives.
    pub fn inline<T: PartialSchema>() -> Self {
        let full_name = std::any::type_name::<T>();
        let name = full_name.rsplit("::").next().unwrap_or(full_name);
        Self {
            name: name.to_string(),
            schema: T::schema(),
            dependencies: Vec::new(),
            inline: true,
        }
    }

    /// Schema name of the type.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the schema is embedded instead of referenced.
    pub fn is_inline(&self) -> bool {
        self.inline
    }

    /// Schema to place in a response: a component reference or the inline schema.
    pub fn schema_reference(&self) -> RefOr<Schema> {
        if self.inline {
            self.schema.clone()
        } else {
            Ref::from_schema_name(self.name.clone()).into()
        }
    }

    /// Component schemas that must be present in a document using this type.
    pub fn component_schemas(&self) -> Vec<(String, RefOr<Schema>)> {
        let mut schemas = self.dependencies.clone();
        if !self.inline {
            schemas.push((self.name.clone(), self.schema.clone()));
        }
        schemas
    }
}

impl PartialEq for ResponseType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.inline == other.inline
    }
}

/// One documented response of a health endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseDefinition {
    /// HTTP status code of the response.
    pub status_code: u16,
    /// Declared body type; `None` documents an untyped body.
    pub response_type: Option<ResponseType>,
    /// Media types the response is written in.
    pub supported_media_types: IndexSet<String>,
}

impl ResponseDefinition {
    /// A JSON response with the given status code and no declared type.
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            response_type: None,
            supported_media_types: IndexSet::from([JSON_MEDIA_TYPE.to_string()]),
        }
    }

    /// Declare the body type.
    pub fn with_type(mut self, response_type: Option<ResponseType>) -> Self {
        self.response_type = response_type;
        self
    }
}

impl Default for ResponseDefinition {
    fn default() -> Self {
        Self::new(200)
    }
}

/// Describes how a health endpoint appears in generated documents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HealthCheckDescriptionMetadata {
    /// Documented responses, in status order of registration.
    pub response_definitions: Vec<ResponseDefinition>,
    /// Document group; `None` targets the default document.
    pub group_name: Option<String>,
    /// Operation summary.
    pub summary: Option<String>,
    /// Operation description.
    pub description: Option<String>,
    /// Operation identifier.
    pub operation_id: Option<String>,
    /// Tags in insertion order; equality ignores order.
    pub tags: IndexSet<String>,
    /// Display name of the endpoint.
    pub display_name: Option<String>,
}

impl HealthCheckDescriptionMetadata {
    /// Metadata seeded with 200 and 503 responses using `response_type`.
    pub fn with_default_responses(response_type: Option<ResponseType>) -> Self {
        Self {
            response_definitions: vec![
                ResponseDefinition::new(200).with_type(response_type.clone()),
                ResponseDefinition::new(503).with_type(response_type),
            ],
            ..Self::default()
        }
    }

    /// Metadata seeded with 200 and 503 responses typed as [`HealthCheckReport`].
    pub fn with_report_responses() -> Self {
        Self::with_default_responses(Some(ResponseType::of::<HealthCheckReport>()))
    }

    /// Replace the definition with the same status code, or append it.
    pub fn set_response(&mut self, definition: ResponseDefinition) {
        match self
            .response_definitions
            .iter_mut()
            .find(|existing| existing.status_code == definition.status_code)
        {
            Some(existing) => *existing = definition,
            None => self.response_definitions.push(definition),
        }
    }

    /// Add a tag; duplicates are ignored.
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        self.tags.insert(tag.into());
    }
}
