//! Describes health endpoints as operations of generated OpenAPI documents.

pub mod api_description;
pub mod configuration;
pub mod descriptor;
pub mod endpoints;
pub mod filter;
pub mod generator;
pub mod provider;
pub mod registration;
pub mod swagger_gen;
pub mod ui;

pub use descriptor::{HealthCheckDescriptionMetadata, ResponseDefinition, ResponseType};
pub use endpoints::{EndpointDataSource, EndpointRouteBuilder};
pub use generator::SwaggerGenerator;
pub use registration::HealthCheckDescriptionExt;
pub use swagger_gen::SwaggerGen;
