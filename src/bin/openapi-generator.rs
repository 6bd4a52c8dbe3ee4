//! Print every OpenAPI document of the sample service as pretty JSON.

use std::sync::Arc;

use health_openapi::{
    config::AppConfig,
    openapi::{EndpointRouteBuilder, HealthCheckDescriptionExt},
    routes,
};

fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    let mut endpoints: EndpointRouteBuilder = EndpointRouteBuilder::new();
    routes::forecast::map(&mut endpoints);
    endpoints
        .map_get("/healthz", || async {})
        .with_api_description(|metadata| {
            metadata.summary = Some("Returns information about the health of the system".into());
        });
    let (_router, data_source) = endpoints.into_parts();

    let generator = routes::generator(&config, Arc::new(data_source))?;
    for name in generator.document_names() {
        println!("{}", generator.get_swagger(name)?.to_pretty_json()?);
    }
    Ok(())
}
