//! Fluent registration of health check descriptions on mapped endpoints.

use std::sync::Arc;

use utoipa::ToSchema;

use super::{
    descriptor::{HealthCheckDescriptionMetadata, ResponseType},
    endpoints::EndpointConventionBuilder,
};

/// Attaches [`HealthCheckDescriptionMetadata`] to a mapped endpoint.
pub trait HealthCheckDescriptionExt: Sized {
    /// Describe the endpoint with 200 and 503 responses typed as the standard health report.
    fn with_api_description<F>(self, configure: F) -> Self
    where
        F: FnOnce(&mut HealthCheckDescriptionMetadata);

    /// Describe the endpoint with 200 and 503 responses typed as `response_type`.
    ///
    /// `None` documents both responses as untyped. `configure` runs after the defaults are
    /// seeded, so it may replace or extend them.
    fn with_response_type<F>(self, response_type: Option<ResponseType>, configure: F) -> Self
    where
        F: FnOnce(&mut HealthCheckDescriptionMetadata);

    /// Shorthand for [`Self::with_response_type`] with a component schema of `T`.
    fn with_open_api<T, F>(self, configure: F) -> Self
    where
        T: ToSchema,
        F: FnOnce(&mut HealthCheckDescriptionMetadata),
    {
        self.with_response_type(Some(ResponseType::of::<T>()), configure)
    }
}

impl HealthCheckDescriptionExt for EndpointConventionBuilder<'_> {
    fn with_api_description<F>(self, configure: F) -> Self
    where
        F: FnOnce(&mut HealthCheckDescriptionMetadata),
    {
        let mut metadata = HealthCheckDescriptionMetadata::with_report_responses();
        configure(&mut metadata);
        self.with_metadata(Arc::new(metadata))
    }

    fn with_response_type<F>(self, response_type: Option<ResponseType>, configure: F) -> Self
    where
        F: FnOnce(&mut HealthCheckDescriptionMetadata),
    {
        let mut metadata = HealthCheckDescriptionMetadata::with_default_responses(response_type);
        configure(&mut metadata);
        self.with_metadata(Arc::new(metadata))
    }
}
