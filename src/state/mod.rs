use std::sync::Arc;

use crate::openapi::SwaggerGenerator;

/// State handle shared by the documentation routes.
pub type SharedState = Arc<AppState>;

/// Central application state shared by the documentation routes.
pub struct AppState {
    generator: SwaggerGenerator,
}

impl AppState {
    /// Wrap the generator in an [`Arc`] so the state can be cloned cheaply.
    pub fn new(generator: SwaggerGenerator) -> SharedState {
        Arc::new(Self { generator })
    }

    /// Generator producing the documents served under `/swagger`.
    pub fn generator(&self) -> &SwaggerGenerator {
        &self.generator
    }
}
