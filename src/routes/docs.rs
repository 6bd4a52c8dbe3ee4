use std::{
    collections::HashSet,
    sync::{LazyLock, Mutex, PoisonError},
};

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use tracing::error;
use utoipa::openapi::OpenApi;
use utoipa_swagger_ui::{Config, SwaggerUi, Url};

use crate::{
    error::{AppError, DocsError},
    state::SharedState,
};

/// Serve the generated documents and the Swagger UI listing them.
pub fn router(state: SharedState) -> Router<SharedState> {
    let urls: Vec<Url<'static>> = state
        .generator()
        .ui_options()
        .resolved_urls()
        .into_iter()
        .map(|entry| Url::new(intern(entry.name), intern(entry.url)))
        .collect();
    let ui: Router<SharedState> = SwaggerUi::new("/swagger-ui")
        .config(Config::new(urls))
        .into();

    Router::<SharedState>::new()
        .route("/swagger/{document}/swagger.json", get(swagger_document))
        .merge(ui)
}

static INTERNED: LazyLock<Mutex<HashSet<&'static str>>> = LazyLock::new(Default::default);

/// The Swagger UI configuration borrows for `'static`; each distinct string is leaked once per
/// process no matter how many routers are built.
fn intern(value: String) -> &'static str {
    let mut interned = INTERNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(&existing) = interned.get(value.as_str()) {
        return existing;
    }
    let leaked: &'static str = Box::leak(value.into_boxed_str());
    interned.insert(leaked);
    leaked
}

/// Generate the document registered as `document`.
pub async fn swagger_document(
    State(state): State<SharedState>,
    Path(document): Path<String>,
) -> Result<Json<OpenApi>, AppError> {
    state
        .generator()
        .get_swagger(&document)
        .map(Json)
        .map_err(|err| {
            if !matches!(err, DocsError::UnknownDocument(_)) {
                error!(%document, error = %err, "failed to generate OpenAPI document");
            }
            AppError::from(err)
        })
}
