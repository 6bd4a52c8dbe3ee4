//! Sample service exposing a health endpoint, a forecast route and their OpenAPI documents.

use std::{env, net::SocketAddr, time::Instant};

use anyhow::Context;
use axum::Router;
use health_openapi::{
    config::AppConfig,
    health::{HealthCheckResult, HealthCheckService},
    openapi::HealthCheckDescriptionExt,
    routes,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load().context("loading configuration")?;
    let app = build_router(&config)?;

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, application = %config.application_name, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(config: &AppConfig) -> anyhow::Result<Router<()>> {
    let started = Instant::now();
    let health = HealthCheckService::new()
        .add_check_fn("self", || {
            Ok(HealthCheckResult::healthy().with_description("The service is running"))
        })
        .add_check_fn("uptime", move || {
            Ok(HealthCheckResult::healthy().with_data("seconds", started.elapsed().as_secs()))
        });

    let router = routes::app(config, health, |endpoints, options| {
        endpoints
            .map_health_checks("/healthz", options.clone())
            .with_display_name("Health Check")
            .with_api_description(|metadata| {
                metadata.summary =
                    Some("Returns information about the health of the system".into());
                metadata.display_name = Some("Health Check".into());
            });
    })
    .context("building OpenAPI generator")?;

    Ok(router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http()))
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler; waiting for Ctrl+C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
