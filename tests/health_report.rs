//! HTTP-level tests of the health report endpoint.

use anyhow::anyhow;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use health_openapi::{
    config::AppConfig,
    health::{HealthCheckResult, HealthCheckService, HealthStatus},
    routes,
    services::json_options::{EnumFormat, JsonOptionsSource, JsonSerializerOptions, NamingPolicy},
};
use serde_json::Value;
use tower::ServiceExt;

fn app<F>(check: F, configure: impl FnOnce(&mut AppConfig)) -> Router
where
    F: Fn() -> anyhow::Result<HealthCheckResult> + Send + Sync + 'static,
{
    let mut config = AppConfig::default();
    configure(&mut config);
    routes::app(
        &config,
        HealthCheckService::new().add_check_fn("Sample", check),
        |endpoints, options| {
            endpoints.map_health_checks("/healthz", options.clone());
        },
    )
    .unwrap()
}

async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, content_type, serde_json::from_slice(&body).unwrap())
}

/// Options that differ from the defaults in both naming and enum format.
fn pascal_numbers() -> JsonSerializerOptions {
    JsonSerializerOptions {
        property_naming: NamingPolicy::PascalCase,
        enum_format: EnumFormat::Number,
        ..JsonSerializerOptions::default()
    }
}

#[tokio::test]
async fn basic_health_report() {
    let app = app(
        || Ok(HealthCheckResult::healthy().with_description("test_description")),
        |_| {},
    );

    let (status, content_type, json) = get(app, "/healthz").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert_eq!(json["endpoint"], "/healthz");
    assert_eq!(json["status"], "healthy");
    assert!(json["duration"].is_string());
    assert_eq!(json["checks"].as_array().map(Vec::len), Some(1));

    let check = &json["checks"][0];
    assert_eq!(check["name"], "Sample");
    assert_eq!(check["description"], "test_description");
    assert!(check["duration"].is_string());
    assert_eq!(check["status"], "healthy");
    assert!(check.get("data").is_none());
    assert!(check.get("error").is_none());
}

#[tokio::test]
async fn report_contains_data_when_available() {
    let app = app(
        || {
            Ok(HealthCheckResult::healthy()
                .with_description("test_description")
                .with_data("Key1", "Value1")
                .with_data("Key2", 2))
        },
        |_| {},
    );

    let (status, _, json) = get(app, "/healthz").await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["checks"][0]["data"].is_object());
    assert_eq!(json["checks"][0]["data"]["Key1"], "Value1");
    assert_eq!(json["checks"][0]["data"]["Key2"], 2);
}

#[tokio::test]
async fn uses_http_json_when_configured() {
    let app = app(
        || Ok(HealthCheckResult::healthy()),
        |config| {
            config.report_format.json_options_source = JsonOptionsSource::Http;
            config.json.http = pascal_numbers();
        },
    );

    let (status, _, json) = get(app, "/healthz").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["Status"], 2);
    assert_eq!(json["Checks"][0]["Status"], 2);
    assert_eq!(json["Endpoint"], "/healthz");
}

#[tokio::test]
async fn uses_controller_json_when_configured() {
    let app = app(
        || Ok(HealthCheckResult::healthy()),
        |config| {
            config.report_format.json_options_source = JsonOptionsSource::Controller;
            config.json.http = pascal_numbers();
        },
    );

    let (status, _, json) = get(app, "/healthz").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"][0]["status"], "healthy");
}

#[tokio::test]
async fn data_keys_keep_their_casing() {
    let app = app(
        || Ok(HealthCheckResult::healthy().with_data("queueDepth", 3)),
        |config| {
            config.report_format.json_options_source = JsonOptionsSource::Http;
            config.json.http = pascal_numbers();
        },
    );

    let (_, _, json) = get(app, "/healthz").await;

    assert_eq!(json["Checks"][0]["Data"]["queueDepth"], 3);
}

#[tokio::test]
async fn absent_fields_are_written_as_null_when_configured() {
    let app = app(
        || Ok(HealthCheckResult::healthy()),
        |config| config.json.controller.ignore_null_values = false,
    );

    let (_, _, json) = get(app, "/healthz").await;

    let check = json["checks"][0].as_object().unwrap();
    assert_eq!(check.get("description"), Some(&Value::Null));
    assert_eq!(check.get("error"), Some(&Value::Null));
    assert_eq!(check.get("data"), Some(&Value::Null));
}

#[tokio::test]
async fn report_contains_exception_when_available() {
    let app = app(
        || {
            Ok(HealthCheckResult::unhealthy()
                .with_description("test_description")
                .with_error(anyhow!("You can't do that, like the Beatles said")))
        },
        |_| {},
    );

    let (status, _, json) = get(app, "/healthz").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["status"], "unhealthy");
    assert_eq!(json["checks"][0]["status"], "unhealthy");
    assert_eq!(
        json["checks"][0]["error"],
        "You can't do that, like the Beatles said"
    );
}

#[tokio::test]
async fn failing_check_is_reported_unhealthy() {
    let app = app(|| Err(anyhow!("boom")), |_| {});

    let (status, _, json) = get(app, "/healthz").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["checks"][0]["status"], "unhealthy");
    assert_eq!(json["checks"][0]["description"], "boom");
    assert_eq!(json["checks"][0]["error"], "boom");
}

#[tokio::test]
async fn degraded_report_is_service_unavailable() {
    let app = app(|| Ok(HealthCheckResult::degraded()), |_| {});

    let (status, _, json) = get(app, "/healthz").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["status"], "degraded");
}

#[tokio::test]
async fn report_is_indented_when_configured() {
    let app = app(
        || Ok(HealthCheckResult::healthy()),
        |config| config.json.controller.write_indented = true,
    );

    let req = Request::builder()
        .uri("/healthz")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();

    assert!(body.contains(&b'\n'));
}

#[tokio::test]
async fn endpoint_is_the_request_path() {
    let app = routes::app(
        &AppConfig::default(),
        HealthCheckService::new(),
        |endpoints, options| {
            endpoints.map_health_checks("/status/health", options.clone());
        },
    )
    .unwrap();

    let (status, _, json) = get(app, "/status/health?verbose=true").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["endpoint"], "/status/health");
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn sample_forecast_route_is_served() {
    let app = app(|| Ok(HealthCheckResult::healthy()), |_| {});

    let (status, _, json) = get(app, "/weatherforecast").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().map(Vec::len), Some(5));
    assert!(json[0]["temperatureC"].is_i64());
}

#[test]
fn worst_status_wins() {
    assert!(HealthStatus::Unhealthy < HealthStatus::Degraded);
    assert!(HealthStatus::Degraded < HealthStatus::Healthy);
}
