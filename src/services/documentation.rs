use utoipa::OpenApi;

#[derive(OpenApi)]
/// Annotated operations served next to the health endpoints.
#[openapi(
    paths(crate::routes::forecast::get_weather_forecast),
    components(schemas(crate::dto::forecast::WeatherForecast)),
    tags((name = "WeatherForecast", description = "Sample forecast endpoints"))
)]
pub struct ApiDoc;
