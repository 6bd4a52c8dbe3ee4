use axum::Json;

use crate::{
    dto::forecast::WeatherForecast, openapi::endpoints::EndpointRouteBuilder,
    services::forecast_service,
};

#[utoipa::path(
    get,
    path = "/weatherforecast",
    tag = "WeatherForecast",
    operation_id = "GetWeatherForecast",
    responses((status = 200, description = "Forecast for the coming days", body = [WeatherForecast]))
)]
/// Return a five-day sample forecast.
pub async fn get_weather_forecast() -> Json<Vec<WeatherForecast>> {
    Json(forecast_service::upcoming_forecasts(5))
}

/// Map the forecast routes.
pub fn map<S>(endpoints: &mut EndpointRouteBuilder<S>)
where
    S: Clone + Send + Sync + 'static,
{
    endpoints.map_get("/weatherforecast", get_weather_forecast);
}
