use serde::Serialize;
use utoipa::ToSchema;

/// Daily forecast served by the sample `/weatherforecast` route.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeatherForecast {
    /// Forecast day, as an ISO date.
    pub date: String,
    /// Temperature in degrees Celsius.
    pub temperature_c: i32,
    /// Temperature in degrees Fahrenheit.
    pub temperature_f: i32,
    /// Short description of the weather.
    pub summary: Option<String>,
}

impl WeatherForecast {
    /// Build a forecast, deriving the Fahrenheit reading.
    pub fn new(date: impl Into<String>, temperature_c: i32, summary: &str) -> Self {
        Self {
            date: date.into(),
            temperature_c,
            temperature_f: 32 + (temperature_c as f64 / 0.5556) as i32,
            summary: Some(summary.to_string()),
        }
    }
}
