//! Sample forecasts served next to the health endpoints.

use rand::Rng;
use time::{Duration, OffsetDateTime};

use crate::dto::forecast::WeatherForecast;

const SUMMARIES: [&str; 10] = [
    "Freezing",
    "Bracing",
    "Chilly",
    "Cool",
    "Mild",
    "Warm",
    "Balmy",
    "Hot",
    "Sweltering",
    "Scorching",
];

/// Random forecasts for the `days` days following today.
pub fn upcoming_forecasts(days: i64) -> Vec<WeatherForecast> {
    let mut rng = rand::rng();
    let today = OffsetDateTime::now_utc().date();
    (1..=days)
        .map(|offset| {
            let date = today.saturating_add(Duration::days(offset));
            WeatherForecast::new(
                date.to_string(),
                rng.random_range(-20..55),
                SUMMARIES[rng.random_range(0..SUMMARIES.len())],
            )
        })
        .collect()
}
