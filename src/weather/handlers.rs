use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use super::{title_case, WeatherError, WeatherReading};
use crate::display::WeatherCard;
use crate::extractors::CityParam;
use crate::theme::{theme_for, ConditionTheme};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// A reading together with its rendered card
#[derive(Debug, Serialize)]
pub struct WeatherLookup {
    pub reading: WeatherReading,
    pub card: WeatherCard,
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Current weather for the path/query city, or the default city
///
/// GET /weather, GET /weather/{city}
pub async fn get_weather(
    State(state): State<AppState>,
    city: CityParam,
) -> Result<Json<WeatherLookup>, WeatherError> {
    let city = city.or_default(state.config.default_city.clone());
    let reading = state.weather.current(&city).await?;

    state.recent.lock().await.record(&title_case(&city));
    if let Err(e) = state
        .history
        .record(&reading.city, reading.temperature, &reading.description)
        .await
    {
        tracing::warn!(error = %e, "Failed to save weather history");
    }

    let card = WeatherCard::from_reading(&reading);
    Ok(Json(WeatherLookup { reading, card }))
}

/// Glyph and colors for a condition string
///
/// GET /theme/{condition}
pub async fn get_theme(Path(condition): Path<String>) -> Json<ConditionTheme> {
    Json(*theme_for(&condition))
}

/// Preset cities offered for quick selection
///
/// GET /cities
pub async fn get_cities(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.config.cities.clone())
}
