use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::Serialize;

use crate::theme::{theme_for, ConditionTheme, DEFAULT_THEME};
use crate::weather::{capitalize, title_case, WeatherError, WeatherReading};

pub const PLACEHOLDER: &str = "--";
pub const NOT_FOUND_TEXT: &str = "City not found";
pub const FAILED_TEXT: &str = "Error fetching data";
pub const LOADING_TEXT: &str = "Loading...";

/// What the card is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardState {
    Reading,
    Loading,
    NotFound,
    Failed,
}

/// Display-ready strings for one reading or placeholder
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherCard {
    pub state: CardState,
    pub city: String,
    pub description: String,
    pub temperature: String,
    pub details: Vec<String>,
    pub theme: ConditionTheme,
}

impl WeatherCard {
    pub fn from_reading(reading: &WeatherReading) -> Self {
        let condition = if reading.condition.is_empty() {
            &reading.description
        } else {
            &reading.condition
        };

        let city = match &reading.country {
            Some(country) => format!("{}, {}", reading.city, country),
            None => reading.city.clone(),
        };

        Self {
            state: CardState::Reading,
            city,
            description: capitalize(&reading.description),
            temperature: format_temperature(reading.temperature),
            details: details(reading),
            theme: *theme_for(condition),
        }
    }

    pub fn not_found(city: &str) -> Self {
        Self::placeholder(CardState::NotFound, city, NOT_FOUND_TEXT)
    }

    pub fn failed(city: &str) -> Self {
        Self::placeholder(CardState::Failed, city, FAILED_TEXT)
    }

    pub fn loading(city: &str) -> Self {
        Self::placeholder(CardState::Loading, city, LOADING_TEXT)
    }

    /// Card for the result of a lookup
    pub fn from_outcome(city: &str, outcome: &Result<WeatherReading, WeatherError>) -> Self {
        match outcome {
            Ok(reading) => Self::from_reading(reading),
            Err(WeatherError::NotFound(_)) => Self::not_found(city),
            Err(_) => Self::failed(city),
        }
    }

    fn placeholder(state: CardState, city: &str, text: &str) -> Self {
        Self {
            state,
            city: title_case(city),
            description: text.to_string(),
            temperature: PLACEHOLDER.to_string(),
            details: Vec::new(),
            theme: DEFAULT_THEME,
        }
    }
}

pub fn format_temperature(celsius: f64) -> String {
    format!("{:.1}°C", celsius)
}

fn details(reading: &WeatherReading) -> Vec<String> {
    let mut lines = vec![
        format!("Feels like: {}", format_temperature(reading.feels_like)),
        format!("Humidity: {}%", reading.humidity),
        match reading.wind_direction {
            Some(deg) => format!("Wind: {} m/s {}", reading.wind_speed, compass(deg)),
            None => format!("Wind: {} m/s", reading.wind_speed),
        },
    ];

    if reading.pressure > 0 {
        lines.push(format!("Pressure: {} hPa", reading.pressure));
    }
    if reading.visibility > 0 {
        lines.push(format!(
            "Visibility: {:.1} km",
            f64::from(reading.visibility) / 1000.0
        ));
    }
    lines.push(format!("Clouds: {}%", reading.clouds));

    let offset = FixedOffset::east_opt(reading.timezone_offset).unwrap_or_else(|| Utc.fix());
    if let Some(sunrise) = reading.sunrise {
        lines.push(format!("Sunrise: {}", local_time(sunrise, offset)));
    }
    if let Some(sunset) = reading.sunset {
        lines.push(format!("Sunset: {}", local_time(sunset, offset)));
    }

    lines
}

fn local_time(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset).format("%H:%M").to_string()
}

/// Eight-point compass direction for a bearing in degrees
pub fn compass(deg: u32) -> &'static str {
    const POINTS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];
    let index = ((f64::from(deg % 360) + 22.5) / 45.0) as usize % 8;
    POINTS[index]
}
