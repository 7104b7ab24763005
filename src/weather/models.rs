use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unit system sent with every request
pub const UNITS: &str = "metric";

// ============================================================================
// Reading (what the rest of the program works with)
// ============================================================================

/// One parsed observation for a city at request time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReading {
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u32,
    pub pressure: u32,
    pub wind_speed: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_direction: Option<u32>,
    pub visibility: u32,
    pub clouds: u32,
    /// Short category label, e.g. "Rain"
    pub condition: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunrise: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunset: Option<DateTime<Utc>>,
    /// Shift in seconds from UTC for the city
    pub timezone_offset: i32,
}

impl WeatherReading {
    /// Build a reading from the upstream body. `requested` names the city when
    /// the body carries no name of its own.
    pub(crate) fn from_api(requested: &str, data: OpenWeatherMapResponse) -> Self {
        let condition = data.weather.into_iter().next().unwrap_or_default();

        let city = if data.name.trim().is_empty() {
            title_case(requested)
        } else {
            data.name
        };

        Self {
            city,
            country: non_empty(data.sys.country),
            temperature: data.main.temp,
            feels_like: data.main.feels_like,
            humidity: data.main.humidity,
            pressure: data.main.pressure,
            wind_speed: data.wind.speed,
            wind_direction: data.wind.deg,
            visibility: data.visibility,
            clouds: data.clouds.all,
            condition: condition.main,
            description: condition.description,
            icon: non_empty(condition.icon),
            sunrise: timestamp(data.sys.sunrise),
            sunset: timestamp(data.sys.sunset),
            timezone_offset: data.timezone,
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn timestamp(secs: Option<i64>) -> Option<DateTime<Utc>> {
    secs.filter(|s| *s > 0)
        .and_then(|s| DateTime::from_timestamp(s, 0))
}

/// Capitalize the first letter of every word. Any non-letter starts a new
/// word, so "winston-salem" becomes "Winston-Salem".
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut word_start = true;
    for c in input.trim().chars() {
        if c.is_alphabetic() {
            if word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            word_start = false;
        } else {
            out.push(c);
            word_start = true;
        }
    }
    out
}

/// Uppercase the first letter and lowercase the rest
pub fn capitalize(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

// ============================================================================
// OpenWeatherMap API Models (Internal)
// ============================================================================
// Every field defaults so a sparse body still yields a reading.

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct OpenWeatherMapResponse {
    pub name: String,
    pub sys: SysInfo,
    pub main: MainInfo,
    pub weather: Vec<WeatherInfo>,
    pub wind: WindInfo,
    pub clouds: CloudsInfo,
    pub visibility: u32,
    pub timezone: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct SysInfo {
    pub country: String,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct MainInfo {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u32,
    pub pressure: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct WeatherInfo {
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct WindInfo {
    pub speed: f64,
    pub deg: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct CloudsInfo {
    pub all: u32,
}

/// Error body OpenWeatherMap sends with non-success statuses
#[derive(Debug, Deserialize)]
pub(crate) struct OpenWeatherMapError {
    pub message: String,
}
