use async_trait::async_trait;
use axum::http::StatusCode;
use reqwest::Client;
use thiserror::Error;

use super::models::{OpenWeatherMapError, OpenWeatherMapResponse, WeatherReading, UNITS};
use crate::display::{FAILED_TEXT, NOT_FOUND_TEXT};
use crate::error::HttpError;
use crate::impl_into_response;

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("City name must not be empty")]
    InputInvalid,

    #[error("City not found: {0}")]
    NotFound(String),

    #[error("Failed to fetch weather data: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid API response: {0}")]
    ParseFailure(String),

    #[error("API error ({status}): {message}")]
    Upstream { status: u16, message: String },
}

impl HttpError for WeatherError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InputInvalid => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Transport(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            Self::Transport(_) => StatusCode::BAD_GATEWAY,
            Self::ParseFailure(_) => StatusCode::BAD_GATEWAY,
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InputInvalid => "INVALID_CITY",
            Self::NotFound(_) => "CITY_NOT_FOUND",
            Self::Transport(_) => "REQUEST_ERROR",
            Self::ParseFailure(_) => "INVALID_RESPONSE",
            Self::Upstream { .. } => "API_ERROR",
        }
    }

    fn display_text(&self) -> Option<&'static str> {
        match self {
            Self::InputInvalid => None,
            Self::NotFound(_) => Some(NOT_FOUND_TEXT),
            _ => Some(FAILED_TEXT),
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Upstream { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl_into_response!(WeatherError);

/// Parameters for a single current-weather request
#[derive(Debug, Clone)]
pub struct WeatherQuery<'a> {
    pub city: &'a str,
    pub api_key: &'a str,
}

impl<'a> WeatherQuery<'a> {
    /// Validate the city; blank input never reaches the network
    pub fn new(city: &'a str, api_key: &'a str) -> Result<Self, WeatherError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::InputInvalid);
        }
        Ok(Self { city, api_key })
    }

    pub fn params(&self) -> [(&'static str, &str); 3] {
        [("q", self.city), ("appid", self.api_key), ("units", UNITS)]
    }
}

/// Anything that can produce a reading for a city
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current(&self, city: &str) -> Result<WeatherReading, WeatherError>;
}

pub struct WeatherService {
    client: Client,
    api_key: String,
    base_url: String,
}

impl WeatherService {
    pub fn new(client: Client, api_key: &str, base_url: &str) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.to_string(),
        }
    }

    /// One GET per call; no retries.
    pub async fn get_weather(&self, city: &str) -> Result<WeatherReading, WeatherError> {
        let query = WeatherQuery::new(city, &self.api_key)?;
        tracing::debug!(city = %query.city, units = UNITS, "Fetching weather data");

        // Query builder handles URL encoding of spaces and special chars
        let response = self
            .client
            .get(&self.base_url)
            .query(&query.params())
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(status = %status, "Received API response");

        let body = response.text().await?;
        let reading = classify_response(query.city, status, &body)?;

        tracing::info!(
            city = %reading.city,
            temp = %reading.temperature,
            condition = %reading.condition,
            "Weather data fetched successfully"
        );

        Ok(reading)
    }
}

#[async_trait]
impl WeatherSource for WeatherService {
    async fn current(&self, city: &str) -> Result<WeatherReading, WeatherError> {
        self.get_weather(city).await
    }
}

/// Turn an upstream status and body into a reading or a classified failure
pub fn classify_response(
    city: &str,
    status: StatusCode,
    body: &str,
) -> Result<WeatherReading, WeatherError> {
    if status == StatusCode::NOT_FOUND {
        return Err(WeatherError::NotFound(city.to_string()));
    }

    if !status.is_success() {
        let message = serde_json::from_str::<OpenWeatherMapError>(body)
            .map(|e| e.message)
            .unwrap_or_else(|_| format!("HTTP {}", status.as_u16()));
        return Err(WeatherError::Upstream {
            status: status.as_u16(),
            message,
        });
    }

    let data: OpenWeatherMapResponse =
        serde_json::from_str(body).map_err(|e| WeatherError::ParseFailure(e.to_string()))?;

    Ok(WeatherReading::from_api(city, data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, routing::get, Router};
    use std::collections::HashMap;
    use std::time::Duration;

    const LAHORE_BODY: &str = r#"{"main":{"temp":30.5,"humidity":40},"weather":[{"description":"clear sky","main":"Clear"}],"wind":{"speed":3.2}}"#;

    #[test]
    fn test_classify_success_extracts_fields() {
        let reading = classify_response("Lahore", StatusCode::OK, LAHORE_BODY).unwrap();
        assert_eq!(reading.city, "Lahore");
        assert_eq!(reading.temperature, 30.5);
        assert_eq!(reading.humidity, 40);
        assert_eq!(reading.wind_speed, 3.2);
        assert_eq!(reading.condition, "Clear");
        assert_eq!(reading.description, "clear sky");
        // Missing fields default to zero
        assert_eq!(reading.pressure, 0);
        assert_eq!(reading.feels_like, 0.0);
        assert_eq!(reading.country, None);
    }

    #[test]
    fn test_classify_full_body() {
        let body = r#"{
            "name": "London",
            "sys": {"country": "GB", "sunrise": 1700000000, "sunset": 1700030000},
            "main": {"temp": 11.2, "feels_like": 9.8, "humidity": 81, "pressure": 1009},
            "weather": [{"main": "Rain", "description": "light rain", "icon": "10d"}],
            "wind": {"speed": 5.1, "deg": 240},
            "clouds": {"all": 90},
            "visibility": 8000,
            "timezone": 0
        }"#;

        let reading = classify_response("london", StatusCode::OK, body).unwrap();
        assert_eq!(reading.city, "London");
        assert_eq!(reading.country.as_deref(), Some("GB"));
        assert_eq!(reading.pressure, 1009);
        assert_eq!(reading.wind_direction, Some(240));
        assert_eq!(reading.clouds, 90);
        assert_eq!(reading.visibility, 8000);
        assert_eq!(reading.icon.as_deref(), Some("10d"));
        assert!(reading.sunset.is_some());
    }

    #[test]
    fn test_classify_not_found() {
        let body = r#"{"cod":"404","message":"city not found"}"#;
        let err = classify_response("Atlantis", StatusCode::NOT_FOUND, body).unwrap_err();
        assert!(matches!(err, WeatherError::NotFound(ref c) if c == "Atlantis"));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_classify_upstream_error_uses_api_message() {
        let body = r#"{"cod":401,"message":"Invalid API key"}"#;
        let err = classify_response("Lahore", StatusCode::UNAUTHORIZED, body).unwrap_err();
        match err {
            WeatherError::Upstream { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid API key");
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_upstream_error_without_body() {
        let err = classify_response("Lahore", StatusCode::BAD_GATEWAY, "").unwrap_err();
        assert!(matches!(err, WeatherError::Upstream { ref message, .. } if message == "HTTP 502"));
    }

    #[test]
    fn test_classify_malformed_body() {
        let err = classify_response("Lahore", StatusCode::OK, "<html>oops</html>").unwrap_err();
        assert!(matches!(err, WeatherError::ParseFailure(_)));

        let err = classify_response("Lahore", StatusCode::OK, r#"{"main":{"temp":"hot"}}"#)
            .unwrap_err();
        assert!(matches!(err, WeatherError::ParseFailure(_)));
    }

    #[test]
    fn test_error_body_carries_card_text() {
        use crate::error::ErrorResponse;

        let body = ErrorResponse::from_error(&WeatherError::NotFound("Atlantis".to_string()));
        assert_eq!(body.code, "CITY_NOT_FOUND");
        assert_eq!(body.display, Some("City not found"));
        assert!(!body.retryable);

        let throttled = WeatherError::Upstream {
            status: 429,
            message: "Too many requests".to_string(),
        };
        let body = ErrorResponse::from_error(&throttled);
        assert_eq!(body.display, Some("Error fetching data"));
        assert!(body.retryable);

        let bad_key = WeatherError::Upstream {
            status: 401,
            message: "Invalid API key".to_string(),
        };
        assert!(!bad_key.retryable());

        let body = ErrorResponse::from_error(&WeatherError::InputInvalid);
        assert_eq!(body.display, None);
        assert!(!body.retryable);
    }

    #[test]
    fn test_query_rejects_blank_city() {
        assert!(matches!(
            WeatherQuery::new("   ", "key"),
            Err(WeatherError::InputInvalid)
        ));
    }

    #[test]
    fn test_query_params() {
        let query = WeatherQuery::new(" New York ", "key").unwrap();
        assert_eq!(
            query.params(),
            [("q", "New York"), ("appid", "key"), ("units", "metric")]
        );
    }

    async fn spawn_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/data/2.5/weather", addr)
    }

    async fn fake_weather(Query(params): Query<HashMap<String, String>>) -> (StatusCode, String) {
        if params.get("appid").map(String::as_str) != Some("test-key")
            || params.get("units").map(String::as_str) != Some("metric")
        {
            return (
                StatusCode::UNAUTHORIZED,
                r#"{"message":"Invalid API key"}"#.to_string(),
            );
        }
        match params.get("q").map(String::as_str) {
            Some("Lahore") => (StatusCode::OK, LAHORE_BODY.to_string()),
            _ => (
                StatusCode::NOT_FOUND,
                r#"{"cod":"404","message":"city not found"}"#.to_string(),
            ),
        }
    }

    #[tokio::test]
    async fn test_get_weather_against_fake_upstream() {
        let url = spawn_upstream(Router::new().route("/data/2.5/weather", get(fake_weather))).await;
        let service = WeatherService::new(Client::new(), "test-key", &url);

        let reading = service.get_weather("Lahore").await.unwrap();
        assert_eq!(reading.temperature, 30.5);
        assert_eq!(reading.description, "clear sky");

        let err = service.current("Nowhere").await.unwrap_err();
        assert!(matches!(err, WeatherError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_get_weather_wrong_key_is_upstream_error() {
        let url = spawn_upstream(Router::new().route("/data/2.5/weather", get(fake_weather))).await;
        let service = WeatherService::new(Client::new(), "bad-key", &url);

        let err = service.get_weather("Lahore").await.unwrap_err();
        assert!(matches!(err, WeatherError::Upstream { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_get_weather_blank_city_skips_request() {
        // Nothing listens here; a request would fail with Transport
        let service = WeatherService::new(Client::new(), "key", "http://127.0.0.1:9/weather");
        let err = service.get_weather("").await.unwrap_err();
        assert!(matches!(err, WeatherError::InputInvalid));
    }

    #[tokio::test]
    async fn test_get_weather_connection_refused_is_transport() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = format!("http://{}/data/2.5/weather", addr);
        let service = WeatherService::new(Client::new(), "key", &url);
        let err = service.get_weather("Lahore").await.unwrap_err();
        assert!(matches!(err, WeatherError::Transport(_)));
        assert_eq!(err.error_code(), "REQUEST_ERROR");
        assert!(err.retryable());
    }

    #[tokio::test]
    async fn test_get_weather_timeout_is_transport() {
        let router = Router::new().route(
            "/data/2.5/weather",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                LAHORE_BODY
            }),
        );
        let url = spawn_upstream(router).await;
        let client = Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .unwrap();
        let service = WeatherService::new(client, "key", &url);

        let err = service.get_weather("Lahore").await.unwrap_err();
        assert!(matches!(err, WeatherError::Transport(ref e) if e.is_timeout()));
        assert_eq!(err.status_code(), StatusCode::GATEWAY_TIMEOUT);
    }
}
